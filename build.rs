fn main() {
    // ── libvips linking ──────────────────────────────────────────────────────
    //
    // The libvips-rs bindings crate ships no build script of its own, so the
    // link directives come from here. Nothing is linked when the `libvips`
    // feature is off.
    //
    // The VIPS_DIR environment variable points at a libvips install prefix
    // (containing `lib/`) when it is not on the default linker search path.
    println!("cargo:rerun-if-env-changed=VIPS_DIR");
    println!("cargo:rerun-if-changed=build.rs");

    if std::env::var_os("CARGO_FEATURE_LIBVIPS").is_none() {
        return;
    }

    link_libvips();
}

fn link_libvips() {
    let lib_dir = std::env::var("VIPS_DIR")
        .ok()
        .map(|dir| std::path::Path::new(&dir).join("lib"));

    if let Some(lib_dir) = lib_dir.as_ref().filter(|dir| dir.exists()) {
        println!("cargo:rustc-link-search=native={}", lib_dir.display());
    }

    if cfg!(target_os = "windows") {
        // MSVC import libraries carry the `lib` prefix in the vips-dev bundle.
        println!("cargo:rustc-link-lib=dylib=libvips");
        println!("cargo:rustc-link-lib=dylib=libglib-2.0");
        println!("cargo:rustc-link-lib=dylib=libgobject-2.0");
    } else {
        // Linux: system libvips-dev package is sufficient. macOS: Homebrew vips.
        println!("cargo:rustc-link-lib=dylib=vips");
        println!("cargo:rustc-link-lib=dylib=glib-2.0");
        println!("cargo:rustc-link-lib=dylib=gobject-2.0");
    }
}
