use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::debug;
use walkdir::WalkDir;
use crate::utils::{OptimizerError, OptimizerResult};
use crate::utils::formats::has_image_extension;

/// Get file size in bytes
pub async fn get_file_size(path: impl AsRef<Path>) -> OptimizerResult<u64> {
    let path = path.as_ref();
    fs::metadata(path)
        .await
        .map(|m| m.len())
        .map_err(|e| OptimizerError::io_at(path, e))
}

/// Modification time of a file as a UTC instant.
pub fn modified_at(path: &Path) -> std::io::Result<DateTime<Utc>> {
    let modified = std::fs::metadata(path)?.modified()?;
    Ok(DateTime::<Utc>::from(modified))
}

/// Creates the parent directory of `path` (and its ancestors) if missing.
pub async fn ensure_parent_dir(path: &Path) -> OptimizerResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| OptimizerError::io_at(parent, e))?;
    }
    Ok(())
}

/// Sibling path with `.tmp` appended to the full file name.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Removes a file, ignoring a missing one.
pub async fn remove_if_exists(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            debug!("Could not remove {}: {}", path.display(), e);
        }
    }
}

/// Lazily lists every image file below `root`.
///
/// Recursive, sorted by file name within a directory, deduplicated, and
/// filtered to the image extensions. Entries that cannot be read are skipped.
/// When `exclude` is set, that subtree is not descended into.
pub fn list_images(root: &Path, exclude: Option<&Path>) -> impl Iterator<Item = PathBuf> + use<> {
    let exclude = exclude.map(Path::to_path_buf);
    let mut seen = HashSet::new();

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| match &exclude {
            Some(excluded) => entry.depth() == 0 || entry.path() != excluded.as_path(),
            None => true,
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && has_image_extension(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .filter(move |path| seen.insert(path.clone()))
}
