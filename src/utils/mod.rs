pub mod error;
pub mod validation;
pub mod formats;
pub mod fs;

pub use error::{OptimizerError, OptimizerResult, PathError, ValidationError};
pub use validation::validate_config;
pub use formats::{ImageFormat, format_from_extension, has_image_extension, IMAGE_EXTENSIONS};
pub use fs::{
    ensure_parent_dir,
    get_file_size,
    list_images,
    modified_at,
    temp_path,
};
