pub mod error;
pub mod validation;
pub mod formats;
pub mod bytes;

pub use error::{ConverterError, ConverterResult, ValidationError};
pub use validation::{validate_config, validate_quality, quality_from_percent};
pub use formats::{OutputFormat, converted_file_name};
pub use bytes::format_bytes;
