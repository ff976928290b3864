pub mod file_format;
pub mod float_ext;
pub mod log_setup;

pub use file_format::{load_from_file, SerdeFormat, SerdeFormatError, SerdeFormatResult};
pub use float_ext::FloatExt;
pub use log_setup::setup_logging;

pub const EPSILON: f64 = 1e-6;
