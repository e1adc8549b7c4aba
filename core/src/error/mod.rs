#[allow(clippy::module_inception)]
pub mod error;
pub mod http;

pub use error::{CliError, ConfigError};
pub use http::{ApiError, ApiErrorKind};
