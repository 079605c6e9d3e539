//! Input validation and error types

pub mod data;
pub mod error;

pub use data::FixValidator;
pub use error::{ConfigError, ConfigResult, FixError};
