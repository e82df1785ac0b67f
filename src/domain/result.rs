//! Result type alias for tempest-conf
//!
//! This module provides a convenient Result type alias that uses TempestError
//! as the error type.

use super::errors::TempestError;

/// Result type alias for tempest-conf operations
///
/// # Examples
///
/// ```
/// use tempest_conf::domain::result::Result;
/// use tempest_conf::domain::errors::TempestError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(TempestError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, TempestError>;
