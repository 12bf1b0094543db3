//! Convenience result type alias for Together.

use crate::error::AppError;

/// A specialized `Result` type for Together operations.
pub type AppResult<T> = Result<T, AppError>;
