//! Bundle validation errors

use super::FappError;

/// Creates a bundle not found error
pub fn not_found(path: impl Into<String>) -> FappError {
    FappError::BundleNotFound { path: path.into() }
}

/// Creates a not-a-directory error
pub fn not_a_directory(path: impl Into<String>) -> FappError {
    FappError::NotADirectory { path: path.into() }
}

/// Creates an invalid bundle error
pub fn invalid(path: impl Into<String>, reason: impl Into<String>) -> FappError {
    FappError::InvalidBundle {
        path: path.into(),
        reason: reason.into(),
    }
}
