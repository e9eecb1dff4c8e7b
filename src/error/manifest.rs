//! Manifest errors

use super::FappError;

/// Creates a manifest read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> FappError {
    FappError::ManifestReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a manifest parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> FappError {
    FappError::ManifestParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a missing field error
pub fn missing_field(path: impl Into<String>, field: impl Into<String>) -> FappError {
    FappError::MissingField {
        path: path.into(),
        field: field.into(),
    }
}
