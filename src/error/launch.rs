//! Launch errors

use super::{ExecFailure, FappError};

/// Creates a usage error
pub fn usage(message: impl Into<String>) -> FappError {
    FappError::Usage {
        message: message.into(),
    }
}

/// Creates an allocation failed error
pub fn allocation_failed(message: impl Into<String>) -> FappError {
    FappError::AllocationFailed {
        message: message.into(),
    }
}

/// Creates an exec failed error
pub fn exec_failed(
    path: impl Into<String>,
    reason: impl Into<String>,
    failure: ExecFailure,
) -> FappError {
    FappError::ExecFailed {
        path: path.into(),
        reason: reason.into(),
        failure,
    }
}
