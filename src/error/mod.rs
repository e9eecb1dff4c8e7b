//! Error types and handling for fapp
//!
//! Uses `thiserror` for error definitions and `miette` for diagnostic codes and help.
//!
//! This module is organized into sub-modules by error domain:
//! - [`bundle`]: Bundle validation errors
//! - [`manifest`]: Manifest read/parse errors
//! - [`launch`]: Composition and process replacement errors
//!
//! Every error is terminal for a launch attempt. The process exit status for each
//! variant is decided by [`FappError::exit_code`].

pub mod bundle;
pub mod launch;
pub mod manifest;


use miette::Diagnostic;
use thiserror::Error;

/// Exit status used when the executable could not be found.
pub const EXIT_EXEC_NOT_FOUND: i32 = 127;

/// Exit status used when the executable exists but could not be run.
pub const EXIT_EXEC_FAILED: i32 = 126;

/// Why a process replacement attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecFailure {
    /// The executable does not exist
    NotFound,
    /// The executable exists but is not a runnable file
    NotExecutable,
    /// The OS rejected the exec call, or the plan could not be serialized
    Os,
}

/// Main error type for fapp operations
#[derive(Error, Diagnostic, Debug)]
pub enum FappError {
    #[error("{message}")]
    #[diagnostic(code(fapp::usage))]
    Usage { message: String },

    // Bundle errors
    #[error("Bundle not found: {path}")]
    #[diagnostic(
        code(fapp::bundle::not_found),
        help("Check that the bundle path exists")
    )]
    BundleNotFound { path: String },

    #[error("Bundle path is not a directory: {path}")]
    #[diagnostic(code(fapp::bundle::not_a_directory))]
    NotADirectory { path: String },

    #[error("Invalid bundle '{path}': {reason}")]
    #[diagnostic(
        code(fapp::bundle::invalid),
        help("A bundle is a directory whose name ends with '.fapp', e.g. demo.fapp")
    )]
    InvalidBundle { path: String, reason: String },

    // Manifest errors
    #[error("Failed to read manifest: {path}: {reason}")]
    #[diagnostic(code(fapp::manifest::read_failed))]
    ManifestReadFailed { path: String, reason: String },

    #[error("Failed to parse manifest: {path}: {reason}")]
    #[diagnostic(code(fapp::manifest::parse_failed))]
    ManifestParseFailed { path: String, reason: String },

    #[error("Manifest field '{field}' is missing or is not a string: {path}")]
    #[diagnostic(
        code(fapp::manifest::missing_field),
        help("Declare the executable, e.g. {{\"exe\": \"my_app\"}}")
    )]
    MissingField { path: String, field: String },

    // Launch errors
    #[error("Out of memory: {message}")]
    #[diagnostic(code(fapp::launch::allocation_failed))]
    AllocationFailed { message: String },

    #[error("Failed to execute '{path}': {reason}")]
    #[diagnostic(code(fapp::launch::exec_failed))]
    ExecFailed {
        path: String,
        reason: String,
        failure: ExecFailure,
    },
}

impl FappError {
    /// Process exit status for this error.
    ///
    /// Without `strict`, usage, bundle validation, manifest parse and missing-field
    /// failures exit with status 0, as the tool always has. With `strict`, every
    /// failure exits non-zero.
    pub fn exit_code(&self, strict: bool) -> i32 {
        match self {
            FappError::Usage { .. } => {
                if strict {
                    2
                } else {
                    0
                }
            }
            FappError::BundleNotFound { .. }
            | FappError::NotADirectory { .. }
            | FappError::InvalidBundle { .. }
            | FappError::ManifestParseFailed { .. }
            | FappError::MissingField { .. } => i32::from(strict),
            FappError::ManifestReadFailed { .. } | FappError::AllocationFailed { .. } => 1,
            FappError::ExecFailed { failure, .. } => match failure {
                ExecFailure::NotFound => EXIT_EXEC_NOT_FOUND,
                ExecFailure::NotExecutable | ExecFailure::Os => EXIT_EXEC_FAILED,
            },
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, FappError>;
