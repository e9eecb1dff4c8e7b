//! Bundle path validation
//!
//! A bundle is a directory whose final path component ends with the bundle
//! extension (`.fapp`). [`validate`] is the only way to obtain a [`BundlePath`].

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::BundleLayout;
use crate::error::{Result, bundle};

/// A validated bundle directory
///
/// Always absolute and valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlePath {
    path: PathBuf,
}

impl BundlePath {
    /// The bundle path as text, used for placeholder substitution
    pub fn as_str(&self) -> &str {
        // Checked to be UTF-8 in `validate`.
        self.path.to_str().unwrap_or_default()
    }

    /// Path of a file or directory relative to the bundle root
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.path.join(relative)
    }
}

impl fmt::Display for BundlePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Validate that `input` is an existing directory carrying the bundle extension.
///
/// Checks run in order: existence, directory, extension. Relative inputs are made
/// absolute against the current directory without resolving symlinks, and a
/// trailing separator is dropped.
pub fn validate(input: &Path, layout: &BundleLayout) -> Result<BundlePath> {
    let display = input.display().to_string();

    let metadata = std::fs::metadata(input).map_err(|_| bundle::not_found(&display))?;
    if !metadata.is_dir() {
        return Err(bundle::not_a_directory(display));
    }

    if !has_extension(input, layout.extension) {
        return Err(bundle::invalid(
            display,
            format!("directory name does not end with '{}'", layout.extension),
        ));
    }

    let path: PathBuf = std::path::absolute(input)
        .map_err(|e| bundle::invalid(&display, e.to_string()))?
        .components()
        .collect();
    if path.to_str().is_none() {
        return Err(bundle::invalid(display, "path is not valid UTF-8"));
    }

    tracing::info!(bundle = %path.display(), "validated bundle");
    Ok(BundlePath { path })
}

/// True when the final component ends with `extension` and is longer than it.
fn has_extension(path: &Path, extension: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.len() > extension.len() && name.ends_with(extension))
}
