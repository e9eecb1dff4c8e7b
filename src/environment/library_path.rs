//! Library search path construction

use std::ffi::{OsStr, OsString};

use crate::bundle::BundlePath;

/// Separator between loader search-path entries.
pub const SEARCH_PATH_SEPARATOR: &str = ":";

/// Build the loader search path for `bundle`.
///
/// The bundle's library directory comes first, followed by the inherited value
/// when one is set. An empty inherited value counts as unset.
pub fn build_library_path(
    bundle: &BundlePath,
    lib_dir: &str,
    inherited: Option<&OsStr>,
) -> OsString {
    let mut value = bundle.join(lib_dir).into_os_string();
    if let Some(inherited) = inherited.filter(|v| !v.is_empty()) {
        value.push(SEARCH_PATH_SEPARATOR);
        value.push(inherited);
    }
    value
}
