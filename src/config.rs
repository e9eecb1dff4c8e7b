//! Launch configuration
//!
//! [`BundleLayout`] holds the on-disk conventions every bundle follows.
//! [`LaunchOptions`] holds the per-invocation switches taken from the command line.

/// On-disk conventions of a `.fapp` bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleLayout {
    /// Required suffix of the bundle directory name
    pub extension: &'static str,
    /// Manifest file name at the bundle root
    pub manifest_file: &'static str,
    /// Directory holding executables, relative to the bundle root
    pub bin_dir: &'static str,
    /// Directory holding shared libraries, relative to the bundle root
    pub lib_dir: &'static str,
    /// Manifest field naming the executable
    pub exe_field: &'static str,
    /// Manifest field listing `KEY=VALUE` declarations
    pub env_field: &'static str,
    /// Token replaced with the bundle path in declared values
    pub placeholder: &'static str,
    /// Dynamic loader search-path variable
    pub library_path_var: &'static str,
}

impl Default for BundleLayout {
    fn default() -> Self {
        Self {
            extension: ".fapp",
            manifest_file: "main.json",
            bin_dir: "bin",
            lib_dir: "lib",
            exe_field: "exe",
            env_field: "env_vars",
            placeholder: "{ROOT_DIR}",
            library_path_var: "LD_LIBRARY_PATH",
        }
    }
}

/// Per-invocation launch switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Print the launch plan instead of replacing the process
    pub dry_run: bool,
    /// Exit non-zero on every failure
    pub strict: bool,
}
