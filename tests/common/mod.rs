//! Common test utilities for fapp integration tests

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A bundle directory inside a temporary directory
#[allow(dead_code)]
pub struct TestBundle {
    /// Temporary directory holding the bundle
    pub temp: TempDir,
    /// Path to the bundle root
    pub path: PathBuf,
}

impl TestBundle {
    /// Create an empty `demo.fapp` bundle
    pub fn new() -> Self {
        Self::named("demo.fapp")
    }

    /// Create an empty bundle directory with the given name
    pub fn named(name: &str) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join(name);
        std::fs::create_dir_all(&path).expect("Failed to create bundle directory");
        Self { temp, path }
    }

    /// Bundle path as text
    pub fn root(&self) -> &str {
        self.path.to_str().expect("Temp path is not UTF-8")
    }

    /// Write main.json
    pub fn write_manifest(&self, content: &str) {
        self.write_file("main.json", content);
    }

    /// Write a file relative to the bundle root
    pub fn write_file(&self, relative: &str, content: &str) {
        let file_path = self.path.join(relative);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Write an executable script to bin/<name>
    #[allow(dead_code)]
    pub fn write_executable(&self, name: &str, script: &str) -> PathBuf {
        let relative = format!("bin/{name}");
        self.write_file(&relative, script);
        let path = self.path.join(relative);
        make_executable(&path);
        path
    }

    /// Install a script that prints its arguments and selected variables
    #[allow(dead_code)]
    pub fn write_echo_executable(&self, name: &str) -> PathBuf {
        self.write_executable(
            name,
            "#!/bin/sh\n\
             echo \"ARG0=$0\"\n\
             for arg in \"$@\"; do echo \"ARG=$arg\"; done\n\
             echo \"FOO=$FOO\"\n\
             echo \"LD_LIBRARY_PATH=$LD_LIBRARY_PATH\"\n\
             echo \"KEEP=$KEEP\"\n",
        )
    }
}

impl Default for TestBundle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
#[allow(dead_code)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = std::fs::metadata(path)
        .expect("Failed to stat executable")
        .permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(path, permissions).expect("Failed to set permissions");
}

#[cfg(not(unix))]
#[allow(dead_code)]
fn make_executable(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_creation() {
        let bundle = TestBundle::new();
        assert!(bundle.path.is_dir());
        assert!(bundle.root().ends_with("demo.fapp"));
    }

    #[test]
    fn test_bundle_write_manifest() {
        let bundle = TestBundle::new();
        bundle.write_manifest(r#"{"exe": "demo_bin"}"#);
        assert!(bundle.path.join("main.json").exists());
    }
}
