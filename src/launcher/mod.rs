//! Launch orchestration
//!
//! A launch runs these stages in order, stopping at the first error:
//! validate, read manifest, resolve executable, build library path,
//! compose environment, build argv, replace.
//!
//! [`prepare`] runs everything up to replacement and returns a [`LaunchPlan`];
//! [`launch`] hands that plan to a [`ProcessReplacer`].

pub mod replace;

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::bundle::{self, BundlePath};
use crate::config::BundleLayout;
use crate::environment::{self, EnvOverride, FinalEnvironment};
use crate::error::Result;
use crate::manifest::Manifest;

pub use replace::{DryRunReplacer, ExecReplacer, ProcessReplacer};

/// Everything a launch needs from the invoking process
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    /// Bundle path as given on the command line
    pub bundle: PathBuf,
    /// Arguments after the bundle path, forwarded verbatim
    pub args: Vec<OsString>,
    /// Environment of the invoking process, in order
    pub inherited: Vec<(OsString, OsString)>,
}

/// A fully resolved launch, ready for process replacement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub bundle: BundlePath,
    /// Absolute path of the executable inside the bundle
    pub executable: PathBuf,
    /// Argument vector; element 0 is `executable`
    pub argv: Vec<OsString>,
    pub environment: FinalEnvironment,
}

/// Run every stage before replacement.
pub fn prepare(layout: &BundleLayout, request: LaunchRequest) -> Result<LaunchPlan> {
    let LaunchRequest {
        bundle: input,
        args,
        inherited,
    } = request;

    tracing::debug!(bundle = %input.display(), "validating bundle");
    let bundle = bundle::validate(&input, layout)?;

    tracing::debug!("reading manifest");
    let manifest = Manifest::load(&bundle, layout)?;

    let executable = resolve_executable(&bundle, layout, &manifest.executable);
    tracing::info!(executable = %executable.display(), "resolved executable");

    let inherited_library_path = lookup(&inherited, layout.library_path_var).map(OsString::from);
    let library_path = environment::build_library_path(
        &bundle,
        layout.lib_dir,
        inherited_library_path.as_deref(),
    );

    let environment = environment::compose(
        inherited,
        &manifest.env_vars,
        &EnvOverride {
            key: layout.library_path_var.to_string(),
            value: library_path,
        },
        &bundle,
        layout.placeholder,
    )?;
    if let Some(library_path) = environment.get(layout.library_path_var) {
        tracing::info!(library_path = %library_path.to_string_lossy(), "combined library path");
    }

    let argv = build_argv(&executable, args);
    tracing::debug!(arguments = argv.len(), "built argument vector");

    Ok(LaunchPlan {
        bundle,
        executable,
        argv,
        environment,
    })
}

/// Prepare a launch and hand it to `replacer`.
///
/// With an exec replacer this only returns on failure.
pub fn launch(
    layout: &BundleLayout,
    request: LaunchRequest,
    replacer: &dyn ProcessReplacer,
) -> Result<()> {
    let plan = prepare(layout, request)?;
    tracing::debug!(executable = %plan.executable.display(), "replacing process");
    replacer.replace(&plan)
}

/// `<bundle>/<bin_dir>/<executable>`
///
/// The name is appended below the binary directory even when it starts with a
/// separator, so it never resolves outside the bundle. An empty name resolves to
/// the binary directory itself and fails at exec time.
pub fn resolve_executable(bundle: &BundlePath, layout: &BundleLayout, executable: &str) -> PathBuf {
    bundle
        .join(layout.bin_dir)
        .join(executable.trim_start_matches('/'))
}

/// The executable path followed by the forwarded arguments, in order.
pub fn build_argv(executable: &Path, args: Vec<OsString>) -> Vec<OsString> {
    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push(executable.as_os_str().to_os_string());
    argv.extend(args);
    argv
}

/// Last value of `key` in an ordered environment.
fn lookup<'a>(env: &'a [(OsString, OsString)], key: &str) -> Option<&'a OsStr> {
    env.iter()
        .rev()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_os_str())
}
