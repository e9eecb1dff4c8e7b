//! Process replacement
//!
//! [`ExecReplacer`] replaces the current process image with the planned
//! executable and never returns on success. [`DryRunReplacer`] prints the plan
//! instead.

use std::fmt::Write as _;
#[cfg(unix)]
use std::path::Path;

use console::Style;

use crate::error::{ExecFailure, Result, launch};

use super::LaunchPlan;

/// Final stage of a launch
pub trait ProcessReplacer {
    /// Transfer execution according to `plan`.
    fn replace(&self, plan: &LaunchPlan) -> Result<()>;
}

/// Replaces the current process via `execve`
#[derive(Debug, Default)]
pub struct ExecReplacer;

impl ProcessReplacer for ExecReplacer {
    #[cfg(unix)]
    fn replace(&self, plan: &LaunchPlan) -> Result<()> {
        use nix::errno::Errno;
        use std::ffi::CString;

        ensure_executable(&plan.executable)?;

        let path = c_string(plan.executable.as_os_str(), &plan.executable)?;
        let argv = plan
            .argv
            .iter()
            .map(|arg| c_string(arg, &plan.executable))
            .collect::<Result<Vec<CString>>>()?;
        let envp = plan
            .environment
            .to_envp()
            .iter()
            .map(|entry| c_string(entry, &plan.executable))
            .collect::<Result<Vec<CString>>>()?;

        let errno = match nix::unistd::execve(&path, &argv, &envp) {
            Ok(never) => match never {},
            Err(errno) => errno,
        };
        let failure = match errno {
            Errno::ENOENT | Errno::ENOTDIR => ExecFailure::NotFound,
            Errno::EACCES | Errno::EPERM | Errno::ENOEXEC => ExecFailure::NotExecutable,
            _ => ExecFailure::Os,
        };
        Err(launch::exec_failed(
            plan.executable.display().to_string(),
            errno.desc(),
            failure,
        ))
    }

    #[cfg(not(unix))]
    fn replace(&self, plan: &LaunchPlan) -> Result<()> {
        Err(launch::exec_failed(
            plan.executable.display().to_string(),
            "process replacement is only supported on Unix",
            ExecFailure::Os,
        ))
    }
}

/// Prints the launch plan to stdout instead of replacing the process
#[derive(Debug, Default)]
pub struct DryRunReplacer;

impl ProcessReplacer for DryRunReplacer {
    fn replace(&self, plan: &LaunchPlan) -> Result<()> {
        print!("{}", render_plan(plan));
        Ok(())
    }
}

/// Human-readable rendering of a plan, one value per line
pub fn render_plan(plan: &LaunchPlan) -> String {
    let label = Style::new().bold().green();
    let mut out = String::new();

    let _ = writeln!(out, "{} {}", label.apply_to("Bundle:"), plan.bundle);
    let _ = writeln!(
        out,
        "{} {}",
        label.apply_to("Executable:"),
        plan.executable.display()
    );
    let _ = writeln!(out, "{}", label.apply_to("Arguments:"));
    for arg in &plan.argv {
        let _ = writeln!(out, "  {}", arg.to_string_lossy());
    }
    let _ = writeln!(out, "{}", label.apply_to("Environment:"));
    if plan.environment.is_empty() {
        let _ = writeln!(out, "  (empty)");
    }
    for entry in plan.environment.to_envp() {
        let _ = writeln!(out, "  {}", entry.to_string_lossy());
    }
    out
}

/// Check that `path` is a regular file with an execute bit set.
#[cfg(unix)]
fn ensure_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let display = path.display().to_string();
    let metadata = std::fs::metadata(path).map_err(|e| {
        let failure = if e.kind() == std::io::ErrorKind::NotFound {
            ExecFailure::NotFound
        } else {
            ExecFailure::NotExecutable
        };
        launch::exec_failed(&display, e.to_string(), failure)
    })?;

    if !metadata.is_file() {
        return Err(launch::exec_failed(
            display,
            "not a regular file",
            ExecFailure::NotExecutable,
        ));
    }
    if metadata.permissions().mode() & 0o111 == 0 {
        return Err(launch::exec_failed(
            display,
            "file is not executable",
            ExecFailure::NotExecutable,
        ));
    }
    Ok(())
}

#[cfg(unix)]
fn c_string(value: &std::ffi::OsStr, executable: &Path) -> Result<std::ffi::CString> {
    use std::os::unix::ffi::OsStrExt;

    std::ffi::CString::new(value.as_bytes()).map_err(|_| {
        launch::exec_failed(
            executable.display().to_string(),
            format!(
                "argument or environment entry contains a NUL byte: {}",
                value.to_string_lossy()
            ),
            ExecFailure::Os,
        )
    })
}
