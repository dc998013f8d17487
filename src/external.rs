//! External processes launched by the command-line layer: the dependency
//! install step after generation and `hexagen-<name>` plugins.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use log::debug;

use crate::error::{Error, Result};

/// Prefix every plugin executable name starts with.
pub const PLUGIN_PREFIX: &str = "hexagen-";

/// A command line with explicit arguments and an optional working directory.
///
/// Standard streams are inherited so the child talks to the user directly.
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    program: OsString,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
}

impl ExternalCommand {
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn current_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Human-readable rendering of the command line, used in messages.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs the command to completion and returns its exit status.
    ///
    /// # Errors
    /// * `Error::ExternalCommandError` if the process cannot be spawned
    pub fn run(&self) -> Result<ExitStatus> {
        debug!("Running external command: {}", self.display());
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        command
            .status()
            .map_err(|e| Error::ExternalCommandError {
                command: self.display(),
                reason: e.to_string(),
            })
    }

    /// Like [`ExternalCommand::run`], but a non-zero exit is also an error.
    pub fn run_checked(&self) -> Result<()> {
        let status = self.run()?;
        if !status.success() {
            return Err(Error::ExternalCommandError {
                command: self.display(),
                reason: format!("exited with {status}"),
            });
        }
        Ok(())
    }
}

/// `go mod tidy` in the generated root.
pub fn install_command<P: AsRef<Path>>(root: P) -> ExternalCommand {
    ExternalCommand::new("go")
        .args(["mod", "tidy"])
        .current_dir(root)
}

fn plugin_file_name(name: &str) -> String {
    format!("{PLUGIN_PREFIX}{name}{}", env::consts::EXE_SUFFIX)
}

/// Looks for `hexagen-<name>` in each directory of `search_path`.
///
/// `search_path` uses the platform `PATH` format.
pub fn find_plugin_in(name: &str, search_path: &OsStr) -> Option<PathBuf> {
    let file_name = plugin_file_name(name);
    env::split_paths(search_path)
        .map(|dir| dir.join(&file_name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Looks for `hexagen-<name>` on `PATH`.
pub fn find_plugin(name: &str) -> Option<PathBuf> {
    env::var_os("PATH").and_then(|path| find_plugin_in(name, &path))
}

/// Runs the plugin for `argv[0]`, forwarding the remaining arguments.
///
/// Returns the plugin's exit code so the caller can exit with it.
pub fn delegate_to_plugin(argv: &[OsString]) -> Result<i32> {
    let (name, rest) = argv
        .split_first()
        .ok_or_else(|| Error::PluginNotFound(String::new()))?;
    let name = name.to_string_lossy();
    let plugin = find_plugin(&name).ok_or_else(|| Error::PluginNotFound(name.to_string()))?;

    let status = ExternalCommand::new(&plugin).args(rest).run()?;
    // a signal-terminated child has no code
    Ok(status.code().unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_display() {
        let cmd = ExternalCommand::new("go").args(["mod", "tidy"]);
        assert_eq!(cmd.display(), "go mod tidy");
    }

    #[test]
    fn test_install_command() {
        let cmd = install_command("/tmp/project");
        assert_eq!(cmd.display(), "go mod tidy");
        assert_eq!(cmd.current_dir.as_deref(), Some(Path::new("/tmp/project")));
    }

    #[test]
    fn test_missing_program_is_error() {
        let result = ExternalCommand::new("hexagen-definitely-not-installed").run();
        assert!(matches!(result, Err(Error::ExternalCommandError { .. })));
    }

    fn write_plugin(dir: &Path, name: &str, executable: bool) -> PathBuf {
        let plugin = dir.join(plugin_file_name(name));
        std::fs::write(&plugin, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = if executable { 0o755 } else { 0o644 };
            std::fs::set_permissions(&plugin, std::fs::Permissions::from_mode(mode)).unwrap();
        }
        #[cfg(not(unix))]
        let _ = executable;
        plugin
    }

    #[test]
    fn test_find_plugin_in() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let plugin = write_plugin(second.path(), "docs", true);
        std::fs::create_dir(first.path().join(plugin_file_name("dir"))).unwrap();

        let search = env::join_paths([first.path(), second.path()]).unwrap();
        assert_eq!(find_plugin_in("docs", &search), Some(plugin));
        assert_eq!(find_plugin_in("dir", &search), None);
        assert_eq!(find_plugin_in("absent", &search), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_plugin_skips_non_executable_files() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write_plugin(first.path(), "lint", false);
        let plugin = write_plugin(second.path(), "lint", true);

        let search = env::join_paths([first.path(), second.path()]).unwrap();
        assert_eq!(find_plugin_in("lint", &search), Some(plugin));

        let only_first = env::join_paths([first.path()]).unwrap();
        assert_eq!(find_plugin_in("lint", &only_first), None);
    }

    #[test]
    fn test_unknown_plugin() {
        let argv = vec![OsString::from("hexagen-test-no-such-plugin")];
        assert!(matches!(delegate_to_plugin(&argv), Err(Error::PluginNotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_reports_exit_status() {
        let ok = ExternalCommand::new("sh").args(["-c", "exit 0"]);
        assert!(ok.run_checked().is_ok());

        let failing = ExternalCommand::new("sh").args(["-c", "exit 3"]);
        assert_eq!(failing.run().unwrap().code(), Some(3));
        assert!(matches!(
            failing.run_checked(),
            Err(Error::ExternalCommandError { .. })
        ));
    }
}
