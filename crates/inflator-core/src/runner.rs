//! External process execution
//!
//! Every collaborator binary (kustomize, sops, helm) is reached through the
//! [`CommandRunner`] trait so resolution and merge logic can be exercised
//! without the real tools installed.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::{Error, Result};

/// Exit status reported by [`ScriptedRunner`] for unscripted commands.
pub const UNSCRIPTED_STATUS: i32 = 127;

/// A process invocation: program, arguments, and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<str>) -> Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        let arg = path.to_string_lossy().into_owned();
        self.arg(arg)
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl std::fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        Self {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 0
    }

    /// Stdout on success, [`Error::ExternalTool`] otherwise.
    pub fn into_stdout(self, tool: &str) -> Result<String> {
        if self.is_success() {
            Ok(self.stdout)
        } else {
            Err(Error::ExternalTool {
                tool: tool.to_string(),
                status: self.status,
                stderr: self.stderr,
            })
        }
    }
}

/// Capability to run an external process to completion.
pub trait CommandRunner {
    /// Run `command`, capturing stdout and stderr.
    ///
    /// A non-zero exit is not an error at this level; only failing to start
    /// the process is.
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput>;
}

/// [`CommandRunner`] that spawns real processes and blocks until they exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        tracing::debug!(command = %command, cwd = ?command.cwd, "Running");

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        if let Some(cwd) = &command.cwd {
            cmd.current_dir(cwd);
        }

        let output = cmd.output().map_err(|source| Error::Spawn {
            tool: command.program.clone(),
            source,
        })?;

        Ok(ToolOutput {
            // Killed by a signal
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

type Matcher = Box<dyn Fn(&ToolCommand) -> bool>;

/// [`CommandRunner`] that replays canned outputs.
///
/// Rules are checked in the order they were added and the first match
/// answers. Unmatched commands exit with [`UNSCRIPTED_STATUS`]. Every
/// invocation is recorded for later inspection.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Vec<(Matcher, ToolOutput)>,
    calls: RefCell<Vec<ToolCommand>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer any command matching `matcher`.
    pub fn on(mut self, matcher: impl Fn(&ToolCommand) -> bool + 'static, output: ToolOutput) -> Self {
        self.rules.push((Box::new(matcher), output));
        self
    }

    /// Answer any invocation of `program`.
    pub fn on_program(self, program: &str, output: ToolOutput) -> Self {
        let program = program.to_string();
        self.on(move |cmd| cmd.program == program, output)
    }

    /// Answer invocations of `program` whose arguments contain `needle`.
    pub fn on_arg_containing(self, program: &str, needle: &str, output: ToolOutput) -> Self {
        let program = program.to_string();
        let needle = needle.to_string();
        self.on(
            move |cmd| cmd.program == program && cmd.args.iter().any(|a| a.contains(&needle)),
            output,
        )
    }

    /// Commands run so far, oldest first.
    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        self.calls.borrow_mut().push(command.clone());

        let output = self
            .rules
            .iter()
            .find(|(matcher, _)| matcher(command))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| {
                ToolOutput::failure(UNSCRIPTED_STATUS, format!("no scripted response for `{command}`"))
            });
        Ok(output)
    }
}

impl std::fmt::Debug for ScriptedRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedRunner")
            .field("rules", &self.rules.len())
            .field("calls", &self.calls.borrow().len())
            .finish()
    }
}
