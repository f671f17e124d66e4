//! Typed builder for external tool invocations.
//!
//! Every tool this crate drives (`mkisofs`, `wodim`, `tar`, `par2`, `mail`)
//! goes through [`Cmd`]. Arguments are passed as separate argv entries, never
//! through a shell, so paths with spaces or quotes need no escaping.
//!
//! # Example
//!
//! ```rust,ignore
//! use intriplicate::process::Cmd;
//!
//! let result = Cmd::new("mkisofs")
//!     .args(["-R", "-J", "-quiet", "-o"])
//!     .arg_path(Path::new("/tmp/burndisk.img"))
//!     .arg_path(Path::new("/data/photos"))
//!     .error_msg("mkisofs failed. Install genisoimage.")
//!     .run()?;
//! assert!(result.success());
//! ```

use anyhow::{bail, Context, Result};
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Outcome of a finished child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Exit code, `None` if the child was killed by a signal.
    pub code: Option<i32>,
    /// Captured stdout (empty for [`Cmd::status`]).
    pub stdout: String,
    /// Captured stderr (empty for [`Cmd::status`]).
    pub stderr: String,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Exit code as a process status; signal termination maps to 1.
    pub fn exit_code(&self) -> i32 {
        self.code.unwrap_or(1)
    }
}

/// Builder for a single external command.
#[derive(Debug, Clone)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    stdin: Option<String>,
    error_msg: Option<String>,
    allow_fail: bool,
    quiet_stderr: bool,
}

impl Cmd {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            stdin: None,
            error_msg: None,
            allow_fail: false,
            quiet_stderr: false,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn arg_path(self, path: &Path) -> Self {
        self.arg(path.as_os_str())
    }

    /// Feed `input` to the child's stdin.
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Message used as the error headline when the command fails.
    pub fn error_msg(mut self, msg: impl Into<String>) -> Self {
        self.error_msg = Some(msg.into());
        self
    }

    /// Return the result instead of an error on non-zero exit.
    pub fn allow_fail(mut self) -> Self {
        self.allow_fail = true;
        self
    }

    /// Send the child's stderr to /dev/null.
    pub fn quiet_stderr(mut self) -> Self {
        self.quiet_stderr = true;
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Shell-like rendering for logs and diagnostics.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| quote(&part.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn validate(&self) -> Result<()> {
        if self.program.is_empty() {
            bail!("refusing to run a command with an empty program name");
        }
        for part in std::iter::once(&self.program).chain(self.args.iter()) {
            if part.to_string_lossy().contains('\0') {
                bail!("argument contains a NUL byte: {}", self.display());
            }
        }
        Ok(())
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    fn check(&self, result: CommandResult) -> Result<CommandResult> {
        if result.success() || self.allow_fail {
            return Ok(result);
        }

        let headline = self
            .error_msg
            .clone()
            .unwrap_or_else(|| format!("{} failed", self.program.to_string_lossy()));
        let status = match result.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        };
        let stderr = result.stderr.trim();
        if stderr.is_empty() {
            bail!("{} ({}): {}", headline, status, self.display());
        }
        bail!("{} ({}): {}\n{}", headline, status, self.display(), stderr)
    }

    /// Run with captured stdout/stderr.
    pub fn run(&self) -> Result<CommandResult> {
        self.validate()?;
        log::debug!("running: {}", self.display());

        let mut cmd = self.command();
        cmd.stdout(Stdio::piped());
        cmd.stderr(if self.quiet_stderr {
            Stdio::null()
        } else {
            Stdio::piped()
        });
        cmd.stdin(if self.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to execute {}", self.program.to_string_lossy()))?;

        if let Some(input) = &self.stdin {
            if let Some(mut pipe) = child.stdin.take() {
                pipe.write_all(input.as_bytes()).with_context(|| {
                    format!("writing stdin of {}", self.program.to_string_lossy())
                })?;
            }
        }

        let output = child
            .wait_with_output()
            .with_context(|| format!("waiting for {}", self.program.to_string_lossy()))?;

        self.check(CommandResult {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Run attached to the terminal (the child may prompt or show progress).
    pub fn status(&self) -> Result<CommandResult> {
        self.validate()?;
        log::debug!("running (interactive): {}", self.display());

        let mut cmd = self.command();
        if self.quiet_stderr {
            cmd.stderr(Stdio::null());
        }
        let status = cmd
            .status()
            .with_context(|| format!("failed to execute {}", self.program.to_string_lossy()))?;

        self.check(CommandResult {
            code: status.code(),
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

fn quote(part: &str) -> String {
    if !part.is_empty()
        && part
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=,:+@%".contains(c))
    {
        part.to_string()
    } else {
        format!("'{}'", part.replace('\'', r"'\''"))
    }
}
