//! `par2` recovery file generation.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::preflight;
use crate::process::Cmd;

/// Executable used when no other is configured.
pub const DEFAULT_PAR2: &str = "par2";

/// Redundancy requested for every file, in percent.
pub const REDUNDANCY_PERCENT: u32 = 5;

/// Creates `.par2` recovery volumes next to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParityGenerator {
    executable: PathBuf,
    redundancy: u32,
}

impl ParityGenerator {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            redundancy: REDUNDANCY_PERCENT,
        }
    }

    /// Find `name` (a command or a path) on the host.
    pub fn locate(name: &str) -> Result<Self> {
        match preflight::find_command(name) {
            Some(path) => Ok(Self::new(path)),
            None => bail!("unable to find {} (install: par2cmdline)", name),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// `par2 c -r5 <file>`
    pub fn command(&self, file: &Path) -> Cmd {
        Cmd::new(&self.executable)
            .arg("c")
            .arg(format!("-r{}", self.redundancy))
            .arg_path(file)
            .error_msg(format!("par2 failed for {}", file.display()))
    }

    pub fn create(&self, file: &Path) -> Result<()> {
        let result = self.command(file).run()?;
        for line in result.stdout.lines().filter(|l| !l.trim().is_empty()) {
            log::debug!("par2: {}", line);
        }
        Ok(())
    }
}
