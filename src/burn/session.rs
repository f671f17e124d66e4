//! Writing the image to one or more disks.
//!
//! The first copy is burned straight away. Every further copy waits for the
//! operator to insert a blank disk; a failed copy can be retried until the
//! operator declines.
//!
//! ```text
//! BurnFirst ──ok──> AwaitNextDisk(2) ─> InsertDisk(2) ──ok──> ... ─> Done
//!     │                                   │    ^
//!     └─fail─> Failed                   fail   │ yes
//!                                         v    │
//!                                    RetryPrompt(n) ──no──> Discontinued(n)
//! ```

use anyhow::{bail, Result};
use std::io;
use std::path::PathBuf;

use super::config::DiskType;
use super::operator::Operator;
use crate::process::Cmd;

/// The burner invocation, assembled once and reused for every copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnCommand {
    pub sudo: bool,
    pub executable: PathBuf,
    pub device: Option<String>,
    pub speed: Option<String>,
    /// Mode option including the dash, e.g. `-sao`.
    pub mode: Option<String>,
    pub image: PathBuf,
}

impl BurnCommand {
    /// `[sudo] <exe> -eject -data [dev=<dev>] [speed=<speed>] [<mode>] <image>`
    pub fn argv(&self) -> Result<Vec<String>> {
        if self.executable.as_os_str().is_empty() {
            bail!("burner executable is empty");
        }
        for (what, value) in [
            ("device", &self.device),
            ("speed", &self.speed),
            ("mode", &self.mode),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                bail!("burn {} is empty", what);
            }
        }

        let mut argv = Vec::new();
        if self.sudo {
            argv.push("sudo".to_string());
        }
        argv.push(self.executable.to_string_lossy().into_owned());
        argv.extend(["-eject".to_string(), "-data".to_string()]);
        if let Some(dev) = &self.device {
            argv.push(format!("dev={}", dev));
        }
        if let Some(speed) = &self.speed {
            argv.push(format!("speed={}", speed));
        }
        if let Some(mode) = &self.mode {
            argv.push(mode.clone());
        }
        argv.push(self.image.to_string_lossy().into_owned());
        Ok(argv)
    }

    pub fn to_cmd(&self) -> Result<Cmd> {
        let argv = self.argv()?;
        Ok(Cmd::new(&argv[0]).args(&argv[1..]).allow_fail())
    }
}

/// Something that writes an image to a disk and reports the exit status.
pub trait Burner {
    fn burn(&mut self, command: &BurnCommand) -> Result<i32>;
}

/// Status reported when the burner process cannot be started at all.
pub const SPAWN_FAILED_STATUS: i32 = 127;

/// Runs the burner as a child process attached to the terminal.
pub struct ProcessBurner;

impl Burner for ProcessBurner {
    fn burn(&mut self, command: &BurnCommand) -> Result<i32> {
        match command.to_cmd()?.status() {
            Ok(result) => Ok(result.exit_code()),
            Err(e) if e.downcast_ref::<io::Error>().is_some() => {
                log::warn!("{:#}", e);
                Ok(SPAWN_FAILED_STATUS)
            }
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurnState {
    BurnFirst,
    /// Copy `n` is next; announce the previous result.
    AwaitNextDisk(u32),
    /// Ask for a blank disk and burn copy `n`.
    InsertDisk(u32),
    RetryPrompt { disk: u32, status: i32 },
    Done,
    Failed(i32),
    Discontinued { disk: u32, status: i32 },
}

impl BurnState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BurnState::Done | BurnState::Failed(_) | BurnState::Discontinued { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnReport {
    pub state: BurnState,
    /// 0 when every copy was written, otherwise the last burner status.
    pub status: i32,
    pub message: String,
    /// Number of burner invocations.
    pub attempts: u32,
}

/// Burn `count` copies of `command.image`.
pub fn burn_copies<B, O>(
    command: &BurnCommand,
    disk: DiskType,
    count: u32,
    burner: &mut B,
    operator: &mut O,
) -> Result<BurnReport>
where
    B: Burner + ?Sized,
    O: Operator + ?Sized,
{
    let mut state = BurnState::BurnFirst;
    let mut message = String::new();
    let mut status = 0;
    let mut attempts = 0;

    while !state.is_terminal() {
        log::debug!("burn state: {:?}", state);
        state = match state {
            BurnState::BurnFirst => {
                attempts += 1;
                status = burner.burn(command)?;
                if status == 0 {
                    message = format!("{} burn finished OK", disk);
                    next_copy(1, count)
                } else {
                    message = format!("something wrong? Return status: {}", status);
                    BurnState::Failed(status)
                }
            }
            BurnState::AwaitNextDisk(n) => {
                println!("burndisk, {}", message);
                BurnState::InsertDisk(n)
            }
            BurnState::InsertDisk(n) => {
                operator.wait_for_disk(&format!(
                    "insert blank {} for disk {} and hit any key",
                    disk, n
                ))?;
                attempts += 1;
                status = burner.burn(command)?;
                if status == 0 {
                    message = format!("{} burn of disk {} finished OK", disk, n);
                    next_copy(n, count)
                } else {
                    println!("burndisk, something wrong? Return status: {}", status);
                    BurnState::RetryPrompt { disk: n, status }
                }
            }
            BurnState::RetryPrompt { disk: n, status } => {
                if operator.confirm(&format!("try disk {} again (yes/no) ? [no]", n))? {
                    BurnState::InsertDisk(n)
                } else {
                    message = format!("disk {} discontinued", n);
                    BurnState::Discontinued { disk: n, status }
                }
            }
            BurnState::Done | BurnState::Failed(_) | BurnState::Discontinued { .. } => state,
        };
    }

    Ok(BurnReport {
        state,
        status,
        message,
        attempts,
    })
}

fn next_copy(finished: u32, count: u32) -> BurnState {
    if finished < count {
        BurnState::AwaitNextDisk(finished + 1)
    } else {
        BurnState::Done
    }
}
