//! Build an ISO image from directories and burn it to CD/DVD.
//!
//! - [`config`] - argv parsing and argument > environment > default resolution
//! - [`detect`] - burner selection and `-scanbus` device detection
//! - [`source`] - what `mkisofs` consumes (tarball, directory, graft points)
//! - [`session`] - the multi-copy burn state machine
//! - [`operator`] - operator prompts between copies
//! - [`notify`] - completion email
//!
//! External programs are reached through [`Toolchain`] so the whole
//! sequence can run against a fake in tests.

pub mod config;
pub mod detect;
pub mod notify;
pub mod operator;
pub mod session;
pub mod source;

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::artifact::iso::IsoOptions;
use crate::artifact::{file_size, iso, size_line, tarball};
use crate::preflight;
use crate::process::Cmd;
use config::{BurnConfig, Device};
use detect::{parse_scanbus, select_burner};
use operator::Operator;
use session::{burn_copies, BurnCommand, Burner, ProcessBurner};
use source::{graft_display, ImageSource};

/// Prefix of every status line.
pub const SAY: &str = "burndisk, ";

/// External programs used while burning.
pub trait Toolchain: Burner {
    /// Path lookup for an executable.
    fn locate(&self, name: &str) -> Option<PathBuf>;

    /// Fail if any (command, package) pair is missing.
    fn check_tools(&self, tools: &[(&str, &str)]) -> Result<()>;

    /// Raw `<burner> -scanbus` output.
    fn scanbus(&mut self, burner: &Path) -> Result<String>;

    fn archive(&mut self, archive: &Path, dirs: &[PathBuf], verbose: bool) -> Result<()>;

    fn make_iso(&mut self, output: &Path, inputs: &[OsString], options: &IsoOptions)
        -> Result<()>;

    fn notify(&mut self, addresses: &[String], message: &str) -> Result<()>;
}

/// The real host: `which`, `tar`, `mkisofs`, the burner and `mail`.
#[derive(Debug, Default)]
pub struct HostToolchain;

impl Burner for HostToolchain {
    fn burn(&mut self, command: &BurnCommand) -> Result<i32> {
        ProcessBurner.burn(command)
    }
}

impl Toolchain for HostToolchain {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        preflight::find_command(name)
    }

    fn check_tools(&self, tools: &[(&str, &str)]) -> Result<()> {
        preflight::check_required_tools(tools)
    }

    fn scanbus(&mut self, burner: &Path) -> Result<String> {
        let result = Cmd::new(burner)
            .arg("-scanbus")
            .quiet_stderr()
            .allow_fail()
            .run()?;
        Ok(result.stdout)
    }

    fn archive(&mut self, archive: &Path, dirs: &[PathBuf], verbose: bool) -> Result<()> {
        tarball::build_tarball(archive, dirs, verbose)
    }

    fn make_iso(
        &mut self,
        output: &Path,
        inputs: &[OsString],
        options: &IsoOptions,
    ) -> Result<()> {
        iso::build_iso(output, inputs, options)
    }

    fn notify(&mut self, addresses: &[String], message: &str) -> Result<()> {
        notify::send_mail(addresses, message)
    }
}

/// Final status of a `burndisk` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnOutcome {
    /// Process exit status: 0 on success.
    pub status: i32,
    pub message: String,
}

impl BurnOutcome {
    fn new(status: i32, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Image, then burn, then report.
///
/// Tool-not-found and missing-image conditions come back as an outcome
/// with status 1. Failures of `tar` and `mkisofs` themselves are errors.
pub fn burndisk<T, O>(
    dirs: &[PathBuf],
    config: &BurnConfig,
    tools: &mut T,
    operator: &mut O,
) -> Result<BurnOutcome>
where
    T: Toolchain + ?Sized,
    O: Operator + ?Sized,
{
    let outcome = run(dirs, config, tools, operator)?;

    println!("{}{}", SAY, outcome.message);

    if !config.email.is_empty() {
        if let Err(e) = tools.notify(&config.email, &outcome.message) {
            log::warn!("could not send status email: {:#}", e);
        }
    }

    Ok(outcome)
}

fn run<T, O>(
    dirs: &[PathBuf],
    config: &BurnConfig,
    tools: &mut T,
    operator: &mut O,
) -> Result<BurnOutcome>
where
    T: Toolchain + ?Sized,
    O: Operator + ?Sized,
{
    let disk = config.disk;

    let device = match &config.device {
        Device::Default => None,
        Device::Named(dev) => Some(dev.clone()),
        Device::Auto => match detect_device(config, tools)? {
            Ok(dev) => Some(dev),
            Err(outcome) => return Ok(outcome),
        },
    };

    let source = ImageSource::plan(dirs, config.make_tar, &config.archive_path())?;
    log::debug!("image source: {:?}", source);

    if !source.is_prebuilt() {
        if let Some(outcome) = missing_tools(tools, preflight::BURNDISK_TOOLS) {
            return Ok(outcome);
        }
    }

    if let ImageSource::Tarball { archive, dirs } = &source {
        if let Some(outcome) = missing_tools(tools, &[preflight::TAR_TOOL]) {
            return Ok(outcome);
        }
        tools
            .archive(archive, dirs, config.verbose)
            .with_context(|| format!("creating tarball {}", archive.display()))?;
        println!("{}\n", size_line(archive, file_size(archive)?));
    }

    let image = match &source {
        ImageSource::Prebuilt(path) => path.clone(),
        ImageSource::Tarball { .. } | ImageSource::Directory(_) | ImageSource::GraftPoints(_) => {
            let (inputs, graft_points) = source.mkisofs_inputs();
            let image = config.image_path();
            println!("{}mkisofs ...", SAY);
            if graft_points {
                log::info!("graft points: {}", graft_display(&inputs));
            }
            let options = IsoOptions {
                joliet: config.joliet,
                follow_links: config.follow_links,
                graft_points,
            };
            tools
                .make_iso(&image, &inputs, &options)
                .with_context(|| format!("creating {} image {}", disk, image.display()))?;
            image
        }
    };

    if let ImageSource::Tarball { archive, .. } = &source {
        fs::remove_file(archive)
            .with_context(|| format!("removing tarball {}", archive.display()))?;
    }

    if !image.exists() {
        return Ok(BurnOutcome::new(
            1,
            format!("{} image does not exist: {}", disk, display_path(&image)),
        ));
    }

    if config.image_only && !source.is_prebuilt() {
        return Ok(BurnOutcome::new(
            0,
            format!("{} image is {}", disk, display_path(&image)),
        ));
    }

    let image_size = file_size(&image)?;

    if let Some(exe) = &config.exe {
        println!("{}{} ...", SAY, exe);
    }
    let executable = match select_burner(config.exe.as_deref(), |name| tools.locate(name)) {
        Ok(path) => path,
        Err(e) => {
            println!("\n{}\n", size_line(&image, image_size));
            return Ok(BurnOutcome::new(1, e.to_string()));
        }
    };
    log::info!("burning with {}", executable.display());

    let command = BurnCommand {
        sudo: !config.nosudo,
        executable,
        device,
        speed: config.speed.clone(),
        mode: config.mode_option(),
        image: image.clone(),
    };

    let report = burn_copies(&command, disk, config.count, tools, operator)?;

    if report.status == 0 && !source.is_prebuilt() {
        fs::remove_file(&image)
            .with_context(|| format!("removing {} image {}", disk, image.display()))?;
    }

    println!("\n{}\n", size_line(&image, image_size));

    Ok(BurnOutcome::new(report.status, report.message))
}

/// A status 1 outcome naming the missing tools, if any.
fn missing_tools<T>(tools: &T, required: &[(&str, &str)]) -> Option<BurnOutcome>
where
    T: Toolchain + ?Sized,
{
    tools
        .check_tools(required)
        .err()
        .map(|e| BurnOutcome::new(1, e.to_string()))
}

/// Find a burner and pick the first device from its bus scan.
///
/// The inner `Err` is a reportable outcome (status 1), not a fault.
fn detect_device<T>(config: &BurnConfig, tools: &mut T) -> Result<Result<String, BurnOutcome>>
where
    T: Toolchain + ?Sized,
{
    let burner = match select_burner(None, |name| tools.locate(name)) {
        Ok(path) => path,
        Err(e) => return Ok(Err(BurnOutcome::new(1, e.to_string()))),
    };

    let output = tools
        .scanbus(&burner)
        .with_context(|| format!("scanning bus with {}", burner.display()))?;

    match parse_scanbus(&output) {
        Some(device) => {
            println!("{}with {} = {}", SAY, device.id, device.name);
            Ok(Ok(device.id))
        }
        None => Ok(Err(BurnOutcome::new(
            1,
            format!("unable to determine {} writer", config.disk),
        ))),
    }
}

/// `path` with the home directory shown as `~`.
pub fn display_path(path: &Path) -> String {
    hide_home(path, std::env::var_os("HOME").as_deref().map(Path::new))
}

fn hide_home(path: &Path, home: Option<&Path>) -> String {
    match home.filter(|h| !h.as_os_str().is_empty() && *h != Path::new("/")) {
        Some(home) => match path.strip_prefix(home) {
            Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
            Ok(rest) => format!("~/{}", rest.display()),
            Err(_) => path.display().to_string(),
        },
        None => path.display().to_string(),
    }
}
