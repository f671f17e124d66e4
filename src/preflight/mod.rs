//! Host tool lookup.
//!
//! Locates the external programs the burner and the tree walker drive.
//!
//! # Example
//!
//! ```rust
//! use intriplicate::preflight::{command_exists, check_required_tools};
//!
//! if !command_exists("mkisofs") {
//!     println!("genisoimage not installed");
//! }
//!
//! let tools = &[("mkisofs", "genisoimage"), ("tar", "tar")];
//! if let Err(e) = check_required_tools(tools) {
//!     eprintln!("{}", e);
//! }
//! ```

use anyhow::{bail, Result};
use std::path::PathBuf;

/// Burner programs in order of preference.
pub const BURNERS: &[&str] = &["wodim", "cdrecord"];

/// Locate a command on `PATH` (or accept it as given if it contains a path
/// separator and is executable).
pub fn find_command(cmd: &str) -> Option<PathBuf> {
    which::which(cmd).ok()
}

/// Check if a command exists on the host system.
pub fn command_exists(cmd: &str) -> bool {
    find_command(cmd).is_some()
}

/// Host tools needed by `burndisk`, as (command_name, package_name).
pub const BURNDISK_TOOLS: &[(&str, &str)] = &[("mkisofs", "genisoimage")];

/// Extra tool needed by `burndisk -tar`.
pub const TAR_TOOL: (&str, &str) = ("tar", "tar");

/// Extra tool needed by `burndisk -email=...`.
pub const MAIL_TOOL: (&str, &str) = ("mail", "mailx");

/// Check that specific tools are available.
///
/// # Returns
///
/// * `Ok(())` if all tools are found
/// * `Err` with list of missing tools and their packages
pub fn check_required_tools(tools: &[(&str, &str)]) -> Result<()> {
    let mut missing = Vec::new();

    for (tool, package) in tools {
        if !command_exists(tool) {
            missing.push((*tool, *package));
        }
    }

    if !missing.is_empty() {
        let msg = missing
            .iter()
            .map(|(t, p)| format!("{} (install: {})", t, p))
            .collect::<Vec<_>>()
            .join(", ");
        bail!("unable to find {}", msg);
    }

    Ok(())
}
