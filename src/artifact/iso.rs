//! ISO image builder.
//!
//! Provides a wrapper around `mkisofs` for creating Rock Ridge (and by
//! default Joliet) data images.

use anyhow::Result;
use std::ffi::OsString;
use std::path::Path;

use crate::process::Cmd;

/// Options for building an ISO image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsoOptions {
    /// Add Joliet records (`-J`) for Windows readers.
    ///
    /// Default: true
    pub joliet: bool,

    /// Follow symbolic links (`-f`) instead of recording them.
    ///
    /// Default: false
    pub follow_links: bool,

    /// Inputs are `<dir>/=<path>` graft specs (`-graft-points`).
    pub graft_points: bool,
}

impl Default for IsoOptions {
    fn default() -> Self {
        Self {
            joliet: true,
            follow_links: false,
            graft_points: false,
        }
    }
}

/// Build the `mkisofs` command line.
///
/// `mkisofs [-graft-points] -R [-J] [-f] -quiet -o <output> <inputs...>`
pub fn mkisofs_command(output: &Path, inputs: &[OsString], options: &IsoOptions) -> Cmd {
    let mut cmd = Cmd::new("mkisofs");
    if options.graft_points {
        cmd = cmd.arg("-graft-points");
    }
    cmd = cmd.arg("-R");
    if options.joliet {
        cmd = cmd.arg("-J");
    }
    if options.follow_links {
        cmd = cmd.arg("-f");
    }
    cmd.args(["-quiet", "-o"])
        .arg_path(output)
        .args(inputs)
        .error_msg("mkisofs failed. Install genisoimage.")
}

/// Build an ISO image from `inputs`.
///
/// # Example
///
/// ```rust,ignore
/// use intriplicate::artifact::iso::{build_iso, IsoOptions};
/// use std::path::Path;
///
/// build_iso(
///     Path::new("/tmp/burndisk.img"),
///     &["photos/=/data/photos".into(), "videos/=/data/videos".into()],
///     &IsoOptions { graft_points: true, ..Default::default() },
/// )?;
/// ```
pub fn build_iso(output: &Path, inputs: &[OsString], options: &IsoOptions) -> Result<()> {
    let result = mkisofs_command(output, inputs, options).run()?;
    if !result.stderr.trim().is_empty() {
        log::debug!("mkisofs: {}", result.stderr.trim());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(cmd: &Cmd) -> Vec<String> {
        cmd.get_args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_default_options() {
        let cmd = mkisofs_command(
            Path::new("/tmp/burndisk.img"),
            &["/data/photos".into()],
            &IsoOptions::default(),
        );
        assert_eq!(cmd.program(), "mkisofs");
        assert_eq!(
            args_of(&cmd),
            ["-R", "-J", "-quiet", "-o", "/tmp/burndisk.img", "/data/photos"]
        );
    }

    #[test]
    fn test_graft_points_no_joliet_follow_links() {
        let options = IsoOptions {
            joliet: false,
            follow_links: true,
            graft_points: true,
        };
        let cmd = mkisofs_command(
            Path::new("/t/burndisk.img"),
            &["a/=/x/a".into(), "b/=/y/b".into()],
            &options,
        );
        assert_eq!(
            args_of(&cmd),
            [
                "-graft-points",
                "-R",
                "-f",
                "-quiet",
                "-o",
                "/t/burndisk.img",
                "a/=/x/a",
                "b/=/y/b"
            ]
        );
    }
}
