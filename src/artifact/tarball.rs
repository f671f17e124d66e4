//! Compressed tar archives of the directories to burn.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::process::Cmd;

/// Build the `tar` command creating `archive` from `dirs`.
pub fn tar_command(archive: &Path, dirs: &[PathBuf], verbose: bool) -> Cmd {
    Cmd::new("tar")
        .arg(if verbose { "-czvf" } else { "-czf" })
        .arg_path(archive)
        .args(dirs)
        .error_msg(format!("tar failed creating {}", archive.display()))
}

/// Create a gzip-compressed tarball of `dirs` at `archive`.
///
/// # Example
///
/// ```rust,ignore
/// use intriplicate::artifact::tarball::build_tarball;
/// use std::path::{Path, PathBuf};
///
/// build_tarball(
///     Path::new("/tmp/burndisk.tar.gz"),
///     &[PathBuf::from("/data/photos")],
///     false,
/// )?;
/// ```
pub fn build_tarball(archive: &Path, dirs: &[PathBuf], verbose: bool) -> Result<()> {
    let result = tar_command(archive, dirs, verbose).run()?;
    for line in result.stdout.lines() {
        log::debug!("tar: {}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_tar_command_args() {
        let cmd = tar_command(
            Path::new("/tmp/burndisk.tar.gz"),
            &[PathBuf::from("/a"), PathBuf::from("/b c")],
            true,
        );
        let args: Vec<_> = cmd
            .get_args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args, ["-czvf", "/tmp/burndisk.tar.gz", "/a", "/b c"]);
    }

    #[test]
    fn test_build_tarball() {
        let temp = TempDir::new().unwrap();
        let data = temp.path().join("data");
        fs::create_dir_all(data.join("sub")).unwrap();
        fs::write(data.join("sub/file.txt"), "hello\n").unwrap();

        let archive = temp.path().join("burndisk.tar.gz");
        build_tarball(&archive, &[data], false).unwrap();

        assert!(archive.is_file());
        assert!(fs::metadata(&archive).unwrap().len() > 0);
    }

    #[test]
    fn test_build_tarball_missing_input_fails() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("burndisk.tar.gz");
        assert!(build_tarball(&archive, &[temp.path().join("missing")], false).is_err());
    }
}
