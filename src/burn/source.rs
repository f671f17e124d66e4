//! What `mkisofs` consumes: a tarball, one directory, graft points, or
//! nothing at all when the caller hands over a finished image.

use anyhow::{bail, Result};
use std::ffi::OsString;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A single regular file given on the command line; burned as is.
    Prebuilt(PathBuf),
    /// `-tar` mode: the directories are archived to this tarball first.
    Tarball { archive: PathBuf, dirs: Vec<PathBuf> },
    /// A single directory, imaged at the root of the disk.
    Directory(PathBuf),
    /// Several directories, each mounted at its basename.
    GraftPoints(Vec<OsString>),
}

impl ImageSource {
    /// Decide how to image `dirs`.
    pub fn plan(dirs: &[PathBuf], make_tar: bool, archive: &Path) -> Result<Self> {
        match dirs {
            [] => bail!("no directories given"),
            _ if make_tar => Ok(ImageSource::Tarball {
                archive: archive.to_path_buf(),
                dirs: dirs.to_vec(),
            }),
            [single] if single.is_file() => Ok(ImageSource::Prebuilt(single.clone())),
            [single] => Ok(ImageSource::Directory(single.clone())),
            _ => Ok(ImageSource::GraftPoints(graft_points(dirs))),
        }
    }

    /// Inputs and `-graft-points` flag for `mkisofs`. A prebuilt image is its
    /// own single input.
    pub fn mkisofs_inputs(&self) -> (Vec<OsString>, bool) {
        match self {
            ImageSource::Prebuilt(image) => (vec![image.clone().into()], false),
            ImageSource::Tarball { archive, .. } => (vec![archive.clone().into()], false),
            ImageSource::Directory(dir) => (vec![dir.clone().into()], false),
            ImageSource::GraftPoints(specs) => (specs.clone(), true),
        }
    }

    pub fn is_prebuilt(&self) -> bool {
        matches!(self, ImageSource::Prebuilt(_))
    }
}

/// `<basename>/=<path>` for one directory, with a single trailing `/` removed.
pub fn graft_point(dir: &Path) -> OsString {
    let bytes = dir.as_os_str().as_bytes();
    let trimmed = bytes.strip_suffix(b"/").unwrap_or(bytes);
    let base = trimmed
        .rsplit(|b| *b == b'/')
        .next()
        .unwrap_or(trimmed);

    let mut spec = Vec::with_capacity(base.len() + trimmed.len() + 2);
    spec.extend_from_slice(base);
    spec.extend_from_slice(b"/=");
    spec.extend_from_slice(trimmed);
    OsString::from_vec(spec)
}

pub fn graft_points(dirs: &[PathBuf]) -> Vec<OsString> {
    dirs.iter().map(|dir| graft_point(dir)).collect()
}

/// Space-joined form, as shown in logs.
pub fn graft_display(specs: &[OsString]) -> String {
    specs
        .iter()
        .map(|s| s.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_graft_points_strip_trailing_slash() {
        let dirs = [PathBuf::from("/data/photos/"), PathBuf::from("/data/videos")];
        assert_eq!(
            graft_display(&graft_points(&dirs)),
            "photos/=/data/photos videos/=/data/videos"
        );
    }

    #[test]
    fn test_graft_point_relative() {
        assert_eq!(graft_point(Path::new("music")), OsString::from("music/=music"));
        assert_eq!(
            graft_point(Path::new("./a/b/")),
            OsString::from("b/=./a/b")
        );
    }

    #[test]
    fn test_plan_multiple_dirs_uses_graft_points() {
        let dirs = [PathBuf::from("/a"), PathBuf::from("/b/")];
        let source = ImageSource::plan(&dirs, false, Path::new("/t/x.tar.gz")).unwrap();
        let (inputs, graft) = source.mkisofs_inputs();
        assert!(graft);
        assert_eq!(inputs, vec![OsString::from("a/=/a"), OsString::from("b/=/b")]);
    }

    #[test]
    fn test_plan_single_file_is_prebuilt() {
        let temp = TempDir::new().unwrap();
        let image = temp.path().join("backup.iso");
        fs::write(&image, b"iso").unwrap();

        let source = ImageSource::plan(&[image.clone()], false, Path::new("/t/x.tar.gz")).unwrap();
        assert_eq!(source, ImageSource::Prebuilt(image.clone()));
        assert!(source.is_prebuilt());
        assert_eq!(source.mkisofs_inputs(), (vec![image.into_os_string()], false));
    }

    #[test]
    fn test_plan_single_directory() {
        let temp = TempDir::new().unwrap();
        let source =
            ImageSource::plan(&[temp.path().to_path_buf()], false, Path::new("/t/x.tar.gz"))
                .unwrap();
        assert_eq!(source, ImageSource::Directory(temp.path().to_path_buf()));
        assert_eq!(source.mkisofs_inputs().1, false);
    }

    #[test]
    fn test_plan_tar_mode_wins() {
        let temp = TempDir::new().unwrap();
        let image = temp.path().join("backup.iso");
        fs::write(&image, b"iso").unwrap();

        let archive = temp.path().join("burndisk.tar.gz");
        let source = ImageSource::plan(&[image.clone()], true, &archive).unwrap();
        assert_eq!(
            source,
            ImageSource::Tarball {
                archive: archive.clone(),
                dirs: vec![image]
            }
        );
        assert_eq!(source.mkisofs_inputs().0, vec![archive.into_os_string()]);
    }

    #[test]
    fn test_plan_requires_input() {
        assert!(ImageSource::plan(&[], false, Path::new("/t/x.tar.gz")).is_err());
    }
}
