//! Source tree traversal for the parity pass.
//!
//! [`entries`] is a lazy depth-first listing: each folder, then its own
//! files, then its subfolders. Within a folder the filesystem order is kept.
//! [`visit`] drives a per-file action over that listing and stops at the
//! first error.

pub mod parity;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEntry {
    Folder(PathBuf),
    File(PathBuf),
}

/// Lazily list `root` depth-first.
///
/// A folder's listing is read in full when the walk enters it, so files
/// created next to the current file (e.g. `.par2` volumes) are not visited.
pub fn entries(root: &Path) -> impl Iterator<Item = Result<WalkEntry>> {
    WalkDir::new(root)
        .follow_links(false)
        // stable sort: files ahead of folders, filesystem order otherwise
        .sort_by(|a, b| a.file_type().is_dir().cmp(&b.file_type().is_dir()))
        .into_iter()
        .map(|entry| {
            let entry = entry.context("walking source tree")?;
            let is_dir = entry.file_type().is_dir();
            let path = entry.into_path();
            Ok(if is_dir {
                WalkEntry::Folder(path)
            } else {
                WalkEntry::File(path)
            })
        })
}

/// Counts from a finished [`visit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub folders: usize,
    pub files: usize,
}

/// Print every folder and file under `root`, calling `on_file` per file.
pub fn visit<F>(root: &Path, mut on_file: F) -> Result<WalkSummary>
where
    F: FnMut(&Path) -> Result<()>,
{
    let mut summary = WalkSummary::default();

    for entry in entries(root) {
        match entry? {
            WalkEntry::Folder(folder) => {
                summary.folders += 1;
                println!("\nFolder: {}\n", folder.display());
            }
            WalkEntry::File(file) => {
                summary.files += 1;
                let name = file.file_name().unwrap_or(file.as_os_str());
                println!("{}\n", name.to_string_lossy());
                on_file(&file).with_context(|| format!("processing {}", file.display()))?;
            }
        }
    }

    log::info!(
        "walked {} folders, {} files under {}",
        summary.folders,
        summary.files,
        root.display()
    );
    Ok(summary)
}
