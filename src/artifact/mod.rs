//! Intermediate artifacts produced on the way to a burned disk.
//!
//! - [`iso`] - ISO images via `mkisofs`
//! - [`tarball`] - gzip-compressed tar archives via `tar`
//!
//! Both are created in the burn temp directory and removed once burned.

pub mod iso;
pub mod tarball;

use anyhow::{Context, Result};
use std::path::Path;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Convert a byte count to (binary) megabytes.
pub fn to_megabytes(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Size of a file on disk, in bytes.
pub fn file_size(path: &Path) -> Result<u64> {
    Ok(std::fs::metadata(path)
        .with_context(|| format!("reading size of {}", path.display()))?
        .len())
}

/// `<path> <bytes> bytes ( <MB> MB)`, the size line printed for archives and images.
pub fn size_line(path: &Path, bytes: u64) -> String {
    format!(
        "{} {} bytes ( {:.2} MB)",
        path.display(),
        bytes,
        to_megabytes(bytes)
    )
}
