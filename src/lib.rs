//! Optical-media backup tools.
//!
//! Two command-line utilities built on this crate:
//!
//! - **burndisk** - image one or more directories with `mkisofs` and burn
//!   the image to CD/DVD with `wodim`/`cdrecord`, optionally several copies,
//!   with device auto-detection and a completion email
//! - **intriplicate** - walk a source tree (typically an SD card) and create
//!   `par2` recovery files for every file
//!
//! # Architecture
//!
//! ```text
//! intriplicate (this crate)
//!     │
//!     ├── burn      config → detect → source → artifact::{tarball, iso} → session
//!     ├── walk      lazy traversal + par2 action
//!     ├── artifact  mkisofs / tar wrappers, size reporting
//!     ├── preflight host tool lookup (which)
//!     ├── process   typed command builder
//!     └── logging   simplelog terminal logger
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use intriplicate::burn::{burndisk, HostToolchain};
//! use intriplicate::burn::config::{BurnArgs, BurnConfig};
//! use intriplicate::burn::operator::ConsoleOperator;
//!
//! let (args, dirs) = BurnArgs::parse(["-dvd", "-count=2", "/data/photos", "/data/videos"])?;
//! let config = BurnConfig::from_env(&args)?;
//! let outcome = burndisk(&dirs, &config, &mut HostToolchain, &mut ConsoleOperator::stdin())?;
//! std::process::exit(outcome.status);
//! ```

pub mod artifact;
pub mod burn;
pub mod logging;
pub mod preflight;
pub mod process;
pub mod walk;

pub use burn::config::{BurnArgs, BurnConfig, DiskType};
pub use burn::{burndisk, BurnOutcome, HostToolchain, Toolchain};
pub use walk::{visit, WalkEntry};
