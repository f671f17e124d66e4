//! Burn CD or DVD from directory trees.
//!
//! ```text
//! burndisk [-tar] [-dvd] [-img] [-nosudo] [-verbose] [-temp=dir] [-count=n]
//!          [-speed=speed] [-mode=mode] [-dev=dev|auto] [-email=a,b]
//!          [-exe=burner] [-nojoliet] [-links] <directory1 <directory2 ..> >
//! ```
//!
//! A single regular file argument is burned as a finished image. Speed and
//! mode default to `CDSPEED`/`CDMODE` (or `DVDSPEED`/`DVDMODE` with `-dvd`),
//! the temp directory to `TUB`.

use anyhow::Result;

use intriplicate::burn::config::{BurnArgs, BurnConfig, USAGE};
use intriplicate::burn::operator::ConsoleOperator;
use intriplicate::burn::{burndisk, HostToolchain, SAY};
use intriplicate::logging::init_logging;

fn main() {
    let status = match run() {
        Ok(status) => status,
        Err(e) => {
            eprintln!("{}", failure_line(&e));
            1
        }
    };
    std::process::exit(status);
}

/// The single stderr line for a fatal error, with its context chain.
fn failure_line(e: &anyhow::Error) -> String {
    format!("{}{:#}", SAY, e)
}

fn run() -> Result<i32> {
    let (args, dirs) = BurnArgs::parse(std::env::args().skip(1))?;
    init_logging(args.verbose);

    if dirs.is_empty() {
        println!("{}", USAGE);
        return Ok(0);
    }

    let config = BurnConfig::from_env(&args)?;
    log::debug!("resolved configuration: {:?}", config);

    let outcome = burndisk(
        &dirs,
        &config,
        &mut HostToolchain,
        &mut ConsoleOperator::stdin(),
    )?;
    Ok(outcome.status)
}
