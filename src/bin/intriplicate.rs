//! Walk an SD card (or any source tree) and create par2 recovery files.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use intriplicate::logging::init_logging;
use intriplicate::walk::parity::{ParityGenerator, DEFAULT_PAR2};
use intriplicate::walk::visit;

#[derive(Parser, Debug)]
#[command(name = "intriplicate", version, about = "InTriplicate")]
struct Args {
    /// SD/Flash drive location
    #[arg(short, long)]
    source: PathBuf,

    /// Copy to file location
    #[arg(short, long)]
    destination: Option<PathBuf>,

    /// Burn a disc (Not Yet Implemented)
    #[arg(short, long, num_args = 0..=1, default_missing_value = "True")]
    burn: Option<String>,

    /// Refresh flash (Not Yet Implemented)
    #[arg(short, long, num_args = 0..=1, default_value = "True", default_missing_value = "True")]
    refresh: String,

    /// Generate web galleries (Not Yet Implemented)
    #[arg(short, long, num_args = 0..=1, default_missing_value = "True")]
    gallery: Option<String>,

    /// Generate parity files using an installed par2
    #[arg(short, long, num_args = 0..=1, default_missing_value = "True")]
    parity: Option<String>,

    /// par2 executable (name on PATH or full path)
    #[arg(long, env = "PAR2", default_value = DEFAULT_PAR2)]
    par2: String,

    /// Log debug detail to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    println!("Input file: {}", args.source.display());
    match &args.destination {
        Some(dest) => println!("destination: {}", dest.display()),
        None => println!("destination: None"),
    }
    println!("Burn: {}", shown(&args.burn));
    println!("Refresh: {}", args.refresh);
    println!("Parity: {}", shown(&args.parity));
    println!("Gallery: {}", shown(&args.gallery));

    let generator = if is_set(&args.parity) {
        Some(ParityGenerator::locate(&args.par2)?)
    } else {
        None
    };

    visit(&args.source, |file| match &generator {
        Some(generator) => generator.create(file),
        None => Ok(()),
    })
    .with_context(|| format!("walking {}", args.source.display()))?;

    Ok(())
}

/// An option is on when given with a non-empty value (or with none at all).
fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

fn shown(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("False")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parity_takes_a_value() {
        let args = Args::try_parse_from(["intriplicate", "--source", "/sd", "--parity", "True"])
            .unwrap();
        assert_eq!(args.parity.as_deref(), Some("True"));
        assert!(is_set(&args.parity));
    }

    #[test]
    fn test_bare_flags_switch_on() {
        let args =
            Args::try_parse_from(["intriplicate", "-s", "/sd", "-p", "-b", "-g"]).unwrap();
        assert!(is_set(&args.parity));
        assert!(is_set(&args.burn));
        assert!(is_set(&args.gallery));
        assert_eq!(shown(&args.burn), "True");
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["intriplicate", "--source", "/sd"]).unwrap();
        assert!(!is_set(&args.parity));
        assert_eq!(shown(&args.gallery), "False");
        assert_eq!(args.refresh, "True");
        assert_eq!(args.destination, None);
    }

    #[test]
    fn test_valued_options_mixed() {
        let args = Args::try_parse_from([
            "intriplicate",
            "-s",
            "/sd",
            "--burn",
            "yes",
            "--refresh",
            "False",
            "-d",
            "/backup",
        ])
        .unwrap();
        assert_eq!(args.burn.as_deref(), Some("yes"));
        assert_eq!(args.refresh, "False");
        assert_eq!(args.destination, Some(PathBuf::from("/backup")));
    }

    #[test]
    fn test_source_required() {
        assert!(Args::try_parse_from(["intriplicate", "--parity", "True"]).is_err());
    }
}
