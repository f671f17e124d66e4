//! Burn configuration: argv parsing and default resolution.
//!
//! Every value resolves as command-line argument > environment variable >
//! hard-coded default. Disk-type-specific variables are `CDSPEED`/`CDMODE`
//! or `DVDSPEED`/`DVDMODE`.

use anyhow::{bail, Context, Result};
use std::fmt;
use std::path::PathBuf;

/// Write mode used when neither `-mode=` nor `<DISK>MODE` is set.
pub const DEFAULT_MODE: &str = "sao";

/// Environment variable holding the default temp directory.
pub const TEMP_ENV: &str = "TUB";

pub const USAGE: &str = "Syntax: burndisk [-dvd] <directory1 <directory2 ..> >";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskType {
    Cd,
    Dvd,
}

impl DiskType {
    pub fn from_dvd_flag(dvd: bool) -> Self {
        if dvd {
            DiskType::Dvd
        } else {
            DiskType::Cd
        }
    }

    /// Name of the disk-type-specific environment variable, e.g. `DVDSPEED`.
    pub fn env_key(self, suffix: &str) -> String {
        format!("{}{}", self, suffix)
    }
}

impl fmt::Display for DiskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiskType::Cd => "CD",
            DiskType::Dvd => "DVD",
        })
    }
}

/// Target device for the burner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Device {
    /// No `dev=` argument; the burner picks its default.
    Default,
    /// Detect from `-scanbus` output at burn time.
    Auto,
    Named(String),
}

/// Option values exactly as given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BurnArgs {
    pub tar: bool,
    pub dvd: bool,
    pub img: bool,
    pub nosudo: bool,
    pub verbose: bool,
    pub nojoliet: bool,
    pub links: bool,
    pub temp: Option<String>,
    pub count: Option<String>,
    pub speed: Option<String>,
    pub mode: Option<String>,
    pub dev: Option<String>,
    pub email: Option<String>,
    pub exe: Option<String>,
}

impl BurnArgs {
    /// Split argv (without the program name) into keywords and directories.
    ///
    /// Flags are exact keywords (`-tar`); valued options are `-key=value`.
    pub fn parse<I, S>(argv: I) -> Result<(Self, Vec<PathBuf>)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = BurnArgs::default();
        let mut dirs = Vec::new();

        for raw in argv {
            let raw = raw.as_ref();
            if !raw.starts_with('-') {
                dirs.push(PathBuf::from(raw));
                continue;
            }

            match raw {
                "-tar" => args.tar = true,
                "-dvd" => args.dvd = true,
                "-img" => args.img = true,
                "-nosudo" => args.nosudo = true,
                "-verbose" => args.verbose = true,
                "-nojoliet" => args.nojoliet = true,
                "-links" => args.links = true,
                _ => {
                    let Some((key, value)) = raw.split_once('=') else {
                        bail!("unknown keyword '{}'\n{}", raw, USAGE);
                    };
                    let slot = match key {
                        "-temp" => &mut args.temp,
                        "-count" => &mut args.count,
                        "-speed" => &mut args.speed,
                        "-mode" => &mut args.mode,
                        "-dev" => &mut args.dev,
                        "-email" => &mut args.email,
                        "-exe" => &mut args.exe,
                        _ => bail!("unknown keyword '{}'\n{}", raw, USAGE),
                    };
                    *slot = Some(value.to_string());
                }
            }
        }

        Ok((args, dirs))
    }
}

/// Fully resolved, read-only burn configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnConfig {
    pub disk: DiskType,
    pub make_tar: bool,
    pub image_only: bool,
    pub nosudo: bool,
    pub verbose: bool,
    pub joliet: bool,
    pub follow_links: bool,
    pub temp_dir: PathBuf,
    pub count: u32,
    pub speed: Option<String>,
    /// Write mode without the leading dash, e.g. `sao`.
    pub mode: Option<String>,
    pub device: Device,
    pub email: Vec<String>,
    pub exe: Option<String>,
}

impl BurnConfig {
    /// Resolve `args` against an environment lookup.
    ///
    /// # Example
    ///
    /// ```rust
    /// use intriplicate::burn::config::{BurnArgs, BurnConfig};
    ///
    /// let (args, _dirs) = BurnArgs::parse(["-dvd", "/data"]).unwrap();
    /// let config = BurnConfig::resolve(&args, |key| match key {
    ///     "DVDSPEED" => Some("8".to_string()),
    ///     "TUB" => Some("/scratch".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.speed.as_deref(), Some("8"));
    /// assert_eq!(config.mode_option().as_deref(), Some("-sao"));
    /// ```
    pub fn resolve<F>(args: &BurnArgs, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let disk = DiskType::from_dvd_flag(args.dvd);
        let lookup = |value: &Option<String>, key: &str| {
            non_empty(value.clone()).or_else(|| non_empty(env(key)))
        };

        let temp_dir = lookup(&args.temp, TEMP_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        let count = match non_empty(args.count.clone()) {
            None => 1,
            Some(raw) => {
                let count: u32 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid -count value '{}'", raw))?;
                if count == 0 {
                    bail!("-count must be at least 1");
                }
                count
            }
        };

        let speed = lookup(&args.speed, &disk.env_key("SPEED"));
        let mode = lookup(&args.mode, &disk.env_key("MODE")).or_else(|| Some(DEFAULT_MODE.into()));

        let device = match non_empty(args.dev.clone()) {
            None => Device::Default,
            Some(dev) if dev == "auto" => Device::Auto,
            Some(dev) => Device::Named(dev),
        };

        let email = args
            .email
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|addr| !addr.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            disk,
            make_tar: args.tar,
            image_only: args.img,
            nosudo: args.nosudo,
            verbose: args.verbose,
            joliet: !args.nojoliet,
            follow_links: args.links,
            temp_dir,
            count,
            speed,
            mode,
            device,
            email,
            exe: non_empty(args.exe.clone()),
        })
    }

    /// Resolve against the process environment.
    pub fn from_env(args: &BurnArgs) -> Result<Self> {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    /// Write mode rendered as a burner option, e.g. `-sao`.
    pub fn mode_option(&self) -> Option<String> {
        self.mode.as_ref().map(|mode| format!("-{}", mode))
    }

    pub fn image_path(&self) -> PathBuf {
        self.temp_dir.join("burndisk.img")
    }

    pub fn archive_path(&self) -> PathBuf {
        self.temp_dir.join("burndisk.tar.gz")
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn resolve(argv: &[&str], env: &[(&str, &str)]) -> BurnConfig {
        let (args, _) = BurnArgs::parse(argv).unwrap();
        BurnConfig::resolve(&args, env_of(env)).unwrap()
    }

    #[test]
    fn test_parse_flags_and_directories() {
        let (args, dirs) =
            BurnArgs::parse(["-tar", "/a", "-count=3", "-email=x@y,z@w", "/b/"]).unwrap();
        assert!(args.tar);
        assert!(!args.dvd);
        assert_eq!(args.count.as_deref(), Some("3"));
        assert_eq!(dirs, vec![PathBuf::from("/a"), PathBuf::from("/b/")]);
    }

    #[test]
    fn test_parse_rejects_unknown_keyword() {
        assert!(BurnArgs::parse(["-bogus"]).is_err());
        assert!(BurnArgs::parse(["-bogus=1"]).is_err());
    }

    #[test]
    fn test_argument_beats_env_beats_default() {
        let env = [("CDSPEED", "16"), ("CDMODE", "tao")];

        let config = resolve(&["-speed=4", "-mode=dao"], &env);
        assert_eq!(config.speed.as_deref(), Some("4"));
        assert_eq!(config.mode.as_deref(), Some("dao"));

        let config = resolve(&[], &env);
        assert_eq!(config.speed.as_deref(), Some("16"));
        assert_eq!(config.mode.as_deref(), Some("tao"));

        let config = resolve(&[], &[]);
        assert_eq!(config.speed, None);
        assert_eq!(config.mode.as_deref(), Some("sao"));
    }

    #[test]
    fn test_env_keyed_by_disk_type() {
        let env = [
            ("CDSPEED", "16"),
            ("DVDSPEED", "4"),
            ("CDMODE", "tao"),
            ("DVDMODE", "dao"),
        ];

        let cd = resolve(&[], &env);
        assert_eq!(cd.disk, DiskType::Cd);
        assert_eq!(cd.speed.as_deref(), Some("16"));
        assert_eq!(cd.mode_option().as_deref(), Some("-tao"));

        let dvd = resolve(&["-dvd"], &env);
        assert_eq!(dvd.disk, DiskType::Dvd);
        assert_eq!(dvd.speed.as_deref(), Some("4"));
        assert_eq!(dvd.mode_option().as_deref(), Some("-dao"));
    }

    #[test]
    fn test_temp_dir_resolution() {
        assert_eq!(
            resolve(&["-temp=/fast"], &[("TUB", "/tub")]).temp_dir,
            PathBuf::from("/fast")
        );
        assert_eq!(
            resolve(&[], &[("TUB", "/tub")]).temp_dir,
            PathBuf::from("/tub")
        );
        assert_eq!(resolve(&[], &[]).temp_dir, std::env::temp_dir());
        assert_eq!(
            resolve(&[], &[("TUB", "/tub")]).image_path(),
            PathBuf::from("/tub/burndisk.img")
        );
    }

    #[test]
    fn test_device_values() {
        assert_eq!(resolve(&[], &[]).device, Device::Default);
        assert_eq!(resolve(&["-dev=auto"], &[]).device, Device::Auto);
        assert_eq!(
            resolve(&["-dev=1,0,0"], &[]).device,
            Device::Named("1,0,0".into())
        );
    }

    #[test]
    fn test_count_validation() {
        assert_eq!(resolve(&[], &[]).count, 1);
        assert_eq!(resolve(&["-count=3"], &[]).count, 3);

        let (args, _) = BurnArgs::parse(["-count=0"]).unwrap();
        assert!(BurnConfig::resolve(&args, env_of(&[])).is_err());
        let (args, _) = BurnArgs::parse(["-count=many"]).unwrap();
        assert!(BurnConfig::resolve(&args, env_of(&[])).is_err());
    }

    #[test]
    fn test_email_list_split() {
        let config = resolve(&["-email=a@example.org, b@example.org,"], &[]);
        assert_eq!(config.email, vec!["a@example.org", "b@example.org"]);
        assert!(resolve(&[], &[]).email.is_empty());
    }

    #[test]
    fn test_joliet_and_links() {
        let config = resolve(&[], &[]);
        assert!(config.joliet);
        assert!(!config.follow_links);

        let config = resolve(&["-nojoliet", "-links"], &[]);
        assert!(!config.joliet);
        assert!(config.follow_links);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let argv = ["-dvd", "-count=2", "-dev=auto", "-exe=growisofs", "/data"];
        let env = [("DVDSPEED", "8"), ("TUB", "/tub")];
        assert_eq!(resolve(&argv, &env), resolve(&argv, &env));
    }
}
