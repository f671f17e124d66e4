//! Burner executable selection and device auto-detection.

use std::path::PathBuf;

/// A device line from `cdrecord -scanbus`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanbusDevice {
    /// Bus address, e.g. `1,0,0`.
    pub id: String,
    pub name: String,
}

/// Pick the first device from `-scanbus` output.
///
/// Device lines start with a tab and hold `\t<id>\t<name>`. Names containing
/// `*` mark empty bus slots and are skipped.
pub fn parse_scanbus(output: &str) -> Option<ScanbusDevice> {
    output
        .lines()
        .filter_map(|line| line.strip_prefix('\t'))
        .filter_map(|rest| {
            let mut fields = rest.split('\t');
            let id = fields.next()?;
            let name = fields.next()?;
            Some(ScanbusDevice {
                id: id.to_string(),
                name: name.to_string(),
            })
        })
        .find(|device| !device.name.contains('*'))
}

/// Why no burner could be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BurnerLookupError {
    /// Neither `wodim` nor `cdrecord` is on `PATH`.
    NoDefault,
    /// The `-exe=` program is not on `PATH`.
    NotFound(String),
}

impl std::fmt::Display for BurnerLookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BurnerLookupError::NoDefault => f.write_str("unable to find wodim or cdrecord"),
            BurnerLookupError::NotFound(exe) => write!(f, "unable to find {}", exe),
        }
    }
}

/// Resolve the burner executable.
///
/// `locate` is the path lookup, so callers can substitute it in tests.
pub fn select_burner<L>(exe: Option<&str>, locate: L) -> Result<PathBuf, BurnerLookupError>
where
    L: Fn(&str) -> Option<PathBuf>,
{
    match exe {
        Some(exe) => locate(exe).ok_or_else(|| BurnerLookupError::NotFound(exe.to_string())),
        None => crate::preflight::BURNERS
            .iter()
            .find_map(|name| locate(name))
            .ok_or(BurnerLookupError::NoDefault),
    }
}
