//! Application version bookkeeping: a semver string stored in the `version`
//! field of a JSON package manifest, read and written by the ops CLI.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_VERSION: &str = "0.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bump {
    Patch,
    Minor,
    Major,
}

impl Bump {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "patch" => Some(Bump::Patch),
            "minor" => Some(Bump::Minor),
            "major" => Some(Bump::Major),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid version string: {0}")]
pub struct ParseVersionError(String);

impl FromStr for SemVer {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(ParseVersionError(s.to_string()));
        }

        let mut numbers = [0u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            // u64::from_str accepts a leading '+', so insist on digits only.
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseVersionError(s.to_string()));
            }
            *slot = part
                .parse()
                .map_err(|_| ParseVersionError(s.to_string()))?;
        }

        Ok(SemVer {
            major: numbers[0],
            minor: numbers[1],
            patch: numbers[2],
        })
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl SemVer {
    pub fn bump(&self, bump: Bump) -> SemVer {
        match bump {
            Bump::Patch => SemVer {
                patch: self.patch + 1,
                ..*self
            },
            Bump::Minor => SemVer {
                major: self.major,
                minor: self.minor + 1,
                patch: 0,
            },
            Bump::Major => SemVer {
                major: self.major + 1,
                minor: 0,
                patch: 0,
            },
        }
    }
}

/// Read the manifest's `version` field. A missing file, unparseable JSON or
/// absent/invalid field all fall back to [`DEFAULT_VERSION`]; this never
/// raises.
pub fn read_version(manifest: &Path) -> String {
    let contents = match std::fs::read_to_string(manifest) {
        Ok(contents) => contents,
        Err(_) => return DEFAULT_VERSION.to_string(),
    };

    let value: serde_json::Value = match serde_json::from_str(&contents) {
        Ok(value) => value,
        Err(_) => return DEFAULT_VERSION.to_string(),
    };

    match value.get("version").and_then(|v| v.as_str()) {
        Some(version) if version.parse::<SemVer>().is_ok() => version.to_string(),
        _ => DEFAULT_VERSION.to_string(),
    }
}

/// Write `version` back into the manifest. A missing or malformed manifest
/// is skipped silently: there is nothing sensible to write into.
pub fn write_version(manifest: &Path, version: &SemVer) {
    let contents = match std::fs::read_to_string(manifest) {
        Ok(contents) => contents,
        Err(_) => return,
    };

    let mut value: serde_json::Value = match serde_json::from_str(&contents) {
        Ok(value) => value,
        Err(_) => return,
    };

    let Some(object) = value.as_object_mut() else {
        return;
    };

    object.insert(
        "version".to_string(),
        serde_json::Value::String(version.to_string()),
    );

    let mut serialized = match serde_json::to_string_pretty(&value) {
        Ok(serialized) => serialized,
        Err(_) => return,
    };
    serialized.push('\n');

    if let Err(e) = std::fs::write(manifest, serialized) {
        tracing::warn!("Failed to write version manifest: {}", e);
    }
}
