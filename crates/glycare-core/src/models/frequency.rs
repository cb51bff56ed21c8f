use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Dosing cadence of a medication.
///
/// Serialized as its canonical upper snake case name. Strings that match no
/// known cadence are kept verbatim in [`Frequency::Unrecognized`] so the
/// schedule layer can decide whether to fall back or reject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    OnceDaily,
    TwiceDaily,
    ThreeDaily,
    Every6h,
    Every8h,
    Weekly,
    EveryOtherDay,
    AsNeeded,
    Unrecognized(String),
}

impl Frequency {
    pub const KNOWN: [Frequency; 8] = [
        Frequency::OnceDaily,
        Frequency::TwiceDaily,
        Frequency::ThreeDaily,
        Frequency::Every6h,
        Frequency::Every8h,
        Frequency::Weekly,
        Frequency::EveryOtherDay,
        Frequency::AsNeeded,
    ];

    /// Parse a frequency name. Case, surrounding whitespace, spaces and
    /// dashes are ignored; anything else becomes `Unrecognized`.
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();

        match normalized.as_str() {
            "ONCE_DAILY" => Self::OnceDaily,
            "TWICE_DAILY" => Self::TwiceDaily,
            "THREE_DAILY" => Self::ThreeDaily,
            "EVERY_6H" => Self::Every6h,
            "EVERY_8H" => Self::Every8h,
            "WEEKLY" => Self::Weekly,
            "EVERY_OTHER_DAY" => Self::EveryOtherDay,
            "AS_NEEDED" => Self::AsNeeded,
            _ => Self::Unrecognized(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::OnceDaily => "ONCE_DAILY",
            Self::TwiceDaily => "TWICE_DAILY",
            Self::ThreeDaily => "THREE_DAILY",
            Self::Every6h => "EVERY_6H",
            Self::Every8h => "EVERY_8H",
            Self::Weekly => "WEEKLY",
            Self::EveryOtherDay => "EVERY_OTHER_DAY",
            Self::AsNeeded => "AS_NEEDED",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl FromStr for Frequency {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for Frequency {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        match value {
            Frequency::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
