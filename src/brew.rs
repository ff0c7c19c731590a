//! Brew types: the key every store and the evaluator index by.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrewType {
    Coffee,
    Espresso,
}

impl BrewType {
    /// Evaluation order for one tick.
    pub const ALL: [BrewType; 2] = [BrewType::Coffee, BrewType::Espresso];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Coffee => "coffee",
            Self::Espresso => "espresso",
        }
    }

    /// Key of this type's duration in the JSON config.
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::Coffee => "coffee_duration_seconds",
            Self::Espresso => "espresso_duration_seconds",
        }
    }

    /// File name of this type's alarm marker.
    pub const fn marker_file(self) -> &'static str {
        match self {
            Self::Coffee => "coffee.alarm",
            Self::Espresso => "espresso.alarm",
        }
    }
}

impl fmt::Display for BrewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coffee" => Ok(Self::Coffee),
            "espresso" => Ok(Self::Espresso),
            other => Err(format!("unknown brew type '{other}' (expected coffee or espresso)")),
        }
    }
}
