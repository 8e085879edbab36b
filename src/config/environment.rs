use crate::error::AnetaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Runtime mode selecting which override set is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentProfile {
    #[default]
    Development,
    Staging,
    Production,
    Testing,
}

impl EnvironmentProfile {
    pub const ALL: [EnvironmentProfile; 4] = [
        EnvironmentProfile::Development,
        EnvironmentProfile::Staging,
        EnvironmentProfile::Production,
        EnvironmentProfile::Testing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentProfile::Development => "development",
            EnvironmentProfile::Staging => "staging",
            EnvironmentProfile::Production => "production",
            EnvironmentProfile::Testing => "testing",
        }
    }
}

impl FromStr for EnvironmentProfile {
    type Err = AnetaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" => Ok(EnvironmentProfile::Development),
            "staging" => Ok(EnvironmentProfile::Staging),
            "production" => Ok(EnvironmentProfile::Production),
            "testing" => Ok(EnvironmentProfile::Testing),
            _ => Err(AnetaError::InvalidEnvironment { name: s.to_string() }),
        }
    }
}

impl fmt::Display for EnvironmentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
