//! Altitude bands served by the cloud cover provider.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Altitude band of a cloud cover request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudLevel {
    Low,
    Medium,
    High,
}

impl CloudLevel {
    /// All bands, lowest first.
    pub const ALL: [CloudLevel; 3] = [CloudLevel::Low, CloudLevel::Medium, CloudLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            CloudLevel::Low => "low",
            CloudLevel::Medium => "medium",
            CloudLevel::High => "high",
        }
    }

    /// Provider parameter name, e.g. `low_cloud_cover:octas`.
    pub fn parameter(&self, unit: &str) -> String {
        format!("{}_cloud_cover:{}", self.as_str(), unit)
    }
}

impl fmt::Display for CloudLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CloudLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(CloudLevel::Low),
            "medium" => Ok(CloudLevel::Medium),
            "high" => Ok(CloudLevel::High),
            other => Err(format!("unknown cloud level: {}", other)),
        }
    }
}
