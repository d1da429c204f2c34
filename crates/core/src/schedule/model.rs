use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// How often a schedule fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    #[default]
    Daily,
    Weekly,
    Monthly,
    /// Operator-supplied cron expression
    Custom,
}

impl ReportType {
    pub const ALL: [ReportType; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Custom];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Custom => "custom",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Custom => "Custom",
        }
    }

    /// Fixed cron string for predefined types; `None` for custom
    pub fn preset_cron(&self) -> Option<&'static str> {
        match self {
            Self::Daily => Some("0 8 * * *"),
            Self::Weekly => Some("0 8 * * 1"),
            Self::Monthly => Some("0 8 1 * *"),
            Self::Custom => None,
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "custom" => Ok(Self::Custom),
            other => Err(Error::InvalidInput(format!("unknown report type: {}", other))),
        }
    }
}
