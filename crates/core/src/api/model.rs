//! Backend record definitions
//!
//! These types mirror the JSON shapes served by the reporting backend.
//! Timestamps stay as the backend's strings; formatting happens at display time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

pub type CompanyId = i64;
pub type UserId = i64;
pub type ScheduleId = i64;

/// A client organization whose tickets are reported on.
///
/// Companies are never removed; deactivation flips `is_active` and hides the
/// company from the active listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,

    /// Credential used by the backend against the company's ticketing system
    pub api_key: String,

    /// Base URL of the company's ticketing system
    pub api_url: String,

    #[serde(default)]
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Payload for creating a company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub api_key: String,
    pub api_url: String,
    pub description: String,
}

/// Partial company update; absent fields are left untouched by the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl From<NewCompany> for CompanyUpdate {
    fn from(company: NewCompany) -> Self {
        Self {
            name: Some(company.name),
            api_key: Some(company.api_key),
            api_url: Some(company.api_url),
            description: Some(company.description),
            is_active: None,
        }
    }
}

/// A person attached to exactly one company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyUser {
    pub id: UserId,
    pub company_id: CompanyId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub receive_reports: bool,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: String,
    pub receive_reports: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receive_reports: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl From<NewUser> for UserUpdate {
    fn from(user: NewUser) -> Self {
        Self {
            name: Some(user.name),
            email: Some(user.email),
            role: Some(user.role),
            receive_reports: Some(user.receive_reports),
            is_active: None,
        }
    }
}

/// A recurring report-generation rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSchedule {
    pub id: ScheduleId,
    pub company_id: CompanyId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,

    /// One of `daily`, `weekly`, `monthly`, `custom`
    pub report_type: String,

    /// Five-field cron string (minute hour day month weekday)
    #[serde(default)]
    pub cron_expression: Option<String>,
    #[serde(default)]
    pub date_start: Option<String>,
    #[serde(default)]
    pub date_end: Option<String>,

    /// Comma-separated addresses; empty means "all company users receiving reports"
    #[serde(default)]
    pub recipients: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub last_run: Option<String>,
    pub run_count: u32,
    pub created_at: String,
    pub updated_at: String,
}

/// Body sent when creating or updating a schedule.
///
/// Built by [`crate::schedule::ScheduleForm::submit`]; optional fields that are
/// `None` are left out of the JSON entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePayload {
    pub name: String,
    pub description: String,
    pub report_type: String,
    pub is_active: bool,
    pub recipients: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cron_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_end: Option<String>,
}

/// Lifecycle states of a ticket report job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Scheduled,
    Processing,
    Sending,
    Sent,
    Completed,
    Failed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Processing => "processing",
            Self::Sending => "sending",
            Self::Sent => "sent",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether the job has stopped moving
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Sent | Self::Completed | Self::Failed)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scheduled" => Ok(Self::Scheduled),
            "processing" => Ok(Self::Processing),
            "sending" => Ok(Self::Sending),
            "sent" => Ok(Self::Sent),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(Error::InvalidInput(format!("unknown ticket status: {}", other))),
        }
    }
}

/// A single asynchronous report-generation job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketRequest {
    pub id: i64,
    pub company_id: CompanyId,
    pub date_start: String,
    #[serde(default)]
    pub date_end: Option<String>,
    #[serde(default)]
    pub email_to: Option<String>,
    pub status: String,
    #[serde(default)]
    pub total_tickets: Option<u64>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub processing_time_seconds: Option<f64>,
    pub created_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
}

impl TicketRequest {
    /// Parsed status; `None` when the backend reports a state we don't know
    pub fn status_kind(&self) -> Option<TicketStatus> {
        self.status.parse().ok()
    }
}

/// Body of `POST /fetch-tickets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketFetchRequest {
    pub company_id: CompanyId,
    pub date_start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}
