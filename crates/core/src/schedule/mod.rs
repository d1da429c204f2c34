//! Schedule editing
//!
//! The report type picked in the schedule form decides which extra fields are
//! offered and where the submitted cron expression comes from.

mod form;
mod model;

pub use form::{ScheduleField, ScheduleForm};
pub use model::ReportType;
