//! Schedule form state machine
//!
//! States are the four report types. Only `custom` reveals the raw cron and
//! date inputs. On submit a predefined type always takes its cron string from
//! the preset table, and whatever sits in the raw inputs is dropped.

use super::model::ReportType;
use crate::api::{ReportSchedule, SchedulePayload};
use crate::error::Error;
use crate::Result;

/// Inputs beyond the always-present ones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleField {
    CronExpression,
    DateStart,
    DateEnd,
}

const CUSTOM_FIELDS: [ScheduleField; 3] = [
    ScheduleField::CronExpression,
    ScheduleField::DateStart,
    ScheduleField::DateEnd,
];

/// Editable schedule form
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleForm {
    pub name: String,
    pub description: String,
    report_type: ReportType,
    /// Raw cron input; only read when the type is custom
    pub cron_expression: String,
    pub date_start: String,
    pub date_end: String,
    /// Comma-separated addresses
    pub recipients: String,
    pub is_active: bool,
}

impl Default for ScheduleForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            report_type: ReportType::Daily,
            cron_expression: String::new(),
            date_start: String::new(),
            date_end: String::new(),
            recipients: String::new(),
            is_active: true,
        }
    }
}

impl ScheduleForm {
    /// Blank form for a new schedule
    pub fn new() -> Self {
        Self::default()
    }

    /// Form prefilled from an existing schedule
    ///
    /// An unrecognised stored report type starts the form as daily.
    pub fn edit(schedule: &ReportSchedule) -> Self {
        Self {
            name: schedule.name.clone(),
            description: schedule.description.clone().unwrap_or_default(),
            report_type: schedule.report_type.parse().unwrap_or_default(),
            cron_expression: schedule.cron_expression.clone().unwrap_or_default(),
            date_start: schedule.date_start.clone().unwrap_or_default(),
            date_end: schedule.date_end.clone().unwrap_or_default(),
            recipients: schedule.recipients.clone().unwrap_or_default(),
            is_active: schedule.is_active,
        }
    }

    pub fn report_type(&self) -> ReportType {
        self.report_type
    }

    /// Switch type; raw inputs are kept so switching back restores them
    pub fn select_type(&mut self, report_type: ReportType) {
        self.report_type = report_type;
    }

    /// Extra inputs offered in the current state
    pub fn visible_fields(&self) -> &'static [ScheduleField] {
        match self.report_type {
            ReportType::Custom => &CUSTOM_FIELDS,
            _ => &[],
        }
    }

    /// Build the request body
    ///
    /// Custom schedules pass the typed cron and dates through verbatim, with an
    /// empty date treated as absent.
    pub fn submit(&self) -> Result<SchedulePayload> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("Schedule name is required"));
        }

        let (cron_expression, date_start, date_end) = match self.report_type.preset_cron() {
            Some(cron) => (Some(cron.to_string()), None, None),
            None => {
                if self.cron_expression.trim().is_empty() {
                    return Err(Error::validation(
                        "Cron expression is required for custom schedules",
                    ));
                }
                (
                    Some(self.cron_expression.clone()),
                    non_empty(&self.date_start),
                    non_empty(&self.date_end),
                )
            }
        };

        Ok(SchedulePayload {
            name: self.name.clone(),
            description: self.description.clone(),
            report_type: self.report_type.as_str().to_string(),
            is_active: self.is_active,
            recipients: self.recipients.clone(),
            cron_expression,
            date_start,
            date_end,
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
