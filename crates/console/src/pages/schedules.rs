//! Schedules page

use std::fmt::Write as _;
use std::sync::Arc;

use kati_core::api::{CompanyId, ReportSchedule, ScheduleId};
use kati_core::cache::QueryKey;
use kati_core::schedule::{ScheduleField, ScheduleForm};
use kati_core::{Error, Result};

use super::{CompanyPicker, Confirmation, Dialog, PageContext};
use crate::ui::time::format_timestamp;
use crate::ui::{StatusBadge, Table};

const DELETE_PROMPT: &str = "Are you sure you want to delete this schedule?";
const TRIGGER_PROMPT: &str = "Trigger this schedule now?";

fn schedules_key(company_id: CompanyId) -> QueryKey {
    QueryKey::new("schedules").id(company_id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteSchedule {
    pub company_id: CompanyId,
    pub schedule_id: ScheduleId,
}

/// Run a schedule immediately, outside its cron trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerSchedule {
    pub company_id: CompanyId,
    pub schedule_id: ScheduleId,
}

pub struct SchedulesPage {
    ctx: PageContext,
    picker: CompanyPicker,
    schedules: Vec<ReportSchedule>,
    dialog: Dialog<ReportSchedule>,
    pub form: ScheduleForm,
}

impl SchedulesPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            picker: CompanyPicker::default(),
            schedules: Vec::new(),
            dialog: Dialog::Closed,
            form: ScheduleForm::new(),
        }
    }

    pub async fn load(&mut self) -> bool {
        if !self.picker.load(&self.ctx).await {
            return false;
        }
        self.load_schedules().await
    }

    /// Switch company; the previous company's rows are dropped before the new read
    pub async fn select_company(&mut self, id: CompanyId) -> bool {
        match self.picker.select(id) {
            Ok(changed) => {
                if changed {
                    self.schedules.clear();
                    self.dialog = Dialog::Closed;
                }
                self.load_schedules().await
            }
            Err(e) => {
                self.ctx.notifier.error(&e).await;
                false
            }
        }
    }

    async fn load_schedules(&mut self) -> bool {
        let api = Arc::clone(&self.ctx.api);
        let result = self
            .ctx
            .cache
            .fetch_when(
                self.picker.selected(),
                |id| schedules_key(*id),
                move |id| async move { api.list_schedules(id).await },
            )
            .await;

        match self.ctx.settle(result).await {
            Some(Some(schedules)) => {
                self.schedules = schedules;
                true
            }
            Some(None) => {
                self.schedules.clear();
                self.dialog = Dialog::Closed;
                true
            }
            None => false,
        }
    }

    pub fn picker(&self) -> &CompanyPicker {
        &self.picker
    }

    pub fn schedules(&self) -> &[ReportSchedule] {
        &self.schedules
    }

    pub fn dialog(&self) -> &Dialog<ReportSchedule> {
        &self.dialog
    }

    pub async fn open_create(&mut self) -> bool {
        if let Err(e) = self.picker.require() {
            self.ctx.notifier.error(&e).await;
            return false;
        }
        self.form = ScheduleForm::new();
        self.dialog = Dialog::Create;
        true
    }

    pub async fn open_edit(&mut self, id: ScheduleId) -> bool {
        match self.find(id) {
            Some(schedule) => {
                self.form = ScheduleForm::edit(&schedule);
                self.dialog = Dialog::Edit(schedule);
                true
            }
            None => {
                self.ctx.notifier.error(&unknown(id)).await;
                false
            }
        }
    }

    pub fn close(&mut self) {
        self.dialog = Dialog::Closed;
    }

    pub async fn submit(&mut self) -> bool {
        let outcome = self.send_form().await;
        let Some(message) = self.ctx.settle(outcome).await else {
            return false;
        };

        self.ctx.cache.invalidate(&QueryKey::new("schedules")).await;
        self.ctx.notifier.success(message).await;
        self.dialog = Dialog::Closed;
        self.form = ScheduleForm::new();
        self.load_schedules().await;
        true
    }

    async fn send_form(&self) -> Result<&'static str> {
        let company_id = self.picker.require()?;
        if !self.dialog.is_open() {
            return Err(Error::validation("No schedule form is open"));
        }
        let payload = self.form.submit()?;
        match &self.dialog {
            Dialog::Edit(existing) => {
                self.ctx
                    .api
                    .update_schedule(existing.company_id, existing.id, &payload)
                    .await?;
                Ok("Schedule updated successfully")
            }
            _ => {
                self.ctx.api.create_schedule(company_id, &payload).await?;
                Ok("Schedule created successfully")
            }
        }
    }

    fn target(&self, id: ScheduleId) -> Result<(CompanyId, ScheduleId)> {
        let company_id = self.picker.require()?;
        let schedule = self.find(id).ok_or_else(|| unknown(id))?;
        Ok((company_id, schedule.id))
    }

    pub async fn ask_delete(&self, id: ScheduleId) -> Option<Confirmation<DeleteSchedule>> {
        match self.target(id) {
            Ok((company_id, schedule_id)) => Some(Confirmation::new(
                DELETE_PROMPT,
                DeleteSchedule {
                    company_id,
                    schedule_id,
                },
            )),
            Err(e) => {
                self.ctx.notifier.error(&e).await;
                None
            }
        }
    }

    pub async fn delete(&mut self, confirmation: Confirmation<DeleteSchedule>) -> bool {
        let DeleteSchedule {
            company_id,
            schedule_id,
        } = confirmation.into_action();
        let outcome = self.ctx.api.delete_schedule(company_id, schedule_id).await;
        if self.ctx.settle(outcome).await.is_none() {
            return false;
        }

        self.ctx.cache.invalidate(&QueryKey::new("schedules")).await;
        self.ctx
            .notifier
            .success("Schedule deleted successfully")
            .await;
        self.load_schedules().await;
        true
    }

    pub async fn ask_trigger(&self, id: ScheduleId) -> Option<Confirmation<TriggerSchedule>> {
        match self.target(id) {
            Ok((company_id, schedule_id)) => Some(Confirmation::new(
                TRIGGER_PROMPT,
                TriggerSchedule {
                    company_id,
                    schedule_id,
                },
            )),
            Err(e) => {
                self.ctx.notifier.error(&e).await;
                None
            }
        }
    }

    /// Run now; the schedules read is left as cached
    pub async fn trigger(&mut self, confirmation: Confirmation<TriggerSchedule>) -> bool {
        let TriggerSchedule {
            company_id,
            schedule_id,
        } = confirmation.into_action();
        let outcome = self.ctx.api.trigger_schedule(company_id, schedule_id).await;
        if self.ctx.settle(outcome).await.is_none() {
            return false;
        }
        self.ctx
            .notifier
            .success("Schedule triggered successfully")
            .await;
        true
    }

    fn find(&self, id: ScheduleId) -> Option<ReportSchedule> {
        self.schedules.iter().find(|s| s.id == id).cloned()
    }

    pub fn render(&self) -> String {
        let mut out = self.picker.render();
        out.push('\n');

        match self.picker.selected_company() {
            None => out.push_str("Select a company to view its schedules\n"),
            Some(company) => {
                let _ = writeln!(out, "Schedules of {}", company.name);
                if self.schedules.is_empty() {
                    out.push_str("No schedules found\n");
                } else {
                    out.push_str(&self.render_table());
                }
            }
        }

        if self.dialog.is_open() {
            out.push_str(&self.render_form());
        }
        out
    }

    fn render_table(&self) -> String {
        let mut table = Table::new(["ID", "Name", "Type", "Cron", "Status", "Last Run", "Runs"]);
        for schedule in &self.schedules {
            table.push_row([
                schedule.id.to_string(),
                schedule.name.clone(),
                schedule.report_type.clone(),
                schedule
                    .cron_expression
                    .clone()
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| "-".to_string()),
                StatusBadge::active(schedule.is_active).to_string(),
                schedule
                    .last_run
                    .as_deref()
                    .map(format_timestamp)
                    .unwrap_or_else(|| "Never".to_string()),
                schedule.run_count.to_string(),
            ]);
        }
        table.render()
    }

    fn render_form(&self) -> String {
        let mut out = String::new();
        let title = match &self.dialog {
            Dialog::Edit(schedule) => format!("Edit Schedule #{}", schedule.id),
            _ => "Add Schedule".to_string(),
        };
        let _ = writeln!(out, "\n{}", title);
        let _ = writeln!(out, "  name:            {}", self.form.name);
        let _ = writeln!(out, "  description:     {}", self.form.description);
        let _ = writeln!(out, "  report_type:     {}", self.form.report_type().label());
        for field in self.form.visible_fields() {
            match field {
                ScheduleField::CronExpression => {
                    let _ = writeln!(out, "  cron_expression: {}", self.form.cron_expression);
                }
                ScheduleField::DateStart => {
                    let _ = writeln!(out, "  date_start:      {}", self.form.date_start);
                }
                ScheduleField::DateEnd => {
                    let _ = writeln!(out, "  date_end:        {}", self.form.date_end);
                }
            }
        }
        let _ = writeln!(out, "  recipients:      {}", self.form.recipients);
        let _ = writeln!(out, "  is_active:       {}", self.form.is_active);
        out
    }
}

fn unknown(id: ScheduleId) -> Error {
    Error::validation(format!("Unknown schedule: {}", id))
}
