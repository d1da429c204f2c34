//! Reports page
//!
//! Submits an on-demand report job. The backend answers with the queued
//! request; generation and delivery happen on its side.

use std::fmt::Write as _;

use kati_core::api::{CompanyId, TicketFetchRequest, TicketRequest};
use kati_core::{Error, Result};

use super::{required, CompanyPicker, PageContext};
use crate::ui::time::{format_timestamp, is_calendar_date};
use crate::ui::StatusBadge;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportForm {
    pub date_start: String,
    pub date_end: String,
    /// Comma-separated; empty sends to the company's report recipients
    pub email_to: String,
}

impl ReportForm {
    pub fn to_request(&self, company_id: CompanyId) -> Result<TicketFetchRequest> {
        required(&self.date_start, "Start Date")?;
        check_date(&self.date_start, "Start Date")?;
        if !self.date_end.is_empty() {
            check_date(&self.date_end, "End Date")?;
        }
        Ok(TicketFetchRequest {
            company_id,
            date_start: self.date_start.clone(),
            date_end: non_empty(&self.date_end),
            email_to: non_empty(&self.email_to),
        })
    }
}

fn check_date(value: &str, label: &str) -> Result<()> {
    if is_calendar_date(value) {
        Ok(())
    } else {
        Err(Error::validation(format!("{} must be YYYY-MM-DD", label)))
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

pub struct ReportsPage {
    ctx: PageContext,
    picker: CompanyPicker,
    pub form: ReportForm,
    last_request: Option<TicketRequest>,
}

impl ReportsPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            picker: CompanyPicker::default(),
            form: ReportForm::default(),
            last_request: None,
        }
    }

    pub async fn load(&mut self) -> bool {
        self.picker.load(&self.ctx).await
    }

    pub async fn select_company(&mut self, id: CompanyId) -> bool {
        match self.picker.select(id) {
            Ok(_) => true,
            Err(e) => {
                self.ctx.notifier.error(&e).await;
                false
            }
        }
    }

    pub fn picker(&self) -> &CompanyPicker {
        &self.picker
    }

    /// Most recent request accepted by the backend
    pub fn last_request(&self) -> Option<&TicketRequest> {
        self.last_request.as_ref()
    }

    /// Queue a report; on success the date and recipient inputs are cleared
    pub async fn submit(&mut self) -> bool {
        let outcome = self.send_request().await;
        let Some(request) = self.ctx.settle(outcome).await else {
            return false;
        };

        self.ctx
            .notifier
            .info(
                "Report request submitted",
                format!("Request ID: {}. Processing tickets...", request.id),
            )
            .await;
        self.form = ReportForm::default();
        self.last_request = Some(request);
        true
    }

    async fn send_request(&self) -> Result<TicketRequest> {
        let company_id = self.picker.require()?;
        let request = self.form.to_request(company_id)?;
        self.ctx.api.fetch_tickets(&request).await
    }

    pub fn render(&self) -> String {
        let mut out = self.picker.render();
        let company = self
            .picker
            .selected_company()
            .map(|c| c.name.as_str())
            .unwrap_or("-");

        let _ = writeln!(out, "\nGenerate Report");
        let _ = writeln!(out, "  company:    {}", company);
        let _ = writeln!(out, "  date_start: {}", self.form.date_start);
        let _ = writeln!(out, "  date_end:   {}", self.form.date_end);
        let _ = writeln!(out, "  email_to:   {}", self.form.email_to);

        if let Some(request) = &self.last_request {
            let _ = writeln!(out, "\nLast request");
            let _ = writeln!(out, "  id:      {}", request.id);
            let _ = writeln!(out, "  status:  {}", StatusBadge::new(&request.status));
            let _ = writeln!(out, "  created: {}", format_timestamp(&request.created_at));
            if let Some(error) = &request.error_message {
                let _ = writeln!(out, "  error:   {}", error);
            }
        }
        out
    }
}
