//! Companies page

use reqwest::Url;
use std::fmt::Write as _;

use kati_core::api::{Company, CompanyId, NewCompany};
use kati_core::{Error, Result};

use super::{companies_key, required, Confirmation, Dialog, PageContext};
use crate::ui::time::format_date;
use crate::ui::{StatusBadge, Table};

const DEACTIVATE_PROMPT: &str = "Are you sure you want to deactivate this company?";

/// Company create/edit inputs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyForm {
    pub name: String,
    pub api_key: String,
    pub api_url: String,
    pub description: String,
}

impl CompanyForm {
    pub fn from_company(company: &Company) -> Self {
        Self {
            name: company.name.clone(),
            api_key: company.api_key.clone(),
            api_url: company.api_url.clone(),
            description: company.description.clone().unwrap_or_default(),
        }
    }

    /// Check required fields and build the request body
    pub fn validate(&self) -> Result<NewCompany> {
        required(&self.name, "Company Name")?;
        required(&self.api_key, "API Key")?;
        required(&self.api_url, "API URL")?;
        Url::parse(&self.api_url)
            .map_err(|e| Error::validation(format!("Invalid API URL: {}", e)))?;

        Ok(NewCompany {
            name: self.name.clone(),
            api_key: self.api_key.clone(),
            api_url: self.api_url.clone(),
            description: self.description.clone(),
        })
    }
}

/// Deactivation of one company
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeactivateCompany(pub CompanyId);

pub struct CompaniesPage {
    ctx: PageContext,
    companies: Vec<Company>,
    dialog: Dialog<Company>,
    pub form: CompanyForm,
}

impl CompaniesPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            companies: Vec::new(),
            dialog: Dialog::Closed,
            form: CompanyForm::default(),
        }
    }

    /// Read the active companies
    pub async fn load(&mut self) -> bool {
        match self.ctx.settle(self.ctx.active_companies().await).await {
            Some(companies) => {
                self.companies = companies;
                true
            }
            None => false,
        }
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn dialog(&self) -> &Dialog<Company> {
        &self.dialog
    }

    pub fn open_create(&mut self) {
        self.form = CompanyForm::default();
        self.dialog = Dialog::Create;
    }

    pub async fn open_edit(&mut self, id: CompanyId) -> bool {
        match self.find(id) {
            Some(company) => {
                self.form = CompanyForm::from_company(&company);
                self.dialog = Dialog::Edit(company);
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

    /// Create or update from the open dialog; the dialog stays open on failure
    pub async fn submit(&mut self) -> bool {
        let outcome = self.send_form().await;
        let Some(message) = self.ctx.settle(outcome).await else {
            return false;
        };

        self.ctx.cache.invalidate(&companies_key()).await;
        self.ctx.notifier.success(message).await;
        self.dialog = Dialog::Closed;
        self.form = CompanyForm::default();
        self.load().await;
        true
    }

    async fn send_form(&self) -> Result<&'static str> {
        if !self.dialog.is_open() {
            return Err(Error::validation("No company form is open"));
        }
        let company = self.form.validate()?;
        match &self.dialog {
            Dialog::Edit(existing) => {
                self.ctx
                    .api
                    .update_company(existing.id, &company.into())
                    .await?;
                Ok("Company updated successfully")
            }
            _ => {
                self.ctx.api.create_company(&company).await?;
                Ok("Company created successfully")
            }
        }
    }

    pub async fn ask_deactivate(&self, id: CompanyId) -> Option<Confirmation<DeactivateCompany>> {
        if self.find(id).is_none() {
            self.ctx.notifier.error(&unknown(id)).await;
            return None;
        }
        Some(Confirmation::new(DEACTIVATE_PROMPT, DeactivateCompany(id)))
    }

    pub async fn deactivate(&mut self, confirmation: Confirmation<DeactivateCompany>) -> bool {
        let DeactivateCompany(id) = confirmation.into_action();
        let outcome = self.ctx.api.deactivate_company(id).await;
        if self.ctx.settle(outcome).await.is_none() {
            return false;
        }

        self.ctx.cache.invalidate(&companies_key()).await;
        self.ctx
            .notifier
            .success("Company deactivated successfully")
            .await;
        self.load().await;
        true
    }

    fn find(&self, id: CompanyId) -> Option<Company> {
        self.companies.iter().find(|c| c.id == id).cloned()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.companies.is_empty() {
            out.push_str("No companies found\n");
        } else {
            let mut table = Table::new(["ID", "Name", "API URL", "Status", "Created"]);
            for company in &self.companies {
                table.push_row([
                    company.id.to_string(),
                    company.name.clone(),
                    company.api_url.clone(),
                    StatusBadge::active(company.is_active).to_string(),
                    format_date(&company.created_at),
                ]);
            }
            out.push_str(&table.render());
        }

        if self.dialog.is_open() {
            let title = match &self.dialog {
                Dialog::Edit(company) => format!("Edit Company #{}", company.id),
                _ => "Add Company".to_string(),
            };
            let _ = writeln!(out, "\n{}", title);
            let _ = writeln!(out, "  name:        {}", self.form.name);
            let _ = writeln!(out, "  api_key:     {}", self.form.api_key);
            let _ = writeln!(out, "  api_url:     {}", self.form.api_url);
            let _ = writeln!(out, "  description: {}", self.form.description);
        }
        out
    }
}

fn unknown(id: CompanyId) -> Error {
    Error::validation(format!("Unknown company: {}", id))
}
