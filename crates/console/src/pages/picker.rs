use std::fmt::Write as _;

use kati_core::api::{Company, CompanyId};
use kati_core::{Error, Result};

use super::{PageContext, SELECT_COMPANY};

/// Company selector shared by the company-scoped pages
#[derive(Debug, Clone, Default)]
pub struct CompanyPicker {
    companies: Vec<Company>,
    selected: Option<CompanyId>,
}

impl CompanyPicker {
    /// Refresh the choices from the active companies read; a selection that
    /// is no longer listed is dropped
    pub async fn load(&mut self, ctx: &PageContext) -> bool {
        match ctx.settle(ctx.active_companies().await).await {
            Some(companies) => {
                self.companies = companies;
                self.selected = self
                    .selected
                    .filter(|id| self.companies.iter().any(|c| c.id == *id));
                true
            }
            None => false,
        }
    }

    pub fn selected(&self) -> Option<CompanyId> {
        self.selected
    }

    pub fn selected_company(&self) -> Option<&Company> {
        let id = self.selected?;
        self.companies.iter().find(|c| c.id == id)
    }

    /// Select one of the loaded companies; returns whether the selection changed
    pub fn select(&mut self, id: CompanyId) -> Result<bool> {
        if !self.companies.iter().any(|c| c.id == id) {
            return Err(Error::validation(format!("Unknown company: {}", id)));
        }
        let changed = self.selected != Some(id);
        self.selected = Some(id);
        Ok(changed)
    }

    /// Selected id, or the validation error a scoped submit reports
    pub fn require(&self) -> Result<CompanyId> {
        self.selected.ok_or_else(|| Error::validation(SELECT_COMPANY))
    }

    pub fn render(&self) -> String {
        if self.companies.is_empty() {
            return "No active companies\n".to_string();
        }
        let mut out = String::new();
        for company in &self.companies {
            let marker = if self.selected == Some(company.id) { '>' } else { ' ' };
            let _ = writeln!(out, "{} {:>4}  {}", marker, company.id, company.name);
        }
        out
    }
}
