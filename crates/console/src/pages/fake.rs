//! In-memory backend for page controller tests

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use kati_core::api::{
    Company, CompanyId, CompanyUpdate, CompanyUser, HealthStatus, NewCompany, NewUser,
    ReportApi, ReportSchedule, ScheduleId, SchedulePayload, TicketFetchRequest, TicketRequest,
    UserId, UserUpdate,
};
use kati_core::cache::QueryCache;
use kati_core::{Error, Result};

use super::PageContext;
use crate::notify::Notifier;

const STAMP: &str = "2024-05-01T10:00:00";

#[derive(Default)]
struct State {
    companies: Vec<Company>,
    users: Vec<CompanyUser>,
    schedules: Vec<ReportSchedule>,
    tickets: Vec<TicketRequest>,
    calls: Vec<String>,
    next_id: i64,
    fail_next: Option<String>,
}

#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<State>>,
}

pub fn context(api: &FakeApi) -> PageContext {
    PageContext::new(Arc::new(api.clone()), QueryCache::new(), Notifier::new())
}

pub fn company(id: CompanyId, name: &str, is_active: bool) -> Company {
    Company {
        id,
        name: name.to_string(),
        api_key: format!("key-{}", id),
        api_url: format!("https://{}.example.com", name.to_lowercase()),
        description: None,
        is_active,
        created_at: STAMP.to_string(),
        updated_at: STAMP.to_string(),
    }
}

pub fn user(id: UserId, company_id: CompanyId, name: &str) -> CompanyUser {
    CompanyUser {
        id,
        company_id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        role: "User".to_string(),
        receive_reports: true,
        is_active: true,
        created_at: STAMP.to_string(),
        updated_at: STAMP.to_string(),
    }
}

pub fn schedule(id: ScheduleId, company_id: CompanyId, name: &str) -> ReportSchedule {
    ReportSchedule {
        id,
        company_id,
        name: name.to_string(),
        description: None,
        report_type: "daily".to_string(),
        cron_expression: Some("0 8 * * *".to_string()),
        date_start: None,
        date_end: None,
        recipients: None,
        is_active: true,
        last_run: None,
        run_count: 0,
        created_at: STAMP.to_string(),
        updated_at: STAMP.to_string(),
    }
}

fn not_found(what: &str) -> Error {
    Error::Api {
        status: 404,
        message: format!("{} not found", what),
    }
}

impl FakeApi {
    /// Acme and Globex active, Initech deactivated, one user and schedule each for Acme and Globex
    pub fn seeded() -> Self {
        let api = Self::default();
        {
            let mut state = api.state.lock().unwrap();
            state.companies = vec![
                company(1, "Acme", true),
                company(2, "Globex", true),
                company(3, "Initech", false),
            ];
            state.users = vec![user(10, 1, "Ana"), user(11, 2, "Bo")];
            state.schedules = vec![schedule(20, 1, "Daily digest"), schedule(21, 2, "Globex weekly")];
            state.next_id = 100;
        }
        api
    }

    /// Make the next call fail as if the backend answered `{"detail": message}`
    pub fn fail_next(&self, message: &str) {
        self.state.lock().unwrap().fail_next = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    pub fn companies(&self) -> Vec<Company> {
        self.state.lock().unwrap().companies.clone()
    }

    pub fn users(&self) -> Vec<CompanyUser> {
        self.state.lock().unwrap().users.clone()
    }

    pub fn schedules(&self) -> Vec<ReportSchedule> {
        self.state.lock().unwrap().schedules.clone()
    }

    pub fn tickets(&self) -> Vec<TicketRequest> {
        self.state.lock().unwrap().tickets.clone()
    }

    fn begin(&self, call: String) -> Result<std::sync::MutexGuard<'_, State>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        let failure = state.fail_next.take();
        match failure {
            Some(message) => Err(Error::Api {
                status: 500,
                message,
            }),
            None => Ok(state),
        }
    }
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[async_trait]
impl ReportApi for FakeApi {
    async fn health(&self) -> Result<HealthStatus> {
        let _state = self.begin("health".to_string())?;
        Ok(HealthStatus {
            status: "healthy".to_string(),
            version: "1.0.0".to_string(),
        })
    }

    async fn list_companies(&self, active: bool) -> Result<Vec<Company>> {
        let state = self.begin(format!("list_companies:{}", active))?;
        Ok(state
            .companies
            .iter()
            .filter(|c| !active || c.is_active)
            .cloned()
            .collect())
    }

    async fn get_company(&self, id: CompanyId) -> Result<Company> {
        let state = self.begin(format!("get_company:{}", id))?;
        state
            .companies
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| not_found("Company"))
    }

    async fn create_company(&self, new: &NewCompany) -> Result<Company> {
        let mut state = self.begin("create_company".to_string())?;
        let id = state.next_id();
        let mut created = company(id, &new.name, true);
        created.api_key = new.api_key.clone();
        created.api_url = new.api_url.clone();
        created.description = Some(new.description.clone());
        state.companies.push(created.clone());
        Ok(created)
    }

    async fn update_company(&self, id: CompanyId, update: &CompanyUpdate) -> Result<Company> {
        let mut state = self.begin(format!("update_company:{}", id))?;
        let existing = state
            .companies
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("Company"))?;
        if let Some(name) = &update.name {
            existing.name = name.clone();
        }
        if let Some(api_key) = &update.api_key {
            existing.api_key = api_key.clone();
        }
        if let Some(api_url) = &update.api_url {
            existing.api_url = api_url.clone();
        }
        if let Some(description) = &update.description {
            existing.description = Some(description.clone());
        }
        if let Some(is_active) = update.is_active {
            existing.is_active = is_active;
        }
        Ok(existing.clone())
    }

    async fn deactivate_company(&self, id: CompanyId) -> Result<()> {
        let mut state = self.begin(format!("deactivate_company:{}", id))?;
        let existing = state
            .companies
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("Company"))?;
        existing.is_active = false;
        Ok(())
    }

    async fn list_users(&self, company_id: CompanyId) -> Result<Vec<CompanyUser>> {
        let state = self.begin(format!("list_users:{}", company_id))?;
        Ok(state
            .users
            .iter()
            .filter(|u| u.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn create_user(&self, company_id: CompanyId, new: &NewUser) -> Result<CompanyUser> {
        let mut state = self.begin(format!("create_user:{}", company_id))?;
        let id = state.next_id();
        let mut created = user(id, company_id, &new.name);
        created.email = new.email.clone();
        created.role = new.role.clone();
        created.receive_reports = new.receive_reports;
        state.users.push(created.clone());
        Ok(created)
    }

    async fn update_user(
        &self,
        company_id: CompanyId,
        user_id: UserId,
        update: &UserUpdate,
    ) -> Result<CompanyUser> {
        let mut state = self.begin(format!("update_user:{}:{}", company_id, user_id))?;
        let existing = state
            .users
            .iter_mut()
            .find(|u| u.company_id == company_id && u.id == user_id)
            .ok_or_else(|| not_found("User"))?;
        if let Some(name) = &update.name {
            existing.name = name.clone();
        }
        if let Some(email) = &update.email {
            existing.email = email.clone();
        }
        if let Some(role) = &update.role {
            existing.role = role.clone();
        }
        if let Some(receive_reports) = update.receive_reports {
            existing.receive_reports = receive_reports;
        }
        Ok(existing.clone())
    }

    async fn delete_user(&self, company_id: CompanyId, user_id: UserId) -> Result<()> {
        let mut state = self.begin(format!("delete_user:{}:{}", company_id, user_id))?;
        let before = state.users.len();
        state
            .users
            .retain(|u| !(u.company_id == company_id && u.id == user_id));
        if state.users.len() == before {
            return Err(not_found("User"));
        }
        Ok(())
    }

    async fn list_schedules(&self, company_id: CompanyId) -> Result<Vec<ReportSchedule>> {
        let state = self.begin(format!("list_schedules:{}", company_id))?;
        Ok(state
            .schedules
            .iter()
            .filter(|s| s.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn create_schedule(
        &self,
        company_id: CompanyId,
        payload: &SchedulePayload,
    ) -> Result<ReportSchedule> {
        let mut state = self.begin(format!("create_schedule:{}", company_id))?;
        let id = state.next_id();
        let mut created = schedule(id, company_id, &payload.name);
        apply_payload(&mut created, payload);
        state.schedules.push(created.clone());
        Ok(created)
    }

    async fn update_schedule(
        &self,
        company_id: CompanyId,
        schedule_id: ScheduleId,
        payload: &SchedulePayload,
    ) -> Result<ReportSchedule> {
        let mut state = self.begin(format!("update_schedule:{}:{}", company_id, schedule_id))?;
        let existing = state
            .schedules
            .iter_mut()
            .find(|s| s.company_id == company_id && s.id == schedule_id)
            .ok_or_else(|| not_found("Schedule"))?;
        apply_payload(existing, payload);
        Ok(existing.clone())
    }

    async fn delete_schedule(&self, company_id: CompanyId, schedule_id: ScheduleId) -> Result<()> {
        let mut state = self.begin(format!("delete_schedule:{}:{}", company_id, schedule_id))?;
        let before = state.schedules.len();
        state
            .schedules
            .retain(|s| !(s.company_id == company_id && s.id == schedule_id));
        if state.schedules.len() == before {
            return Err(not_found("Schedule"));
        }
        Ok(())
    }

    async fn trigger_schedule(
        &self,
        company_id: CompanyId,
        schedule_id: ScheduleId,
    ) -> Result<()> {
        let mut state = self.begin(format!("trigger_schedule:{}:{}", company_id, schedule_id))?;
        let existing = state
            .schedules
            .iter_mut()
            .find(|s| s.company_id == company_id && s.id == schedule_id)
            .ok_or_else(|| not_found("Schedule"))?;
        existing.run_count += 1;
        existing.last_run = Some(STAMP.to_string());
        Ok(())
    }

    async fn fetch_tickets(&self, request: &TicketFetchRequest) -> Result<TicketRequest> {
        let mut state = self.begin(format!("fetch_tickets:{}", request.company_id))?;
        let id = state.next_id();
        let ticket = TicketRequest {
            id,
            company_id: request.company_id,
            date_start: request.date_start.clone(),
            date_end: request.date_end.clone(),
            email_to: request.email_to.clone(),
            status: "scheduled".to_string(),
            total_tickets: None,
            file_name: None,
            error_message: None,
            processing_time_seconds: None,
            created_at: STAMP.to_string(),
            completed_at: None,
        };
        state.tickets.push(ticket.clone());
        Ok(ticket)
    }
}

fn apply_payload(schedule: &mut ReportSchedule, payload: &SchedulePayload) {
    schedule.name = payload.name.clone();
    schedule.description = Some(payload.description.clone());
    schedule.report_type = payload.report_type.clone();
    schedule.is_active = payload.is_active;
    schedule.recipients = Some(payload.recipients.clone());
    schedule.cron_expression = payload.cron_expression.clone();
    schedule.date_start = payload.date_start.clone();
    schedule.date_end = payload.date_end.clone();
}
