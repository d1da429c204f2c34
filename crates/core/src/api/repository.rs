//! Backend API trait
//!
//! Defines the interface page controllers use to reach the reporting backend.

use async_trait::async_trait;

use super::model::{
    Company, CompanyId, CompanyUpdate, CompanyUser, HealthStatus, NewCompany, NewUser,
    ReportSchedule, ScheduleId, SchedulePayload, TicketFetchRequest, TicketRequest, UserId,
    UserUpdate,
};
use crate::Result;

/// One method per backend operation, each a single request
#[async_trait]
pub trait ReportApi: Send + Sync {
    /// `GET /health`
    async fn health(&self) -> Result<HealthStatus>;

    /// `GET /companies?active=<flag>`
    async fn list_companies(&self, active: bool) -> Result<Vec<Company>>;

    async fn get_company(&self, id: CompanyId) -> Result<Company>;

    async fn create_company(&self, company: &NewCompany) -> Result<Company>;

    async fn update_company(&self, id: CompanyId, update: &CompanyUpdate) -> Result<Company>;

    /// `DELETE /companies/{id}`; the backend only flips `is_active`
    async fn deactivate_company(&self, id: CompanyId) -> Result<()>;

    async fn list_users(&self, company_id: CompanyId) -> Result<Vec<CompanyUser>>;

    async fn create_user(&self, company_id: CompanyId, user: &NewUser) -> Result<CompanyUser>;

    async fn update_user(
        &self,
        company_id: CompanyId,
        user_id: UserId,
        update: &UserUpdate,
    ) -> Result<CompanyUser>;

    async fn delete_user(&self, company_id: CompanyId, user_id: UserId) -> Result<()>;

    async fn list_schedules(&self, company_id: CompanyId) -> Result<Vec<ReportSchedule>>;

    async fn create_schedule(
        &self,
        company_id: CompanyId,
        schedule: &SchedulePayload,
    ) -> Result<ReportSchedule>;

    async fn update_schedule(
        &self,
        company_id: CompanyId,
        schedule_id: ScheduleId,
        schedule: &SchedulePayload,
    ) -> Result<ReportSchedule>;

    async fn delete_schedule(&self, company_id: CompanyId, schedule_id: ScheduleId) -> Result<()>;

    /// `POST /companies/{id}/schedules/{id}/run`
    async fn trigger_schedule(&self, company_id: CompanyId, schedule_id: ScheduleId)
        -> Result<()>;

    /// Submit a report job; returns the created request, not the finished report
    async fn fetch_tickets(&self, request: &TicketFetchRequest) -> Result<TicketRequest>;
}
