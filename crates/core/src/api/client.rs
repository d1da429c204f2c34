//! Reporting backend HTTP client
//!
//! Every operation is exactly one request. Non-success answers become
//! [`Error::Api`] carrying the backend's `detail` string when it sent one.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use super::model::{
    Company, CompanyId, CompanyUpdate, CompanyUser, HealthStatus, NewCompany, NewUser,
    ReportSchedule, ScheduleId, SchedulePayload, TicketFetchRequest, TicketRequest, UserId,
    UserUpdate,
};
use super::repository::ReportApi;
use crate::error::Error;
use crate::settings::ApiSettings;
use crate::Result;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the backend
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Base URL without a trailing slash, e.g. `http://127.0.0.1:8000`
    pub base_url: String,
    /// Sent as `Authorization: Bearer <token>` when present
    pub bearer_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from(&ApiSettings::default())
    }
}

impl From<&ApiSettings> for ApiConfig {
    fn from(settings: &ApiSettings) -> Self {
        let token = settings.bearer_token.trim();
        Self {
            base_url: settings.api_url.trim().trim_end_matches('/').to_string(),
            bearer_token: (!token.is_empty()).then(|| token.to_string()),
        }
    }
}

/// Backend operations, used to pick the fallback error message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Health,
    ListCompanies,
    GetCompany,
    CreateCompany,
    UpdateCompany,
    DeactivateCompany,
    ListUsers,
    CreateUser,
    UpdateUser,
    DeleteUser,
    ListSchedules,
    CreateSchedule,
    UpdateSchedule,
    DeleteSchedule,
    TriggerSchedule,
    FetchTickets,
}

impl Operation {
    /// Message used when the backend gives no usable `detail`
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Health => "Failed to fetch health",
            Self::ListCompanies => "Failed to fetch companies",
            Self::GetCompany => "Failed to fetch company",
            Self::CreateCompany => "Failed to create company",
            Self::UpdateCompany => "Failed to update company",
            Self::DeactivateCompany => "Failed to delete company",
            Self::ListUsers => "Failed to fetch users",
            Self::CreateUser => "Failed to create user",
            Self::UpdateUser => "Failed to update user",
            Self::DeleteUser => "Failed to delete user",
            Self::ListSchedules => "Failed to fetch schedules",
            Self::CreateSchedule => "Failed to create schedule",
            Self::UpdateSchedule => "Failed to update schedule",
            Self::DeleteSchedule => "Failed to delete schedule",
            Self::TriggerSchedule => "Failed to trigger schedule",
            Self::FetchTickets => "Failed to fetch tickets",
        }
    }
}

/// HTTP client for the reporting backend
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: Arc<RwLock<ApiConfig>>,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Point the client at a different backend; later requests use the new settings
    pub async fn reconfigure(&self, config: ApiConfig) {
        debug!("API client now targets {}", config.base_url);
        *self.config.write().await = config;
    }

    /// Current connection settings
    pub async fn config(&self) -> ApiConfig {
        self.config.read().await.clone()
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let config = self.config.read().await;
        debug!("{} {}{}", method, config.base_url, path);

        let builder = self
            .client
            .request(method, format!("{}{}", config.base_url, path));
        match &config.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and turn any non-success status into an error
    async fn execute(&self, operation: Operation, builder: RequestBuilder) -> Result<Response> {
        let resp = builder.send().await.map_err(|e| {
            debug!("{:?} transport failure: {}", operation, e);
            Error::Transport {
                message: operation.failure_message().to_string(),
                source: e,
            }
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = detail_message(&body)
            .unwrap_or_else(|| operation.failure_message().to_string());
        debug!("{:?} failed with HTTP {}: {}", operation, status, message);

        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        operation: Operation,
        builder: RequestBuilder,
    ) -> Result<T> {
        let resp = self.execute(operation, builder).await?;
        resp.json::<T>().await.map_err(|e| Error::Decode {
            message: operation.failure_message().to_string(),
            source: e,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, operation: Operation, path: &str) -> Result<T> {
        let builder = self.request(Method::GET, path).await;
        self.fetch_json(operation, builder).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        operation: Operation,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let builder = self.request(method, path).await.json(body);
        self.fetch_json(operation, builder).await
    }

    /// Issue a request whose response body is ignored
    async fn send_empty(&self, operation: Operation, method: Method, path: &str) -> Result<()> {
        let builder = self.request(method, path).await;
        self.execute(operation, builder).await?;
        Ok(())
    }
}

/// Pull a string `detail` out of an error body, if there is one
fn detail_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(|d| d.as_str())
        .filter(|d| !d.is_empty())
        .map(|d| d.to_string())
}

#[async_trait]
impl ReportApi for ApiClient {
    async fn health(&self) -> Result<HealthStatus> {
        self.get_json(Operation::Health, "/health").await
    }

    async fn list_companies(&self, active: bool) -> Result<Vec<Company>> {
        self.get_json(
            Operation::ListCompanies,
            &format!("/companies?active={}", active),
        )
        .await
    }

    async fn get_company(&self, id: CompanyId) -> Result<Company> {
        self.get_json(Operation::GetCompany, &format!("/companies/{}", id))
            .await
    }

    async fn create_company(&self, company: &NewCompany) -> Result<Company> {
        self.send_json(Operation::CreateCompany, Method::POST, "/companies", company)
            .await
    }

    async fn update_company(&self, id: CompanyId, update: &CompanyUpdate) -> Result<Company> {
        self.send_json(
            Operation::UpdateCompany,
            Method::PUT,
            &format!("/companies/{}", id),
            update,
        )
        .await
    }

    async fn deactivate_company(&self, id: CompanyId) -> Result<()> {
        self.send_empty(
            Operation::DeactivateCompany,
            Method::DELETE,
            &format!("/companies/{}", id),
        )
        .await
    }

    async fn list_users(&self, company_id: CompanyId) -> Result<Vec<CompanyUser>> {
        self.get_json(
            Operation::ListUsers,
            &format!("/companies/{}/users", company_id),
        )
        .await
    }

    async fn create_user(&self, company_id: CompanyId, user: &NewUser) -> Result<CompanyUser> {
        self.send_json(
            Operation::CreateUser,
            Method::POST,
            &format!("/companies/{}/users", company_id),
            user,
        )
        .await
    }

    async fn update_user(
        &self,
        company_id: CompanyId,
        user_id: UserId,
        update: &UserUpdate,
    ) -> Result<CompanyUser> {
        self.send_json(
            Operation::UpdateUser,
            Method::PUT,
            &format!("/companies/{}/users/{}", company_id, user_id),
            update,
        )
        .await
    }

    async fn delete_user(&self, company_id: CompanyId, user_id: UserId) -> Result<()> {
        self.send_empty(
            Operation::DeleteUser,
            Method::DELETE,
            &format!("/companies/{}/users/{}", company_id, user_id),
        )
        .await
    }

    async fn list_schedules(&self, company_id: CompanyId) -> Result<Vec<ReportSchedule>> {
        self.get_json(
            Operation::ListSchedules,
            &format!("/companies/{}/schedules", company_id),
        )
        .await
    }

    async fn create_schedule(
        &self,
        company_id: CompanyId,
        schedule: &SchedulePayload,
    ) -> Result<ReportSchedule> {
        self.send_json(
            Operation::CreateSchedule,
            Method::POST,
            &format!("/companies/{}/schedules", company_id),
            schedule,
        )
        .await
    }

    async fn update_schedule(
        &self,
        company_id: CompanyId,
        schedule_id: ScheduleId,
        schedule: &SchedulePayload,
    ) -> Result<ReportSchedule> {
        self.send_json(
            Operation::UpdateSchedule,
            Method::PUT,
            &format!("/companies/{}/schedules/{}", company_id, schedule_id),
            schedule,
        )
        .await
    }

    async fn delete_schedule(&self, company_id: CompanyId, schedule_id: ScheduleId) -> Result<()> {
        self.send_empty(
            Operation::DeleteSchedule,
            Method::DELETE,
            &format!("/companies/{}/schedules/{}", company_id, schedule_id),
        )
        .await
    }

    async fn trigger_schedule(
        &self,
        company_id: CompanyId,
        schedule_id: ScheduleId,
    ) -> Result<()> {
        self.send_empty(
            Operation::TriggerSchedule,
            Method::POST,
            &format!("/companies/{}/schedules/{}/run", company_id, schedule_id),
        )
        .await
    }

    async fn fetch_tickets(&self, request: &TicketFetchRequest) -> Result<TicketRequest> {
        self.send_json(Operation::FetchTickets, Method::POST, "/fetch-tickets", request)
            .await
    }
}
