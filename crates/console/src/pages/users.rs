//! Users page

use std::fmt::Write as _;
use std::sync::Arc;

use kati_core::api::{CompanyId, CompanyUser, NewUser, UserId};
use kati_core::cache::QueryKey;
use kati_core::{Error, Result};

use super::{required, CompanyPicker, Confirmation, Dialog, PageContext};
use crate::ui::{StatusBadge, Table};

const DELETE_PROMPT: &str = "Are you sure you want to delete this user?";
const DEFAULT_ROLE: &str = "User";

fn users_key(company_id: CompanyId) -> QueryKey {
    QueryKey::new("users").id(company_id)
}

/// User create/edit inputs
#[derive(Debug, Clone, PartialEq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub role: String,
    pub receive_reports: bool,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            role: DEFAULT_ROLE.to_string(),
            receive_reports: true,
        }
    }
}

impl UserForm {
    pub fn from_user(user: &CompanyUser) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            receive_reports: user.receive_reports,
        }
    }

    pub fn validate(&self) -> Result<NewUser> {
        required(&self.name, "Name")?;
        required(&self.email, "Email")?;
        required(&self.role, "Role")?;
        Ok(NewUser {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            receive_reports: self.receive_reports,
        })
    }
}

/// Deletion of one user of one company
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteUser {
    pub company_id: CompanyId,
    pub user_id: UserId,
}

pub struct UsersPage {
    ctx: PageContext,
    picker: CompanyPicker,
    users: Vec<CompanyUser>,
    dialog: Dialog<CompanyUser>,
    pub form: UserForm,
}

impl UsersPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            picker: CompanyPicker::default(),
            users: Vec::new(),
            dialog: Dialog::Closed,
            form: UserForm::default(),
        }
    }

    /// Read the company choices and, once one is selected, its users
    pub async fn load(&mut self) -> bool {
        if !self.picker.load(&self.ctx).await {
            return false;
        }
        self.load_users().await
    }

    /// Switch company; the previous company's rows are dropped before the new read
    pub async fn select_company(&mut self, id: CompanyId) -> bool {
        match self.picker.select(id) {
            Ok(changed) => {
                if changed {
                    self.users.clear();
                    self.dialog = Dialog::Closed;
                }
                self.load_users().await
            }
            Err(e) => {
                self.ctx.notifier.error(&e).await;
                false
            }
        }
    }

    async fn load_users(&mut self) -> bool {
        let api = Arc::clone(&self.ctx.api);
        let result = self
            .ctx
            .cache
            .fetch_when(
                self.picker.selected(),
                |id| users_key(*id),
                move |id| async move { api.list_users(id).await },
            )
            .await;

        match self.ctx.settle(result).await {
            Some(Some(users)) => {
                self.users = users;
                true
            }
            Some(None) => {
                self.users.clear();
                self.dialog = Dialog::Closed;
                true
            }
            None => false,
        }
    }

    pub fn picker(&self) -> &CompanyPicker {
        &self.picker
    }

    pub fn users(&self) -> &[CompanyUser] {
        &self.users
    }

    pub fn dialog(&self) -> &Dialog<CompanyUser> {
        &self.dialog
    }

    pub async fn open_create(&mut self) -> bool {
        if let Err(e) = self.picker.require() {
            self.ctx.notifier.error(&e).await;
            return false;
        }
        self.form = UserForm::default();
        self.dialog = Dialog::Create;
        true
    }

    pub async fn open_edit(&mut self, id: UserId) -> bool {
        match self.find(id) {
            Some(user) => {
                self.form = UserForm::from_user(&user);
                self.dialog = Dialog::Edit(user);
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

        self.ctx.cache.invalidate(&QueryKey::new("users")).await;
        self.ctx.notifier.success(message).await;
        self.dialog = Dialog::Closed;
        self.form = UserForm::default();
        self.load_users().await;
        true
    }

    async fn send_form(&self) -> Result<&'static str> {
        let company_id = self.picker.require()?;
        if !self.dialog.is_open() {
            return Err(Error::validation("No user form is open"));
        }
        let user = self.form.validate()?;
        match &self.dialog {
            Dialog::Edit(existing) => {
                self.ctx
                    .api
                    .update_user(existing.company_id, existing.id, &user.into())
                    .await?;
                Ok("User updated successfully")
            }
            _ => {
                self.ctx.api.create_user(company_id, &user).await?;
                Ok("User created successfully")
            }
        }
    }

    pub async fn ask_delete(&self, id: UserId) -> Option<Confirmation<DeleteUser>> {
        let target = match self.picker.require() {
            Ok(company_id) => self
                .find(id)
                .map(|user| DeleteUser {
                    company_id,
                    user_id: user.id,
                })
                .ok_or_else(|| unknown(id)),
            Err(e) => Err(e),
        };
        match target {
            Ok(action) => Some(Confirmation::new(DELETE_PROMPT, action)),
            Err(e) => {
                self.ctx.notifier.error(&e).await;
                None
            }
        }
    }

    pub async fn delete(&mut self, confirmation: Confirmation<DeleteUser>) -> bool {
        let DeleteUser {
            company_id,
            user_id,
        } = confirmation.into_action();
        let outcome = self.ctx.api.delete_user(company_id, user_id).await;
        if self.ctx.settle(outcome).await.is_none() {
            return false;
        }

        self.ctx.cache.invalidate(&QueryKey::new("users")).await;
        self.ctx.notifier.success("User deleted successfully").await;
        self.load_users().await;
        true
    }

    fn find(&self, id: UserId) -> Option<CompanyUser> {
        self.users.iter().find(|u| u.id == id).cloned()
    }

    pub fn render(&self) -> String {
        let mut out = self.picker.render();
        out.push('\n');

        match self.picker.selected_company() {
            None => out.push_str("Select a company to view its users\n"),
            Some(company) => {
                let _ = writeln!(out, "Users of {}", company.name);
                if self.users.is_empty() {
                    out.push_str("No users found\n");
                } else {
                    let mut table = Table::new(["ID", "Name", "Email", "Role", "Reports", "Status"]);
                    for user in &self.users {
                        table.push_row([
                            user.id.to_string(),
                            user.name.clone(),
                            user.email.clone(),
                            user.role.clone(),
                            if user.receive_reports { "Yes" } else { "No" }.to_string(),
                            StatusBadge::active(user.is_active).to_string(),
                        ]);
                    }
                    out.push_str(&table.render());
                }
            }
        }

        if self.dialog.is_open() {
            let title = match &self.dialog {
                Dialog::Edit(user) => format!("Edit User #{}", user.id),
                _ => "Add User".to_string(),
            };
            let _ = writeln!(out, "\n{}", title);
            let _ = writeln!(out, "  name:            {}", self.form.name);
            let _ = writeln!(out, "  email:           {}", self.form.email);
            let _ = writeln!(out, "  role:            {}", self.form.role);
            let _ = writeln!(out, "  receive_reports: {}", self.form.receive_reports);
        }
        out
    }
}

fn unknown(id: UserId) -> Error {
    Error::validation(format!("Unknown user: {}", id))
}
