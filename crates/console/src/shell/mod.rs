//! Interactive shell
//!
//! Reads one command per line, routes it to the current page and prints the
//! page followed by any pending notifications.

mod args;
mod command;
mod error;
mod fields;
mod terminal;

pub use command::Command;
pub use error::{ShellError, ShellResult};
pub use terminal::Terminal;

use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::debug;

use kati_core::api::ReportApi;

use crate::pages::{
    CompaniesPage, DashboardPage, LoginOutcome, LoginPage, ReportsPage, SchedulesPage,
    SettingsPage, UsersPage,
};
use crate::state::AppState;
use crate::ui::nav::render_sidebar;
use crate::ui::Route;
use args::split_words;
use command::HELP;
use fields::{apply_company, apply_login, apply_report, apply_schedule, apply_settings, apply_user};

const LOGIN_REQUIRED: &str = "Please log in first\n";
const LOGIN_HELP: &str = "Log in with: login <email> <password>\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    state: AppState,
    route: Route,
    dashboard: DashboardPage,
    companies: CompaniesPage,
    users: UsersPage,
    schedules: SchedulesPage,
    reports: ReportsPage,
    settings: SettingsPage,
    login: LoginPage,
}

impl Shell {
    pub fn new(state: AppState) -> Self {
        let api: Arc<dyn ReportApi> = Arc::new(state.client().clone());
        Self::with_api(state, api)
    }

    /// Shell whose pages talk to `api` instead of the HTTP client
    pub fn with_api(state: AppState, api: Arc<dyn ReportApi>) -> Self {
        let ctx = state.context_with(api);
        Self {
            route: Route::Login,
            dashboard: DashboardPage::new(ctx.clone()),
            companies: CompaniesPage::new(ctx.clone()),
            users: UsersPage::new(ctx.clone()),
            schedules: SchedulesPage::new(ctx.clone()),
            reports: ReportsPage::new(ctx),
            settings: state.settings_page(),
            login: LoginPage::new(state.session().clone(), state.notifier().clone()),
            state,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Land on the dashboard, or the login page without a session
    pub async fn start<R, W>(&mut self, term: &mut Terminal<R, W>) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let parsed = Ok(Some(Command::Nav(Route::Dashboard)));
        self.execute(parsed, term).await.map(|_| ())
    }

    /// Prompt and execute lines until `quit` or end of input
    pub async fn run<R, W>(&mut self, term: &mut Terminal<R, W>) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.start(term).await?;
        loop {
            term.write(&format!("kati {}> ", self.route.path())).await?;
            let Some(line) = term.read_line().await? else {
                term.write("\n").await?;
                break;
            };
            if self.execute_line(&line, term).await? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    pub async fn execute_line<R, W>(
        &mut self,
        line: &str,
        term: &mut Terminal<R, W>,
    ) -> io::Result<Flow>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let parsed = split_words(line).and_then(|words| Command::parse(&words));
        self.execute(parsed, term).await
    }

    /// Execute already-split words, e.g. from the process arguments
    pub async fn execute_words<R, W>(
        &mut self,
        words: &[String],
        term: &mut Terminal<R, W>,
    ) -> io::Result<Flow>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.execute(Command::parse(words), term).await
    }

    async fn execute<R, W>(
        &mut self,
        parsed: ShellResult<Option<Command>>,
        term: &mut Terminal<R, W>,
    ) -> io::Result<Flow>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let outcome = match parsed {
            Ok(Some(command)) => {
                debug!("Running {} on {}", command.name(), self.route.path());
                self.dispatch(command, term).await
            }
            Ok(None) => Ok(Flow::Continue),
            Err(e) => Err(e),
        };

        let flow = match outcome {
            Ok(flow) => flow,
            Err(ShellError::Io(e)) => return Err(e),
            Err(e) => {
                term.write(&format!("{}\n", e)).await?;
                Flow::Continue
            }
        };

        for notification in self.state.notifier().drain().await {
            term.write(&format!("{}\n", notification)).await?;
        }
        Ok(flow)
    }

    async fn dispatch<R, W>(
        &mut self,
        command: Command,
        term: &mut Terminal<R, W>,
    ) -> ShellResult<Flow>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        match command {
            Command::Help => term.write(HELP).await?,
            Command::Pages => term.write(&render_sidebar(&self.route)).await?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Nav(route) => self.navigate(route, term).await?,
            Command::Login { email, password } => {
                self.login.email = email;
                self.login.password = password;
                self.submit_login(term).await?;
            }
            Command::Logout => {
                if let Err(e) = self.state.session().logout().await {
                    self.state.notifier().error(&e).await;
                }
                self.route = Route::Login;
                term.write("Logged out\n").await?;
            }
            command => {
                if !self.route.is_public() && !self.state.session().is_authenticated().await {
                    self.route = Route::Login;
                    term.write(LOGIN_REQUIRED).await?;
                } else {
                    self.page_command(command, term).await?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    async fn submit_login<R, W>(&mut self, term: &mut Terminal<R, W>) -> ShellResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if self.login.submit().await == LoginOutcome::LoggedIn {
            self.navigate(Route::Dashboard, term).await?;
        }
        Ok(())
    }

    async fn navigate<R, W>(&mut self, route: Route, term: &mut Terminal<R, W>) -> ShellResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if !route.is_public() && !self.state.session().is_authenticated().await {
            self.route = Route::Login;
            term.write(LOGIN_REQUIRED).await?;
            term.write(&self.render_current()).await?;
            return Ok(());
        }
        self.route = route;
        self.load_current().await;
        term.write(&self.render_current()).await?;
        Ok(())
    }

    async fn page_command<R, W>(
        &mut self,
        command: Command,
        term: &mut Terminal<R, W>,
    ) -> ShellResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let route = self.route.clone();
        let not_here = {
            let command = command.name();
            let page = route.title();
            move || ShellError::NotOnPage { command, page }
        };

        match command {
            Command::Show => {}
            Command::Refresh => self.load_current().await,
            Command::Select(id) => match route {
                Route::Users => {
                    self.users.select_company(id).await;
                }
                Route::Schedules => {
                    self.schedules.select_company(id).await;
                }
                Route::Reports => {
                    self.reports.select_company(id).await;
                }
                _ => return Err(not_here()),
            },
            Command::New => match route {
                Route::Companies => self.companies.open_create(),
                Route::Users => {
                    self.users.open_create().await;
                }
                Route::Schedules => {
                    self.schedules.open_create().await;
                }
                _ => return Err(not_here()),
            },
            Command::Edit(id) => match route {
                Route::Companies => {
                    self.companies.open_edit(id).await;
                }
                Route::Users => {
                    self.users.open_edit(id).await;
                }
                Route::Schedules => {
                    self.schedules.open_edit(id).await;
                }
                _ => return Err(not_here()),
            },
            Command::Set(fields) => match route {
                Route::Companies => apply_company(&mut self.companies.form, &fields)?,
                Route::Users => apply_user(&mut self.users.form, &fields)?,
                Route::Schedules => apply_schedule(&mut self.schedules.form, &fields)?,
                Route::Reports => apply_report(&mut self.reports.form, &fields)?,
                Route::Settings => apply_settings(&mut self.settings.settings, &fields)?,
                Route::Login => apply_login(&mut self.login, &fields)?,
                _ => return Err(not_here()),
            },
            Command::Submit => match route {
                Route::Companies => {
                    self.companies.submit().await;
                }
                Route::Users => {
                    self.users.submit().await;
                }
                Route::Schedules => {
                    self.schedules.submit().await;
                }
                Route::Reports => {
                    self.reports.submit().await;
                }
                Route::Settings => {
                    self.settings.save().await;
                }
                Route::Login => return self.submit_login(term).await,
                _ => return Err(not_here()),
            },
            Command::Cancel => match route {
                Route::Companies => self.companies.close(),
                Route::Users => self.users.close(),
                Route::Schedules => self.schedules.close(),
                _ => return Err(not_here()),
            },
            Command::Deactivate(id) if route == Route::Companies => {
                if let Some(confirmation) = self.companies.ask_deactivate(id).await {
                    if term.confirm(confirmation.prompt()).await? {
                        self.companies.deactivate(confirmation).await;
                    }
                }
            }
            Command::Delete(id) => match route {
                Route::Users => {
                    if let Some(confirmation) = self.users.ask_delete(id).await {
                        if term.confirm(confirmation.prompt()).await? {
                            self.users.delete(confirmation).await;
                        }
                    }
                }
                Route::Schedules => {
                    if let Some(confirmation) = self.schedules.ask_delete(id).await {
                        if term.confirm(confirmation.prompt()).await? {
                            self.schedules.delete(confirmation).await;
                        }
                    }
                }
                _ => return Err(not_here()),
            },
            Command::Trigger(id) if route == Route::Schedules => {
                if let Some(confirmation) = self.schedules.ask_trigger(id).await {
                    if term.confirm(confirmation.prompt()).await? {
                        self.schedules.trigger(confirmation).await;
                    }
                }
            }
            Command::Save if route == Route::Settings => {
                self.settings.save().await;
            }
            Command::Reset if route == Route::Settings => {
                self.settings.reset().await;
            }
            _ => return Err(not_here()),
        }

        term.write(&self.render_current()).await?;
        Ok(())
    }

    async fn load_current(&mut self) {
        match self.route {
            Route::Dashboard => {
                self.dashboard.load().await;
            }
            Route::Companies => {
                self.companies.load().await;
            }
            Route::Users => {
                self.users.load().await;
            }
            Route::Schedules => {
                self.schedules.load().await;
            }
            Route::Reports => {
                self.reports.load().await;
            }
            Route::Settings => {
                self.settings.load().await;
            }
            Route::Login | Route::NotFound(_) => {}
        }
    }

    fn render_current(&self) -> String {
        let body = match &self.route {
            Route::Dashboard => self.dashboard.render(),
            Route::Companies => self.companies.render(),
            Route::Users => self.users.render(),
            Route::Schedules => self.schedules.render(),
            Route::Reports => self.reports.render(),
            Route::Settings => self.settings.render(),
            Route::Login => LOGIN_HELP.to_string(),
            Route::NotFound(path) => format!("Page not found: {}\n", path),
        };
        format!("\n== {} ==\n{}", self.route.title(), body)
    }
}
