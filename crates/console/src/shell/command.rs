use super::args::{parse_field, parse_id};
use super::error::{ShellError, ShellResult};
use crate::ui::Route;

pub const HELP: &str = "\
Navigation
  nav <path>              open a page (/, /companies, /users, /schedules, /reports, /settings)
  pages                   show the navigation menu
  show | refresh          redraw the page, or reload it first
Session
  login <email> <password>
  logout
Page actions
  select <company_id>     pick the company (users, schedules, reports)
  new | edit <id>         open the create or edit form
  set key=value ...       fill form fields; quote values with spaces
  submit | cancel         send or close the open form
  deactivate <id>         deactivate a company
  delete <id>             delete a user or schedule
  trigger <id>            run a schedule now
  save | reset            store or reset the API settings
  quit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Pages,
    Quit,
    Nav(Route),
    Show,
    Refresh,
    Login { email: String, password: String },
    Logout,
    Select(i64),
    New,
    Edit(i64),
    Set(Vec<(String, String)>),
    Submit,
    Cancel,
    Deactivate(i64),
    Delete(i64),
    Trigger(i64),
    Save,
    Reset,
}

impl Command {
    /// Parse split words; an empty line is no command
    pub fn parse(words: &[String]) -> ShellResult<Option<Self>> {
        let Some((head, rest)) = words.split_first() else {
            return Ok(None);
        };
        if head.starts_with('/') {
            return Ok(Some(Self::Nav(Route::resolve(head))));
        }

        let command = match head.to_ascii_lowercase().as_str() {
            "help" | "?" => Self::Help,
            "pages" | "menu" => Self::Pages,
            "quit" | "exit" => Self::Quit,
            "nav" | "go" => {
                let path = rest.first().ok_or(ShellError::MissingArgument("path"))?;
                Self::Nav(Route::resolve(path))
            }
            "show" => Self::Show,
            "refresh" => Self::Refresh,
            "login" => Self::Login {
                email: rest.first().cloned().unwrap_or_default(),
                password: rest.get(1).cloned().unwrap_or_default(),
            },
            "logout" => Self::Logout,
            "select" => Self::Select(parse_id(rest.first())?),
            "new" | "add" => Self::New,
            "edit" => Self::Edit(parse_id(rest.first())?),
            "set" => {
                if rest.is_empty() {
                    return Err(ShellError::MissingArgument("key=value"));
                }
                let fields = rest
                    .iter()
                    .map(|word| parse_field(word))
                    .collect::<ShellResult<Vec<_>>>()?;
                Self::Set(fields)
            }
            "submit" => Self::Submit,
            "cancel" => Self::Cancel,
            "deactivate" => Self::Deactivate(parse_id(rest.first())?),
            "delete" => Self::Delete(parse_id(rest.first())?),
            "trigger" | "run" => Self::Trigger(parse_id(rest.first())?),
            "save" => Self::Save,
            "reset" => Self::Reset,
            _ => return Err(ShellError::UnknownCommand(head.clone())),
        };
        Ok(Some(command))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Pages => "pages",
            Self::Quit => "quit",
            Self::Nav(_) => "nav",
            Self::Show => "show",
            Self::Refresh => "refresh",
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::Select(_) => "select",
            Self::New => "new",
            Self::Edit(_) => "edit",
            Self::Set(_) => "set",
            Self::Submit => "submit",
            Self::Cancel => "cancel",
            Self::Deactivate(_) => "deactivate",
            Self::Delete(_) => "delete",
            Self::Trigger(_) => "trigger",
            Self::Save => "save",
            Self::Reset => "reset",
        }
    }
}
