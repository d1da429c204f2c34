use thiserror::Error;

/// Problems with what the operator typed, reported straight back to them
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Unknown command: {0} (type 'help' for a list of commands)")]
    UnknownCommand(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Not a valid id: {0}")]
    InvalidId(String),

    #[error("Expected key=value, got: {0}")]
    ExpectedField(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Expected yes or no, got: {0}")]
    InvalidBool(String),

    #[error("Unterminated quote")]
    UnterminatedQuote,

    #[error("'{command}' is not available on the {page} page")]
    NotOnPage {
        command: &'static str,
        page: &'static str,
    },

    #[error(transparent)]
    Core(#[from] kati_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ShellResult<T> = std::result::Result<T, ShellError>;
