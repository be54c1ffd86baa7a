use backtrace::Backtrace;
use thiserror::Error;

/// Failures surfaced to whoever ran the command. Every variant is caught at
/// the dispatch boundary and translated into a chat message; none of these
/// should ever escape to the host as a panic.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("internal error: {message}")]
    Internal { message: String, trace: String },
    #[error("command handler failed: {cause}")]
    Execution { cause: anyhow::Error, trace: String },
    #[error(transparent)]
    ArgumentParse(#[from] ParseFailure),
    #[error("unknown command")]
    UnknownCommand,
    #[error("missing permission node {node}")]
    NoPermission { node: String },
    #[error("this command may only be executed by a {expected}")]
    InvalidSender {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("invalid syntax, expected {usage}")]
    InvalidSyntax { usage: String },
}

impl CommandError {
    pub fn internal(message: impl Into<String>) -> Self {
        CommandError::Internal {
            message: message.into(),
            trace: capture_trace(),
        }
    }

    pub fn execution(cause: anyhow::Error) -> Self {
        CommandError::Execution {
            cause,
            trace: capture_trace(),
        }
    }

    /// The captured stack trace, present only on the two error kinds that
    /// indicate a bug rather than bad user input.
    pub fn trace(&self) -> Option<&str> {
        match self {
            CommandError::Internal { trace, .. } => Some(trace),
            CommandError::Execution { trace, .. } => Some(trace),
            _ => None,
        }
    }
}

fn capture_trace() -> String {
    format!("{:?}", Backtrace::new())
}

/// Argument-level parse failures. `Syntax` is a malformed token (the input
/// does not even look like the expected value); `Parser` is a well-formed
/// token rejected by parser logic (out of bounds, unknown registry entry).
#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("{message}")]
    Syntax { message: String },
    #[error("{message}")]
    Parser { message: String },
}

impl ParseFailure {
    pub fn syntax(message: impl Into<String>) -> Self {
        ParseFailure::Syntax {
            message: message.into(),
        }
    }

    pub fn parser(message: impl Into<String>) -> Self {
        ParseFailure::Parser {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ParseFailure::Syntax { message } => message,
            ParseFailure::Parser { message } => message,
        }
    }
}

/// Configuration mistakes made by the embedding application. These propagate
/// as fatal errors from construction or startup and are never shown in chat.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(
        "server command managers must be constructed during mod initialization, \
         before the server begins starting"
    )]
    LateRegistration,
    #[error("the server runtime was started more than once")]
    AlreadyStarted,
    #[error("permission node `{node}` required by `/{command}` was never declared")]
    UnregisteredPermissionNode { node: String, command: String },
    #[error("no parser registered for `{key}` arguments")]
    UnknownParser { key: String },
    #[error("commands must be rooted at a literal, found argument `{name}`")]
    NonLiteralRoot { name: String },
}

pub type CommandResult<T> = Result<T, CommandError>;
pub type SetupResult<T> = Result<T, SetupError>;
