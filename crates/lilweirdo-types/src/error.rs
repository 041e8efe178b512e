use thiserror::Error;

/// Errors raised while registering commands.
///
/// These are configuration mistakes in the bot itself, surfaced at startup
/// and never shown to chat users.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandTreeError {
    #[error("command path is empty")]
    EmptyPath,

    #[error("cannot register '{path}': '{segment}' is already a command, not a group")]
    LeafAsBranch { path: String, segment: String },

    #[error("cannot register '{path}': a command or group already exists there")]
    Occupied { path: String },
}

/// Errors returned by command handlers for malformed user input.
///
/// The command router answers these with the command's usage line; they
/// never travel past the router.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
}

/// Errors from the chat platform when sending.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to send message: {0}")]
    Send(String),
}

/// Errors loading the bot configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid config: {0}")]
    Invalid(String),
}
