use miette::Diagnostic;
use thiserror::Error;

/// Process exit codes, one per failure class so scripts can branch on them.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const HTTP: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Could not reach {endpoint}")]
    #[diagnostic(
        code(userdeck::connection_failed),
        help("Check that the endpoint is up and your connection is alive.\nTry: userdeck status")
    )]
    ConnectionFailed { endpoint: String },

    #[error("Request to {endpoint} timed out")]
    #[diagnostic(
        code(userdeck::timeout),
        help("Raise the deadline with --fetch-timeout-ms or check endpoint responsiveness.")
    )]
    Timeout { endpoint: String },

    #[error("Server returned HTTP {status} for {endpoint}")]
    #[diagnostic(
        code(userdeck::http),
        help("The endpoint is reachable but refused the request. Check the URL path.")
    )]
    Http { status: u16, endpoint: String },

    #[error("Network error: {message}")]
    #[diagnostic(code(userdeck::network))]
    Network { message: String },

    #[error("No {resource_type} matching '{identifier}'")]
    #[diagnostic(
        code(userdeck::not_found),
        help("Run: userdeck {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Invalid {field}: {reason}")]
    #[diagnostic(code(userdeck::validation))]
    Validation { field: String, reason: String },

    #[error("Profile '{name}' not found")]
    #[diagnostic(
        code(userdeck::profile_not_found),
        help("Available profiles: {available}\nCreate one with: userdeck config init")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(code(userdeck::config_exists), help("Pass --force to overwrite it."))]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(userdeck::config))]
    Config(Box<figment::Error>),

    #[error(transparent)]
    #[diagnostic(code(userdeck::io))]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Network { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Http { .. } => exit_code::HTTP,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::ConfigExists { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl From<userdeck_config::ConfigError> for CliError {
    fn from(err: userdeck_config::ConfigError) -> Self {
        match err {
            userdeck_config::ConfigError::Validation { field, reason } => {
                Self::Validation { field, reason }
            }
            userdeck_config::ConfigError::UnknownProfile { name, available } => {
                Self::ProfileNotFound { name, available }
            }
            userdeck_config::ConfigError::Serialization(e) => Self::Validation {
                field: "config".to_string(),
                reason: e.to_string(),
            },
            userdeck_config::ConfigError::Figment(e) => Self::Config(e),
            userdeck_config::ConfigError::Io(e) => Self::Io(e),
        }
    }
}
