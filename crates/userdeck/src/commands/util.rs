//! Helpers shared across command handlers.

use std::sync::Arc;

use url::Url;
use userdeck_core::{DirectoryError, User};

use crate::error::CliError;

/// Translate a directory error into a CLI error, attaching the endpoint
/// the command was talking to.
pub fn directory_error(err: DirectoryError, endpoint: &Url) -> CliError {
    match err {
        DirectoryError::ConnectionFailed => CliError::ConnectionFailed {
            endpoint: endpoint.to_string(),
        },
        DirectoryError::Timeout => CliError::Timeout {
            endpoint: endpoint.to_string(),
        },
        DirectoryError::Http(status) => CliError::Http {
            status,
            endpoint: endpoint.to_string(),
        },
        DirectoryError::Network(message) => CliError::Network { message },
    }
}

/// Find one user by ID, or by case-insensitive exact name/username match.
pub fn find_user(users: &[Arc<User>], identifier: &str) -> Result<Arc<User>, CliError> {
    if let Ok(id) = identifier.parse::<u64>() {
        if let Some(user) = users.iter().find(|u| u.id == id) {
            return Ok(Arc::clone(user));
        }
    } else {
        let needle = identifier.to_lowercase();
        if let Some(user) = users
            .iter()
            .find(|u| u.name.to_lowercase() == needle || u.username.to_lowercase() == needle)
        {
            return Ok(Arc::clone(user));
        }
    }

    Err(CliError::NotFound {
        resource_type: "user".to_string(),
        identifier: identifier.to_string(),
        list_command: "list".to_string(),
    })
}
