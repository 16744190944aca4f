use thiserror::Error;

#[derive(Error, Debug)]
pub enum Asg365Error {
    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Graph API error: {0}")]
    GraphApiError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Interactive prompt error: {0}")]
    DialoguerError(#[from] dialoguer::Error),

    #[error("Token not found. Please run 'asg365 login' first")]
    TokenNotFound,

    #[error("Tenant '{0}' not found")]
    TenantNotFound(String),

    #[error("Group '{0}' not found in the directory")]
    GroupNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Asg365Error>;

pub use Asg365Error as Error;

/// Parse Graph API error response and provide helpful context
pub fn enhance_graph_error(error_response: &str) -> String {
    if let Ok(error_json) = serde_json::from_str::<serde_json::Value>(error_response) {
        if let Some(error_obj) = error_json.get("error") {
            let code = error_obj
                .get("code")
                .and_then(|c| c.as_str())
                .unwrap_or("Unknown");
            let message = error_obj
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("No message");

            let hint = match code {
                "Unauthorized" | "InvalidAuthenticationToken" => {
                    "\n💡 Hint: Your authentication token may have expired. Try running 'asg365 login' again."
                }
                "Forbidden" | "InsufficientPrivileges" => {
                    "\n💡 Hint: Check that your app registration has the required read permissions and admin consent is granted."
                }
                "BadRequest" => {
                    if message.contains("Resource not found for the segment") {
                        "\n💡 Hint: This endpoint may only exist on the beta API. Check the api_version setting in config.toml."
                    } else {
                        "\n💡 Hint: The request format may be incorrect."
                    }
                }
                "NotFound" => {
                    "\n💡 Hint: The requested resource doesn't exist. Check IDs and resource names."
                }
                "TooManyRequests" => {
                    "\n💡 Hint: API rate limit exceeded. Wait a moment and try again."
                }
                _ => "",
            };

            return format!("{}: {}{}", code, message, hint);
        }
    }

    error_response.to_string()
}
