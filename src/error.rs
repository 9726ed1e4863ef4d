use reqwest::StatusCode;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use url::Url;

pub type Result<T, E = ActivatorError> = std::result::Result<T, E>;

#[derive(Debug, ThisError)]
pub enum ActivatorError {
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("missing required setting `{0}`; pass --{flag} or set DEVICE_ACTIVATOR_{env}", flag = .0.replace('_', "-"), env = .0.to_uppercase())]
    MissingSetting(&'static str),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("URL {url} is unusable: {reason}")]
    UnusableUrl { url: Url, reason: &'static str },

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("upstream {url} responded with status {status}")]
    UpstreamStatus { status: StatusCode, url: Url },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ActivatorError {
    fn from(e: figment::Error) -> Self {
        ActivatorError::Config(Box::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_setting_names_flag_and_env_var() {
        let msg = ActivatorError::MissingSetting("db_password").to_string();
        assert!(msg.contains("--db-password"), "{msg}");
        assert!(msg.contains("DEVICE_ACTIVATOR_DB_PASSWORD"), "{msg}");
    }
}
