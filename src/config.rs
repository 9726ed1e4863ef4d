//! Layered configuration.
//!
//! Values are merged from built-in defaults, `DEVICE_ACTIVATOR_*` environment
//! variables and finally command-line flags, then resolved against the static
//! per-environment profile table into an immutable [`Config`].

use crate::error::{ActivatorError, Result};
use figment::{
    Figment, Provider,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt;
use std::str::FromStr;
use std::path::PathBuf;
use url::Url;

pub const ENV_PREFIX: &str = "DEVICE_ACTIVATOR_";

const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_DB_NAME: &str = "postgres";

/// Keys read from the environment verbatim. `Env` would otherwise parse
/// `0042` as the integer 42.
const RAW_STRING_KEYS: &[&str] = &[
    "token",
    "db_user",
    "db_password",
    "db_name",
    "database_url",
    "identifier_param",
    "loglevel",
    "input_file",
    "output_file",
];

/// Named deployment profile. Parsed case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[value(alias = "development")]
    Dev,
    #[value(alias = "production")]
    Prod,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("dev") || s.eq_ignore_ascii_case("development") {
            Ok(Environment::Dev)
        } else if s.eq_ignore_ascii_case("prod") || s.eq_ignore_ascii_case("production") {
            Ok(Environment::Prod)
        } else {
            Err(format!("unknown environment `{s}`, expected `dev` or `prod`"))
        }
    }
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Per-environment endpoint and connection values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentProfile {
    pub service_url: &'static str,
    pub db_host: &'static str,
    pub db_sslmode: &'static str,
}

impl Environment {
    pub fn profile(self) -> EnvironmentProfile {
        match self {
            Environment::Dev => EnvironmentProfile {
                service_url: "http://api.open-notify.org/astros.json",
                db_host: "localhost",
                db_sslmode: "disable",
            },
            Environment::Prod => EnvironmentProfile {
                service_url: "http://api.open-notify.org/astros.json",
                db_host: "my-prod",
                db_sslmode: "require",
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }
}

/// Whether (and where) the line identifier goes into the service request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierForwarding {
    /// Same request for every line.
    #[default]
    Omit,
    /// `?<identifier_param>=<identifier>`
    Query,
    /// Identifier appended as the last path segment.
    Path,
}

/// Raw layered values before resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub token: Option<String>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub dry_run: bool,
    pub environment: Environment,
    pub db_port: u16,
    pub db_name: String,
    pub service_url: Option<Url>,
    pub database_url: Option<String>,
    pub forward_identifier: IdentifierForwarding,
    pub identifier_param: String,
    pub loglevel: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            token: None,
            db_user: None,
            db_password: None,
            input_file: PathBuf::from("in.txt"),
            output_file: PathBuf::from("out.txt"),
            dry_run: false,
            environment: Environment::default(),
            db_port: DEFAULT_DB_PORT,
            db_name: DEFAULT_DB_NAME.to_string(),
            service_url: None,
            database_url: None,
            forward_identifier: IdentifierForwarding::default(),
            identifier_param: "id".to_string(),
            loglevel: "info".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then environment variables, then `overrides` (usually CLI flags).
    pub fn figment(overrides: impl Provider) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Env::prefixed(ENV_PREFIX).ignore(RAW_STRING_KEYS));
        for key in RAW_STRING_KEYS {
            let var = format!("{ENV_PREFIX}{}", key.to_uppercase());
            if let Ok(value) = std::env::var(&var) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }
        figment.merge(overrides)
    }

    pub fn load(overrides: impl Provider) -> Result<Self> {
        Ok(Self::figment(overrides).extract()?)
    }
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub sslmode: String,
    pub url_override: Option<String>,
}

impl DatabaseConfig {
    /// Connection URL for the driver. Credentials are percent-encoded.
    pub fn connection_url(&self) -> Result<String> {
        if let Some(url) = &self.url_override {
            return Ok(url.clone());
        }

        let mut url = Url::parse(&format!("postgres://{}:{}", self.host, self.port))?;
        url.set_path(&self.name);
        url.set_username(&self.user)
            .map_err(|()| ActivatorError::UnusableUrl {
                url: url.clone(),
                reason: "cannot carry a username",
            })?;
        url.set_password(Some(&self.password))
            .map_err(|()| ActivatorError::UnusableUrl {
                url: url.clone(),
                reason: "cannot carry a password",
            })?;
        url.query_pairs_mut().append_pair("sslmode", &self.sslmode);
        Ok(url.into())
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("sslmode", &self.sslmode)
            .field("url_override", &self.url_override.as_ref().map(|_| "<set>"))
            .finish()
    }
}

/// Fully resolved, immutable run configuration.
#[derive(Clone)]
pub struct Config {
    pub environment: Environment,
    pub service_url: Url,
    pub service_token: String,
    pub database: DatabaseConfig,
    pub dry_run: bool,
    pub forward_identifier: IdentifierForwarding,
    pub identifier_param: String,
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub loglevel: String,
}

impl Config {
    pub fn load(overrides: impl Provider) -> Result<Self> {
        Self::resolve(Settings::load(overrides)?)
    }

    /// Apply the environment profile and check required values.
    pub fn resolve(settings: Settings) -> Result<Self> {
        let profile = settings.environment.profile();

        let service_token = settings
            .token
            .ok_or(ActivatorError::MissingSetting("token"))?;
        let user = settings
            .db_user
            .ok_or(ActivatorError::MissingSetting("db_user"))?;
        let password = settings
            .db_password
            .ok_or(ActivatorError::MissingSetting("db_password"))?;

        let service_url = match settings.service_url {
            Some(url) => url,
            None => Url::parse(profile.service_url)?,
        };

        Ok(Self {
            environment: settings.environment,
            service_url,
            service_token,
            database: DatabaseConfig {
                host: profile.db_host.to_string(),
                port: settings.db_port,
                name: settings.db_name,
                user,
                password,
                sslmode: profile.db_sslmode.to_string(),
                url_override: settings.database_url,
            },
            dry_run: settings.dry_run,
            forward_identifier: settings.forward_identifier,
            identifier_param: settings.identifier_param,
            input_file: settings.input_file,
            output_file: settings.output_file,
            loglevel: settings.loglevel,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("environment", &self.environment)
            .field("service_url", &self.service_url.as_str())
            .field("service_token", &"<redacted>")
            .field("database", &self.database)
            .field("dry_run", &self.dry_run)
            .field("forward_identifier", &self.forward_identifier)
            .field("identifier_param", &self.identifier_param)
            .field("input_file", &self.input_file)
            .field("output_file", &self.output_file)
            .field("loglevel", &self.loglevel)
            .finish()
    }
}
