use crate::config::{Environment, IdentifierForwarding};
use serde::Serialize;
use std::path::PathBuf;
use url::Url;

/// Read identifiers line by line, call the service for each, mark the
/// matching device active and write the service responses to a file.
///
/// Every flag can also be given as a `DEVICE_ACTIVATOR_<FLAG>` environment
/// variable (or in a `.env` file); flags win.
#[derive(clap::Parser, Debug, Default, Serialize)]
#[command(name = "device-activator", version)]
pub struct Args {
    /// Token of the HTTP API, sent as a bearer token.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Database user.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_user: Option<String>,

    /// Database password.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_password: Option<String>,

    /// Input file to process, one identifier per line [default: in.txt]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_file: Option<PathBuf>,

    /// Path to the output file [default: out.txt]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,

    /// Perform all reads and service calls but leave the database untouched.
    #[arg(long)]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,

    /// Deployment profile selecting service URL and database host [default: dev]
    #[arg(long, value_enum, ignore_case = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,

    /// Replace the profile's service URL.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_url: Option<Url>,

    /// Full database URL; replaces host, port, name, credentials and TLS mode.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    /// Send the line identifier to the service [default: omit]
    #[arg(long, value_enum)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_identifier: Option<IdentifierForwarding>,

    /// Query parameter name used with `--forward-identifier query` [default: id]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier_param: Option<String>,

    /// Log filter used when RUST_LOG is unset [default: info]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loglevel: Option<String>,
}
