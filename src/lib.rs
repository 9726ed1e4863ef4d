pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod service;

pub use config::Config;
pub use db::DeviceStore;
pub use error::{ActivatorError, Result};
pub use service::{BatchSummary, Reporter, TracingReporter};
