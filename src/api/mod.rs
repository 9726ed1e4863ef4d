pub mod service_api;

pub use service_api::{ServiceApi, ServiceResponse};
