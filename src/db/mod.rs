//! Database module: the device session and its two query helpers.
//!
//! Layout:
//! - `models.rs`: row structs
//! - `queries.rs`: fixed statements and the transaction-scoped select/update helpers
//! - `schema.rs`: DDL for the `device` table
//! - `store.rs`: `DeviceStore`, the live connection owned for the run

pub mod models;
pub mod queries;
pub mod schema;
pub mod store;

pub use models::{ACTIVE_STATUS, Device};
pub use schema::DEVICE_TABLE;
pub use store::DeviceStore;
