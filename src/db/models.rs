use sqlx::FromRow;

/// Status written by the activation update.
pub const ACTIVE_STATUS: &str = "ACTIVE";

/// A `device` row keyed by the input line identifier. `id` is read back as
/// text whatever the column type.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Device {
    pub id: String,
    pub status: String,
}
