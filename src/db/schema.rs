//! Shape of the `device` table the activator reads and updates.
//! The tool never creates it in production; this DDL seeds local and test
//! databases.

/// Portable DDL (PostgreSQL and SQLite):
/// - `id` TEXT PRIMARY KEY, matched against each input line
/// - `status` TEXT, set to `ACTIVE` on activation
pub const DEVICE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS device (
    id TEXT PRIMARY KEY,
    status TEXT NOT NULL
)
"#;
