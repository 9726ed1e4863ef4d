use crate::config::DatabaseConfig;
use crate::db::models::{ACTIVE_STATUS, Device};
use crate::db::queries::{SELECT_DEVICE, UPDATE_DEVICE_STATUS, select_rows, update_rows};
use crate::db::schema::DEVICE_TABLE;
use crate::error::Result;
use sqlx::{AnyConnection, Connection};
use tracing::debug;

/// The single live database connection for a run.
///
/// Owned by the entry point and lent mutably to the line processor. Dropping
/// the store releases the connection; [`DeviceStore::close`] does it
/// gracefully.
pub struct DeviceStore {
    conn: AnyConnection,
}

impl DeviceStore {
    pub async fn connect(db: &DatabaseConfig) -> Result<Self> {
        Self::open(&db.connection_url()?).await
    }

    /// Open a connection from a driver URL (`postgres://...`, `sqlite:...`).
    pub async fn open(url: &str) -> Result<Self> {
        sqlx::any::install_default_drivers();
        let conn = AnyConnection::connect(url).await?;
        debug!(backend = conn.backend_name(), "database connection opened");
        Ok(Self { conn })
    }

    pub fn backend_name(&self) -> &str {
        self.conn.backend_name()
    }

    /// Raw access for seeding and inspection.
    pub fn connection(&mut self) -> &mut AnyConnection {
        &mut self.conn
    }

    /// Create the `device` table if it does not exist.
    pub async fn init_schema(&mut self) -> Result<()> {
        sqlx::query(DEVICE_TABLE).execute(&mut self.conn).await?;
        Ok(())
    }

    pub async fn find_devices(&mut self, id: &str) -> Result<Vec<Device>> {
        select_rows(&mut self.conn, SELECT_DEVICE, &[id]).await
    }

    /// Set the device's status to `ACTIVE`. Returns the affected-row count.
    pub async fn activate(&mut self, id: &str) -> Result<u64> {
        update_rows(&mut self.conn, UPDATE_DEVICE_STATUS, &[ACTIVE_STATUS, id]).await
    }

    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }
}
