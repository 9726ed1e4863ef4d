//! Fixed statements plus the two transaction-scoped helpers that run them.
//!
//! Values are always bound through placeholders (`$1`, `$2`, ...), never
//! formatted into the SQL text. The key column is compared as text so tables
//! keyed by integers match identifiers read from the input file.

use crate::error::Result;
use sqlx::any::AnyRow;
use sqlx::{AnyConnection, Connection, FromRow};

/// `$1` = device id
pub const SELECT_DEVICE: &str =
    "SELECT CAST(id AS TEXT) AS id, status FROM device WHERE CAST(id AS TEXT) = $1";

/// `$1` = new status, `$2` = device id
pub const UPDATE_DEVICE_STATUS: &str =
    "UPDATE device SET status = $1 WHERE CAST(id AS TEXT) = $2";

/// Run a read-only query inside a transaction and return every matching row.
pub async fn select_rows<'q, T>(
    conn: &mut AnyConnection,
    sql: &'q str,
    params: &[&'q str],
) -> Result<Vec<T>>
where
    T: for<'r> FromRow<'r, AnyRow> + Send + Unpin,
{
    let mut query = sqlx::query_as::<_, T>(sql);
    for param in params {
        query = query.bind(*param);
    }

    let mut tx = conn.begin().await?;
    let rows = query.fetch_all(&mut *tx).await?;
    tx.commit().await?;
    Ok(rows)
}

/// Run a write inside a transaction and return the affected-row count.
/// The transaction rolls back when dropped on any error path.
pub async fn update_rows<'q>(
    conn: &mut AnyConnection,
    sql: &'q str,
    params: &[&'q str],
) -> Result<u64> {
    let mut query = sqlx::query(sql);
    for param in params {
        query = query.bind(*param);
    }

    let mut tx = conn.begin().await?;
    let affected = query.execute(&mut *tx).await?.rows_affected();
    tx.commit().await?;
    Ok(affected)
}
