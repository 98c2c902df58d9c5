//! Postgres store over a shared sqlx connection pool.

use crate::error::{Error, Result};
use crate::model::WorkItem;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

use super::{PoolUsage, Store, StoreTx};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS items (
    id integer primary key,
    title text,
    description text
)";

/// Postgres-backed store. Owns the connection pool shared by all workers;
/// the pool's `max_connections` is the capacity the gate throttles against.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    max_connections: u32,
}

impl PgStore {
    /// Connect to Postgres with a pool of at most `max_connections`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Ok(Self {
            pool,
            max_connections,
        })
    }

    /// Create the `items` table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Simple health check — run a SELECT 1.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Read back every row, ordered by id.
    pub async fn fetch_items(&self) -> Result<Vec<WorkItem>> {
        let items = sqlx::query_as("SELECT id, title, description FROM items ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    /// Delete all rows. Used by the integration tests to reset state.
    pub async fn truncate_items(&self) -> Result<()> {
        sqlx::query("TRUNCATE items").execute(&self.pool).await?;
        Ok(())
    }
}

impl Store for PgStore {
    type Tx = PgStoreTx;

    async fn begin(&self) -> Result<PgStoreTx> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::BeginTransaction(e.to_string()))?;
        Ok(PgStoreTx { tx })
    }

    fn current_usage(&self) -> PoolUsage {
        let size = self.pool.size();
        let idle = self.pool.num_idle() as u32;
        PoolUsage {
            in_use: size.saturating_sub(idle),
            max: self.max_connections,
        }
    }
}

/// One Postgres transaction, held by a single worker.
pub struct PgStoreTx {
    tx: Transaction<'static, Postgres>,
}

impl StoreTx for PgStoreTx {
    async fn execute(&mut self, item: &WorkItem) -> Result<()> {
        sqlx::query("INSERT INTO items (id, title, description) VALUES ($1, $2, $3)")
            .bind(item.id)
            .bind(&item.title)
            .bind(&item.description)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| Error::Execute {
                id: item.id,
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn commit(self) -> Result<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| Error::Commit(e.to_string()))
    }

    async fn rollback(self) {
        let _ = self.tx.rollback().await;
    }
}
