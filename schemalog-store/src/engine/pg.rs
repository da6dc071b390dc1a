use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    engine::{table_name, Engine},
    error::{map_insert_error, Result},
    ledger::Ledger,
    record::{MigrationRecord, NewMigrationRecord},
};

#[derive(Debug, Clone)]
pub struct PgEngine {
    pool: PgPool,
    prefix: Option<String>,
}

impl PgEngine {
    pub fn create(pool: &PgPool) -> Ledger {
        Ledger::new(Self {
            pool: pool.clone(),
            prefix: None,
        })
    }

    pub fn with_prefix(pool: &PgPool, prefix: impl Into<String>) -> Ledger {
        Ledger::new(Self {
            pool: pool.clone(),
            prefix: Some(prefix.into()),
        })
    }

    pub fn table(&self) -> String {
        table_name(self.prefix.as_deref())
    }
}

#[async_trait]
impl Engine for PgEngine {
    async fn init(&self) -> Result<()> {
        let table = self.table();
        let mut tx = self.pool.begin().await?;

        // concurrent CREATE TABLE IF NOT EXISTS may race on the catalog
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&table)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    id BIGSERIAL PRIMARY KEY,
                    version VARCHAR(64) NOT NULL,
                    applied_at TIMESTAMPTZ NOT NULL,
                    changes TEXT NOT NULL
                )
                "#
            )
            .as_str(),
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            format!("CREATE UNIQUE INDEX IF NOT EXISTS uk_{table}_version ON {table} (version)")
                .as_str(),
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn append(&self, record: NewMigrationRecord) -> Result<MigrationRecord> {
        let table = self.table();

        sqlx::query_as::<_, MigrationRecord>(
            format!(
                r#"
                INSERT INTO {table} (version, applied_at, changes)
                VALUES ($1, $2, $3)
                RETURNING id, version, applied_at, changes
                "#
            )
            .as_str(),
        )
        .bind(&record.version)
        .bind(record.applied_at)
        .bind(&record.changes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(&record.version, e))
    }

    async fn history(&self) -> Result<Vec<MigrationRecord>> {
        let table = self.table();
        let records = sqlx::query_as::<_, MigrationRecord>(
            format!(
                r#"
                SELECT id, version, applied_at, changes FROM {table}
                ORDER BY applied_at DESC, id DESC
                "#
            )
            .as_str(),
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn latest(&self) -> Result<Option<MigrationRecord>> {
        let table = self.table();
        let record = sqlx::query_as::<_, MigrationRecord>(
            format!(
                r#"
                SELECT id, version, applied_at, changes FROM {table}
                ORDER BY applied_at DESC, id DESC
                LIMIT 1
                "#
            )
            .as_str(),
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
