use tracing::{debug, error};

use crate::{
    engine::Engine,
    error::Result,
    record::{MigrationRecord, NewMigrationRecord},
};

/// Append-only history of schema versions.
///
/// `Ledger` is cheap to clone; clones share the same underlying engine.
#[derive(Clone)]
pub struct Ledger {
    pub(crate) engine: Box<dyn Engine>,
}

impl Ledger {
    pub fn new<E: Engine + 'static>(engine: E) -> Self {
        Self {
            engine: Box::new(engine),
        }
    }

    pub async fn ensure_initialized(&self) -> Result<()> {
        self.engine.init().await.inspect_err(|e| {
            error!("failed to create schema version table: {e}");
        })?;

        debug!("schema version table created or already exists");

        Ok(())
    }

    /// Writes one record. Fails with [`crate::StoreError::Conflict`] when the version is
    /// already recorded; the existing record is left untouched.
    pub async fn append(&self, record: NewMigrationRecord) -> Result<MigrationRecord> {
        let record = self.engine.append(record).await?;

        debug!(
            "recorded schema version {} with id {}",
            record.version, record.id
        );

        Ok(record)
    }

    /// Full history ordered by `applied_at`, newest first.
    pub async fn list_history(&self) -> Result<Vec<MigrationRecord>> {
        let records = self.engine.history().await.inspect_err(|e| {
            error!("failed to retrieve migration history: {e}");
        })?;

        debug!("retrieved {} migration history records", records.len());

        Ok(records)
    }

    pub async fn latest(&self) -> Result<Option<MigrationRecord>> {
        self.engine.latest().await
    }
}
