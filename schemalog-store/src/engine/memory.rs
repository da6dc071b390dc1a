use async_trait::async_trait;
use parking_lot::RwLock;
use std::{cmp::Ordering, sync::Arc};

use crate::{
    engine::Engine,
    error::{Result, StoreError},
    ledger::Ledger,
    record::{MigrationRecord, NewMigrationRecord},
};

#[derive(Debug, Default)]
struct MemoryLedger {
    initialized: bool,
    last_id: i64,
    records: Vec<MigrationRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryEngine(Arc<RwLock<MemoryLedger>>);

impl MemoryEngine {
    pub fn create() -> Ledger {
        Ledger::new(Self::default())
    }
}

#[async_trait]
impl Engine for MemoryEngine {
    async fn init(&self) -> Result<()> {
        self.0.write().initialized = true;

        Ok(())
    }

    async fn append(&self, record: NewMigrationRecord) -> Result<MigrationRecord> {
        let mut data = self.0.write();

        if !data.initialized {
            return Err(StoreError::unavailable("schema version table does not exist"));
        }

        if data.records.iter().any(|r| r.version == record.version) {
            return Err(StoreError::Conflict(record.version));
        }

        data.last_id += 1;

        let record = record.to_record(data.last_id);
        data.records.push(record.clone());

        Ok(record)
    }

    async fn history(&self) -> Result<Vec<MigrationRecord>> {
        let data = self.0.read();

        if !data.initialized {
            return Err(StoreError::unavailable("schema version table does not exist"));
        }

        let mut records = data.records.clone();

        records.sort_by(|a, b| match b.applied_at.cmp(&a.applied_at) {
            Ordering::Equal => b.id.cmp(&a.id),
            cmp => cmp,
        });

        Ok(records)
    }
}
