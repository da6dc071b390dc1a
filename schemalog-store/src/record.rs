use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the schema version ledger.
///
/// Records are written once by [`crate::Ledger::append`] and never updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(any(feature = "sqlite", feature = "pg"), derive(sqlx::FromRow))]
pub struct MigrationRecord {
    pub id: i64,
    pub version: String,
    pub applied_at: DateTime<Utc>,
    pub changes: String,
}

/// A record that storage has not yet assigned an id to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMigrationRecord {
    pub version: String,
    pub applied_at: DateTime<Utc>,
    pub changes: String,
}

impl NewMigrationRecord {
    pub fn new(version: impl Into<String>, changes: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            applied_at: Utc::now(),
            changes: changes.into(),
        }
    }

    pub fn applied_at(mut self, applied_at: DateTime<Utc>) -> Self {
        self.applied_at = applied_at;
        self
    }

    pub fn to_record(&self, id: i64) -> MigrationRecord {
        MigrationRecord {
            id,
            version: self.version.to_owned(),
            applied_at: self.applied_at,
            changes: self.changes.to_owned(),
        }
    }
}
