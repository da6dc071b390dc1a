use async_trait::async_trait;
use dyn_clone::DynClone;

use crate::{
    error::Result,
    record::{MigrationRecord, NewMigrationRecord},
};

#[cfg(feature = "memory")]
mod memory;
#[cfg(feature = "pg")]
mod pg;
#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "memory")]
pub use memory::*;
#[cfg(feature = "pg")]
pub use pg::*;
#[cfg(feature = "sqlite")]
pub use sqlite::*;

pub const DEFAULT_TABLE: &str = "schema_versions";

#[async_trait]
pub trait Engine: DynClone + Send + Sync {
    /// Creates the ledger storage if it does not exist yet. Safe to call on every startup.
    async fn init(&self) -> Result<()>;

    async fn append(&self, record: NewMigrationRecord) -> Result<MigrationRecord>;

    /// All records, most recently applied first.
    async fn history(&self) -> Result<Vec<MigrationRecord>>;

    async fn latest(&self) -> Result<Option<MigrationRecord>> {
        Ok(self.history().await?.into_iter().next())
    }
}

dyn_clone::clone_trait_object!(Engine);

#[cfg(any(feature = "sqlite", feature = "pg"))]
pub(crate) fn table_name(prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}_{DEFAULT_TABLE}"),
        _ => DEFAULT_TABLE.to_owned(),
    }
}
