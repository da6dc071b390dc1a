#![forbid(unsafe_code)]

mod clock;
mod config;
mod describe;
mod error;
mod host;
mod tracker;

pub use clock::*;
pub use config::*;
pub use describe::*;
pub use error::*;
pub use host::*;
pub use tracker::*;

pub use schemalog_store as store;
pub use schemalog_store::{Ledger, MigrationRecord, NewMigrationRecord, StoreError};
