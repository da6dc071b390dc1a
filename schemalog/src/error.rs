use schemalog_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("synchronize extension point is unavailable")]
    Unavailable,

    #[error("synchronize extension point is exclusively claimed by `{0}`")]
    Claimed(String),
}

/// Failure that prevents the tracker from becoming active.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("failed to create schema version table: {0}")]
    Ledger(#[from] StoreError),

    #[error("failed to register synchronize interceptor: {0}")]
    Host(#[from] HostError),
}

/// Failure of a single synchronization, reported through the host error channel.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("failed to synchronize {target}: {source}")]
    Delegation {
        target: String,
        source: anyhow::Error,
    },

    #[error("failed to record schema version: {0}")]
    Record(#[from] StoreError),
}
