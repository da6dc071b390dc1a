use async_trait::async_trait;
use chrono::{DateTime, Utc};
use schemalog_store::{Ledger, MigrationRecord, NewMigrationRecord, Result as StoreResult};
use std::{fmt::Write, sync::Arc};
use tracing::{debug, error, info, Instrument};

use crate::{
    clock::{Clock, SystemClock},
    config::{TrackerConfig, DEFAULT_VERSION_FORMAT},
    describe::describe,
    error::{InitError, SyncError},
    host::{HostContext, SyncContext, SyncTarget, Synchronizer},
};

/// Records a schema version for every successful synchronization of a host.
#[derive(Clone)]
pub struct AutoMigrateTracker {
    ledger: Ledger,
    config: Arc<TrackerConfig>,
    clock: Arc<dyn Clock>,
}

impl AutoMigrateTracker {
    pub fn new(ledger: Ledger) -> Self {
        Self::with_config(ledger, TrackerConfig::default())
    }

    pub fn with_config(ledger: Ledger, config: TrackerConfig) -> Self {
        Self {
            ledger,
            config: Arc::new(config),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Creates the schema version table and installs the tracker at the host
    /// extension point. Both steps are idempotent.
    pub async fn initialize(&self, host: &HostContext) -> Result<(), InitError> {
        debug!("initializing {}", self.name());

        self.ledger.ensure_initialized().await?;

        let tracker = self.clone();
        let installed = host.intercept(self.name(), move |inner| {
            Arc::new(TrackedSynchronizer { tracker, inner }) as Arc<dyn Synchronizer>
        })?;

        if installed {
            info!("{} registered at the synchronize extension point", self.name());
        }

        Ok(())
    }

    /// Synchronizes `target` through `next` and records the result.
    ///
    /// A failed synchronization is returned and leaves the ledger untouched. A failed
    /// write goes to the error channel of `ctx`; the schema change itself stays.
    pub async fn on_synchronize(
        &self,
        ctx: &SyncContext,
        target: &SyncTarget,
        next: &dyn Synchronizer,
    ) -> Result<(), SyncError> {
        let span = tracing::debug_span!(
            "automigrate_tracker",
            correlation_id = %ctx.id,
            sync_target = %target,
        );

        async move {
            let started_at = self.clock.now();
            debug!("synchronize started at {started_at}");

            next.synchronize(ctx, target)
                .await
                .map_err(|source| SyncError::Delegation {
                    target: target.to_string(),
                    source,
                })?;

            let version = self.version_label(started_at);
            let changes = describe(target);
            let applied_at = self.clock.now().max(started_at);
            let record = NewMigrationRecord::new(version, changes).applied_at(applied_at);

            match self.ledger.append(record).await {
                Ok(record) => info!("recorded schema version {}", record.version),
                Err(err) => ctx.add_error(SyncError::Record(err)),
            }

            Ok::<_, SyncError>(())
        }
        .instrument(span)
        .await
    }

    fn version_label(&self, started_at: DateTime<Utc>) -> String {
        let mut version = String::new();

        if write!(version, "{}", started_at.format(&self.config.version_format)).is_err() {
            error!(
                "invalid version format `{}`, falling back to `{DEFAULT_VERSION_FORMAT}`",
                self.config.version_format
            );

            return started_at.format(DEFAULT_VERSION_FORMAT).to_string();
        }

        version
    }

    /// Migration history, newest first.
    pub async fn history(&self) -> StoreResult<Vec<MigrationRecord>> {
        self.ledger.list_history().await
    }
}

/// Strategy installed by [`AutoMigrateTracker::initialize`], wraps the previous one.
pub struct TrackedSynchronizer {
    tracker: AutoMigrateTracker,
    inner: Arc<dyn Synchronizer>,
}

#[async_trait]
impl Synchronizer for TrackedSynchronizer {
    async fn synchronize(&self, ctx: &SyncContext, target: &SyncTarget) -> anyhow::Result<()> {
        self.tracker
            .on_synchronize(ctx, target, self.inner.as_ref())
            .await?;

        Ok(())
    }
}
