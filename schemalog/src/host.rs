//! The host side of schema synchronization.
//!
//! A host data-access layer synchronizes the schema of its entities through a
//! pluggable [`Synchronizer`] strategy. Extensions wrap the current strategy with
//! [`HostContext::intercept`] to observe every synchronization, whatever the call
//! site. Non-fatal failures of a pass are accumulated on an [`ErrorChannel`] and
//! handed back to the caller in a [`SyncReport`].

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::{fmt, sync::Arc};
use tracing::{debug, error};
use uuid::Uuid;

use crate::error::HostError;

/// Logical name capability of a synchronized entity.
pub trait Entity: Send + Sync {
    /// Declared logical name, `None` when it cannot be resolved.
    fn entity_name(&self) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEntity(pub String);

impl NamedEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl Entity for NamedEntity {
    fn entity_name(&self) -> Option<String> {
        Some(self.0.to_owned())
    }
}

/// What the host exposes about the entities being synchronized.
#[derive(Clone)]
pub enum SyncTarget {
    Entity(Arc<dyn Entity>),
    Batch(Vec<Arc<dyn Entity>>),
    Unknown,
}

impl fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |e: &Arc<dyn Entity>| e.entity_name().unwrap_or_else(|| "?".to_owned());

        match self {
            SyncTarget::Entity(entity) => write!(f, "{}", name(entity)),
            SyncTarget::Batch(entities) => write!(
                f,
                "[{}]",
                entities.iter().map(name).collect::<Vec<_>>().join(", ")
            ),
            SyncTarget::Unknown => f.write_str("<all models>"),
        }
    }
}

impl fmt::Debug for SyncTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SyncTarget({self})")
    }
}

/// How much of a synchronization pass the host makes observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    /// One call per entity.
    #[default]
    PerEntity,
    /// One call per pass, with the batch of entities.
    Batch,
    /// One call per pass, entities are not observable.
    Opaque,
}

/// Accumulates non-fatal errors raised during one synchronization pass.
#[derive(Debug, Clone, Default)]
pub struct ErrorChannel(Arc<Mutex<Vec<anyhow::Error>>>);

impl ErrorChannel {
    pub fn add(&self, err: impl Into<anyhow::Error>) {
        let err = err.into();
        error!("{err}");
        self.0.lock().push(err);
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    pub fn take(&self) -> Vec<anyhow::Error> {
        std::mem::take(&mut *self.0.lock())
    }
}

/// Context of a single synchronize invocation.
///
/// A new context is built for every call into the strategy, so nothing stored here
/// is visible to a concurrent invocation.
#[derive(Debug, Clone)]
pub struct SyncContext {
    pub id: Uuid,
    pub granularity: Granularity,
    errors: ErrorChannel,
}

impl SyncContext {
    pub fn new(granularity: Granularity, errors: ErrorChannel) -> Self {
        Self {
            id: Uuid::new_v4(),
            granularity,
            errors,
        }
    }

    /// Reports a failure that must not abort the pass.
    pub fn add_error(&self, err: impl Into<anyhow::Error>) {
        self.errors.add(err);
    }

    pub fn errors(&self) -> &ErrorChannel {
        &self.errors
    }
}

/// Strategy that brings the database schema in line with the given target.
#[async_trait]
pub trait Synchronizer: Send + Sync {
    async fn synchronize(&self, ctx: &SyncContext, target: &SyncTarget) -> anyhow::Result<()>;
}

/// Outcome of [`HostContext::auto_migrate`].
#[derive(Debug, Default)]
pub struct SyncReport {
    pub errors: Vec<anyhow::Error>,
}

impl SyncReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Default)]
struct ExtensionPoint {
    sealed: bool,
    exclusive: Option<String>,
    installed: Vec<String>,
}

struct HostInner {
    granularity: Granularity,
    strategy: RwLock<Arc<dyn Synchronizer>>,
    extensions: Mutex<ExtensionPoint>,
}

/// Handle on the host data-access layer. Clones share the same extension point.
#[derive(Clone)]
pub struct HostContext {
    inner: Arc<HostInner>,
}

impl HostContext {
    pub fn new<S: Synchronizer + 'static>(strategy: S) -> Self {
        Self::with_granularity(strategy, Granularity::default())
    }

    pub fn with_granularity<S: Synchronizer + 'static>(
        strategy: S,
        granularity: Granularity,
    ) -> Self {
        Self {
            inner: Arc::new(HostInner {
                granularity,
                strategy: RwLock::new(Arc::new(strategy)),
                extensions: Mutex::new(ExtensionPoint::default()),
            }),
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.inner.granularity
    }

    /// Closes the extension point, later [`Self::intercept`] calls fail.
    pub fn seal(&self) {
        self.inner.extensions.lock().sealed = true;
    }

    /// Reserves the extension point for `name` alone.
    pub fn claim_exclusive(&self, name: impl Into<String>) -> Result<(), HostError> {
        let name = name.into();
        let mut extensions = self.inner.extensions.lock();

        if extensions.sealed {
            return Err(HostError::Unavailable);
        }

        if let Some(owner) = extensions.exclusive.as_ref().filter(|owner| *owner != &name) {
            return Err(HostError::Claimed(owner.to_owned()));
        }

        extensions.exclusive = Some(name);

        Ok(())
    }

    /// Replaces the current strategy with `wrap(current)`.
    ///
    /// Returns `Ok(false)` without wrapping again when an interceptor named `name` is
    /// already installed.
    pub fn intercept<F>(&self, name: impl Into<String>, wrap: F) -> Result<bool, HostError>
    where
        F: FnOnce(Arc<dyn Synchronizer>) -> Arc<dyn Synchronizer>,
    {
        let name = name.into();
        let mut extensions = self.inner.extensions.lock();

        if extensions.sealed {
            return Err(HostError::Unavailable);
        }

        if let Some(owner) = extensions.exclusive.as_ref().filter(|owner| *owner != &name) {
            return Err(HostError::Claimed(owner.to_owned()));
        }

        if extensions.installed.contains(&name) {
            debug!("interceptor {name} already installed");
            return Ok(false);
        }

        let mut strategy = self.inner.strategy.write();
        *strategy = wrap(strategy.clone());
        extensions.installed.push(name);

        Ok(true)
    }

    pub fn is_intercepted_by(&self, name: &str) -> bool {
        self.inner
            .extensions
            .lock()
            .installed
            .iter()
            .any(|n| n == name)
    }

    /// Runs one synchronization pass over `entities`.
    pub async fn auto_migrate(&self, entities: Vec<Arc<dyn Entity>>) -> SyncReport {
        let strategy = self.inner.strategy.read().clone();
        let errors = ErrorChannel::default();

        let targets = match self.inner.granularity {
            Granularity::PerEntity => entities.into_iter().map(SyncTarget::Entity).collect(),
            Granularity::Batch if !entities.is_empty() => vec![SyncTarget::Batch(entities)],
            Granularity::Batch | Granularity::Opaque => vec![SyncTarget::Unknown],
        };

        for target in targets {
            let ctx = SyncContext::new(self.inner.granularity, errors.clone());

            if let Err(err) = strategy.synchronize(&ctx, &target).await {
                ctx.add_error(err);
            }
        }

        SyncReport {
            errors: errors.take(),
        }
    }
}
