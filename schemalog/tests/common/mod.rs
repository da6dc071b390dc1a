#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use parse_display::Display;
use schemalog::{Entity, SyncContext, SyncTarget, Synchronizer};
use std::{sync::Arc, time::Duration};

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    Order,
    Customer,
    Invoice,
}

impl Entity for Model {
    fn entity_name(&self) -> Option<String> {
        Some(self.to_string())
    }
}

pub fn models(models: &[Model]) -> Vec<Arc<dyn Entity>> {
    models
        .iter()
        .map(|m| Arc::new(*m) as Arc<dyn Entity>)
        .collect()
}

/// Stand-in for the host's own schema synchronization.
#[derive(Clone, Default)]
pub struct Schema {
    pub synchronized: Arc<Mutex<Vec<String>>>,
    fail_on: Vec<String>,
    delay: Option<(String, Duration)>,
}

impl Schema {
    pub fn failing_on(mut self, model: Model) -> Self {
        self.fail_on.push(model.to_string());
        self
    }

    pub fn slow_on(mut self, model: Model, delay: Duration) -> Self {
        self.delay = Some((model.to_string(), delay));
        self
    }

    pub fn synchronized(&self) -> Vec<String> {
        self.synchronized.lock().clone()
    }
}

#[async_trait]
impl Synchronizer for Schema {
    async fn synchronize(&self, _ctx: &SyncContext, target: &SyncTarget) -> anyhow::Result<()> {
        let name = target.to_string();

        if let Some((model, delay)) = &self.delay {
            if model == &name {
                tokio::time::sleep(*delay).await;
            }
        }

        if self.fail_on.contains(&name) {
            anyhow::bail!("cannot alter table for {name}");
        }

        self.synchronized.lock().push(name);

        Ok(())
    }
}
