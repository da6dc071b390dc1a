//! Tracker configuration.

/// Name the tracker registers its interceptor under.
pub const DEFAULT_TRACKER_NAME: &str = "automigrate_tracker";

/// `chrono` format of version labels; one label per second.
pub const DEFAULT_VERSION_FORMAT: &str = "%Y%m%d%H%M%S";

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Registration name at the host extension point
    pub name: String,

    /// Format applied to the synchronization start time to build the version label.
    ///
    /// Two synchronizations starting within the same formatted instant produce the
    /// same label and the second one is rejected by the ledger.
    pub version_format: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_TRACKER_NAME.to_owned(),
            version_format: DEFAULT_VERSION_FORMAT.to_owned(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: TrackerConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn version_format(mut self, format: impl Into<String>) -> Self {
        self.config.version_format = format.into();
        self
    }

    pub fn build(self) -> TrackerConfig {
        self.config
    }
}
