//! Configuration schema for the Mnemos memory engine.

use serde::{Deserialize, Serialize};

/// Root config for the memory engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MnemosConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub volatile: VolatileConfig,
    #[serde(default)]
    pub durable: DurableConfig,
    #[serde(default)]
    pub coordinator: CoordinatorConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

impl MnemosConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> MnemosConfigBuilder {
        MnemosConfigBuilder::new()
    }
}

/// Builder for assembling a `MnemosConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct MnemosConfigBuilder {
    config: MnemosConfig,
}

impl MnemosConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: MnemosConfig::default(),
        }
    }

    /// Replace the volatile tier configuration.
    pub fn volatile(mut self, volatile: VolatileConfig) -> Self {
        self.config.volatile = volatile;
        self
    }

    /// Replace the durable tier configuration.
    pub fn durable(mut self, durable: DurableConfig) -> Self {
        self.config.durable = durable;
        self
    }

    /// Replace the coordinator configuration.
    pub fn coordinator(mut self, coordinator: CoordinatorConfig) -> Self {
        self.config.coordinator = coordinator;
        self
    }

    /// Replace the event bus configuration.
    pub fn events(mut self, events: EventsConfig) -> Self {
        self.config.events = events;
        self
    }

    /// Finalize and return the built `MnemosConfig`.
    pub fn build(self) -> MnemosConfig {
        self.config
    }
}

/// Configuration for the volatile short-term message log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatileConfig {
    /// Maximum number of messages kept per conversation.
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,
    /// Inactivity TTL in seconds for a conversation's log.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for VolatileConfig {
    fn default() -> Self {
        Self {
            max_messages: default_max_messages(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_max_messages() -> usize {
    20
}

fn default_ttl_secs() -> u64 {
    3600
}

/// Configuration for the durable long-term memory store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurableConfig {
    /// How many recent message entries a summary draws from.
    #[serde(default = "default_summary_window")]
    pub summary_window: usize,
    /// Default result limit for memory search.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

impl Default for DurableConfig {
    fn default() -> Self {
        Self {
            summary_window: default_summary_window(),
            search_limit: default_search_limit(),
        }
    }
}

fn default_summary_window() -> usize {
    20
}

fn default_search_limit() -> usize {
    5
}

/// Configuration for the memory coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Minimum importance for promotion into durable memory.
    #[serde(default = "default_promotion_threshold")]
    pub promotion_threshold: f64,
    /// Maximum recent messages pulled into a turn context.
    #[serde(default = "default_max_recent")]
    pub max_recent: usize,
    /// Maximum durable memories pulled into a turn context.
    #[serde(default = "default_max_durable")]
    pub max_durable: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            promotion_threshold: default_promotion_threshold(),
            max_recent: default_max_recent(),
            max_durable: default_max_durable(),
        }
    }
}

fn default_promotion_threshold() -> f64 {
    0.5
}

fn default_max_recent() -> usize {
    10
}

fn default_max_durable() -> usize {
    3
}

/// Configuration for the memory event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Broadcast channel buffer size.
    #[serde(default = "default_event_buffer")]
    pub buffer: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            buffer: default_event_buffer(),
        }
    }
}

fn default_event_buffer() -> usize {
    64
}
