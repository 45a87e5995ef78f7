//! Runtime behaviour of a [`FlowController`](crate::controller::FlowController).
//!
//! The content tables decide *what* a flow asks; the configuration decides how
//! the controller reacts to the host's navigation events. Every field has a
//! default, so a partial JSON document is enough:
//!
//! ```rust
//! use stepwise::config::{BackAtStart, FlowConfig};
//!
//! let config = FlowConfig::from_json(r#"{ "auto_advance_ms": 300 }"#).unwrap();
//! assert_eq!(config.auto_advance_ms, Some(300));
//! assert_eq!(config.back_at_start, BackAtStart::Exit);
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// What `back` does on the first visible step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackAtStart {
    /// Ask the host to leave the flow.
    #[default]
    Exit,
    /// Stay on the first step.
    Ignore,
}

/// Where the user may skip the remainder of a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipPolicy {
    Never,
    #[default]
    FirstStep,
    Anywhere,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Delay before a single-select answer advances on its own. `None`
    /// disables auto-advance.
    pub auto_advance_ms: Option<u64>,
    pub back_at_start: BackAtStart,
    pub skip_policy: SkipPolicy,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            auto_advance_ms: None,
            back_at_start: BackAtStart::Exit,
            skip_policy: SkipPolicy::FirstStep,
        }
    }
}

impl FlowConfig {
    pub fn with_auto_advance(mut self, delay: Duration) -> Self {
        self.auto_advance_ms = Some(delay.as_millis() as u64);
        self
    }

    pub fn with_back_at_start(mut self, behaviour: BackAtStart) -> Self {
        self.back_at_start = behaviour;
        self
    }

    pub fn with_skip_policy(mut self, policy: SkipPolicy) -> Self {
        self.skip_policy = policy;
        self
    }

    pub fn auto_advance_delay(&self) -> Option<Duration> {
        self.auto_advance_ms.map(Duration::from_millis)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }
}
