//! Controller timing configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Timing for one controller.
///
/// Serialized with millisecond fields:
///
/// ```json
/// { "debounce_ms": 300, "success_display_ms": 2000, "failure_display_ms": 3000 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Minimum spacing between accepted triggers.
    #[serde(rename = "debounce_ms", with = "millis")]
    pub debounce: Duration,
    /// How long `Succeeded` is shown before resetting to `Idle`.
    #[serde(rename = "success_display_ms", with = "millis")]
    pub success_display: Duration,
    /// How long `Failed` is shown before resetting to `Idle`.
    #[serde(rename = "failure_display_ms", with = "millis")]
    pub failure_display: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::add_to_cart()
    }
}

impl ControllerConfig {
    pub fn new(debounce: Duration, success_display: Duration, failure_display: Duration) -> Self {
        Self {
            debounce,
            success_display,
            failure_display,
        }
    }

    /// 300ms debounce, "Added!" for 2s, error for 3s.
    pub fn add_to_cart() -> Self {
        Self::new(
            Duration::from_millis(300),
            Duration::from_millis(2000),
            Duration::from_millis(3000),
        )
    }

    pub fn wishlist() -> Self {
        Self::new(
            Duration::from_millis(200),
            Duration::from_millis(1500),
            Duration::from_millis(2000),
        )
    }

    pub fn quick_view() -> Self {
        Self::wishlist()
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_success_display(mut self, display: Duration) -> Self {
        self.success_display = display;
        self
    }

    pub fn with_failure_display(mut self, display: Duration) -> Self {
        self.failure_display = display;
        self
    }

    /// Parse a config from JSON text. Missing fields take the add-to-cart preset.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// A zero display duration would reset before the result is seen.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.success_display.is_zero() || self.failure_display.is_zero() {
            return Err(ConfigError::Invalid(
                "display durations must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// `Duration` as whole milliseconds.
pub mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
