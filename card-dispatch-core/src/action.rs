//! Action identity and the dispatchable message trait

use std::fmt::{self, Debug, Display};
use std::time::Duration;

/// Marker trait for messages that can be dispatched to a store
///
/// Messages describe what happened (a click, a completed request) and are
/// reduced into state. They should be:
/// - Clone: messages may be logged or forwarded
/// - Debug: for logging
/// - Send + 'static: controllers and tasks send them across the runtime
pub trait Action: Clone + Debug + Send + 'static {
    /// Get the message name for logging and filtering
    fn name(&self) -> &'static str;
}

/// Identifies one logical control, e.g. `add-to-cart:sku123`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(String);

impl ActionId {
    /// Create an id from a raw string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create an id scoped to a product: `<kind>:<product_id>`.
    pub fn scoped(kind: &str, product_id: &str) -> Self {
        Self(format!("{kind}:{product_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part before the first `:`, or the whole id if unscoped.
    pub fn kind(&self) -> &str {
        self.0.split_once(':').map_or(&self.0, |(kind, _)| kind)
    }
}

impl Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ActionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The immutable description of a control a controller drives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionRequest {
    id: ActionId,
    debounce: Duration,
}

impl ActionRequest {
    pub fn new(id: impl Into<ActionId>, debounce: Duration) -> Self {
        Self {
            id: id.into(),
            debounce,
        }
    }

    pub fn id(&self) -> &ActionId {
        &self.id
    }

    /// Minimum spacing between two accepted triggers.
    pub fn debounce(&self) -> Duration {
        self.debounce
    }
}
