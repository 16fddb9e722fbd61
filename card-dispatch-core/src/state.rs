//! Lifecycle states and the results of driving them

use std::fmt;

/// Where a controller is in its action lifecycle.
///
/// ```text
///          trigger            Ok              display timeout
///   Idle ----------> Pending ----> Succeeded ----------------> Idle
///    ^                  |
///    |                  | Err
///    |                  v
///    +--------------- Failed
///       display timeout
/// ```
///
/// A trigger accepted while `Succeeded` or `Failed` moves straight to
/// `Pending` without waiting for the display timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActionState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl ActionState {
    /// `Succeeded` or `Failed`: a result is being displayed.
    pub fn is_terminal(self) -> bool {
        matches!(self, ActionState::Succeeded | ActionState::Failed)
    }

    pub fn is_pending(self) -> bool {
        self == ActionState::Pending
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionState::Idle => "idle",
            ActionState::Pending => "pending",
            ActionState::Succeeded => "succeeded",
            ActionState::Failed => "failed",
        }
    }
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a call to `trigger` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The action was started.
    Started,
    /// Ignored: the previous accepted trigger was less than the debounce ago.
    Debounced,
    /// Ignored: an action is already in flight.
    InFlight,
}

impl Trigger {
    pub fn is_started(self) -> bool {
        self == Trigger::Started
    }
}

/// The transition taken when a completion was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// `Pending -> Succeeded`
    Succeeded,
    /// `Pending -> Failed`
    Failed,
    /// `Succeeded|Failed -> Idle`
    Reset,
    /// The completion belonged to an earlier trigger and was dropped.
    Stale,
}

/// Message sent from a controller's tasks back to the controller.
#[derive(Debug)]
pub enum Completion<T> {
    /// The async action finished.
    Settled {
        epoch: u64,
        result: Result<T, crate::NetworkError>,
    },
    /// The result display duration elapsed.
    ResetDue { epoch: u64 },
}

impl<T> Completion<T> {
    pub fn epoch(&self) -> u64 {
        match self {
            Completion::Settled { epoch, .. } | Completion::ResetDue { epoch } => *epoch,
        }
    }
}
