//! Observer hooks through which a controller reports its lifecycle
//!
//! A controller never renders anything. Everything the presentation layer
//! needs to know arrives through an [`ActionObserver`]:
//!
//! 1. `loading_started` - show busy/disabled, announce "in progress"
//! 2. `succeeded` or `failed` - announce the result, show a temporary affordance
//! 3. `settled` - clear busy/disabled; runs even if step 2 errors or panics
//! 4. `reset` - the display timeout elapsed, back to the resting look
//!
//! Hooks are called synchronously from the controller's transition points,
//! in that order, and never interleave for one controller.

use tokio::sync::mpsc;

use crate::action::{Action, ActionId};
use crate::error::{NetworkError, ObserverError};

/// Receives lifecycle callbacks from a controller.
///
/// `T` is the value the action resolves to on success.
pub trait ActionObserver<T> {
    /// The action was accepted and is now in flight.
    fn loading_started(&mut self, id: &ActionId) -> Result<(), ObserverError>;

    /// The action resolved successfully.
    fn succeeded(&mut self, id: &ActionId, output: &T) -> Result<(), ObserverError>;

    /// The action failed. Called exactly once per failed trigger.
    fn failed(&mut self, id: &ActionId, error: &NetworkError) -> Result<(), ObserverError>;

    /// The busy affordance must be cleared.
    ///
    /// Runs after `succeeded`/`failed` as a finalizer, including when those
    /// hooks return an error or panic, so it must not panic itself.
    #[allow(unused_variables)]
    fn settled(&mut self, id: &ActionId) {}

    /// The result display duration elapsed and the controller is idle again.
    #[allow(unused_variables)]
    fn reset(&mut self, id: &ActionId) -> Result<(), ObserverError> {
        Ok(())
    }
}

/// Observer that ignores every hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl<T> ActionObserver<T> for NoopObserver {
    fn loading_started(&mut self, _id: &ActionId) -> Result<(), ObserverError> {
        Ok(())
    }

    fn succeeded(&mut self, _id: &ActionId, _output: &T) -> Result<(), ObserverError> {
        Ok(())
    }

    fn failed(&mut self, _id: &ActionId, _error: &NetworkError) -> Result<(), ObserverError> {
        Ok(())
    }
}

/// One lifecycle event, borrowed from the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lifecycle<'a, T> {
    LoadingStarted,
    Succeeded(&'a T),
    Failed(&'a NetworkError),
    Settled,
    Reset,
}

/// Maps a lifecycle event to an optional store action.
pub type LifecycleMapper<T, A> = fn(&ActionId, Lifecycle<'_, T>) -> Option<A>;

/// Bridges controller callbacks into a store's action channel.
///
/// Each hook maps its event through `mapper` and sends the resulting action,
/// so lifecycle changes are reduced into state like any other input.
///
/// # Example
///
/// ```ignore
/// fn map_cart(_id: &ActionId, event: Lifecycle<'_, u32>) -> Option<CardAction> {
///     match event {
///         Lifecycle::LoadingStarted => Some(CardAction::CartDidStart),
///         Lifecycle::Succeeded(count) => Some(CardAction::CartDidAdd(*count)),
///         Lifecycle::Failed(e) => Some(CardAction::CartDidFail(e.to_string())),
///         Lifecycle::Settled => Some(CardAction::CartDidSettle),
///         Lifecycle::Reset => Some(CardAction::CartDidReset),
///     }
/// }
///
/// let observer = ChannelObserver::new(action_tx.clone(), map_cart);
/// ```
pub struct ChannelObserver<T, A> {
    tx: mpsc::UnboundedSender<A>,
    mapper: LifecycleMapper<T, A>,
}

impl<T, A: Action> ChannelObserver<T, A> {
    pub fn new(tx: mpsc::UnboundedSender<A>, mapper: LifecycleMapper<T, A>) -> Self {
        Self { tx, mapper }
    }

    fn forward(&self, id: &ActionId, event: Lifecycle<'_, T>) -> Result<(), ObserverError> {
        match (self.mapper)(id, event) {
            Some(action) => self
                .tx
                .send(action)
                .map_err(|_| ObserverError::ChannelClosed),
            None => Ok(()),
        }
    }
}

impl<T, A> std::fmt::Debug for ChannelObserver<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelObserver")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl<T, A: Action> ActionObserver<T> for ChannelObserver<T, A> {
    fn loading_started(&mut self, id: &ActionId) -> Result<(), ObserverError> {
        self.forward(id, Lifecycle::LoadingStarted)
    }

    fn succeeded(&mut self, id: &ActionId, output: &T) -> Result<(), ObserverError> {
        self.forward(id, Lifecycle::Succeeded(output))
    }

    fn failed(&mut self, id: &ActionId, error: &NetworkError) -> Result<(), ObserverError> {
        self.forward(id, Lifecycle::Failed(error))
    }

    fn settled(&mut self, id: &ActionId) {
        if self.forward(id, Lifecycle::Settled).is_err() {
            tracing::debug!(action = %id, "settled event dropped, channel closed");
        }
    }

    fn reset(&mut self, id: &ActionId) -> Result<(), ObserverError> {
        self.forward(id, Lifecycle::Reset)
    }
}
