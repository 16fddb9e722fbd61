//! Two-state (wishlist-style) controller
//!
//! A [`ToggleController`] wraps an [`ActionController<bool, _>`] and keeps a
//! boolean next to it. Triggering shows the target value immediately; the
//! action's result either confirms it or, on failure, the value reverts to
//! what it was before the trigger.

use std::future::Future;

use tokio::time::Instant;

use crate::action::ActionId;
use crate::config::ControllerConfig;
use crate::controller::ActionController;
use crate::error::{NetworkError, ObserverError};
use crate::observer::ActionObserver;
use crate::state::{ActionState, Completion, Transition, Trigger};

pub struct ToggleController<O> {
    inner: ActionController<bool, O>,
    value: bool,
    committed: bool,
}

impl<O: ActionObserver<bool>> ToggleController<O> {
    /// Create a controller whose value starts `false`.
    pub fn new(id: impl Into<ActionId>, config: ControllerConfig, observer: O) -> Self {
        Self::with_initial(id, config, observer, false)
    }

    /// Create a controller with a value restored from elsewhere (e.g. saved prefs).
    pub fn with_initial(
        id: impl Into<ActionId>,
        config: ControllerConfig,
        observer: O,
        initial: bool,
    ) -> Self {
        Self {
            inner: ActionController::new(id, config, observer),
            value: initial,
            committed: initial,
        }
    }

    /// The value to display, including an optimistic in-flight target.
    pub fn value(&self) -> bool {
        self.value
    }

    /// The last value the backend confirmed.
    pub fn committed(&self) -> bool {
        self.committed
    }

    pub fn state(&self) -> ActionState {
        self.inner.state()
    }

    pub fn is_busy(&self) -> bool {
        self.inner.is_busy()
    }

    pub fn id(&self) -> &ActionId {
        self.inner.id()
    }

    pub fn controller(&self) -> &ActionController<bool, O> {
        &self.inner
    }

    pub fn observer(&self) -> &O {
        self.inner.observer()
    }

    pub fn observer_mut(&mut self) -> &mut O {
        self.inner.observer_mut()
    }

    /// Request `target`. `perform` receives it and resolves to the confirmed value.
    ///
    /// Suppressed triggers leave the value untouched.
    pub fn trigger<F, Fut>(
        &mut self,
        now: Instant,
        target: bool,
        perform: F,
    ) -> Result<Trigger, ObserverError>
    where
        F: FnOnce(bool) -> Fut,
        Fut: Future<Output = Result<bool, NetworkError>> + Send + 'static,
    {
        if let Some(suppressed) = self.inner.suppressed_by(now) {
            return Ok(suppressed);
        }
        self.committed = self.value;
        self.value = target;
        self.inner.trigger(now, || perform(target))
    }

    /// Request the opposite of the current value.
    pub fn toggle<F, Fut>(&mut self, now: Instant, perform: F) -> Result<Trigger, ObserverError>
    where
        F: FnOnce(bool) -> Fut,
        Fut: Future<Output = Result<bool, NetworkError>> + Send + 'static,
    {
        let target = !self.value;
        self.trigger(now, target, perform)
    }

    pub async fn next_completion(&mut self) -> Option<Completion<bool>> {
        self.inner.next_completion().await
    }

    /// Apply a completion, committing or reverting the value first so the
    /// observer sees the settled value.
    pub fn apply(&mut self, completion: Completion<bool>) -> Result<Transition, ObserverError> {
        if let Completion::Settled { epoch, result } = &completion {
            if self.inner.accepts_settlement(*epoch) {
                match result {
                    Ok(confirmed) => {
                        self.value = *confirmed;
                        self.committed = *confirmed;
                    }
                    Err(_) => self.value = self.committed,
                }
            }
        }
        self.inner.apply(completion)
    }

    pub async fn step(&mut self) -> Result<Option<Transition>, ObserverError> {
        match self.inner.next_completion().await {
            Some(completion) => self.apply(completion).map(Some),
            None => Ok(None),
        }
    }

    pub async fn run_until_idle(&mut self) -> Result<(), ObserverError> {
        while self.state() != ActionState::Idle {
            if self.step().await?.is_none() {
                break;
            }
        }
        Ok(())
    }
}

impl<O> std::fmt::Debug for ToggleController<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToggleController")
            .field("inner", &self.inner)
            .field("value", &self.value)
            .field("committed", &self.committed)
            .finish()
    }
}
