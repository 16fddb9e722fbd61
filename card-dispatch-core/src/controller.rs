//! Async action controller
//!
//! An [`ActionController`] drives one button's lifecycle under rapid input:
//!
//! ```ignore
//! let mut cart = ActionController::new(
//!     ActionId::scoped("add-to-cart", "sku123"),
//!     ControllerConfig::add_to_cart(),
//!     observer,
//! );
//!
//! // Click: starts the call unless debounced or already in flight
//! let backend = backend.clone();
//! cart.trigger(clock.now(), move || backend.add_to_cart("sku123"))?;
//!
//! // Main loop: feed completions back in
//! loop {
//!     tokio::select! {
//!         Some(completion) = cart.next_completion() => {
//!             cart.apply(completion)?;
//!         }
//!         // ... input, other controllers
//!     }
//! }
//! ```
//!
//! The controller owns its state and its tasks; it is mutated only through
//! `&mut self` from the loop that owns it. Results and reset timers come back
//! as [`Completion`] messages, each tagged with the epoch of the trigger that
//! produced it so leftovers from an earlier trigger are ignored.

use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::action::{ActionId, ActionRequest};
use crate::config::ControllerConfig;
use crate::error::{NetworkError, ObserverError};
use crate::observer::ActionObserver;
use crate::state::{ActionState, Completion, Transition, Trigger};
use crate::tasks::{TaskKey, TaskManager};

const PERFORM_TASK: &str = "perform";
const RESET_TASK: &str = "reset";

/// Lifecycle controller for one async action.
///
/// # Type Parameters
///
/// - `T`: the value the action resolves to on success
/// - `O`: the observer receiving lifecycle callbacks
pub struct ActionController<T, O> {
    request: ActionRequest,
    config: ControllerConfig,
    state: ActionState,
    last_trigger: Option<Instant>,
    epoch: u64,
    busy: bool,
    observer: O,
    tasks: TaskManager<Completion<T>>,
    completions: mpsc::UnboundedReceiver<Completion<T>>,
}

impl<T, O> ActionController<T, O>
where
    T: Send + 'static,
    O: ActionObserver<T>,
{
    pub fn new(id: impl Into<ActionId>, config: ControllerConfig, observer: O) -> Self {
        let (tx, completions) = mpsc::unbounded_channel();
        Self {
            request: ActionRequest::new(id, config.debounce),
            config,
            state: ActionState::Idle,
            last_trigger: None,
            epoch: 0,
            busy: false,
            observer,
            tasks: TaskManager::new(tx),
            completions,
        }
    }

    pub fn request(&self) -> &ActionRequest {
        &self.request
    }

    pub fn id(&self) -> &ActionId {
        self.request.id()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    /// Whether the busy/disabled affordance should be shown.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Which guard, if any, would ignore a trigger at `now`.
    pub fn suppressed_by(&self, now: Instant) -> Option<Trigger> {
        if self.state.is_pending() {
            return Some(Trigger::InFlight);
        }
        match self.last_trigger {
            Some(last) if now.saturating_duration_since(last) < self.request.debounce() => {
                Some(Trigger::Debounced)
            }
            _ => None,
        }
    }

    /// Start the action unless a guard suppresses it.
    ///
    /// A suppressed trigger has no side effects: `perform` is not called and
    /// no hook fires. Otherwise the state becomes `Pending`, any pending
    /// reset is cancelled, `loading_started` fires and `perform` is called
    /// exactly once with its future spawned. An error from `loading_started`
    /// is returned after the action has been started.
    pub fn trigger<F, Fut>(&mut self, now: Instant, perform: F) -> Result<Trigger, ObserverError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, NetworkError>> + Send + 'static,
    {
        if let Some(suppressed) = self.suppressed_by(now) {
            return Ok(suppressed);
        }

        self.last_trigger = Some(now);
        self.epoch += 1;
        self.tasks.cancel(&TaskKey::from(RESET_TASK));
        self.state = ActionState::Pending;
        self.busy = true;
        debug!(action = %self.request.id(), epoch = self.epoch, "action started");

        let started = self.observer.loading_started(self.request.id());

        let epoch = self.epoch;
        let future = perform();
        self.tasks.spawn(PERFORM_TASK, async move {
            Completion::Settled {
                epoch,
                result: run_contained(future).await,
            }
        });

        started.map(|()| Trigger::Started)
    }

    /// Wait for the next completion from this controller's tasks.
    ///
    /// Cancel safe. Pending forever if nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Completion<T>> {
        self.completions.recv().await
    }

    /// Whether a settlement for `epoch` would be applied.
    pub fn accepts_settlement(&self, epoch: u64) -> bool {
        epoch == self.epoch && self.state.is_pending()
    }

    /// Feed a completion into the state machine.
    ///
    /// The state transition, reset scheduling and busy clearing all happen
    /// before any observer error is returned.
    pub fn apply(&mut self, completion: Completion<T>) -> Result<Transition, ObserverError> {
        match completion {
            Completion::Settled { epoch, result } => {
                if !self.accepts_settlement(epoch) {
                    return Ok(Transition::Stale);
                }
                self.settle(epoch, result)
            }
            Completion::ResetDue { epoch } => {
                if epoch != self.epoch || !self.state.is_terminal() {
                    return Ok(Transition::Stale);
                }
                self.state = ActionState::Idle;
                debug!(action = %self.request.id(), "action reset");
                self.observer.reset(self.request.id())?;
                Ok(Transition::Reset)
            }
        }
    }

    fn settle(
        &mut self,
        epoch: u64,
        result: Result<T, NetworkError>,
    ) -> Result<Transition, ObserverError> {
        let (state, display) = match &result {
            Ok(_) => (ActionState::Succeeded, self.config.success_display),
            Err(_) => (ActionState::Failed, self.config.failure_display),
        };
        self.state = state;
        self.schedule_reset(epoch, display);

        let mut finalizer = Finalizer {
            observer: &mut self.observer,
            busy: &mut self.busy,
            id: self.request.id(),
            _output: PhantomData,
        };

        match &result {
            Ok(output) => {
                debug!(action = %finalizer.id, "action succeeded");
                finalizer.observer.succeeded(finalizer.id, output)?;
                Ok(Transition::Succeeded)
            }
            Err(error) => {
                debug!(action = %finalizer.id, %error, "action failed");
                finalizer.observer.failed(finalizer.id, error)?;
                Ok(Transition::Failed)
            }
        }
    }

    fn schedule_reset(&mut self, epoch: u64, display: Duration) {
        self.tasks
            .spawn_after(RESET_TASK, display, async move { Completion::ResetDue { epoch } });
    }

    /// Wait for one completion and apply it.
    ///
    /// Returns `None` only if the completion channel closed.
    pub async fn step(&mut self) -> Result<Option<Transition>, ObserverError> {
        match self.next_completion().await {
            Some(completion) => self.apply(completion).map(Some),
            None => Ok(None),
        }
    }

    /// Apply completions until the controller is `Idle`.
    ///
    /// Never returns while an action that never settles is in flight.
    pub async fn run_until_idle(&mut self) -> Result<(), ObserverError> {
        while self.state != ActionState::Idle {
            if self.step().await?.is_none() {
                break;
            }
        }
        Ok(())
    }
}

/// Run the action on its own task so a panic surfaces as a failure.
///
/// Aborting the returned future aborts the action too.
async fn run_contained<T, Fut>(future: Fut) -> Result<T, NetworkError>
where
    T: Send + 'static,
    Fut: Future<Output = Result<T, NetworkError>> + Send + 'static,
{
    let mut action = AbortOnDrop(tokio::spawn(future));
    match (&mut action.0).await {
        Ok(result) => result,
        Err(e) if e.is_panic() => {
            warn!("action panicked");
            Err(NetworkError::Unavailable("action panicked".into()))
        }
        Err(_) => Err(NetworkError::Unavailable("action cancelled".into())),
    }
}

struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl<T, O> std::fmt::Debug for ActionController<T, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionController")
            .field("request", &self.request)
            .field("state", &self.state)
            .field("epoch", &self.epoch)
            .field("busy", &self.busy)
            .finish()
    }
}

/// Clears the busy affordance when a settlement finishes, however it exits.
struct Finalizer<'a, T, O: ActionObserver<T>> {
    observer: &'a mut O,
    busy: &'a mut bool,
    id: &'a ActionId,
    _output: PhantomData<fn(&T)>,
}

impl<T, O: ActionObserver<T>> Drop for Finalizer<'_, T, O> {
    fn drop(&mut self) {
        *self.busy = false;
        self.observer.settled(self.id);
    }
}
