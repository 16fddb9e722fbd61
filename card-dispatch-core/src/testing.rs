//! Test utilities for controllers
//!
//! - [`RecordingObserver`]: records every lifecycle hook in order, with
//!   optional error or panic injection per hook
//! - [`assert_observed!`](crate::assert_observed): pattern assertions on recorded events
//!
//! # Example
//!
//! ```ignore
//! use card_dispatch::testing::{Observed, RecordingObserver};
//!
//! let mut cart = ActionController::new("add-to-cart:sku1", config, RecordingObserver::new());
//! cart.trigger(Instant::now(), || async { Ok(1) })?;
//! cart.run_until_idle().await?;
//!
//! assert_eq!(
//!     cart.observer().events(),
//!     &[Observed::LoadingStarted, Observed::Succeeded(1), Observed::Settled, Observed::Reset]
//! );
//! ```

use crate::action::ActionId;
use crate::error::{NetworkError, ObserverError};
use crate::observer::ActionObserver;

/// One recorded hook invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Observed<T> {
    LoadingStarted,
    Succeeded(T),
    Failed(NetworkError),
    Settled,
    Reset,
}

impl<T> Observed<T> {
    pub fn hook(&self) -> Hook {
        match self {
            Observed::LoadingStarted => Hook::LoadingStarted,
            Observed::Succeeded(_) => Hook::Succeeded,
            Observed::Failed(_) => Hook::Failed,
            Observed::Settled => Hook::Settled,
            Observed::Reset => Hook::Reset,
        }
    }
}

/// Names an observer hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    LoadingStarted,
    Succeeded,
    Failed,
    Settled,
    Reset,
}

/// Observer that records hook calls for assertions.
#[derive(Debug, Clone)]
pub struct RecordingObserver<T> {
    events: Vec<Observed<T>>,
    ids: Vec<ActionId>,
    fail_on: Option<Hook>,
    panic_on: Option<Hook>,
}

impl<T> Default for RecordingObserver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecordingObserver<T> {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            ids: Vec::new(),
            fail_on: None,
            panic_on: None,
        }
    }

    /// Make `hook` return `ObserverError::Hook` after recording.
    ///
    /// `Settled` cannot fail, so it is ignored here.
    pub fn failing_on(mut self, hook: Hook) -> Self {
        self.fail_on = Some(hook);
        self
    }

    /// Make `hook` panic after recording.
    pub fn panicking_on(mut self, hook: Hook) -> Self {
        self.panic_on = Some(hook);
        self
    }

    pub fn events(&self) -> &[Observed<T>] {
        &self.events
    }

    /// Ids passed to each hook, parallel to [`events`](Self::events).
    pub fn ids(&self) -> &[ActionId] {
        &self.ids
    }

    pub fn count(&self, hook: Hook) -> usize {
        self.events.iter().filter(|e| e.hook() == hook).count()
    }

    /// Take the recorded events, leaving the log empty.
    pub fn drain(&mut self) -> Vec<Observed<T>> {
        self.ids.clear();
        std::mem::take(&mut self.events)
    }

    fn record(&mut self, id: &ActionId, event: Observed<T>) -> Result<(), ObserverError> {
        let hook = event.hook();
        self.events.push(event);
        self.ids.push(id.clone());

        if self.panic_on == Some(hook) {
            panic!("injected panic in {hook:?}");
        }
        if self.fail_on == Some(hook) && hook != Hook::Settled {
            return Err(ObserverError::Hook(format!("injected failure in {hook:?}")));
        }
        Ok(())
    }
}

impl<T: Clone> ActionObserver<T> for RecordingObserver<T> {
    fn loading_started(&mut self, id: &ActionId) -> Result<(), ObserverError> {
        self.record(id, Observed::LoadingStarted)
    }

    fn succeeded(&mut self, id: &ActionId, output: &T) -> Result<(), ObserverError> {
        self.record(id, Observed::Succeeded(output.clone()))
    }

    fn failed(&mut self, id: &ActionId, error: &NetworkError) -> Result<(), ObserverError> {
        self.record(id, Observed::Failed(error.clone()))
    }

    fn settled(&mut self, id: &ActionId) {
        self.events.push(Observed::Settled);
        self.ids.push(id.clone());
    }

    fn reset(&mut self, id: &ActionId) -> Result<(), ObserverError> {
        self.record(id, Observed::Reset)
    }
}

/// Assert that a recorded event matches a pattern.
///
/// # Example
///
/// ```ignore
/// assert_observed!(cart.observer().events(), Observed::Failed(NetworkError::Timeout));
/// ```
#[macro_export]
macro_rules! assert_observed {
    ($events:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $events.iter().any(|e| matches!(e, $pattern $(if $guard)?)),
            "Expected event matching `{}` to be observed, but got: {:?}",
            stringify!($pattern),
            $events
        );
    };
}

/// Assert that no recorded event matches a pattern.
#[macro_export]
macro_rules! assert_not_observed {
    ($events:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$events.iter().any(|e| matches!(e, $pattern $(if $guard)?)),
            "Expected no event matching `{}`, but it was observed: {:?}",
            stringify!($pattern),
            $events
        );
    };
}

/// Pause tokio time so display timeouts can be stepped deterministically.
#[cfg(feature = "testing-time")]
pub fn pause_time() {
    tokio::time::pause();
}

/// Resume real time after [`pause_time`].
#[cfg(feature = "testing-time")]
pub fn resume_time() {
    tokio::time::resume();
}

/// Move paused time forward, firing any reset timers that fall due.
#[cfg(feature = "testing-time")]
pub async fn advance_time(by: std::time::Duration) {
    tokio::time::advance(by).await;
}
