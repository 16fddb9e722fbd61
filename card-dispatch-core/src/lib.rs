//! Core types for card-dispatch
//!
//! Async action buttons (add to cart, wishlist, quick view) look simple but
//! have to survive double clicks, slow networks and failed requests without
//! leaving the UI stuck. This crate provides the pieces:
//!
//! - **ActionController**: lifecycle of one async action. Debounces repeated
//!   triggers, refuses to start while a call is in flight, reports loading,
//!   success and failure to an observer, and resets to idle after a display
//!   timeout.
//! - **ToggleController**: the same lifecycle around a boolean that is shown
//!   optimistically and reverted on failure.
//! - **ActionObserver**: the hooks a presentation layer implements.
//!   [`ChannelObserver`] turns them into store messages.
//! - **EffectStore**: reducer + effects, for wiring controllers into an app.
//! - Collaborators: [`SimulatedBackend`], [`WishlistPrefs`], [`LiveRegion`]
//!   and the [`safe_text`] helpers.
//!
//! # Message flow
//!
//! Intent messages (`AddToCart`) come from input and make the reducer emit an
//! effect. The loop runs the effect by triggering a controller. The controller
//! reports back through its observer, which sends result messages
//! (`DidAddToCart`, `DidFailAddToCart`) into the same store:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(msg) = msg_rx.recv() => {
//!             for effect in store.dispatch(msg).effects {
//!                 run_effect(effect, &mut cart, &backend)?;
//!             }
//!         }
//!         Some(completion) = cart.next_completion() => {
//!             cart.apply(completion)?;
//!         }
//!     }
//! }
//! ```

pub mod action;
pub mod announce;
pub mod backend;
pub mod clock;
pub mod config;
pub mod controller;
pub mod effect;
pub mod error;
pub mod observer;
pub mod prefs;
pub mod safe_text;
pub mod state;
pub mod store;
pub mod tasks;
pub mod testing;
pub mod toggle;

pub use action::{Action, ActionId, ActionRequest};
pub use announce::{Announcement, LiveRegion, Politeness};
pub use backend::{BackendConfig, SimulatedBackend};
pub use clock::{Clock, ManualClock, TokioClock};
pub use config::ControllerConfig;
pub use controller::ActionController;
pub use error::{ConfigError, NetworkError, ObserverError, PrefsError};
pub use observer::{ActionObserver, ChannelObserver, Lifecycle, LifecycleMapper, NoopObserver};
pub use prefs::{JsonFileStore, MemoryStore, PrefStore, WishlistPrefs};
pub use state::{ActionState, Completion, Transition, Trigger};
pub use toggle::ToggleController;

pub use effect::{DispatchResult, EffectReducer, EffectStore, EffectStoreWithMiddleware};
pub use store::{LoggingMiddleware, Middleware, NoopMiddleware};

pub use tasks::{TaskKey, TaskManager};

pub use testing::{Hook, Observed, RecordingObserver};

#[cfg(feature = "testing-time")]
pub use testing::{advance_time, pause_time, resume_time};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionId};
    pub use crate::clock::{Clock, TokioClock};
    pub use crate::config::ControllerConfig;
    pub use crate::controller::ActionController;
    pub use crate::effect::{DispatchResult, EffectStore, EffectStoreWithMiddleware};
    pub use crate::error::{NetworkError, ObserverError};
    pub use crate::observer::{ActionObserver, ChannelObserver, Lifecycle};
    pub use crate::state::{ActionState, Completion, Transition, Trigger};
    pub use crate::store::{LoggingMiddleware, Middleware};
    pub use crate::toggle::ToggleController;
}
