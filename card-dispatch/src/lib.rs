//! card-dispatch: async action buttons that don't get stuck
//!
//! Controllers for the buttons on a product card. Each one debounces rapid
//! input, runs at most one call at a time, reports its lifecycle to an
//! observer and resets itself after showing the result.
//!
//! # Quick Start
//!
//! ```ignore
//! use card_dispatch::prelude::*;
//!
//! let backend = SimulatedBackend::default();
//! let mut cart = ActionController::new(
//!     ActionId::scoped("add-to-cart", "sku123"),
//!     ControllerConfig::add_to_cart(),
//!     NoopObserver,
//! );
//!
//! let b = backend.clone();
//! cart.trigger(TokioClock.now(), move || b.add_to_cart("sku123"))?;
//! cart.run_until_idle().await?;
//! ```
//!
//! See `demos/product-card` for a terminal product card wiring three
//! controllers into an [`EffectStore`].

// Re-export everything from core
pub use card_dispatch_core::*;

/// Prelude for convenient imports
pub mod prelude {
    // Controllers
    pub use card_dispatch_core::{
        ActionController, ActionState, Completion, ControllerConfig, ToggleController,
        Transition, Trigger,
    };

    // Observers
    pub use card_dispatch_core::{
        ActionObserver, ChannelObserver, Lifecycle, NoopObserver, ObserverError,
    };

    // Identity and time
    pub use card_dispatch_core::{Action, ActionId, Clock, TokioClock};

    // Store
    pub use card_dispatch_core::{
        DispatchResult, EffectStore, EffectStoreWithMiddleware, LoggingMiddleware, Middleware,
    };

    // Collaborators
    pub use card_dispatch_core::{
        LiveRegion, NetworkError, PrefStore, SimulatedBackend, WishlistPrefs,
    };
}
