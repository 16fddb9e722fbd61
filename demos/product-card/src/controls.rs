//! The card's three controllers and the effect runner that drives them.

use card_dispatch::{
    ActionController, ActionId, ChannelObserver, Clock, ObserverError, PrefStore,
    SimulatedBackend, TaskManager, TokioClock, ToggleController, Trigger, WishlistPrefs,
};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::action::{map_cart, map_quick_view, map_wishlist, CardAction};
use crate::config::CardConfig;
use crate::effect::Effect;
use crate::state::Button;

type Observer<T> = ChannelObserver<T, CardAction>;

pub struct Controls<S, C = TokioClock> {
    product_id: String,
    clock: C,
    tx: mpsc::UnboundedSender<CardAction>,
    backend: SimulatedBackend,
    prefs: WishlistPrefs<S>,
    cart: ActionController<u32, Observer<u32>>,
    wishlist: ToggleController<Observer<bool>>,
    quick_view: ActionController<(), Observer<()>>,
    tasks: TaskManager<CardAction>,
}

impl<S: PrefStore, C: Clock> Controls<S, C> {
    /// Build controllers for the configured product. Lifecycle messages and
    /// the image load result are sent to `tx`; presses are timed by `clock`.
    pub fn new(
        config: &CardConfig,
        backend: SimulatedBackend,
        prefs: WishlistPrefs<S>,
        clock: C,
        tx: mpsc::UnboundedSender<CardAction>,
    ) -> Self {
        let product_id = config.product.id.clone();
        let wishlisted = prefs.contains(&product_id);
        Self {
            cart: ActionController::new(
                ActionId::scoped("add-to-cart", &product_id),
                config.add_to_cart,
                ChannelObserver::new(tx.clone(), map_cart),
            ),
            wishlist: ToggleController::with_initial(
                ActionId::scoped("wishlist", &product_id),
                config.wishlist,
                ChannelObserver::new(tx.clone(), map_wishlist),
                wishlisted,
            ),
            quick_view: ActionController::new(
                ActionId::scoped("quick-view", &product_id),
                config.quick_view,
                ChannelObserver::new(tx.clone(), map_quick_view),
            ),
            tasks: TaskManager::new(tx.clone()),
            tx,
            clock,
            product_id,
            backend,
            prefs,
        }
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn wishlisted(&self) -> bool {
        self.wishlist.value()
    }

    pub fn prefs(&self) -> &WishlistPrefs<S> {
        &self.prefs
    }

    pub fn cart(&self) -> &ActionController<u32, Observer<u32>> {
        &self.cart
    }

    pub fn wishlist(&self) -> &ToggleController<Observer<bool>> {
        &self.wishlist
    }

    pub fn quick_view(&self) -> &ActionController<(), Observer<()>> {
        &self.quick_view
    }

    /// Simulate loading the product image; reports `ImageDidLoad` or
    /// `ImageDidFail` after `delay`.
    pub fn load_image(&mut self, image: Option<&str>, delay: std::time::Duration) {
        let loaded = image.is_some_and(|src| !src.trim().is_empty());
        self.tasks.spawn_after("image", delay, async move {
            if loaded {
                CardAction::ImageDidLoad
            } else {
                CardAction::ImageDidFail
            }
        });
    }

    /// Run one effect from the reducer.
    ///
    /// Returns how the controller took a trigger, or `None` for effects that
    /// trigger nothing.
    pub fn run(&mut self, effect: Effect) -> Result<Option<Trigger>, ObserverError> {
        let now = self.clock.now();
        let backend = self.backend.clone();
        let id = self.product_id.clone();
        let trigger = match effect {
            Effect::Trigger(Button::AddToCart) => {
                self.cart.trigger(now, move || backend.add_to_cart(&id))
            }
            Effect::Trigger(Button::Wishlist) => self.toggle_wishlist(now, backend, id),
            Effect::Trigger(Button::QuickView) => {
                self.quick_view.trigger(now, move || backend.quick_view(&id))
            }
            Effect::SaveWishlist(on) => {
                // A failed write only loses persistence; the UI stays correct
                match self.prefs.set(&self.product_id, on) {
                    Ok(()) => info!(product = %self.product_id, wishlisted = on, "wishlist saved"),
                    Err(e) => warn!(error = %e, "could not save wishlist"),
                }
                return Ok(None);
            }
        };
        trigger.map(Some)
    }

    /// The wishlist start message carries the controller's optimistic value,
    /// so it is sent here rather than through the observer.
    fn toggle_wishlist(
        &mut self,
        now: Instant,
        backend: SimulatedBackend,
        id: String,
    ) -> Result<Trigger, ObserverError> {
        let trigger = self
            .wishlist
            .toggle(now, move |on| backend.set_wishlisted(&id, on))?;
        if trigger == Trigger::Started {
            self.tx
                .send(CardAction::WishlistDidStart(self.wishlist.value()))
                .map_err(|_| ObserverError::ChannelClosed)?;
        }
        Ok(trigger)
    }

    /// Wait for the next controller completion and apply it.
    ///
    /// Cancel safe: nothing is lost if another branch of a `select!` wins.
    pub async fn settle_next(&mut self) -> Result<(), ObserverError> {
        tokio::select! {
            Some(completion) = self.cart.next_completion() => {
                self.cart.apply(completion)?;
            }
            Some(completion) = self.wishlist.next_completion() => {
                self.wishlist.apply(completion)?;
            }
            Some(completion) = self.quick_view.next_completion() => {
                self.quick_view.apply(completion)?;
            }
        }
        Ok(())
    }
}

impl<S, C> std::fmt::Debug for Controls<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controls")
            .field("product_id", &self.product_id)
            .field("cart", &self.cart)
            .field("wishlist", &self.wishlist)
            .field("quick_view", &self.quick_view)
            .finish_non_exhaustive()
    }
}
