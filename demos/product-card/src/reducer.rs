//! Reducer - (state, message) -> effects
//!
//! All card state changes happen here. Announcements and toasts are timed
//! against `state.now`, which the tick keeps current.

use card_dispatch::DispatchResult;

use crate::action::CardAction;
use crate::effect::Effect;
use crate::state::{Affordance, Button, CardState, ImageStatus, ToastKind};

pub const CART_ADDING: &str = "Adding item to cart...";
pub const CART_ADDED: &str = "Item successfully added to cart";
pub const CART_FAILED: &str = "Error: Could not add item to cart. Please try again.";
pub const WISHLIST_ADDED: &str = "Item added to wishlist";
pub const WISHLIST_REMOVED: &str = "Item removed from wishlist";
pub const WISHLIST_FAILED: &str = "Could not update wishlist. Please try again.";
pub const QUICK_VIEW_OPENED: &str = "Quick view opened for product details";
pub const QUICK_VIEW_FAILED: &str = "Could not open quick view. Please try again.";

pub fn reducer(state: &mut CardState, action: CardAction) -> DispatchResult<Effect> {
    match action {
        // ===== Input =====
        CardAction::FocusNext => {
            state.focus = state.focus.next();
            DispatchResult::changed()
        }
        CardAction::FocusPrev => {
            state.focus = state.focus.prev();
            DispatchResult::changed()
        }
        CardAction::Press(button) => {
            // Busy buttons are disabled; the controller would ignore it anyway
            if state.affordance(button).contains(Affordance::BUSY) {
                return DispatchResult::unchanged();
            }
            let moved = state.focus != button;
            state.focus = button;
            let result = DispatchResult::effect(Effect::Trigger(button));
            if moved {
                result.mark_changed()
            } else {
                result
            }
        }
        CardAction::CloseQuickView => {
            let was_open = state.quick_view_open;
            state.quick_view_open = false;
            if was_open {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }
        // Handled by the main loop
        CardAction::Quit => DispatchResult::unchanged(),

        // ===== Image =====
        CardAction::ImageDidLoad => {
            state.image = ImageStatus::Loaded;
            DispatchResult::changed()
        }
        CardAction::ImageDidFail => {
            state.image = ImageStatus::Failed;
            DispatchResult::changed()
        }

        // ===== Add to cart =====
        CardAction::CartDidStart => {
            state.add_to_cart = Affordance::BUSY;
            state.live.polite(CART_ADDING, state.now);
            DispatchResult::changed()
        }
        CardAction::CartDidAdd(count) => {
            state.cart_count = count;
            state.add_to_cart.insert(Affordance::SUCCESS);
            state.live.polite(CART_ADDED, state.now);
            state.show_toast(CART_ADDED, ToastKind::Success);
            DispatchResult::changed()
        }
        CardAction::CartDidFail(reason) => {
            tracing::debug!(%reason, "add to cart failed");
            state.add_to_cart.insert(Affordance::ERROR);
            state.live.assertive(CART_FAILED, state.now);
            state.show_toast(CART_FAILED, ToastKind::Error);
            DispatchResult::changed()
        }
        CardAction::CartDidSettle => settle(state, Button::AddToCart),
        CardAction::CartDidReset => reset(state, Button::AddToCart),

        // ===== Wishlist =====
        CardAction::WishlistDidStart(target) => {
            // Optimistic: show the target while the call is in flight
            state.wishlisted = target;
            state.wishlist = pressed(target) | Affordance::BUSY;
            DispatchResult::changed()
        }
        CardAction::WishlistDidSet(on) => {
            state.wishlisted = on;
            state.wishlist_confirmed = on;
            state.wishlist = pressed(on) | Affordance::BUSY | Affordance::SUCCESS;
            let text = if on { WISHLIST_ADDED } else { WISHLIST_REMOVED };
            state.live.polite(text, state.now);
            state.show_toast(text, ToastKind::Success);
            DispatchResult::changed_with(Effect::SaveWishlist(on))
        }
        CardAction::WishlistDidFail(reason) => {
            tracing::debug!(%reason, "wishlist update failed");
            state.wishlisted = state.wishlist_confirmed;
            state.wishlist = pressed(state.wishlisted) | Affordance::BUSY | Affordance::ERROR;
            state.live.assertive(WISHLIST_FAILED, state.now);
            state.show_toast(WISHLIST_FAILED, ToastKind::Error);
            DispatchResult::changed()
        }
        CardAction::WishlistDidSettle => settle(state, Button::Wishlist),
        CardAction::WishlistDidReset => reset(state, Button::Wishlist),

        // ===== Quick view =====
        CardAction::QuickViewDidStart => {
            state.quick_view = Affordance::BUSY;
            DispatchResult::changed()
        }
        CardAction::QuickViewDidOpen => {
            state.quick_view_open = true;
            state.quick_view.insert(Affordance::SUCCESS);
            state.live.polite(QUICK_VIEW_OPENED, state.now);
            DispatchResult::changed()
        }
        CardAction::QuickViewDidFail(reason) => {
            tracing::debug!(%reason, "quick view failed");
            state.quick_view.insert(Affordance::ERROR);
            state.live.assertive(QUICK_VIEW_FAILED, state.now);
            state.show_toast(QUICK_VIEW_FAILED, ToastKind::Error);
            DispatchResult::changed()
        }
        CardAction::QuickViewDidSettle => settle(state, Button::QuickView),
        CardAction::QuickViewDidReset => reset(state, Button::QuickView),

        // ===== Tick =====
        CardAction::Tick(now) => {
            state.now = now;
            state.tick_count = state.tick_count.wrapping_add(1);
            let expired_toast = state.toast.as_ref().is_some_and(|t| now >= t.expires_at);
            if expired_toast {
                state.toast = None;
            }
            let expired_live = state.live.expire(now);
            // Only re-render for spinners or something disappearing
            if state.any_busy() || expired_toast || expired_live {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }
    }
}

fn pressed(on: bool) -> Affordance {
    if on {
        Affordance::PRESSED
    } else {
        Affordance::empty()
    }
}

fn settle(state: &mut CardState, button: Button) -> DispatchResult<Effect> {
    state.affordance_mut(button).remove(Affordance::BUSY);
    DispatchResult::changed()
}

fn reset(state: &mut CardState, button: Button) -> DispatchResult<Effect> {
    state
        .affordance_mut(button)
        .remove(Affordance::SUCCESS | Affordance::ERROR);
    DispatchResult::changed()
}
