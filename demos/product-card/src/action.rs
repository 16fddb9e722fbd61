//! Card messages
//!
//! Intent messages come from input; `*Did*` messages carry controller
//! lifecycle events back in through a `ChannelObserver`.

use card_dispatch::{ActionId, Lifecycle};
use tokio::time::Instant;

use crate::state::Button;

#[derive(Clone, Debug, PartialEq)]
pub enum CardAction {
    // ===== Input =====
    FocusNext,
    FocusPrev,
    /// Activate a button (click, Enter/Space on focus, or shortcut)
    Press(Button),
    CloseQuickView,
    Quit,

    // ===== Image =====
    ImageDidLoad,
    ImageDidFail,

    // ===== Add to cart =====
    CartDidStart,
    /// New cart item count
    CartDidAdd(u32),
    CartDidFail(String),
    CartDidSettle,
    CartDidReset,

    // ===== Wishlist =====
    /// Optimistic membership shown while the call is in flight
    WishlistDidStart(bool),
    /// Membership confirmed by the backend
    WishlistDidSet(bool),
    WishlistDidFail(String),
    WishlistDidSettle,
    WishlistDidReset,

    // ===== Quick view =====
    QuickViewDidStart,
    QuickViewDidOpen,
    QuickViewDidFail(String),
    QuickViewDidSettle,
    QuickViewDidReset,

    /// Periodic tick for spinners and expiry
    Tick(Instant),
}

impl card_dispatch::Action for CardAction {
    fn name(&self) -> &'static str {
        match self {
            CardAction::FocusNext => "FocusNext",
            CardAction::FocusPrev => "FocusPrev",
            CardAction::Press(_) => "Press",
            CardAction::CloseQuickView => "CloseQuickView",
            CardAction::Quit => "Quit",
            CardAction::ImageDidLoad => "ImageDidLoad",
            CardAction::ImageDidFail => "ImageDidFail",
            CardAction::CartDidStart => "CartDidStart",
            CardAction::CartDidAdd(_) => "CartDidAdd",
            CardAction::CartDidFail(_) => "CartDidFail",
            CardAction::CartDidSettle => "CartDidSettle",
            CardAction::CartDidReset => "CartDidReset",
            CardAction::WishlistDidStart(_) => "WishlistDidStart",
            CardAction::WishlistDidSet(_) => "WishlistDidSet",
            CardAction::WishlistDidFail(_) => "WishlistDidFail",
            CardAction::WishlistDidSettle => "WishlistDidSettle",
            CardAction::WishlistDidReset => "WishlistDidReset",
            CardAction::QuickViewDidStart => "QuickViewDidStart",
            CardAction::QuickViewDidOpen => "QuickViewDidOpen",
            CardAction::QuickViewDidFail(_) => "QuickViewDidFail",
            CardAction::QuickViewDidSettle => "QuickViewDidSettle",
            CardAction::QuickViewDidReset => "QuickViewDidReset",
            CardAction::Tick(_) => "Tick",
        }
    }
}

pub fn map_cart(_id: &ActionId, event: Lifecycle<'_, u32>) -> Option<CardAction> {
    Some(match event {
        Lifecycle::LoadingStarted => CardAction::CartDidStart,
        Lifecycle::Succeeded(count) => CardAction::CartDidAdd(*count),
        Lifecycle::Failed(e) => CardAction::CartDidFail(e.to_string()),
        Lifecycle::Settled => CardAction::CartDidSettle,
        Lifecycle::Reset => CardAction::CartDidReset,
    })
}

/// `WishlistDidStart` needs the optimistic target, which the lifecycle event
/// does not carry; `Controls` sends it after a started toggle.
pub fn map_wishlist(_id: &ActionId, event: Lifecycle<'_, bool>) -> Option<CardAction> {
    match event {
        Lifecycle::LoadingStarted => None,
        Lifecycle::Succeeded(on) => Some(CardAction::WishlistDidSet(*on)),
        Lifecycle::Failed(e) => Some(CardAction::WishlistDidFail(e.to_string())),
        Lifecycle::Settled => Some(CardAction::WishlistDidSettle),
        Lifecycle::Reset => Some(CardAction::WishlistDidReset),
    }
}

pub fn map_quick_view(_id: &ActionId, event: Lifecycle<'_, ()>) -> Option<CardAction> {
    Some(match event {
        Lifecycle::LoadingStarted => CardAction::QuickViewDidStart,
        Lifecycle::Succeeded(()) => CardAction::QuickViewDidOpen,
        Lifecycle::Failed(e) => CardAction::QuickViewDidFail(e.to_string()),
        Lifecycle::Settled => CardAction::QuickViewDidSettle,
        Lifecycle::Reset => CardAction::QuickViewDidReset,
    })
}
