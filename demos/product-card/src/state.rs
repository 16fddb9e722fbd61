//! Card state - single source of truth for rendering
//!
//! Components receive `&CardState` as props; only the reducer mutates it.
//! Every product string is sanitized on the way in.

use std::time::Duration;

use bitflags::bitflags;
use card_dispatch::safe_text;
use card_dispatch::LiveRegion;
use tokio::time::Instant;

/// Interval of the tick that drives spinners and expiry.
pub const TICK_MS: u64 = 100;

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_millis(4000);

/// Alt text shown when the product image cannot be loaded.
pub const IMAGE_FALLBACK_ALT: &str = "Product image unavailable";

#[derive(Clone, Debug, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub image_alt: String,
}

impl Product {
    /// Build a product from untrusted input.
    pub fn new(id: &str, name: &str, price: &str, image_alt: &str) -> Self {
        Self {
            id: safe_text::strip_tags(id),
            name: safe_text::strip_tags(name),
            price: safe_text::sanitize_price(price),
            image_alt: safe_text::strip_tags(image_alt),
        }
    }

    pub fn price_label(&self) -> String {
        format!("${:.2}", self.price)
    }
}

impl Default for Product {
    fn default() -> Self {
        Self::new(
            "sku123",
            "Wireless Headphones",
            "79.99",
            "Wireless headphones in matte black",
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ImageStatus {
    #[default]
    Loading,
    Loaded,
    Failed,
}

/// The card's three action buttons, in focus order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Button {
    #[default]
    AddToCart,
    Wishlist,
    QuickView,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::AddToCart, Button::Wishlist, Button::QuickView];

    pub fn next(self) -> Self {
        match self {
            Button::AddToCart => Button::Wishlist,
            Button::Wishlist => Button::QuickView,
            Button::QuickView => Button::AddToCart,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Button::AddToCart => Button::QuickView,
            Button::Wishlist => Button::AddToCart,
            Button::QuickView => Button::Wishlist,
        }
    }

    /// Keyboard shortcut shown in the help bar.
    pub fn shortcut(self) -> char {
        match self {
            Button::AddToCart => 'a',
            Button::Wishlist => 'w',
            Button::QuickView => 'v',
        }
    }
}

bitflags! {
    /// Visual state of one button.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct Affordance: u8 {
        /// Call in flight; the button is disabled.
        const BUSY = 1 << 0;
        /// Showing a success result.
        const SUCCESS = 1 << 1;
        /// Showing a failure result.
        const ERROR = 1 << 2;
        /// Toggle is on (wishlist only).
        const PRESSED = 1 << 3;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub text: String,
    pub kind: ToastKind,
    pub expires_at: Instant,
}

#[derive(Clone, Debug)]
pub struct CardState {
    pub product: Product,
    pub image: ImageStatus,
    pub focus: Button,
    pub add_to_cart: Affordance,
    pub wishlist: Affordance,
    pub quick_view: Affordance,
    pub cart_count: u32,
    /// Shown membership, including an in-flight target.
    pub wishlisted: bool,
    /// Membership the backend last confirmed; restored on failure.
    pub wishlist_confirmed: bool,
    pub quick_view_open: bool,
    pub live: LiveRegion,
    pub toast: Option<Toast>,
    /// Time of the latest tick; announcements and toasts expire against it.
    pub now: Instant,
    pub tick_count: u32,
}

impl CardState {
    pub fn new(product: Product, wishlisted: bool, now: Instant) -> Self {
        let wishlist = if wishlisted {
            Affordance::PRESSED
        } else {
            Affordance::empty()
        };
        Self {
            product,
            image: ImageStatus::default(),
            focus: Button::default(),
            add_to_cart: Affordance::empty(),
            wishlist,
            quick_view: Affordance::empty(),
            cart_count: 0,
            wishlisted,
            wishlist_confirmed: wishlisted,
            quick_view_open: false,
            live: LiveRegion::default(),
            toast: None,
            now,
            tick_count: 0,
        }
    }

    pub fn affordance(&self, button: Button) -> Affordance {
        match button {
            Button::AddToCart => self.add_to_cart,
            Button::Wishlist => self.wishlist,
            Button::QuickView => self.quick_view,
        }
    }

    pub fn affordance_mut(&mut self, button: Button) -> &mut Affordance {
        match button {
            Button::AddToCart => &mut self.add_to_cart,
            Button::Wishlist => &mut self.wishlist,
            Button::QuickView => &mut self.quick_view,
        }
    }

    pub fn any_busy(&self) -> bool {
        Button::ALL
            .iter()
            .any(|b| self.affordance(*b).contains(Affordance::BUSY))
    }

    pub fn button_label(&self, button: Button) -> &'static str {
        let flags = self.affordance(button);
        match button {
            Button::AddToCart if flags.contains(Affordance::BUSY) => "Adding...",
            Button::AddToCart if flags.contains(Affordance::SUCCESS) => "Added!",
            Button::AddToCart if flags.contains(Affordance::ERROR) => "Try again",
            Button::AddToCart => "Add to Cart",
            Button::Wishlist if flags.contains(Affordance::BUSY) => "Saving...",
            Button::Wishlist if self.wishlisted => "♥ Wishlisted",
            Button::Wishlist => "♡ Wishlist",
            Button::QuickView if flags.contains(Affordance::BUSY) => "Loading...",
            Button::QuickView => "Quick View",
        }
    }

    /// Alt text to show in place of the image.
    pub fn image_alt(&self) -> &str {
        match self.image {
            ImageStatus::Failed => IMAGE_FALLBACK_ALT,
            _ => &self.product.image_alt,
        }
    }

    /// The current live-region text, if not expired.
    pub fn announcement(&self) -> Option<&str> {
        self.live.current(self.now).map(|a| a.text.as_str())
    }

    pub fn visible_toast(&self) -> Option<&Toast> {
        self.toast.as_ref().filter(|t| self.now < t.expires_at)
    }

    pub fn show_toast(&mut self, text: &str, kind: ToastKind) {
        self.toast = Some(Toast {
            text: safe_text::strip_tags(text),
            kind,
            expires_at: self.now + TOAST_DURATION,
        });
    }
}

impl Default for CardState {
    fn default() -> Self {
        Self::new(Product::default(), false, Instant::now())
    }
}
