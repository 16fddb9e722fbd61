//! Effects - side effects declared by the reducer
//!
//! Run by [`Controls`](crate::Controls) in the main loop.

use crate::state::Button;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Trigger the button's controller
    Trigger(Button),
    /// Persist confirmed wishlist membership
    SaveWishlist(bool),
}
