pub mod action;
pub mod components;
pub mod config;
pub mod controls;
pub mod effect;
pub mod input;
pub mod reducer;
pub mod state;
pub mod testing;

pub use action::CardAction;
pub use components::ProductCard;
pub use config::CardConfig;
pub use controls::Controls;
pub use effect::Effect;
pub use reducer::reducer;
pub use state::CardState;
