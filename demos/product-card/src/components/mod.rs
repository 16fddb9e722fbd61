pub mod action_button;
pub mod product_card;
pub mod status_bar;

use ratatui::{layout::Rect, Frame};

use crate::input::TermEvent;

pub use action_button::{ActionButton, ActionButtonProps};
pub use product_card::{ProductCard, ProductCardProps, SPINNERS};
pub use status_bar::{StatusBar, StatusBarProps};

/// A piece of UI that renders from props and maps input to messages
///
/// Props are read-only views of state; components never mutate state
/// themselves.
pub trait Component<A> {
    type Props<'a>;

    /// Map an input event to messages. Render-only components keep the default.
    #[allow(unused_variables)]
    fn handle_event(
        &mut self,
        event: &TermEvent,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        None::<A>
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>);
}
