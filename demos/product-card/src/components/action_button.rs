use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use super::Component;
use crate::action::CardAction;
use crate::state::Affordance;

/// One card button. Render-only; the card handles its input.
pub struct ActionButton;

pub struct ActionButtonProps<'a> {
    pub label: &'a str,
    pub affordance: Affordance,
    pub focused: bool,
    /// Spinner frame shown while busy
    pub spinner: &'a str,
}

impl ActionButton {
    pub const HEIGHT: u16 = 3;

    fn color(affordance: Affordance) -> Color {
        if affordance.contains(Affordance::BUSY) {
            Color::DarkGray
        } else if affordance.contains(Affordance::ERROR) {
            Color::Red
        } else if affordance.contains(Affordance::SUCCESS) {
            Color::Green
        } else if affordance.contains(Affordance::PRESSED) {
            Color::Magenta
        } else {
            Color::White
        }
    }
}

impl Component<CardAction> for ActionButton {
    type Props<'a> = ActionButtonProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let color = Self::color(props.affordance);
        let (border_type, border_style) = if props.focused {
            (
                BorderType::Thick,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )
        } else {
            (BorderType::Rounded, Style::default().fg(Color::Rgb(80, 80, 100)))
        };

        let text = if props.affordance.contains(Affordance::BUSY) {
            format!("{} {}", props.spinner, props.label)
        } else {
            props.label.to_string()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(border_style);
        let label = Paragraph::new(Line::from(text))
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(label, area);
    }
}
