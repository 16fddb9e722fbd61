//! The product card: image, details, three action buttons and status lines
//!
//! Focus and busy state come in through props; keys come back out as
//! [`CardAction`]s.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{ActionButton, ActionButtonProps, Component, StatusBar, StatusBarProps};
use crate::action::CardAction;
use crate::input::TermEvent;
use crate::state::{Button, CardState, ImageStatus};

pub const SPINNERS: [&str; 4] = ["◐", "◓", "◑", "◒"];

pub struct ProductCardProps<'a> {
    pub state: &'a CardState,
}

#[derive(Default)]
pub struct ProductCard;

impl ProductCard {
    fn render_image(frame: &mut Frame, area: Rect, state: &CardState) {
        let (text, style) = match state.image {
            ImageStatus::Loading => (
                format!("{} Loading image...", SPINNERS[spinner_frame(state)]),
                Style::default().fg(Color::DarkGray),
            ),
            ImageStatus::Loaded => (
                format!("🖼  {}", state.image_alt()),
                Style::default().fg(Color::White),
            ),
            ImageStatus::Failed => (
                state.image_alt().to_string(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        };
        let image = Paragraph::new(text)
            .style(style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Rgb(60, 60, 80))),
            );
        frame.render_widget(image, area);
    }

    fn render_details(frame: &mut Frame, area: Rect, state: &CardState) {
        let lines = vec![
            Line::from(Span::styled(
                state.product.name.as_str(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ))
            .centered(),
            Line::from(Span::styled(
                state.product.price_label(),
                Style::default().fg(Color::Yellow),
            ))
            .centered(),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_quick_view(frame: &mut Frame, area: Rect, state: &CardState) {
        let popup = centered(area, 40, 7);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Quick View ")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(Color::Cyan));
        let body = vec![
            Line::from(state.product.name.as_str()).centered(),
            Line::from(format!(
                "{}  ·  id {}",
                state.product.price_label(),
                state.product.id
            ))
            .centered(),
            Line::from(""),
            Line::from(Span::styled(
                "esc to close",
                Style::default().fg(Color::DarkGray),
            ))
            .centered(),
        ];
        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(body).block(block), popup);
    }
}

impl Component<CardAction> for ProductCard {
    type Props<'a> = ProductCardProps<'a>;

    // `where 'a: 'a` makes 'a early-bound, matching the trait's RPITIT capture.
    #[allow(refining_impl_trait)]
    fn handle_event<'a>(&mut self, event: &TermEvent, props: Self::Props<'a>) -> Vec<CardAction>
    where
        'a: 'a,
    {
        let TermEvent::Key(key) = event else {
            return vec![];
        };
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => vec![CardAction::Quit],
                _ => vec![],
            };
        }

        let state = props.state;
        match key.code {
            KeyCode::Tab | KeyCode::Right | KeyCode::Down => vec![CardAction::FocusNext],
            KeyCode::BackTab | KeyCode::Left | KeyCode::Up => vec![CardAction::FocusPrev],
            KeyCode::Enter | KeyCode::Char(' ') => vec![CardAction::Press(state.focus)],
            KeyCode::Char(c) => match Button::ALL.iter().find(|b| b.shortcut() == c) {
                Some(button) => vec![CardAction::Press(*button)],
                None if c == 'q' => vec![CardAction::Quit],
                None => vec![],
            },
            KeyCode::Esc if state.quick_view_open => vec![CardAction::CloseQuickView],
            KeyCode::Esc => vec![CardAction::Quit],
            _ => vec![],
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;

        let title = format!(" Product  ·  cart: {} ", state.cart_count);
        let outer = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(80, 80, 100)))
            .title(title)
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .title_alignment(Alignment::Center);
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let rows = Layout::vertical([
            Constraint::Min(3),                       // Image
            Constraint::Length(2),                    // Name + price
            Constraint::Length(ActionButton::HEIGHT), // Buttons
            Constraint::Length(StatusBar::HEIGHT),    // Toast, live region, help
        ])
        .split(inner);

        Self::render_image(frame, rows[0], state);
        Self::render_details(frame, rows[1], state);

        let columns = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(rows[2]);
        let spinner = SPINNERS[spinner_frame(state)];
        let mut button = ActionButton;
        for (slot, kind) in columns.iter().zip(Button::ALL) {
            button.render(
                frame,
                *slot,
                ActionButtonProps {
                    label: state.button_label(kind),
                    affordance: state.affordance(kind),
                    focused: state.focus == kind,
                    spinner,
                },
            );
        }

        let mut status = StatusBar;
        status.render(
            frame,
            rows[3],
            StatusBarProps {
                toast: state.visible_toast(),
                announcement: state.announcement(),
            },
        );

        if state.quick_view_open {
            Self::render_quick_view(frame, area, state);
        }
    }
}

fn spinner_frame(state: &CardState) -> usize {
    (state.tick_count as usize / 2) % SPINNERS.len()
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
