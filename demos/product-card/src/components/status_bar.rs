use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::Component;
use crate::action::CardAction;
use crate::state::{Button, Toast, ToastKind};

/// Toast, screen-reader announcement and key help, one line each.
pub struct StatusBar;

pub struct StatusBarProps<'a> {
    pub toast: Option<&'a Toast>,
    pub announcement: Option<&'a str>,
}

impl StatusBar {
    pub const HEIGHT: u16 = 3;
}

impl Component<CardAction> for StatusBar {
    type Props<'a> = StatusBarProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let rows = Layout::vertical([Constraint::Length(1); 3]).split(area);

        if let Some(toast) = props.toast {
            let (icon, color) = match toast.kind {
                ToastKind::Success => ("✓", Color::Green),
                ToastKind::Error => ("✗", Color::Red),
                ToastKind::Info => ("i", Color::Cyan),
            };
            let line = Line::from(vec![
                Span::styled(format!("{icon} "), Style::default().fg(color)),
                Span::styled(toast.text.as_str(), Style::default().fg(color)),
            ])
            .centered();
            frame.render_widget(Paragraph::new(line), rows[0]);
        }

        if let Some(text) = props.announcement {
            let line = Line::from(vec![
                Span::styled("live: ", Style::default().fg(Color::DarkGray)),
                Span::styled(text, Style::default().fg(Color::Gray)),
            ])
            .centered();
            frame.render_widget(Paragraph::new(line), rows[1]);
        }

        let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let hint = Style::default().fg(Color::DarkGray);
        let mut spans = vec![
            Span::styled("tab", key),
            Span::styled(" focus  ", hint),
            Span::styled("enter", key),
            Span::styled(" press  ", hint),
        ];
        for (button, name) in [
            (Button::AddToCart, " cart  "),
            (Button::Wishlist, " wishlist  "),
            (Button::QuickView, " view  "),
        ] {
            spans.push(Span::styled(button.shortcut().to_string(), key));
            spans.push(Span::styled(name, hint));
        }
        spans.push(Span::styled("q", key));
        spans.push(Span::styled(" quit", hint));
        frame.render_widget(Paragraph::new(Line::from(spans).centered()), rows[2]);
    }
}
