//! Test helpers: render components into a `TestBackend` and build key events.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::{Frame, Terminal};

use crate::input::TermEvent;

/// Renders into an in-memory terminal of fixed size.
pub struct RenderHarness {
    terminal: Terminal<TestBackend>,
}

impl RenderHarness {
    pub fn new(width: u16, height: u16) -> Self {
        let terminal = Terminal::new(TestBackend::new(width, height))
            .unwrap_or_else(|e| panic!("test terminal: {e}"));
        Self { terminal }
    }

    /// Draw one frame and return the buffer as plain text, one line per row.
    pub fn render_to_string_plain(&mut self, draw: impl FnOnce(&mut Frame)) -> String {
        self.terminal
            .draw(draw)
            .unwrap_or_else(|e| panic!("test draw: {e}"));
        buffer_to_string_plain(self.terminal.backend().buffer())
    }
}

pub fn buffer_to_string_plain(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

pub fn key_event(code: KeyCode, modifiers: KeyModifiers) -> TermEvent {
    TermEvent::Key(KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    })
}

pub fn key(code: KeyCode) -> TermEvent {
    key_event(code, KeyModifiers::NONE)
}

pub fn char_key(c: char) -> TermEvent {
    key(KeyCode::Char(c))
}
