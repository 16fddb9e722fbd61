//! Terminal input polling

use std::time::Duration;

use crossterm::event::{self, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Terminal event the card reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

impl TermEvent {
    fn from_crossterm(event: event::Event) -> Option<Self> {
        match event {
            // Windows reports releases too; react to presses only
            event::Event::Key(key) if key.kind != KeyEventKind::Release => Some(Self::Key(key)),
            event::Event::Resize(w, h) => Some(Self::Resize(w, h)),
            _ => None,
        }
    }
}

/// Poll crossterm on a background task and forward events to `tx`.
///
/// Stops when `cancel_token` fires or the receiver is dropped.
pub fn spawn_event_poller(
    tx: mpsc::UnboundedSender<TermEvent>,
    poll_timeout: Duration,
    loop_sleep: Duration,
    cancel_token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        const MAX_EVENTS_PER_BATCH: usize = 20;

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    info!("event poller cancelled");
                    // Leave nothing buffered for the shell
                    while event::poll(Duration::ZERO).unwrap_or(false) {
                        let _ = event::read();
                    }
                    break;
                }
                _ = tokio::time::sleep(loop_sleep) => {
                    let mut processed = 0;
                    while processed < MAX_EVENTS_PER_BATCH
                        && event::poll(poll_timeout).unwrap_or(false)
                    {
                        processed += 1;
                        let Ok(raw) = event::read() else { continue };
                        if let Some(event) = TermEvent::from_crossterm(raw) {
                            if tx.send(event).is_err() {
                                debug!("event channel closed, stopping poller");
                                return;
                            }
                        }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    #[test]
    fn test_release_events_are_dropped() {
        let press = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let release = KeyEvent {
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
            ..press
        };

        assert_eq!(
            TermEvent::from_crossterm(event::Event::Key(press)),
            Some(TermEvent::Key(press))
        );
        assert_eq!(TermEvent::from_crossterm(event::Event::Key(release)), None);
        assert_eq!(
            TermEvent::from_crossterm(event::Event::Resize(80, 24)),
            Some(TermEvent::Resize(80, 24))
        );
        assert_eq!(TermEvent::from_crossterm(event::Event::FocusGained), None);
    }
}
