//! Screen-reader live region
//!
//! Holds the current announcement for a fixed time, the way an
//! `aria-live` element is filled and then emptied.

use std::time::Duration;

use tokio::time::Instant;

use crate::safe_text;

/// How long an announcement stays in the region.
pub const DEFAULT_HOLD: Duration = Duration::from_millis(3000);

/// `aria-live` politeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Politeness {
    /// Read when the user is idle.
    #[default]
    Polite,
    /// Interrupts whatever is being read.
    Assertive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub text: String,
    pub politeness: Politeness,
    pub expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct LiveRegion {
    hold: Duration,
    current: Option<Announcement>,
}

impl Default for LiveRegion {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD)
    }
}

impl LiveRegion {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            current: None,
        }
    }

    /// Replace the current announcement. Empty text is ignored.
    ///
    /// The text is sanitized before it is stored.
    pub fn announce(&mut self, text: &str, politeness: Politeness, now: Instant) {
        let text = safe_text::sanitize(text);
        if text.is_empty() {
            return;
        }
        tracing::debug!(%text, ?politeness, "announce");
        self.current = Some(Announcement {
            text,
            politeness,
            expires_at: now + self.hold,
        });
    }

    pub fn polite(&mut self, text: &str, now: Instant) {
        self.announce(text, Politeness::Polite, now);
    }

    pub fn assertive(&mut self, text: &str, now: Instant) {
        self.announce(text, Politeness::Assertive, now);
    }

    /// The announcement still held at `now`, if any.
    pub fn current(&self, now: Instant) -> Option<&Announcement> {
        self.current.as_ref().filter(|a| now < a.expires_at)
    }

    /// Drop an expired announcement. Returns true if one was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        match &self.current {
            Some(a) if now >= a.expires_at => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_announcement_expires() {
        let now = Instant::now();
        let mut region = LiveRegion::default();

        region.polite("Adding item to cart...", now);
        assert_eq!(
            region.current(now).map(|a| a.text.as_str()),
            Some("Adding item to cart...")
        );
        assert!(region.current(now + Duration::from_millis(2999)).is_some());
        assert!(region.current(now + DEFAULT_HOLD).is_none());

        assert!(!region.expire(now + Duration::from_millis(10)));
        assert!(region.expire(now + DEFAULT_HOLD));
        assert!(!region.expire(now + DEFAULT_HOLD));
    }

    #[test]
    fn test_newer_announcement_replaces_older() {
        let now = Instant::now();
        let mut region = LiveRegion::default();

        region.polite("Adding item to cart...", now);
        region.assertive("Error: Could not add item to cart.", now);

        let current = region.current(now).unwrap();
        assert_eq!(current.politeness, Politeness::Assertive);
        assert!(current.text.starts_with("Error"));
    }

    #[test]
    fn test_text_is_sanitized_and_empty_ignored() {
        let now = Instant::now();
        let mut region = LiveRegion::new(Duration::from_secs(1));

        region.polite("<b>Saved</b>", now);
        assert_eq!(region.current(now).unwrap().text, "&lt;b&gt;Saved&lt;/b&gt;");

        region.polite("   ", now);
        assert_eq!(region.current(now).unwrap().text, "&lt;b&gt;Saved&lt;/b&gt;");

        region.clear();
        assert!(region.current(now).is_none());
    }
}
