//! Dispatch middleware

use crate::Action;

/// Hooks around every dispatch to a store
///
/// Middleware sees the message and whether the state changed, never the
/// effects. Use it for logging, metrics or persistence that cuts across
/// reducers.
pub trait Middleware<A: Action> {
    /// Called before the reducer runs
    fn before(&mut self, action: &A);

    /// Called after the reducer ran
    fn after(&mut self, action: &A, state_changed: bool);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<A: Action> Middleware<A> for NoopMiddleware {
    fn before(&mut self, _action: &A) {}
    fn after(&mut self, _action: &A, _state_changed: bool) {}
}

/// Logs dispatched messages at debug level
#[derive(Debug, Clone)]
pub struct LoggingMiddleware {
    pub log_before: bool,
    pub log_after: bool,
    /// Message names that are never logged (e.g. render ticks).
    pub skip: Vec<&'static str>,
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingMiddleware {
    /// Log after dispatch only
    pub fn new() -> Self {
        Self {
            log_before: false,
            log_after: true,
            skip: Vec::new(),
        }
    }

    /// Log before and after dispatch
    pub fn verbose() -> Self {
        Self {
            log_before: true,
            ..Self::new()
        }
    }

    /// Never log messages named `name`
    pub fn skipping(mut self, name: &'static str) -> Self {
        self.skip.push(name);
        self
    }

    fn logs(&self, name: &str) -> bool {
        !self.skip.iter().any(|skipped| *skipped == name)
    }
}

impl<A: Action> Middleware<A> for LoggingMiddleware {
    fn before(&mut self, action: &A) {
        if self.log_before && self.logs(action.name()) {
            tracing::debug!(action = %action.name(), "dispatching");
        }
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        if self.log_after && self.logs(action.name()) {
            tracing::debug!(action = %action.name(), state_changed, "dispatched");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    enum CardMsg {
        Press,
        Tick,
    }

    impl Action for CardMsg {
        fn name(&self) -> &'static str {
            match self {
                CardMsg::Press => "Press",
                CardMsg::Tick => "Tick",
            }
        }
    }

    #[test]
    fn test_logging_middleware_presets() {
        let quiet = LoggingMiddleware::new();
        assert!(!quiet.log_before && quiet.log_after);

        let verbose = LoggingMiddleware::verbose();
        assert!(verbose.log_before && verbose.log_after);
    }

    #[test]
    fn test_logging_middleware_skips_names() {
        let mut logger = LoggingMiddleware::verbose().skipping("Tick");
        assert!(logger.logs(CardMsg::Press.name()));
        assert!(!logger.logs(CardMsg::Tick.name()));

        // No subscriber installed; only checks the hooks run
        logger.before(&CardMsg::Press);
        logger.after(&CardMsg::Tick, true);
    }
}
