//! Diagnostic configuration for a runtime [`crate::runtime::Context`].
//!
//! The core never installs a logger. A [`Context`](crate::runtime::Context) forwards diagnostics
//! to the `log` facade, and this configuration decides which target they are tagged with and
//! which levels get through.

use log::LevelFilter;

/// Routing configuration for diagnostics emitted through a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextConfig {
    /// The `log` target attached to every record
    pub log_target: &'static str,

    /// Records above this level are dropped before reaching the `log` facade
    pub max_level: LevelFilter,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            log_target: "machkit",
            max_level: LevelFilter::Info,
        }
    }
}

impl ContextConfig {
    /// Drops every record.
    #[must_use]
    pub fn quiet() -> Self {
        Self {
            max_level: LevelFilter::Off,
            ..Self::default()
        }
    }

    /// Forwards everything, down to trace records.
    #[must_use]
    pub fn verbose() -> Self {
        Self {
            max_level: LevelFilter::Trace,
            ..Self::default()
        }
    }

    /// Same configuration, tagged with a different target.
    #[must_use]
    pub fn with_target(self, log_target: &'static str) -> Self {
        Self { log_target, ..self }
    }
}
