use std::fmt;

use log::Level;

use crate::config::ContextConfig;

/// The diagnostic channel an entity is attached to.
///
/// Parsers build one context per loaded input and hand it out through the `get_context` slot of
/// their descriptors, so generic code holding any entity can report problems against the input
/// it came from.
///
/// # Examples
///
/// ```rust
/// use machkit::{config::ContextConfig, runtime::Context};
///
/// let context = Context::new("libSystem.B.dylib", ContextConfig::default());
/// context.log(log::Level::Warn, format_args!("truncated symbol table at {:#x}", 0x4000));
/// assert!(!context.passes(log::Level::Debug));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    name: String,
    config: ContextConfig,
}

impl Context {
    /// Creates a context for the input called `name`.
    pub fn new(name: impl Into<String>, config: ContextConfig) -> Self {
        Context {
            name: name.into(),
            config,
        }
    }

    /// The name of the input this context belongs to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The routing configuration.
    #[must_use]
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Returns `true` if records at `level` pass the configured filter.
    #[must_use]
    pub fn passes(&self, level: Level) -> bool {
        level <= self.config.max_level
    }

    /// Forwards a record to the `log` facade, tagged with the configured target and prefixed
    /// with the input name.
    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if self.passes(level) {
            log::log!(target: self.config.log_target, level, "[{}] {}", self.name, args);
        }
    }
}
