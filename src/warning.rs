// Sinks for non-fatal diagnostics raised while building a plot

use std::sync::{Arc, Mutex};

/// Accepts human-readable warnings without aborting the build.
pub trait WarningSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Sink used when none is given: [`StderrSink`].
pub fn default_sink() -> Arc<dyn WarningSink> {
    Arc::new(StderrSink)
}

/// Forwards warnings to `tracing`. Messages are dropped unless the host
/// installs a subscriber.
#[derive(Debug, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Prints warnings to stderr.
#[derive(Debug, Default)]
pub struct StderrSink;

impl WarningSink for StderrSink {
    fn warn(&self, message: &str) {
        eprintln!("Warning: {}", message);
    }
}

/// Records warnings in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Warnings received so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl WarningSink for CollectingSink {
    fn warn(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
