//! In-process context sink.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::ports::context_sink::ContextSink;

/// Keeps context keys in memory so the host can query them later.
#[derive(Default)]
pub struct MemoryContextSink {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryContextSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }
}

impl ContextSink for MemoryContextSink {
    fn set_context(&self, key: &str, value: &str) {
        debug!(key, value, "context updated");
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }
}
