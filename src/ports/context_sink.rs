//! Context sink port for publishing host-visible context keys.

/// Receives key/value context updates that the host can query elsewhere,
/// e.g. to enable or hide commands.
pub trait ContextSink: Send + Sync {
    /// Sets `key` to `value`, replacing any previous value.
    fn set_context(&self, key: &str, value: &str);
}
