//! Bounded completion channel between decode tasks and the staging engine.

use tokio::sync::mpsc;

use crate::config::ProcessingConfig;

/// Create a bounded channel pair with the configured buffer size.
///
/// Decode tasks block when the buffer fills, providing backpressure while
/// the staging engine drains completions one at a time.
pub fn completion_channel<T>(config: &ProcessingConfig) -> (mpsc::Sender<T>, mpsc::Receiver<T>) {
    mpsc::channel(config.buffer_size)
}
