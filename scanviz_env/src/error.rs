//! Error types for the scanviz environment abstraction.

use thiserror::Error;

/// Errors that can occur in the environment abstraction layer.
#[derive(Debug, Error)]
pub enum EnvError {
    /// The receiving end of a topic is gone (shutdown)
    #[error("Channel closed: {0}")]
    ChannelClosed(String),
    
    /// Reliable publisher has no room left in its bounded queue
    #[error("Publish queue full (depth {0})")]
    QueueFull(usize),
    
    /// Sink-specific publish failure (visualizer, file, ...)
    #[error("Publish error: {0}")]
    PublishError(String),
}

impl EnvError {
    /// Creates a publish error.
    pub fn publish(msg: impl Into<String>) -> Self {
        Self::PublishError(msg.into())
    }
    
    /// Creates a closed-channel error for the named topic.
    pub fn closed(topic: impl std::fmt::Display) -> Self {
        Self::ChannelClosed(topic.to_string())
    }
}
