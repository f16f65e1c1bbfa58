//! Outbound messaging abstraction.

pub mod line;

use async_trait::async_trait;

use crate::error::ChannelError;

pub use line::LineChannel;

/// Outbound notifier contract consumed by the controller and webhook layer.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Channel name for logging.
    fn name(&self) -> &str;

    /// Push a message to a destination (group or user ID).
    async fn push(&self, to: &str, text: &str) -> Result<(), ChannelError>;

    /// Reply to an inbound event using its reply token.
    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), ChannelError>;
}
