use chime_domain::RenderedMessage;
use tracing::info;

/// Delivers a `RenderedMessage` over one concrete channel integration
#[async_trait::async_trait]
pub trait IChannelSender: Send + Sync {
    async fn send(&self, message: &RenderedMessage) -> anyhow::Result<()>;
}

/// Writes the message to the log. Used for every channel without a
/// configured integration.
pub struct LogChannelSender {}

#[async_trait::async_trait]
impl IChannelSender for LogChannelSender {
    async fn send(&self, message: &RenderedMessage) -> anyhow::Result<()> {
        info!(
            reminder_id = %message.reminder_id,
            channel = %message.channel,
            "Sending {}: {}",
            message.title,
            message.body
        );
        Ok(())
    }
}
