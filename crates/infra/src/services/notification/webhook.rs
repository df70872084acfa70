use super::IChannelSender;
use chime_domain::RenderedMessage;
use reqwest::Client;
use url::Url;

pub const WEBHOOK_KEY_HEADER: &str = "x-chime-webhook-key";

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelWebhook {
    pub url: Url,
    pub key: Option<String>,
}

/// Posts the `RenderedMessage` as json to the webhook of the channel
/// provider. Any non success status code is a failed delivery.
pub struct WebhookChannelSender {
    client: Client,
    webhook: ChannelWebhook,
}

impl WebhookChannelSender {
    pub fn new(webhook: ChannelWebhook) -> Self {
        Self {
            client: Client::new(),
            webhook,
        }
    }
}

#[async_trait::async_trait]
impl IChannelSender for WebhookChannelSender {
    async fn send(&self, message: &RenderedMessage) -> anyhow::Result<()> {
        let mut req = self.client.post(self.webhook.url.clone()).json(message);
        if let Some(key) = &self.webhook.key {
            req = req.header(WEBHOOK_KEY_HEADER, key);
        }
        req.send().await?.error_for_status()?;
        Ok(())
    }
}
