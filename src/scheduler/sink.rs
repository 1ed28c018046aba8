use async_trait::async_trait;

use crate::domain::RecipientId;

/// Outbound side of the delivery pass; a stand-in for a real messaging
/// gateway. Implementations must tolerate a second call for the same
/// (announcement, recipient) pair, since a pass interrupted mid-recipient is
/// repeated for that recipient after a restart.
#[async_trait]
pub trait DeliverySink: Send + Sync {
    async fn deliver(&self, recipient: RecipientId, content: &str) -> anyhow::Result<()>;
}

/// Logs every send instead of talking to a messaging network.
pub struct LogDeliverySink;

#[async_trait]
impl DeliverySink for LogDeliverySink {
    async fn deliver(&self, recipient: RecipientId, content: &str) -> anyhow::Result<()> {
        log::info!("sending {content:?} to recipient {recipient}");
        Ok(())
    }
}
