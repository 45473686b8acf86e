mod http;
mod inmemory;

pub use http::HttpMailer;
pub use inmemory::InMemoryMailer;

use gifting_domain::MailMessage;
use tracing::info;

/// Delivers a single `MailMessage`. A failed delivery is reported to the
/// caller and never retried here.
#[async_trait::async_trait]
pub trait IMailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> anyhow::Result<()>;
}

/// Used when no mail relay is configured. Only logs what would have been sent.
pub struct LogMailer;

#[async_trait::async_trait]
impl IMailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> anyhow::Result<()> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "No mail relay configured, skipping delivery"
        );
        Ok(())
    }
}
