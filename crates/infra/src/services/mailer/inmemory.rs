use super::IMailer;
use gifting_domain::MailMessage;
use std::sync::Mutex;

/// Keeps every delivered message in memory. Deliveries to recipients
/// registered with `fail_for` are rejected.
pub struct InMemoryMailer {
    sent: Mutex<Vec<MailMessage>>,
    failing: Mutex<Vec<String>>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_for(&self, recipient: &str) {
        self.failing.lock().unwrap().push(recipient.to_string());
    }

    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemoryMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IMailer for InMemoryMailer {
    async fn send(&self, message: &MailMessage) -> anyhow::Result<()> {
        if self.failing.lock().unwrap().contains(&message.to) {
            anyhow::bail!("Mailbox {} is unavailable", message.to);
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
