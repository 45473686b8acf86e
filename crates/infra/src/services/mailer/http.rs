use super::IMailer;
use gifting_domain::MailMessage;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct SendMailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

/// Posts every message as JSON to a transactional mail relay
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    from: String,
}

impl HttpMailer {
    /// Every request to the relay is aborted after `timeout`
    pub fn new(
        api_url: String,
        api_key: Option<String>,
        from: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url,
            api_key,
            from,
        })
    }
}

#[async_trait::async_trait]
impl IMailer for HttpMailer {
    async fn send(&self, message: &MailMessage) -> anyhow::Result<()> {
        let body = SendMailRequest {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.text,
            html: &message.html,
        };

        let mut req = self.client.post(&self.api_url).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let res = req.send().await?;
        let status = res.status();
        if !status.is_success() {
            let reason = res.text().await.unwrap_or_default();
            anyhow::bail!("Mail relay responded with {}: {}", status, reason);
        }
        Ok(())
    }
}
