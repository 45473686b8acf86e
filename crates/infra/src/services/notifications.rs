use super::IMailer;
use futures::future::join_all;
use gifting_domain::{notification::assignment_mail, Assignment, ID};
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tracing::{error, info};

#[derive(Debug)]
struct NotificationJob {
    event_id: ID,
    assignments: Vec<Assignment>,
}

/// Hands assignment notifications to a background worker so that the
/// caller never waits on, or fails because of, mail delivery.
#[derive(Clone)]
pub struct NotificationQueue {
    sender: UnboundedSender<NotificationJob>,
}

impl NotificationQueue {
    /// Spawns the worker on the current tokio runtime. Every job is
    /// dispatched on its own task so that a slow delivery never holds up
    /// the jobs queued behind it.
    pub fn start(mailer: Arc<dyn IMailer>) -> Self {
        let (sender, mut receiver) = unbounded_channel::<NotificationJob>();

        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                let mailer = mailer.clone();
                tokio::spawn(async move {
                    dispatch_assignments(mailer.as_ref(), &job.event_id, &job.assignments)
                        .await;
                });
            }
        });

        Self { sender }
    }

    pub fn submit(&self, event_id: &ID, assignments: Vec<Assignment>) {
        let job = NotificationJob {
            event_id: event_id.clone(),
            assignments,
        };
        if let Err(e) = self.sender.send(job) {
            error!(
                "Notification worker is gone, dropping mails for event {}",
                e.0.event_id
            );
        }
    }
}

/// Sends one mail per `Assignment`, all at once. A failed delivery is
/// logged and does not affect the others. Returns how many were delivered.
pub async fn dispatch_assignments(
    mailer: &dyn IMailer,
    event_id: &ID,
    assignments: &[Assignment],
) -> usize {
    let messages = assignments.iter().map(assignment_mail).collect::<Vec<_>>();
    let results = join_all(messages.iter().map(|m| mailer.send(m))).await;

    let mut delivered = 0;
    for (message, res) in messages.iter().zip(results) {
        match res {
            Ok(_) => delivered += 1,
            Err(e) => error!(
                "Failed to notify {} about their assignment in event {}: {:?}",
                message.to, event_id, e
            ),
        }
    }
    info!(
        "Delivered {} of {} assignment mails for event {}",
        delivered,
        messages.len(),
        event_id
    );
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryMailer;
    use gifting_domain::MailMessage;
    use std::time::Duration;

    /// Never finishes deliveries to `stuck@x.com`
    struct StuckMailer {
        inner: InMemoryMailer,
    }

    #[async_trait::async_trait]
    impl IMailer for StuckMailer {
        async fn send(&self, message: &MailMessage) -> anyhow::Result<()> {
            if message.to == "stuck@x.com" {
                futures::future::pending::<()>().await;
            }
            self.inner.send(message).await
        }
    }

    fn assignment(giver_email: &str, receiver_name: &str) -> Assignment {
        Assignment {
            giver_email: giver_email.into(),
            receiver_name: receiver_name.into(),
            receiver_wishlist: vec!["Socks".into()],
        }
    }

    fn assignments() -> Vec<Assignment> {
        vec![
            assignment("a@x.com", "Bob"),
            assignment("b@x.com", "Carol"),
            assignment("c@x.com", "Alice"),
        ]
    }

    #[tokio::test]
    async fn one_failed_delivery_does_not_stop_the_others() {
        let mailer = InMemoryMailer::new();
        mailer.fail_for("b@x.com");

        let delivered = dispatch_assignments(&mailer, &ID::new(), &assignments()).await;

        assert_eq!(delivered, 2);
        let mut recipients = mailer.sent().into_iter().map(|m| m.to).collect::<Vec<_>>();
        recipients.sort();
        assert_eq!(recipients, vec!["a@x.com", "c@x.com"]);
    }

    #[tokio::test]
    async fn queue_delivers_in_the_background() {
        let mailer = Arc::new(InMemoryMailer::new());
        let queue = NotificationQueue::start(mailer.clone());

        queue.submit(&ID::new(), assignments());

        for _ in 0..50 {
            if mailer.sent().len() == 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let sent = mailer.sent();
        assert_eq!(sent.len(), 3);
        assert!(sent.iter().any(|m| m.to == "a@x.com" && m.text.contains("Bob")));
    }

    #[tokio::test]
    async fn stuck_delivery_does_not_block_later_events() {
        let mailer = Arc::new(StuckMailer {
            inner: InMemoryMailer::new(),
        });
        let queue = NotificationQueue::start(mailer.clone());

        queue.submit(&ID::new(), vec![assignment("stuck@x.com", "Bob")]);
        queue.submit(&ID::new(), vec![assignment("d@x.com", "Eve")]);

        for _ in 0..50 {
            if !mailer.inner.sent().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let sent = mailer.inner.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "d@x.com");
    }
}
