mod mailer;
mod notifications;

pub use mailer::{HttpMailer, IMailer, InMemoryMailer, LogMailer};
pub use notifications::{dispatch_assignments, NotificationQueue};
