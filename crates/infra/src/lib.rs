mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, MailConfig};
pub use repos::{
    IEventRepo, IUserRepo, IWishlistRepo, InMemoryEventRepo, InMemoryUserRepo,
    InMemoryWishlistRepo, Repos,
};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::{info, warn};

#[derive(Clone)]
pub struct GiftingContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notifications: NotificationQueue,
}

impl GiftingContext {
    /// Context backed by in-memory repositories where mails are only logged.
    /// Has to be called from within a tokio runtime.
    pub fn create_inmemory() -> Self {
        Self::create(Repos::create_inmemory(), Config::new(), Arc::new(LogMailer))
    }

    /// Replaces the mailer used for assignment notifications
    pub fn with_mailer(mut self, mailer: Arc<dyn IMailer>) -> Self {
        self.notifications = NotificationQueue::start(mailer);
        self
    }

    fn create(repos: Repos, config: Config, mailer: Arc<dyn IMailer>) -> Self {
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            notifications: NotificationQueue::start(mailer),
        }
    }
}

fn create_mailer(config: &Config) -> anyhow::Result<Arc<dyn IMailer>> {
    let mailer: Arc<dyn IMailer> = match &config.mail.api_url {
        Some(api_url) => {
            info!("MAIL_API_URL was provided. Going to deliver mails through {}", api_url);
            Arc::new(HttpMailer::new(
                api_url.clone(),
                config.mail.api_key.clone(),
                config.mail.from.clone(),
                config.mail.timeout,
            )?)
        }
        None => {
            info!("MAIL_API_URL was not provided. Assignment mails will only be logged.");
            Arc::new(LogMailer)
        }
    };
    Ok(mailer)
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<GiftingContext> {
    let config = Config::new();
    let repos = match &config.database_url {
        Some(database_url) => {
            info!("DATABASE_URL was provided. Going to use postgres.");
            Repos::create_postgres(database_url).await?
        }
        None => {
            warn!("DATABASE_URL was not provided. Going to use inmemory infra.");
            Repos::create_inmemory()
        }
    };

    let mailer = create_mailer(&config)?;

    Ok(GiftingContext::create(repos, config, mailer))
}
