use gifting_utils::create_random_secret;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Secret shared with the auth service that signs the session tokens
    pub session_secret: String,
    /// Name of the cookie carrying the session token
    pub session_cookie_name: String,
    /// Postgres connection string. In-memory repositories are used when missing
    pub database_url: Option<String>,
    pub mail: MailConfig,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Endpoint of the mail relay. Mails are only logged when missing
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub from: String,
    /// How long a single request to the mail relay may take
    pub timeout: Duration,
}

const DEFAULT_PORT: usize = 5000;
const DEFAULT_SESSION_COOKIE_NAME: &str = "token";
const DEFAULT_MAIL_FROM: &str = "\"Secret Santa\" <santa@example.com>";
const DEFAULT_MAIL_TIMEOUT_SECS: u64 = 10;

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_port(port: Option<String>) -> usize {
    match port {
        None => DEFAULT_PORT,
        Some(port) => match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, DEFAULT_PORT
                );
                DEFAULT_PORT
            }
        },
    }
}

fn parse_mail_timeout(secs: Option<String>) -> Duration {
    match secs.map(|s| s.parse::<u64>()) {
        None => Duration::from_secs(DEFAULT_MAIL_TIMEOUT_SECS),
        Some(Ok(secs)) if secs > 0 => Duration::from_secs(secs),
        Some(_) => {
            warn!(
                "The given MAIL_TIMEOUT_SECS is not valid, falling back to {} seconds.",
                DEFAULT_MAIL_TIMEOUT_SECS
            );
            Duration::from_secs(DEFAULT_MAIL_TIMEOUT_SECS)
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let session_secret = match non_empty_var("SESSION_SECRET") {
            Some(secret) => secret,
            None => {
                info!("Did not find SESSION_SECRET environment variable. Going to create one.");
                info!("Session tokens issued by the auth service will not verify with a generated secret.");
                create_random_secret(32)
            }
        };

        Self {
            port: parse_port(non_empty_var("PORT")),
            session_secret,
            session_cookie_name: non_empty_var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|| DEFAULT_SESSION_COOKIE_NAME.into()),
            database_url: non_empty_var("DATABASE_URL"),
            mail: MailConfig {
                api_url: non_empty_var("MAIL_API_URL"),
                api_key: non_empty_var("MAIL_API_KEY"),
                from: non_empty_var("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.into()),
                timeout: parse_mail_timeout(non_empty_var("MAIL_TIMEOUT_SECS")),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
