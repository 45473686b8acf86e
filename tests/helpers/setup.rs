use chrono::Utc;
use gifting_api::Application;
use gifting_domain::{User, ID};
use gifting_infra::{Config, GiftingContext, InMemoryMailer, StaticTimeSys};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    exp: usize,
    iat: usize,
    user_id: String,
    email: String,
    name: String,
}

pub struct TestApp {
    pub address: String,
    pub config: Config,
    pub sys: Arc<StaticTimeSys>,
    pub mailer: Arc<InMemoryMailer>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.address, path)
    }

    /// Session token as issued by the auth service
    pub fn token(&self, user: &User) -> String {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            exp: now + 3600,
            iat: now,
            user_id: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.session_secret.as_bytes()),
        )
        .expect("To sign session token")
    }

    pub fn session_cookie(&self, user: &User) -> String {
        format!("{}={}", self.config.session_cookie_name, self.token(user))
    }
}

pub fn new_user(name: &str) -> User {
    User::new(
        ID::new(),
        name.into(),
        format!("{}@example.com", name.to_lowercase()),
    )
}

// Launch the application as a background task
pub async fn spawn_app() -> TestApp {
    let mailer = Arc::new(InMemoryMailer::new());
    let sys = Arc::new(StaticTimeSys::new(1_000));
    let mut ctx = GiftingContext::create_inmemory().with_mailer(mailer.clone());
    ctx.sys = sys.clone();
    ctx.config.port = 0; // Random port

    let config = ctx.config.clone();
    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    TestApp {
        address,
        config,
        sys,
        mailer,
        client: reqwest::Client::new(),
    }
}
