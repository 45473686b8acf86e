mod event;
mod shared;
mod user;
mod wishlist;

pub use event::{IEventRepo, InMemoryEventRepo, PostgresEventRepo};
pub use user::{IUserRepo, InMemoryUserRepo, PostgresUserRepo};
pub use wishlist::{IWishlistRepo, InMemoryWishlistRepo, PostgresWishlistRepo};

use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub events: Arc<dyn IEventRepo>,
    pub users: Arc<dyn IUserRepo>,
    pub wishlists: Arc<dyn IWishlistRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;

        info!("DB CHECKING CONNECTION ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            events: Arc::new(PostgresEventRepo::new(pool.clone())),
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
            wishlists: Arc::new(PostgresWishlistRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            events: Arc::new(InMemoryEventRepo::new()),
            users: Arc::new(InMemoryUserRepo::new()),
            wishlists: Arc::new(InMemoryWishlistRepo::new()),
        }
    }
}
