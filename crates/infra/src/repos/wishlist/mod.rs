mod inmemory;
mod postgres;

pub use inmemory::InMemoryWishlistRepo;
pub use postgres::PostgresWishlistRepo;

use gifting_domain::{Wishlist, WishlistItem, ID};

/// Storage of `Wishlist`s. Updates report whether they were applied.
#[async_trait::async_trait]
pub trait IWishlistRepo: Send + Sync {
    /// Fails when the code is already taken
    async fn insert(&self, w: &Wishlist) -> anyhow::Result<()>;
    async fn find(&self, wishlist_id: &ID) -> anyhow::Result<Option<Wishlist>>;
    async fn find_by_code(&self, code: &str) -> anyhow::Result<Option<Wishlist>>;
    /// Wishlists owned by or subscribed to by the user
    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Wishlist>>;
    async fn set_items(&self, wishlist_id: &ID, items: &[WishlistItem]) -> anyhow::Result<bool>;
    /// Adds the subscriber unless it is the owner or already subscribed
    async fn add_subscriber(&self, wishlist_id: &ID, user_id: &ID) -> anyhow::Result<bool>;
    async fn remove_subscriber(&self, wishlist_id: &ID, user_id: &ID) -> anyhow::Result<bool>;
    async fn delete(&self, wishlist_id: &ID) -> anyhow::Result<Option<Wishlist>>;
}
