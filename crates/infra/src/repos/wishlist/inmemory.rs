use super::IWishlistRepo;
use crate::repos::shared::inmemory_repo::*;
use gifting_domain::{Wishlist, WishlistItem, ID};

pub struct InMemoryWishlistRepo {
    wishlists: std::sync::Mutex<Vec<Wishlist>>,
}

impl InMemoryWishlistRepo {
    pub fn new() -> Self {
        Self {
            wishlists: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IWishlistRepo for InMemoryWishlistRepo {
    async fn insert(&self, w: &Wishlist) -> anyhow::Result<()> {
        if insert_unless(w, &self.wishlists, |existing| {
            existing.code == w.code || existing.id == w.id
        }) {
            Ok(())
        } else {
            Err(anyhow::Error::msg(format!(
                "Wishlist with id {} or code {} already exists",
                w.id, w.code
            )))
        }
    }

    async fn find(&self, wishlist_id: &ID) -> anyhow::Result<Option<Wishlist>> {
        Ok(find(wishlist_id, &self.wishlists))
    }

    async fn find_by_code(&self, code: &str) -> anyhow::Result<Option<Wishlist>> {
        Ok(find_by(&self.wishlists, |w| w.code == code)
            .into_iter()
            .next())
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Wishlist>> {
        Ok(find_by(&self.wishlists, |w| {
            w.is_owner(user_id) || w.is_subscriber(user_id)
        }))
    }

    async fn set_items(&self, wishlist_id: &ID, items: &[WishlistItem]) -> anyhow::Result<bool> {
        Ok(update_one(wishlist_id, &self.wishlists, |w| {
            w.items = items.to_vec();
            true
        }))
    }

    async fn add_subscriber(&self, wishlist_id: &ID, user_id: &ID) -> anyhow::Result<bool> {
        Ok(update_one(wishlist_id, &self.wishlists, |w| {
            if w.is_owner(user_id) || w.is_subscriber(user_id) {
                return false;
            }
            w.subscribers.push(user_id.clone());
            true
        }))
    }

    async fn remove_subscriber(&self, wishlist_id: &ID, user_id: &ID) -> anyhow::Result<bool> {
        Ok(update_one(wishlist_id, &self.wishlists, |w| {
            let before = w.subscribers.len();
            w.subscribers.retain(|s| s != user_id);
            w.subscribers.len() != before
        }))
    }

    async fn delete(&self, wishlist_id: &ID) -> anyhow::Result<Option<Wishlist>> {
        Ok(delete(wishlist_id, &self.wishlists))
    }
}
