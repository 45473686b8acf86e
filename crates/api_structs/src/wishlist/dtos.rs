use gifting_domain::{Wishlist, WishlistItem, WishlistRole, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItemDTO {
    pub id: ID,
    pub name: String,
    pub links: Vec<String>,
}

impl WishlistItemDTO {
    pub fn new(item: WishlistItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            links: item.links,
        }
    }
}

/// A `Wishlist` as seen by one user. The code is only shown to the owner
/// and to subscribers.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WishlistDTO {
    pub id: ID,
    pub name: String,
    pub deadline: i64,
    pub owner_id: ID,
    pub owner_name: String,
    pub code: Option<String>,
    pub items: Vec<WishlistItemDTO>,
    pub subscriber_count: usize,
    /// Missing when the viewer neither owns nor subscribes to the list
    pub role: Option<WishlistRole>,
    pub created: i64,
}

impl WishlistDTO {
    pub fn new(wishlist: Wishlist, viewer: &ID) -> Self {
        let role = wishlist.role_of(viewer);
        Self {
            id: wishlist.id,
            name: wishlist.name,
            deadline: wishlist.deadline,
            owner_id: wishlist.owner_id,
            owner_name: wishlist.owner_name,
            code: role.map(|_| wishlist.code),
            items: wishlist
                .items
                .into_iter()
                .map(WishlistItemDTO::new)
                .collect(),
            subscriber_count: wishlist.subscribers.len(),
            role,
            created: wishlist.created,
        }
    }
}
