use crate::shared::entity::{Entity, ID};
use crate::user::User;
use gifting_utils::create_join_code;
use serde::{Deserialize, Serialize};

/// Something the owner of a `Wishlist` would like to get
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: ID,
    pub name: String,
    /// Where the item can be found, kept as given
    pub links: Vec<String>,
}

/// An item as sent by the owner when editing the list. `id` is missing
/// for items that are new.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditedWishlistItem {
    pub id: Option<ID>,
    pub name: String,
    #[serde(default)]
    pub links: Vec<String>,
}

/// How a `User` relates to a `Wishlist`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WishlistRole {
    Owner,
    Subscriber,
}

/// A personal list of wishes the owner shares with people holding its code
#[derive(Debug, Clone, PartialEq)]
pub struct Wishlist {
    pub id: ID,
    pub name: String,
    /// Timestamp in millis of the occasion the `Wishlist` is for
    pub deadline: i64,
    pub owner_id: ID,
    pub owner_name: String,
    /// Code other `User`s need to subscribe
    pub code: String,
    pub items: Vec<WishlistItem>,
    /// Subscribed users in subscription order, never containing the owner
    pub subscribers: Vec<ID>,
    pub created: i64,
}

impl Wishlist {
    pub fn new(
        name: String,
        deadline: i64,
        owner: &User,
        items: Vec<WishlistItem>,
        created: i64,
    ) -> Self {
        Self {
            id: Default::default(),
            name,
            deadline,
            owner_id: owner.id.clone(),
            owner_name: owner.name.clone(),
            code: create_join_code(),
            items,
            subscribers: Vec::new(),
            created,
        }
    }

    pub fn is_owner(&self, user_id: &ID) -> bool {
        self.owner_id == *user_id
    }

    pub fn is_subscriber(&self, user_id: &ID) -> bool {
        self.subscribers.contains(user_id)
    }

    pub fn role_of(&self, user_id: &ID) -> Option<WishlistRole> {
        if self.is_owner(user_id) {
            Some(WishlistRole::Owner)
        } else if self.is_subscriber(user_id) {
            Some(WishlistRole::Subscriber)
        } else {
            None
        }
    }

    /// Codes are compared ignoring case and surrounding whitespace
    pub fn code_matches(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code.trim())
    }

    /// Merges an edited item list into the current one. Items keep their id
    /// when it is already known, everything else gets a fresh id. Items
    /// without a name are dropped.
    pub fn merge_items(&self, edited: Vec<EditedWishlistItem>) -> Vec<WishlistItem> {
        edited
            .into_iter()
            .filter_map(|EditedWishlistItem { id, name, links }| {
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                let id = id
                    .filter(|id| self.items.iter().any(|item| item.id == *id))
                    .unwrap_or_default();
                let links = links
                    .into_iter()
                    .map(|link| link.trim().to_string())
                    .filter(|link| !link.is_empty())
                    .collect();
                Some(WishlistItem {
                    id,
                    name: name.to_string(),
                    links,
                })
            })
            .collect()
    }
}

impl Entity for Wishlist {
    fn id(&self) -> &ID {
        &self.id
    }
}
