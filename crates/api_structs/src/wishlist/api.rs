use crate::dtos::WishlistDTO;
use gifting_domain::{EditedWishlistItem, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistResponse {
    pub wishlist: WishlistDTO,
}

impl WishlistResponse {
    pub fn new(wishlist: WishlistDTO) -> Self {
        Self { wishlist }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistMessageResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct WishlistPathParams {
    pub wishlist_id: ID,
}

pub mod create_wishlist {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub name: String,
        /// Timestamp in millis
        pub deadline: i64,
        #[serde(default)]
        pub items: Vec<EditedWishlistItem>,
    }

    pub type APIResponse = WishlistResponse;
}

pub mod get_wishlists {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub wishlists: Vec<WishlistDTO>,
    }
}

pub mod get_wishlist {
    use super::*;

    pub type PathParams = WishlistPathParams;
    pub type APIResponse = WishlistResponse;
}

pub mod update_wishlist_items {
    use super::*;

    pub type PathParams = WishlistPathParams;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub items: Vec<EditedWishlistItem>,
    }

    pub type APIResponse = WishlistResponse;
}

pub mod delete_wishlist {
    use super::*;

    pub type PathParams = WishlistPathParams;
    pub type APIResponse = WishlistMessageResponse;
}

pub mod join_wishlist {
    use super::*;

    pub type PathParams = WishlistPathParams;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub code: String,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub message: String,
        pub already_joined: bool,
    }
}

pub mod leave_wishlist {
    use super::*;

    pub type PathParams = WishlistPathParams;
    pub type APIResponse = WishlistMessageResponse;
}
