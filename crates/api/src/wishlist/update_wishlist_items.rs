use crate::error::GiftingError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use gifting_api_structs::dtos::WishlistDTO;
use gifting_api_structs::update_wishlist_items::*;
use gifting_domain::{EditedWishlistItem, Wishlist, ID};
use gifting_infra::GiftingContext;

pub async fn update_wishlist_items_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<GiftingContext>,
) -> Result<HttpResponse, GiftingError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = UpdateWishlistItemsUseCase {
        wishlist_id: path_params.wishlist_id.clone(),
        user_id: user.id.clone(),
        items: body.0.items,
    };

    execute(usecase, &ctx)
        .await
        .map(|wishlist| {
            HttpResponse::Ok().json(APIResponse::new(WishlistDTO::new(wishlist, &user.id)))
        })
        .map_err(GiftingError::from)
}

/// Replaces the items of a wishlist, only allowed for its owner
#[derive(Debug)]
pub struct UpdateWishlistItemsUseCase {
    pub wishlist_id: ID,
    pub user_id: ID,
    pub items: Vec<EditedWishlistItem>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    NotOwner,
    StorageError,
}

impl From<UseCaseError> for GiftingError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(wishlist_id) => Self::NotFound(format!(
                "The wishlist with id: {}, was not found.",
                wishlist_id
            )),
            UseCaseError::NotOwner => {
                Self::Forbidden("Only the owner can change the items of a wishlist".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateWishlistItemsUseCase {
    type Response = Wishlist;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &GiftingContext) -> Result<Self::Response, Self::Error> {
        let mut wishlist = ctx
            .repos
            .wishlists
            .find(&self.wishlist_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::NotFound(self.wishlist_id.clone()))?;

        if !wishlist.is_owner(&self.user_id) {
            return Err(UseCaseError::NotOwner);
        }

        wishlist.items = wishlist.merge_items(std::mem::take(&mut self.items));
        let updated = ctx
            .repos
            .wishlists
            .set_items(&self.wishlist_id, &wishlist.items)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        // Deleted since it was read
        if !updated {
            return Err(UseCaseError::NotFound(self.wishlist_id.clone()));
        }
        Ok(wishlist)
    }
}
