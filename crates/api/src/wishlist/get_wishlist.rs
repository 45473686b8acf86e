use crate::error::GiftingError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use gifting_api_structs::dtos::WishlistDTO;
use gifting_api_structs::get_wishlist::*;
use gifting_domain::{Wishlist, ID};
use gifting_infra::GiftingContext;

pub async fn get_wishlist_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<GiftingContext>,
) -> Result<HttpResponse, GiftingError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = GetWishlistUseCase {
        wishlist_id: path_params.wishlist_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|wishlist| {
            HttpResponse::Ok().json(APIResponse::new(WishlistDTO::new(wishlist, &user.id)))
        })
        .map_err(GiftingError::from)
}

/// Any signed in user may look at a wishlist before joining it
#[derive(Debug)]
pub struct GetWishlistUseCase {
    pub wishlist_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for GiftingError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(wishlist_id) => Self::NotFound(format!(
                "The wishlist with id: {}, was not found.",
                wishlist_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetWishlistUseCase {
    type Response = Wishlist;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &GiftingContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .wishlists
            .find(&self.wishlist_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::NotFound(self.wishlist_id.clone()))
    }
}
