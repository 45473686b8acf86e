use crate::error::GiftingError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use gifting_api_structs::dtos::WishlistDTO;
use gifting_api_structs::get_wishlists::*;
use gifting_domain::{Wishlist, ID};
use gifting_infra::GiftingContext;

pub async fn get_wishlists_controller(
    http_req: HttpRequest,
    ctx: web::Data<GiftingContext>,
) -> Result<HttpResponse, GiftingError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = GetWishlistsUseCase {
        user_id: user.id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|wishlists| {
            HttpResponse::Ok().json(APIResponse {
                wishlists: wishlists
                    .into_iter()
                    .map(|w| WishlistDTO::new(w, &user.id))
                    .collect(),
            })
        })
        .map_err(GiftingError::from)
}

/// Wishlists the user owns or subscribes to
#[derive(Debug)]
pub struct GetWishlistsUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for GiftingError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetWishlistsUseCase {
    type Response = Vec<Wishlist>;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &GiftingContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .wishlists
            .find_by_user(&self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
