use crate::error::GiftingError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use gifting_api_structs::leave_wishlist::*;
use gifting_domain::ID;
use gifting_infra::GiftingContext;

pub async fn leave_wishlist_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<GiftingContext>,
) -> Result<HttpResponse, GiftingError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = LeaveWishlistUseCase {
        wishlist_id: path_params.wishlist_id.clone(),
        user_id: user.id,
    };

    execute(usecase, &ctx)
        .await
        .map(|_| {
            HttpResponse::Ok().json(APIResponse {
                message: "Left wishlist successfully".into(),
            })
        })
        .map_err(GiftingError::from)
}

/// Unsubscribes a user. Leaving a wishlist one is not subscribed to is a no-op,
/// the owner has to delete it instead.
#[derive(Debug)]
pub struct LeaveWishlistUseCase {
    pub wishlist_id: ID,
    pub user_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    IsOwner,
    StorageError,
}

impl From<UseCaseError> for GiftingError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(wishlist_id) => Self::NotFound(format!(
                "The wishlist with id: {}, was not found.",
                wishlist_id
            )),
            UseCaseError::IsOwner => Self::Forbidden(
                "Cannot leave your own wishlist. Delete it instead.".into(),
            ),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for LeaveWishlistUseCase {
    type Response = ();

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &GiftingContext) -> Result<Self::Response, Self::Error> {
        let wishlist = ctx
            .repos
            .wishlists
            .find(&self.wishlist_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::NotFound(self.wishlist_id.clone()))?;

        if wishlist.is_owner(&self.user_id) {
            return Err(UseCaseError::IsOwner);
        }

        ctx.repos
            .wishlists
            .remove_subscriber(&self.wishlist_id, &self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        Ok(())
    }
}
