use crate::error::GiftingError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use gifting_api_structs::join_wishlist::*;
use gifting_domain::ID;
use gifting_infra::GiftingContext;

pub async fn join_wishlist_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<GiftingContext>,
) -> Result<HttpResponse, GiftingError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = JoinWishlistUseCase {
        wishlist_id: path_params.wishlist_id.clone(),
        user_id: user.id,
        code: body.0.code,
    };

    execute(usecase, &ctx)
        .await
        .map(|already_joined| {
            let message = if already_joined {
                "Already joined"
            } else {
                "Joined successfully"
            };
            HttpResponse::Ok().json(APIResponse {
                message: message.into(),
                already_joined,
            })
        })
        .map_err(GiftingError::from)
}

/// Subscribes a user to a wishlist given its code. Responds with whether
/// the user already was the owner or a subscriber.
#[derive(Debug)]
pub struct JoinWishlistUseCase {
    pub wishlist_id: ID,
    pub user_id: ID,
    pub code: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidCode,
    StorageError,
}

impl From<UseCaseError> for GiftingError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(wishlist_id) => Self::NotFound(format!(
                "The wishlist with id: {}, was not found.",
                wishlist_id
            )),
            UseCaseError::InvalidCode => Self::BadClientData("Invalid access code".into()),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for JoinWishlistUseCase {
    type Response = bool;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &GiftingContext) -> Result<Self::Response, Self::Error> {
        let wishlist = ctx
            .repos
            .wishlists
            .find(&self.wishlist_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::NotFound(self.wishlist_id.clone()))?;

        if !wishlist.code_matches(&self.code) {
            return Err(UseCaseError::InvalidCode);
        }
        if wishlist.role_of(&self.user_id).is_some() {
            return Ok(true);
        }

        let added = ctx
            .repos
            .wishlists
            .add_subscriber(&self.wishlist_id, &self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if added {
            return Ok(false);
        }

        // Either a concurrent join won or the wishlist is gone
        let exists = ctx
            .repos
            .wishlists
            .find(&self.wishlist_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .is_some();
        if exists {
            Ok(true)
        } else {
            Err(UseCaseError::NotFound(self.wishlist_id.clone()))
        }
    }
}
