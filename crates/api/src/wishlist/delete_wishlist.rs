use crate::error::GiftingError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use gifting_api_structs::delete_wishlist::*;
use gifting_domain::ID;
use gifting_infra::GiftingContext;

pub async fn delete_wishlist_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<GiftingContext>,
) -> Result<HttpResponse, GiftingError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = DeleteWishlistUseCase {
        wishlist_id: path_params.wishlist_id.clone(),
        user_id: user.id,
    };

    execute(usecase, &ctx)
        .await
        .map(|_| {
            HttpResponse::Ok().json(APIResponse {
                message: "Wishlist deleted".into(),
            })
        })
        .map_err(GiftingError::from)
}

#[derive(Debug)]
pub struct DeleteWishlistUseCase {
    pub wishlist_id: ID,
    pub user_id: ID,
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
                Self::Forbidden("Only the owner can delete a wishlist".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteWishlistUseCase {
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

        if !wishlist.is_owner(&self.user_id) {
            return Err(UseCaseError::NotOwner);
        }

        ctx.repos
            .wishlists
            .delete(&self.wishlist_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .map(|_| ())
            .ok_or_else(|| UseCaseError::NotFound(self.wishlist_id.clone()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use gifting_domain::{User, Wishlist};

    #[actix_web::test]
    async fn only_owner_deletes() {
        let ctx = GiftingContext::create_inmemory();
        let alice = User::new(ID::new(), "Alice".into(), "alice@x.com".into());
        let wishlist = Wishlist::new("Birthday".into(), 1000, &alice, vec![], 0);
        ctx.repos.wishlists.insert(&wishlist).await.unwrap();

        let mut usecase = DeleteWishlistUseCase {
            wishlist_id: wishlist.id.clone(),
            user_id: ID::new(),
        };
        assert_eq!(usecase.execute(&ctx).await, Err(UseCaseError::NotOwner));

        usecase.user_id = alice.id.clone();
        assert_eq!(usecase.execute(&ctx).await, Ok(()));
        assert!(ctx.repos.wishlists.find(&wishlist.id).await.unwrap().is_none());
        assert_eq!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::NotFound(wishlist.id.clone()))
        );
    }
}
