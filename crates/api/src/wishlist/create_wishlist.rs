use crate::error::GiftingError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use gifting_api_structs::create_wishlist::*;
use gifting_api_structs::dtos::WishlistDTO;
use gifting_domain::{EditedWishlistItem, User, Wishlist};
use gifting_infra::GiftingContext;

/// How many codes are tried before giving up
const MAX_CODE_ATTEMPTS: usize = 5;

pub async fn create_wishlist_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<GiftingContext>,
) -> Result<HttpResponse, GiftingError> {
    let user = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = CreateWishlistUseCase {
        user,
        name: body.name,
        deadline: body.deadline,
        items: body.items,
    };

    execute(usecase, &ctx)
        .await
        .map(|wishlist| {
            let owner_id = wishlist.owner_id.clone();
            HttpResponse::Created().json(APIResponse::new(WishlistDTO::new(wishlist, &owner_id)))
        })
        .map_err(GiftingError::from)
}

#[derive(Debug)]
pub struct CreateWishlistUseCase {
    pub user: User,
    pub name: String,
    pub deadline: i64,
    pub items: Vec<EditedWishlistItem>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EmptyName,
    StorageError,
}

impl From<UseCaseError> for GiftingError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyName => Self::BadClientData("The wishlist needs a name".into()),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateWishlistUseCase {
    type Response = Wishlist;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &GiftingContext) -> Result<Self::Response, Self::Error> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(UseCaseError::EmptyName);
        }

        let created = ctx.sys.get_timestamp_millis();
        for _ in 0..MAX_CODE_ATTEMPTS {
            let mut wishlist =
                Wishlist::new(name.to_string(), self.deadline, &self.user, vec![], created);
            wishlist.items = wishlist.merge_items(self.items.clone());

            let taken = ctx
                .repos
                .wishlists
                .find_by_code(&wishlist.code)
                .await
                .map_err(|_| UseCaseError::StorageError)?
                .is_some();
            if taken {
                continue;
            }

            ctx.repos
                .wishlists
                .insert(&wishlist)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            return Ok(wishlist);
        }

        Err(UseCaseError::StorageError)
    }
}
