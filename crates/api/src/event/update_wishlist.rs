use crate::error::GiftingError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use gifting_api_structs::update_wishlist::*;
use gifting_domain::ID;
use gifting_infra::GiftingContext;

pub async fn update_wishlist_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<GiftingContext>,
) -> Result<HttpResponse, GiftingError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = UpdateWishlistUseCase {
        event_id: path_params.event_id.clone(),
        user_id: user.id,
        wishlist: body.0.wishlist,
    };

    execute(usecase, &ctx)
        .await
        .map(|_| {
            HttpResponse::Ok().json(APIResponse {
                message: "Wishlist updated".into(),
            })
        })
        .map_err(GiftingError::from)
}

#[derive(Debug)]
pub struct UpdateWishlistUseCase {
    pub event_id: ID,
    pub user_id: ID,
    pub wishlist: Vec<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    NotParticipant,
    EventClosed,
    StorageError,
}

impl From<UseCaseError> for GiftingError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
            UseCaseError::NotParticipant => {
                Self::Forbidden("Only participants can change their wishlist".into())
            }
            UseCaseError::EventClosed => Self::Conflict(
                "The event is already matched and wishlists can no longer change".into(),
            ),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateWishlistUseCase {
    type Response = ();

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &GiftingContext) -> Result<Self::Response, Self::Error> {
        let event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::NotFound(self.event_id.clone()))?;

        if !event.is_participant(&self.user_id) {
            return Err(UseCaseError::NotParticipant);
        }
        if !event.is_active() {
            return Err(UseCaseError::EventClosed);
        }

        let wishlist = self
            .wishlist
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect::<Vec<_>>();

        let updated = ctx
            .repos
            .events
            .set_wishlist(&self.event_id, &self.user_id, &wishlist)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        // Either matched or left since it was read
        if !updated {
            return Err(UseCaseError::EventClosed);
        }
        Ok(())
    }
}
