use super::run_matching::{self, RunMatchingUseCase};
use crate::error::GiftingError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use gifting_api_structs::dtos::EventViewDTO;
use gifting_api_structs::get_event::*;
use gifting_domain::{User, ID};
use gifting_infra::GiftingContext;

pub async fn get_event_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<GiftingContext>,
) -> Result<HttpResponse, GiftingError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = GetEventUseCase {
        event_id: path_params.event_id.clone(),
        user,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(GiftingError::from)
}

/// Serves an event to a user. An active event past its deadline gets
/// matched first, so the response already carries the assignment.
#[derive(Debug)]
pub struct GetEventUseCase {
    pub event_id: ID,
    pub user: User,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for GiftingError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

impl From<run_matching::UseCaseError> for UseCaseError {
    fn from(e: run_matching::UseCaseError) -> Self {
        match e {
            run_matching::UseCaseError::NotFound(event_id) => Self::NotFound(event_id),
            run_matching::UseCaseError::StorageError => Self::StorageError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetEventUseCase {
    type Response = EventViewDTO;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &GiftingContext) -> Result<Self::Response, Self::Error> {
        let mut event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::NotFound(self.event_id.clone()))?;

        if event.should_trigger_matching(ctx.sys.get_timestamp_millis()) {
            let run_matching = RunMatchingUseCase {
                event_id: event.id.clone(),
            };
            // Any outcome is fine here, the event is served as it is stored now
            execute(run_matching, ctx).await?;

            event = ctx
                .repos
                .events
                .find(&self.event_id)
                .await
                .map_err(|_| UseCaseError::StorageError)?
                .ok_or_else(|| UseCaseError::NotFound(self.event_id.clone()))?;
        }

        let user_ids = event
            .participants
            .iter()
            .map(|p| p.user_id.clone())
            .collect::<Vec<_>>();
        let users = ctx
            .repos
            .users
            .find_many(&user_ids)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(EventViewDTO::new(event, &self.user, &users))
    }
}
