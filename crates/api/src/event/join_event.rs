use crate::error::GiftingError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use gifting_api_structs::join_event::*;
use gifting_domain::{Participant, User, ID};
use gifting_infra::GiftingContext;

pub async fn join_event_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<GiftingContext>,
) -> Result<HttpResponse, GiftingError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = JoinEventUseCase {
        user,
        code: body.0.code,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            let message = if res.already_joined {
                "Already joined"
            } else {
                "Joined successfully"
            };
            HttpResponse::Ok().json(APIResponse {
                message: message.into(),
                event_id: res.event_id,
                already_joined: res.already_joined,
            })
        })
        .map_err(GiftingError::from)
}

#[derive(Debug)]
pub struct JoinEventUseCase {
    pub user: User,
    /// Join code, case insensitive
    pub code: String,
}

#[derive(Debug, PartialEq)]
pub struct UseCaseResponse {
    pub event_id: ID,
    pub already_joined: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    MissingCode,
    InvalidCode(String),
    EventClosed,
    StorageError,
}

impl From<UseCaseError> for GiftingError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::MissingCode => Self::BadClientData("Missing join code".into()),
            UseCaseError::InvalidCode(code) => {
                Self::NotFound(format!("No event has the join code: {}", code))
            }
            UseCaseError::EventClosed => {
                Self::Conflict("The event is already matched and closed for joining".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for JoinEventUseCase {
    type Response = UseCaseResponse;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &GiftingContext) -> Result<Self::Response, Self::Error> {
        let code = self.code.trim().to_uppercase();
        if code.is_empty() {
            return Err(UseCaseError::MissingCode);
        }

        let event = ctx
            .repos
            .events
            .find_by_code(&code)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::InvalidCode(code.clone()))?;

        if event.is_participant(&self.user.id) {
            return Ok(UseCaseResponse {
                event_id: event.id,
                already_joined: true,
            });
        }
        if !event.is_active() {
            return Err(UseCaseError::EventClosed);
        }

        let joined = ctx
            .repos
            .events
            .add_participant(&event.id, &Participant::from_user(&self.user))
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if joined {
            return Ok(UseCaseResponse {
                event_id: event.id,
                already_joined: false,
            });
        }

        // Something changed since the event was read
        let event = ctx
            .repos
            .events
            .find(&event.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or(UseCaseError::InvalidCode(code))?;
        if event.is_participant(&self.user.id) {
            Ok(UseCaseResponse {
                event_id: event.id,
                already_joined: true,
            })
        } else {
            Err(UseCaseError::EventClosed)
        }
    }
}
