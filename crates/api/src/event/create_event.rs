use crate::error::GiftingError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use gifting_api_structs::create_event::*;
use gifting_domain::{GiftEvent, User};
use gifting_infra::GiftingContext;

/// How many join codes are tried before giving up
const MAX_CODE_ATTEMPTS: usize = 5;

pub async fn create_event_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<GiftingContext>,
) -> Result<HttpResponse, GiftingError> {
    let user = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = CreateEventUseCase {
        user,
        name: body.name,
        deadline: body.deadline,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Created().json(APIResponse::new(event)))
        .map_err(GiftingError::from)
}

#[derive(Debug)]
pub struct CreateEventUseCase {
    pub user: User,
    pub name: String,
    pub deadline: i64,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EmptyName,
    StorageError,
}

impl From<UseCaseError> for GiftingError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyName => Self::BadClientData("The event needs a name".into()),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateEventUseCase {
    type Response = GiftEvent;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &GiftingContext) -> Result<Self::Response, Self::Error> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(UseCaseError::EmptyName);
        }

        let created = ctx.sys.get_timestamp_millis();
        for _ in 0..MAX_CODE_ATTEMPTS {
            let event = GiftEvent::new(name.to_string(), self.deadline, &self.user, created);
            let taken = ctx
                .repos
                .events
                .find_by_code(&event.code)
                .await
                .map_err(|_| UseCaseError::StorageError)?
                .is_some();
            if taken {
                continue;
            }

            ctx.repos
                .events
                .insert(&event)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            return Ok(event);
        }

        Err(UseCaseError::StorageError)
    }
}
