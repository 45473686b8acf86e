use crate::error::GiftingError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use gifting_api_structs::leave_event::*;
use gifting_domain::ID;
use gifting_infra::GiftingContext;

pub async fn leave_event_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<GiftingContext>,
) -> Result<HttpResponse, GiftingError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = LeaveEventUseCase {
        event_id: path_params.event_id.clone(),
        user_id: user.id,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            let (message, is_owner) = match res {
                UseCaseResponse::Deleted => ("Event deleted", true),
                UseCaseResponse::Left => ("Left event successfully", false),
            };
            HttpResponse::Ok().json(APIResponse {
                message: message.into(),
                is_owner,
            })
        })
        .map_err(GiftingError::from)
}

/// The owner leaving deletes the event, anybody else is removed from it
#[derive(Debug)]
pub struct LeaveEventUseCase {
    pub event_id: ID,
    pub user_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseResponse {
    Deleted,
    Left,
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
                Self::Forbidden("You are not a participant of this event".into())
            }
            UseCaseError::EventClosed => Self::Conflict(
                "The event is already matched and participants can no longer leave".into(),
            ),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for LeaveEventUseCase {
    type Response = UseCaseResponse;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &GiftingContext) -> Result<Self::Response, Self::Error> {
        let event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::NotFound(self.event_id.clone()))?;

        if event.is_owner(&self.user_id) {
            ctx.repos
                .events
                .delete(&self.event_id)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            return Ok(UseCaseResponse::Deleted);
        }

        if !event.is_participant(&self.user_id) {
            return Err(UseCaseError::NotParticipant);
        }
        if !event.is_active() {
            return Err(UseCaseError::EventClosed);
        }

        let removed = ctx
            .repos
            .events
            .remove_participant(&self.event_id, &self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if removed {
            return Ok(UseCaseResponse::Left);
        }

        let event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::NotFound(self.event_id.clone()))?;
        if event.is_active() {
            // Already left by a concurrent request
            Ok(UseCaseResponse::Left)
        } else {
            Err(UseCaseError::EventClosed)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use gifting_domain::{GiftEvent, Participant, User};

    struct TestContext {
        ctx: GiftingContext,
        alice: User,
        bob: User,
        event: GiftEvent,
    }

    async fn setup() -> TestContext {
        let ctx = GiftingContext::create_inmemory();
        let alice = User::new(ID::new(), "Alice".into(), "alice@x.com".into());
        let bob = User::new(ID::new(), "Bob".into(), "bob@x.com".into());
        let event = GiftEvent::new("Office".into(), 1000, &alice, 0);
        ctx.repos.events.insert(&event).await.unwrap();
        ctx.repos
            .events
            .add_participant(&event.id, &Participant::from_user(&bob))
            .await
            .unwrap();

        TestContext {
            ctx,
            alice,
            bob,
            event,
        }
    }

    #[actix_web::test]
    async fn participant_leaves_event() {
        let TestContext { ctx, bob, event, .. } = setup().await;

        let mut usecase = LeaveEventUseCase {
            event_id: event.id.clone(),
            user_id: bob.id.clone(),
        };
        assert_eq!(usecase.execute(&ctx).await, Ok(UseCaseResponse::Left));

        let stored = ctx.repos.events.find(&event.id).await.unwrap().unwrap();
        assert!(!stored.is_participant(&bob.id));
        assert_eq!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::NotParticipant)
        );
    }

    #[actix_web::test]
    async fn owner_deletes_event() {
        let TestContext {
            ctx, alice, event, ..
        } = setup().await;

        let mut usecase = LeaveEventUseCase {
            event_id: event.id.clone(),
            user_id: alice.id.clone(),
        };
        assert_eq!(usecase.execute(&ctx).await, Ok(UseCaseResponse::Deleted));
        assert!(ctx.repos.events.find(&event.id).await.unwrap().is_none());
        assert_eq!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::NotFound(event.id.clone()))
        );
    }

    #[actix_web::test]
    async fn participant_cannot_leave_matched_event() {
        let TestContext { ctx, bob, event, .. } = setup().await;
        let stored = ctx.repos.events.find(&event.id).await.unwrap().unwrap();
        ctx.repos
            .events
            .complete_matching(&event.id, stored.version, &[])
            .await
            .unwrap();

        let mut usecase = LeaveEventUseCase {
            event_id: event.id.clone(),
            user_id: bob.id.clone(),
        };
        assert_eq!(usecase.execute(&ctx).await, Err(UseCaseError::EventClosed));
    }
}
