use super::subscribers::DispatchNotificationsOnEventMatched;
use crate::shared::usecase::{Subscriber, UseCase};
use gifting_domain::{
    matching::{build_assignments, generate_cycle, resolve_participants, MIN_PARTICIPANTS},
    Assignment, GiftEvent, ID,
};
use gifting_infra::GiftingContext;
use tracing::{info, warn};

/// How many times a run reads the event again after the roster changed
/// under it before giving up
const MAX_COMMIT_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum MatchingOutcome {
    /// The event is not active
    NotEligible,
    /// Not enough participants with a known name and email
    InsufficientParticipants(usize),
    /// Another run committed its assignments first
    AlreadyMatched,
    /// The roster kept changing while matching
    Superseded,
    Matched {
        event_id: ID,
        assignments: Vec<Assignment>,
    },
}

/// Matches every participant of an event with the participant they buy a
/// present for, and commits the assignments at most once.
#[derive(Debug)]
pub struct RunMatchingUseCase {
    pub event_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl RunMatchingUseCase {
    /// Returns `None` when the commit lost against a concurrent write
    async fn try_match(
        &self,
        event: &GiftEvent,
        ctx: &GiftingContext,
    ) -> Result<Option<MatchingOutcome>, UseCaseError> {
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

        let resolution = resolve_participants(&event.participants, &users);
        for user_id in &resolution.unresolved {
            warn!(
                "Participant {} of event {} has no name or email and is left out of the matching",
                user_id, event.id
            );
        }

        let participant_count = resolution.resolved.len();
        if participant_count < MIN_PARTICIPANTS {
            info!(
                "Event {} has {} valid participants, which is not enough for a matching",
                event.id, participant_count
            );
            return Ok(Some(MatchingOutcome::InsufficientParticipants(
                participant_count,
            )));
        }

        let cycle = match generate_cycle(resolution.resolved, &mut rand::thread_rng()) {
            Some(cycle) => cycle,
            None => {
                return Ok(Some(MatchingOutcome::InsufficientParticipants(
                    participant_count,
                )))
            }
        };
        let assignments = build_assignments(&cycle);

        let committed = ctx
            .repos
            .events
            .complete_matching(&event.id, event.version, &assignments)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        if committed {
            info!(
                "Event {} was matched with {} participants",
                event.id, participant_count
            );
            Ok(Some(MatchingOutcome::Matched {
                event_id: event.id.clone(),
                assignments,
            }))
        } else {
            Ok(None)
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RunMatchingUseCase {
    type Response = MatchingOutcome;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &GiftingContext) -> Result<Self::Response, Self::Error> {
        for attempt in 0..MAX_COMMIT_ATTEMPTS {
            let event = match ctx.repos.events.find(&self.event_id).await {
                Ok(Some(event)) => event,
                Ok(None) => return Err(UseCaseError::NotFound(self.event_id.clone())),
                Err(_) => return Err(UseCaseError::StorageError),
            };

            if !event.is_active() {
                return Ok(if attempt == 0 {
                    MatchingOutcome::NotEligible
                } else {
                    MatchingOutcome::AlreadyMatched
                });
            }

            if let Some(outcome) = self.try_match(&event, ctx).await? {
                return Ok(outcome);
            }
            info!(
                "Event {} changed while being matched, discarding the assignments",
                event.id
            );
        }

        warn!(
            "Gave up matching event {} after {} attempts",
            self.event_id, MAX_COMMIT_ATTEMPTS
        );
        Ok(MatchingOutcome::Superseded)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(DispatchNotificationsOnEventMatched)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;
    use gifting_domain::{EventStatus, Participant, User};
    use gifting_infra::{IEventRepo, IUserRepo, InMemoryMailer, InMemoryUserRepo};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn user(name: &str) -> User {
        User::new(
            ID::new(),
            name.into(),
            format!("{}@x.com", name.to_lowercase()),
        )
    }

    struct TestContext {
        ctx: GiftingContext,
        mailer: Arc<InMemoryMailer>,
        event: GiftEvent,
    }

    /// An active event owned by the first user where every user has joined
    async fn setup(users: Vec<User>) -> TestContext {
        let mailer = Arc::new(InMemoryMailer::new());
        let ctx = GiftingContext::create_inmemory().with_mailer(mailer.clone());
        let mut event = GiftEvent::new("Office".into(), 0, &users[0], 0);
        for user in &users {
            ctx.repos.users.insert(user).await.unwrap();
        }
        for user in users.iter().skip(1) {
            event.participants.push(Participant::from_user(user));
        }
        ctx.repos.events.insert(&event).await.unwrap();

        TestContext { ctx, mailer, event }
    }

    async fn wait_for_mails(mailer: &InMemoryMailer, count: usize) {
        for _ in 0..50 {
            if mailer.sent().len() >= count {
                return;
            }
            actix_web::rt::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[actix_web::test]
    async fn matches_two_participants_with_each_other() {
        let alice = user("Alice");
        let bob = user("Bob");
        let TestContext { ctx, mailer, event } = setup(vec![alice, bob]).await;
        ctx.repos
            .events
            .set_wishlist(&event.id, &event.participants[1].user_id, &["Book".to_string()])
            .await
            .unwrap();

        let usecase = RunMatchingUseCase {
            event_id: event.id.clone(),
        };
        let res = execute(usecase, &ctx).await.unwrap();

        let mut assignments = match res {
            MatchingOutcome::Matched { assignments, .. } => assignments,
            other => panic!("Expected a matching, got {:?}", other),
        };
        assignments.sort_by(|a, b| a.giver_email.cmp(&b.giver_email));
        assert_eq!(
            assignments,
            vec![
                Assignment {
                    giver_email: "alice@x.com".into(),
                    receiver_name: "Bob".into(),
                    receiver_wishlist: vec!["Book".into()],
                },
                Assignment {
                    giver_email: "bob@x.com".into(),
                    receiver_name: "Alice".into(),
                    receiver_wishlist: vec![],
                },
            ]
        );

        let stored = ctx.repos.events.find(&event.id).await.unwrap().unwrap();
        assert_eq!(stored.status, EventStatus::Matched);
        assert_eq!(stored.assignments.unwrap().len(), 2);

        wait_for_mails(&mailer, 2).await;
        let mut recipients = mailer.sent().into_iter().map(|m| m.to).collect::<Vec<_>>();
        recipients.sort();
        assert_eq!(recipients, vec!["alice@x.com", "bob@x.com"]);
    }

    #[actix_web::test]
    async fn leaves_event_active_with_too_few_participants() {
        let TestContext { ctx, mailer, event } = setup(vec![user("Alice")]).await;

        let mut usecase = RunMatchingUseCase {
            event_id: event.id.clone(),
        };
        let res = usecase.execute(&ctx).await;

        assert_eq!(res, Ok(MatchingOutcome::InsufficientParticipants(1)));
        let stored = ctx.repos.events.find(&event.id).await.unwrap().unwrap();
        assert_eq!(stored.status, EventStatus::Active);
        assert!(stored.assignments.is_none());
        assert!(mailer.sent().is_empty());
    }

    #[actix_web::test]
    async fn leaves_out_participants_without_identity() {
        let TestContext { ctx, event, .. } = setup(vec![user("Alice"), user("Bob")]).await;
        let ghost = Participant::new(ID::new());
        ctx.repos.events.add_participant(&event.id, &ghost).await.unwrap();

        let mut usecase = RunMatchingUseCase {
            event_id: event.id.clone(),
        };
        match usecase.execute(&ctx).await {
            Ok(MatchingOutcome::Matched { assignments, .. }) => {
                assert_eq!(assignments.len(), 2);
            }
            other => panic!("Expected a matching, got {:?}", other),
        }
    }

    #[actix_web::test]
    async fn does_nothing_for_matched_event() {
        let TestContext { ctx, event, .. } =
            setup(vec![user("Alice"), user("Bob"), user("Carol")]).await;

        let mut usecase = RunMatchingUseCase {
            event_id: event.id.clone(),
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Ok(MatchingOutcome::Matched { .. })
        ));
        let first = ctx.repos.events.find(&event.id).await.unwrap().unwrap();

        assert_eq!(usecase.execute(&ctx).await, Ok(MatchingOutcome::NotEligible));
        let second = ctx.repos.events.find(&event.id).await.unwrap().unwrap();
        assert_eq!(first.assignments, second.assignments);
    }

    #[actix_web::test]
    async fn keeps_assignments_when_wishlists_change_afterwards() {
        let TestContext { ctx, event, .. } = setup(vec![user("Alice"), user("Bob")]).await;
        let bob_id = event.participants[1].user_id.clone();
        ctx.repos
            .events
            .set_wishlist(&event.id, &bob_id, &["Book".to_string()])
            .await
            .unwrap();

        let mut usecase = RunMatchingUseCase {
            event_id: event.id.clone(),
        };
        usecase.execute(&ctx).await.unwrap();

        let applied = ctx
            .repos
            .events
            .set_wishlist(&event.id, &bob_id, &["Car".to_string()])
            .await
            .unwrap();
        assert!(!applied);

        let stored = ctx.repos.events.find(&event.id).await.unwrap().unwrap();
        let assignment = stored.assignment_for("alice@x.com").unwrap();
        assert_eq!(assignment.receiver_wishlist, vec!["Book".to_string()]);
    }

    #[actix_web::test]
    async fn fails_for_unknown_event() {
        let ctx = GiftingContext::create_inmemory();
        let event_id = ID::new();
        let mut usecase = RunMatchingUseCase {
            event_id: event_id.clone(),
        };

        assert_eq!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::NotFound(event_id))
        );
    }

    /// What happens to the event while a run is between reading it and
    /// writing the assignments
    enum Interference {
        RivalCommit(Vec<Assignment>),
        Join(Participant),
    }

    /// User store that lets a concurrent writer touch the event the first
    /// time the participants are looked up
    struct InterferingUserRepo {
        inner: InMemoryUserRepo,
        events: Arc<dyn IEventRepo>,
        event_id: ID,
        interference: Mutex<Option<Interference>>,
    }

    #[async_trait::async_trait]
    impl IUserRepo for InterferingUserRepo {
        async fn insert(&self, user: &User) -> anyhow::Result<()> {
            self.inner.insert(user).await
        }

        async fn save(&self, user: &User) -> anyhow::Result<()> {
            self.inner.save(user).await
        }

        async fn find(&self, user_id: &ID) -> anyhow::Result<Option<User>> {
            self.inner.find(user_id).await
        }

        async fn find_many(&self, user_ids: &[ID]) -> anyhow::Result<Vec<User>> {
            let interference = self.interference.lock().unwrap().take();
            match interference {
                Some(Interference::RivalCommit(assignments)) => {
                    let event = self.events.find(&self.event_id).await?.unwrap();
                    self.events
                        .complete_matching(&self.event_id, event.version, &assignments)
                        .await?;
                }
                Some(Interference::Join(participant)) => {
                    self.events
                        .add_participant(&self.event_id, &participant)
                        .await?;
                }
                None => (),
            }
            self.inner.find_many(user_ids).await
        }
    }

    async fn interfere(ctx: &mut GiftingContext, event: &GiftEvent, interference: Interference) {
        let inner = InMemoryUserRepo::new();
        for p in &event.participants {
            let user = ctx.repos.users.find(&p.user_id).await.unwrap().unwrap();
            inner.insert(&user).await.unwrap();
        }
        ctx.repos.users = Arc::new(InterferingUserRepo {
            inner,
            events: ctx.repos.events.clone(),
            event_id: event.id.clone(),
            interference: Mutex::new(Some(interference)),
        });
    }

    #[actix_web::test]
    async fn discards_assignments_when_another_run_committed_first() {
        let TestContext {
            mut ctx,
            mailer,
            event,
        } = setup(vec![user("Alice"), user("Bob"), user("Carol")]).await;
        let rival = vec![Assignment {
            giver_email: "alice@x.com".into(),
            receiver_name: "Rival".into(),
            receiver_wishlist: vec![],
        }];
        interfere(&mut ctx, &event, Interference::RivalCommit(rival.clone())).await;

        let usecase = RunMatchingUseCase {
            event_id: event.id.clone(),
        };
        let res = execute(usecase, &ctx).await;

        assert_eq!(res, Ok(MatchingOutcome::AlreadyMatched));
        let stored = ctx.repos.events.find(&event.id).await.unwrap().unwrap();
        assert_eq!(stored.status, EventStatus::Matched);
        assert_eq!(stored.assignments, Some(rival));
        actix_web::rt::time::sleep(Duration::from_millis(50)).await;
        assert!(mailer.sent().is_empty());
    }

    #[actix_web::test]
    async fn includes_participant_who_joined_during_the_run() {
        let TestContext { mut ctx, event, .. } = setup(vec![user("Alice"), user("Bob")]).await;
        let carol = user("Carol");
        ctx.repos.users.insert(&carol).await.unwrap();
        interfere(
            &mut ctx,
            &event,
            Interference::Join(Participant::from_user(&carol)),
        )
        .await;

        let mut usecase = RunMatchingUseCase {
            event_id: event.id.clone(),
        };
        match usecase.execute(&ctx).await {
            Ok(MatchingOutcome::Matched { assignments, .. }) => {
                assert_eq!(assignments.len(), 3);
                assert!(assignments.iter().any(|a| a.giver_email == "carol@x.com"));
            }
            other => panic!("Expected a matching, got {:?}", other),
        }
    }
}
