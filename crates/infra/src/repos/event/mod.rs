mod inmemory;
mod postgres;

pub use inmemory::InMemoryEventRepo;
pub use postgres::PostgresEventRepo;

use gifting_domain::{Assignment, GiftEvent, Participant, ID};

/// Storage of `GiftEvent`s.
///
/// Every method that changes a `GiftEvent` after creation is a conditional
/// write: it is applied atomically only when its precondition holds on the
/// stored record and reports whether it was applied.
#[async_trait::async_trait]
pub trait IEventRepo: Send + Sync {
    /// Fails when the join code is already taken
    async fn insert(&self, e: &GiftEvent) -> anyhow::Result<()>;
    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<GiftEvent>>;
    async fn find_by_code(&self, code: &str) -> anyhow::Result<Option<GiftEvent>>;
    /// Events owned by or joined by the user
    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<GiftEvent>>;
    /// Appends the participant and bumps the version if the event is active
    /// and the user has not joined yet
    async fn add_participant(&self, event_id: &ID, participant: &Participant)
        -> anyhow::Result<bool>;
    /// Removes the participant and bumps the version if the event is active
    async fn remove_participant(&self, event_id: &ID, user_id: &ID) -> anyhow::Result<bool>;
    /// Replaces the wishlist of the participant if the event is active
    async fn set_wishlist(
        &self,
        event_id: &ID,
        user_id: &ID,
        wishlist: &[String],
    ) -> anyhow::Result<bool>;
    /// Stores the assignments and flips the status to matched, if the event
    /// is still active and still at `expected_version`
    async fn complete_matching(
        &self,
        event_id: &ID,
        expected_version: i64,
        assignments: &[Assignment],
    ) -> anyhow::Result<bool>;
    async fn delete(&self, event_id: &ID) -> anyhow::Result<Option<GiftEvent>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GiftingContext;
    use gifting_domain::{EventStatus, User};

    fn user(name: &str) -> User {
        User::new(
            ID::new(),
            name.into(),
            format!("{}@x.com", name.to_lowercase()),
        )
    }

    fn assignments() -> Vec<Assignment> {
        vec![Assignment {
            giver_email: "alice@x.com".into(),
            receiver_name: "Bob".into(),
            receiver_wishlist: vec!["Book".into()],
        }]
    }

    #[tokio::test]
    async fn create_find_and_delete() {
        let ctx = GiftingContext::create_inmemory();
        let owner = user("Alice");
        let event = GiftEvent::new("Office".into(), 100, &owner, 0);

        assert!(ctx.repos.events.insert(&event).await.is_ok());
        assert_eq!(ctx.repos.events.find(&event.id).await.unwrap(), Some(event.clone()));
        assert_eq!(
            ctx.repos.events.find_by_code(&event.code).await.unwrap(),
            Some(event.clone())
        );
        assert_eq!(ctx.repos.events.find_by_user(&owner.id).await.unwrap().len(), 1);
        assert!(ctx.repos.events.find_by_user(&ID::new()).await.unwrap().is_empty());

        assert_eq!(ctx.repos.events.delete(&event.id).await.unwrap(), Some(event.clone()));
        assert!(ctx.repos.events.find(&event.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejects_duplicate_join_codes() {
        let ctx = GiftingContext::create_inmemory();
        let event = GiftEvent::new("Office".into(), 100, &user("Alice"), 0);
        let mut other = GiftEvent::new("Family".into(), 100, &user("Bob"), 0);
        other.code = event.code.clone();

        assert!(ctx.repos.events.insert(&event).await.is_ok());
        assert!(ctx.repos.events.insert(&other).await.is_err());
    }

    #[tokio::test]
    async fn adds_each_participant_once_and_bumps_version() {
        let ctx = GiftingContext::create_inmemory();
        let event = GiftEvent::new("Office".into(), 100, &user("Alice"), 0);
        ctx.repos.events.insert(&event).await.unwrap();
        let bob = Participant::from_user(&user("Bob"));

        assert!(ctx.repos.events.add_participant(&event.id, &bob).await.unwrap());
        assert!(!ctx.repos.events.add_participant(&event.id, &bob).await.unwrap());

        let stored = ctx.repos.events.find(&event.id).await.unwrap().unwrap();
        assert_eq!(stored.participants.len(), 2);
        assert_eq!(stored.version, event.version + 1);
        assert_eq!(
            ctx.repos.events.find_by_user(&bob.user_id).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn completes_matching_at_most_once() {
        let ctx = GiftingContext::create_inmemory();
        let event = GiftEvent::new("Office".into(), 100, &user("Alice"), 0);
        ctx.repos.events.insert(&event).await.unwrap();

        let first = assignments();
        let mut second = assignments();
        second[0].receiver_name = "Carol".into();

        assert!(ctx
            .repos
            .events
            .complete_matching(&event.id, event.version, &first)
            .await
            .unwrap());
        assert!(!ctx
            .repos
            .events
            .complete_matching(&event.id, event.version, &second)
            .await
            .unwrap());

        let stored = ctx.repos.events.find(&event.id).await.unwrap().unwrap();
        assert_eq!(stored.status, EventStatus::Matched);
        assert_eq!(stored.assignments, Some(first));
    }

    #[tokio::test]
    async fn refuses_matching_when_roster_changed() {
        let ctx = GiftingContext::create_inmemory();
        let event = GiftEvent::new("Office".into(), 100, &user("Alice"), 0);
        ctx.repos.events.insert(&event).await.unwrap();
        ctx.repos
            .events
            .add_participant(&event.id, &Participant::from_user(&user("Bob")))
            .await
            .unwrap();

        assert!(!ctx
            .repos
            .events
            .complete_matching(&event.id, event.version, &assignments())
            .await
            .unwrap());
        let stored = ctx.repos.events.find(&event.id).await.unwrap().unwrap();
        assert_eq!(stored.status, EventStatus::Active);
        assert!(stored.assignments.is_none());
    }

    #[tokio::test]
    async fn freezes_roster_and_wishlists_once_matched() {
        let ctx = GiftingContext::create_inmemory();
        let alice = user("Alice");
        let event = GiftEvent::new("Office".into(), 100, &alice, 0);
        ctx.repos.events.insert(&event).await.unwrap();

        let wishlist = vec!["Tea".to_string()];
        assert!(ctx
            .repos
            .events
            .set_wishlist(&event.id, &alice.id, &wishlist)
            .await
            .unwrap());
        assert!(!ctx
            .repos
            .events
            .set_wishlist(&event.id, &ID::new(), &wishlist)
            .await
            .unwrap());

        ctx.repos
            .events
            .complete_matching(&event.id, event.version, &assignments())
            .await
            .unwrap();

        let bob = Participant::from_user(&user("Bob"));
        assert!(!ctx.repos.events.add_participant(&event.id, &bob).await.unwrap());
        assert!(!ctx
            .repos
            .events
            .set_wishlist(&event.id, &alice.id, &[])
            .await
            .unwrap());
        assert!(!ctx
            .repos
            .events
            .remove_participant(&event.id, &alice.id)
            .await
            .unwrap());

        let stored = ctx.repos.events.find(&event.id).await.unwrap().unwrap();
        assert_eq!(stored.participants.len(), 1);
        assert_eq!(stored.participants[0].wishlist, wishlist);
    }
}
