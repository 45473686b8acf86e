use crate::shared::entity::{Entity, ID};
use crate::user::User;
use gifting_utils::create_join_code;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Lifecycle of a `GiftEvent`. The only transition is `Active` -> `Matched`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Open for joining and wishlist edits
    Active,
    /// Assignments have been committed, terminal
    Matched,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Matched => "matched",
        }
    }
}

impl Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Unknown event status: {0}")]
pub struct InvalidEventStatusError(String);

impl FromStr for EventStatus {
    type Err = InvalidEventStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "matched" => Ok(Self::Matched),
            _ => Err(InvalidEventStatusError(s.to_string())),
        }
    }
}

/// A member of a `GiftEvent`.
///
/// `name` and `email` are the values known when the `User` joined and
/// are only used when the user store does not know better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: ID,
    pub name: Option<String>,
    pub email: Option<String>,
    pub wishlist: Vec<String>,
}

impl Participant {
    pub fn new(user_id: ID) -> Self {
        Self {
            user_id,
            name: None,
            email: None,
            wishlist: Vec::new(),
        }
    }

    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            name: Some(user.name.clone()),
            email: Some(user.email.clone()),
            wishlist: Vec::new(),
        }
    }
}

/// Who a giver buys a present for. The receiver is stored as a snapshot
/// so later wishlist edits never change a committed `Assignment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub giver_email: String,
    pub receiver_name: String,
    pub receiver_wishlist: Vec<String>,
}

/// A Secret Santa gift exchange
#[derive(Debug, Clone, PartialEq)]
pub struct GiftEvent {
    pub id: ID,
    pub name: String,
    /// Timestamp in millis after which the `GiftEvent` gets matched
    pub deadline: i64,
    pub owner_id: ID,
    pub owner_name: String,
    /// Code used by other `User`s to join
    pub code: String,
    pub status: EventStatus,
    pub participants: Vec<Participant>,
    /// Only set once the `GiftEvent` is `Matched`
    pub assignments: Option<Vec<Assignment>>,
    /// Bumped every time a participant joins or leaves
    pub version: i64,
    pub created: i64,
}

impl GiftEvent {
    /// Creates an active event where the owner is the first participant
    pub fn new(name: String, deadline: i64, owner: &User, created: i64) -> Self {
        Self {
            id: Default::default(),
            name,
            deadline,
            owner_id: owner.id.clone(),
            owner_name: owner.name.clone(),
            code: create_join_code(),
            status: EventStatus::Active,
            participants: vec![Participant::from_user(owner)],
            assignments: None,
            version: 0,
            created,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == EventStatus::Active
    }

    pub fn is_owner(&self, user_id: &ID) -> bool {
        self.owner_id == *user_id
    }

    pub fn participant(&self, user_id: &ID) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user_id == *user_id)
    }

    pub fn is_participant(&self, user_id: &ID) -> bool {
        self.participant(user_id).is_some()
    }

    /// Whether the matching has to run before this event can be served
    pub fn should_trigger_matching(&self, now: i64) -> bool {
        self.is_active() && now > self.deadline
    }

    /// The `Assignment` where the giver has the given email
    pub fn assignment_for(&self, giver_email: &str) -> Option<&Assignment> {
        self.assignments
            .as_ref()?
            .iter()
            .find(|a| a.giver_email == giver_email)
    }
}

impl Entity for GiftEvent {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> User {
        User::new(ID::new(), "Alice".into(), "a@x.com".into())
    }

    #[test]
    fn new_event_is_active_with_owner_as_participant() {
        let owner = owner();
        let event = GiftEvent::new("Office".into(), 1000, &owner, 10);

        assert_eq!(event.status, EventStatus::Active);
        assert!(event.assignments.is_none());
        assert_eq!(event.participants.len(), 1);
        assert!(event.is_participant(&owner.id));
        assert!(event.is_owner(&owner.id));
        assert_eq!(event.code.len(), 6);
    }

    #[test]
    fn triggers_matching_only_after_deadline_while_active() {
        let mut event = GiftEvent::new("Office".into(), 1000, &owner(), 10);

        assert!(!event.should_trigger_matching(999));
        assert!(!event.should_trigger_matching(1000));
        assert!(event.should_trigger_matching(1001));

        event.status = EventStatus::Matched;
        assert!(!event.should_trigger_matching(1001));
    }

    #[test]
    fn status_roundtrips_through_its_string_form() {
        for status in [EventStatus::Active, EventStatus::Matched] {
            assert_eq!(status.as_str().parse::<EventStatus>().unwrap(), status);
        }
        assert!("done".parse::<EventStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&EventStatus::Matched).unwrap(),
            "\"matched\""
        );
    }

    #[test]
    fn finds_assignment_by_giver_email() {
        let mut event = GiftEvent::new("Office".into(), 1000, &owner(), 10);
        assert!(event.assignment_for("a@x.com").is_none());

        event.assignments = Some(vec![Assignment {
            giver_email: "a@x.com".into(),
            receiver_name: "Bob".into(),
            receiver_wishlist: vec![],
        }]);
        assert_eq!(
            event.assignment_for("a@x.com").unwrap().receiver_name,
            "Bob"
        );
        assert!(event.assignment_for("b@x.com").is_none());
    }
}
