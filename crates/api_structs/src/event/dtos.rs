use gifting_domain::{Assignment, EventStatus, GiftEvent, User, ID};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDTO {
    pub user_id: ID,
    pub name: Option<String>,
    pub email: Option<String>,
    pub wishlist: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventDTO {
    pub id: ID,
    pub name: String,
    pub deadline: i64,
    pub owner_id: ID,
    pub owner_name: String,
    pub code: String,
    pub status: EventStatus,
    pub participants: Vec<ParticipantDTO>,
    pub created: i64,
}

impl EventDTO {
    pub fn new(event: GiftEvent) -> Self {
        Self {
            id: event.id,
            name: event.name,
            deadline: event.deadline,
            owner_id: event.owner_id,
            owner_name: event.owner_name,
            code: event.code,
            status: event.status,
            participants: event
                .participants
                .into_iter()
                .map(|p| ParticipantDTO {
                    user_id: p.user_id,
                    name: p.name,
                    email: p.email,
                    wishlist: p.wishlist,
                })
                .collect(),
            created: event.created,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDTO {
    pub receiver_name: String,
    pub receiver_wishlist: Vec<String>,
}

impl AssignmentDTO {
    pub fn new(assignment: &Assignment) -> Self {
        Self {
            receiver_name: assignment.receiver_name.clone(),
            receiver_wishlist: assignment.receiver_wishlist.clone(),
        }
    }
}

/// An event as seen by one user. The full list of assignments is never
/// part of it, only the assignment where the user is the giver.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventViewDTO {
    pub id: ID,
    pub name: String,
    pub deadline: i64,
    pub owner_id: ID,
    pub owner_name: String,
    pub code: String,
    pub status: EventStatus,
    pub is_owner: bool,
    pub participants: Vec<ParticipantDTO>,
    pub my_assignment: Option<AssignmentDTO>,
    pub created: i64,
}

fn known(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

impl EventViewDTO {
    /// `users` are the live profiles of the participants, which take
    /// precedence over what was stored when they joined
    pub fn new(event: GiftEvent, viewer: &User, users: &[User]) -> Self {
        let users_by_id = users.iter().map(|u| (&u.id, u)).collect::<HashMap<_, _>>();
        let is_owner = event.is_owner(&viewer.id);
        let my_assignment = if event.is_participant(&viewer.id) {
            event.assignment_for(&viewer.email).map(AssignmentDTO::new)
        } else {
            None
        };

        let participants = event
            .participants
            .into_iter()
            .map(|p| {
                let user = users_by_id.get(&p.user_id);
                let name = known(user.map(|u| &u.name))
                    .or_else(|| known(p.name.as_ref()))
                    .unwrap_or_else(|| UNKNOWN.to_string());
                let email = known(user.map(|u| &u.email))
                    .or_else(|| known(p.email.as_ref()))
                    .unwrap_or_else(|| UNKNOWN.to_string());
                ParticipantDTO {
                    user_id: p.user_id,
                    name: Some(name),
                    email: Some(email),
                    wishlist: p.wishlist,
                }
            })
            .collect();

        Self {
            id: event.id,
            name: event.name,
            deadline: event.deadline,
            owner_id: event.owner_id,
            owner_name: event.owner_name,
            code: event.code,
            status: event.status,
            is_owner,
            participants,
            my_assignment,
            created: event.created,
        }
    }
}
