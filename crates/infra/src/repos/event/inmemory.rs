use super::IEventRepo;
use crate::repos::shared::inmemory_repo::*;
use gifting_domain::{Assignment, EventStatus, GiftEvent, Participant, ID};

pub struct InMemoryEventRepo {
    events: std::sync::Mutex<Vec<GiftEvent>>,
}

impl InMemoryEventRepo {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IEventRepo for InMemoryEventRepo {
    async fn insert(&self, e: &GiftEvent) -> anyhow::Result<()> {
        if insert_unless(e, &self.events, |existing| {
            existing.code == e.code || existing.id == e.id
        }) {
            Ok(())
        } else {
            Err(anyhow::Error::msg(format!(
                "Event with id {} or code {} already exists",
                e.id, e.code
            )))
        }
    }

    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<GiftEvent>> {
        Ok(find(event_id, &self.events))
    }

    async fn find_by_code(&self, code: &str) -> anyhow::Result<Option<GiftEvent>> {
        Ok(find_by(&self.events, |e| e.code == code).into_iter().next())
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<GiftEvent>> {
        Ok(find_by(&self.events, |e| {
            e.is_owner(user_id) || e.is_participant(user_id)
        }))
    }

    async fn add_participant(
        &self,
        event_id: &ID,
        participant: &Participant,
    ) -> anyhow::Result<bool> {
        Ok(update_one(event_id, &self.events, |e| {
            if !e.is_active() || e.is_participant(&participant.user_id) {
                return false;
            }
            e.participants.push(participant.clone());
            e.version += 1;
            true
        }))
    }

    async fn remove_participant(&self, event_id: &ID, user_id: &ID) -> anyhow::Result<bool> {
        Ok(update_one(event_id, &self.events, |e| {
            let before = e.participants.len();
            if !e.is_active() {
                return false;
            }
            e.participants.retain(|p| p.user_id != *user_id);
            if e.participants.len() == before {
                return false;
            }
            e.version += 1;
            true
        }))
    }

    async fn set_wishlist(
        &self,
        event_id: &ID,
        user_id: &ID,
        wishlist: &[String],
    ) -> anyhow::Result<bool> {
        Ok(update_one(event_id, &self.events, |e| {
            if !e.is_active() {
                return false;
            }
            match e.participants.iter_mut().find(|p| p.user_id == *user_id) {
                Some(participant) => {
                    participant.wishlist = wishlist.to_vec();
                    true
                }
                None => false,
            }
        }))
    }

    async fn complete_matching(
        &self,
        event_id: &ID,
        expected_version: i64,
        assignments: &[Assignment],
    ) -> anyhow::Result<bool> {
        Ok(update_one(event_id, &self.events, |e| {
            if !e.is_active() || e.version != expected_version {
                return false;
            }
            e.status = EventStatus::Matched;
            e.assignments = Some(assignments.to_vec());
            true
        }))
    }

    async fn delete(&self, event_id: &ID) -> anyhow::Result<Option<GiftEvent>> {
        Ok(delete(event_id, &self.events))
    }
}
