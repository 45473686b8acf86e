use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A `User` as known by the session layer. The name and email are kept
/// in sync with the claims of the latest session seen for the `User`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: ID,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(id: ID, name: String, email: String) -> Self {
        Self { id, name, email }
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}
