use crate::{Participant, User, ID};
use std::collections::HashMap;

/// A participant whose name and email are known, and can therefore
/// take part in the matching
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParticipant {
    pub user_id: ID,
    pub name: String,
    pub email: String,
    pub wishlist: Vec<String>,
}

#[derive(Debug, Default)]
pub struct IdentityResolution {
    pub resolved: Vec<ResolvedParticipant>,
    /// Participants without a usable name or email
    pub unresolved: Vec<ID>,
}

fn non_empty(value: Option<&String>) -> Option<&String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Resolves the name and email of every participant.
///
/// For each field the value from the user store wins, then the value
/// stored on the participant when it joined. Participants still missing
/// a name or an email end up in `unresolved`. Order is preserved.
pub fn resolve_participants(participants: &[Participant], users: &[User]) -> IdentityResolution {
    let users_by_id = users
        .iter()
        .map(|u| (&u.id, u))
        .collect::<HashMap<_, _>>();

    let mut resolution = IdentityResolution::default();
    for participant in participants {
        let user = users_by_id.get(&participant.user_id);
        let name = non_empty(user.map(|u| &u.name)).or(non_empty(participant.name.as_ref()));
        let email = non_empty(user.map(|u| &u.email)).or(non_empty(participant.email.as_ref()));

        match (name, email) {
            (Some(name), Some(email)) => resolution.resolved.push(ResolvedParticipant {
                user_id: participant.user_id.clone(),
                name: name.clone(),
                email: email.clone(),
                wishlist: participant.wishlist.clone(),
            }),
            _ => resolution.unresolved.push(participant.user_id.clone()),
        }
    }

    resolution
}
