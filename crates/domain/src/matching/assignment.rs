use super::{derangement::GiftCycle, identity::ResolvedParticipant};
use crate::Assignment;

/// Turns every (giver, receiver) edge of the `GiftCycle` into an `Assignment`,
/// copying the receiver's current wishlist into it.
pub fn build_assignments(cycle: &GiftCycle<ResolvedParticipant>) -> Vec<Assignment> {
    cycle
        .pairs()
        .map(|(giver, receiver)| Assignment {
            giver_email: giver.email.clone(),
            receiver_name: receiver.name.clone(),
            receiver_wishlist: receiver.wishlist.clone(),
        })
        .collect()
}
