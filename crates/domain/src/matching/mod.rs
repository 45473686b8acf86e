//! Secret Santa matching: who gives a present to whom.

mod assignment;
mod derangement;
mod identity;

pub use assignment::build_assignments;
pub use derangement::{generate_cycle, GiftCycle};
pub use identity::{resolve_participants, IdentityResolution, ResolvedParticipant};

/// Minimum number of resolvable participants needed to match an event
pub const MIN_PARTICIPANTS: usize = 2;
