mod event;
pub mod matching;
pub mod notification;
mod shared;
mod user;
mod wishlist;

pub use event::{Assignment, EventStatus, GiftEvent, InvalidEventStatusError, Participant};
pub use notification::MailMessage;
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use user::User;
pub use wishlist::{EditedWishlistItem, Wishlist, WishlistItem, WishlistRole};
