mod event;
mod status;
mod wishlist;

pub mod dtos {
    pub use crate::event::dtos::*;
    pub use crate::wishlist::dtos::*;
}

pub use crate::event::api::*;
pub use crate::status::api::*;
pub use crate::wishlist::api::*;
