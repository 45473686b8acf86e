mod create_wishlist;
mod delete_wishlist;
mod get_wishlist;
mod get_wishlists;
mod join_wishlist;
mod leave_wishlist;
mod update_wishlist_items;

use actix_web::web;
use create_wishlist::create_wishlist_controller;
use delete_wishlist::delete_wishlist_controller;
use get_wishlist::get_wishlist_controller;
use get_wishlists::get_wishlists_controller;
use join_wishlist::join_wishlist_controller;
use leave_wishlist::leave_wishlist_controller;
use update_wishlist_items::update_wishlist_items_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/wishlists", web::post().to(create_wishlist_controller));
    cfg.route("/wishlists", web::get().to(get_wishlists_controller));

    cfg.route(
        "/wishlists/{wishlist_id}",
        web::get().to(get_wishlist_controller),
    );
    cfg.route(
        "/wishlists/{wishlist_id}",
        web::put().to(update_wishlist_items_controller),
    );
    cfg.route(
        "/wishlists/{wishlist_id}",
        web::delete().to(delete_wishlist_controller),
    );
    cfg.route(
        "/wishlists/{wishlist_id}/join",
        web::post().to(join_wishlist_controller),
    );
    cfg.route(
        "/wishlists/{wishlist_id}/leave",
        web::post().to(leave_wishlist_controller),
    );
}
