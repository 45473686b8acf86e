mod create_event;
mod get_event;
mod get_events;
mod join_event;
mod leave_event;
mod run_matching;
mod subscribers;
mod update_wishlist;

use actix_web::web;
use create_event::create_event_controller;
use get_event::get_event_controller;
use get_events::get_events_controller;
use join_event::join_event_controller;
use leave_event::leave_event_controller;
use update_wishlist::update_wishlist_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/events", web::post().to(create_event_controller));
    cfg.route("/events", web::get().to(get_events_controller));

    cfg.route("/events/join", web::post().to(join_event_controller));

    cfg.route("/events/{event_id}", web::get().to(get_event_controller));
    cfg.route(
        "/events/{event_id}",
        web::put().to(update_wishlist_controller),
    );
    cfg.route(
        "/events/{event_id}/leave",
        web::post().to(leave_event_controller),
    );
}
