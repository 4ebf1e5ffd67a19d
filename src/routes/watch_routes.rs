use axum::{Router, routing::{delete, get}};
use crate::{AppState, controllers::watch_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/users/:owner_id/watches",
            get(watch_controller::get_watches).post(watch_controller::post_add_watch),
        )
        .route("/users/:owner_id/watches/:collection", delete(watch_controller::delete_watch))
        .route("/users/:owner_id/check", get(watch_controller::get_check_watches))
}
