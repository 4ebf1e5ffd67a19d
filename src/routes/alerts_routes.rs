use axum::{Router, routing::{delete, get}};
use crate::{AppState, controllers::alerts_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/users/:owner_id/alerts",
            get(alerts_controller::get_alerts).post(alerts_controller::post_create_alert),
        )
        .route("/users/:owner_id/alerts/:collection", delete(alerts_controller::delete_alerts))
}
