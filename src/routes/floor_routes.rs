use axum::{Router, routing::get};
use crate::{AppState, controllers::floor_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/collections/:collection/floor", get(floor_controller::get_floor))
}
