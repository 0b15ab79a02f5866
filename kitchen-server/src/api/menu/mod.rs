//! Menu Calendar API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/range", get(handler::get_by_date_range))
        .route("/custom", post(handler::create_custom_entry))
        .route("/entries/{id}/convert", post(handler::convert_custom_to_normal))
        .route("/{date}", get(handler::get_by_date).put(handler::save))
}
