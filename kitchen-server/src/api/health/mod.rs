//! Health API Module

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    database: &'static str,
}

async fn health(State(state): State<ServerState>) -> AppResult<Json<Health>> {
    state.db.ping().await?;
    Ok(Json(Health {
        status: "ok",
        database: "ok",
    }))
}
