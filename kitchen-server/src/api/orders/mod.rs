//! Order API Module
//!
//! Checkout, manual-order management, payments, and the per-day
//! cooking/bagging/payment views.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get_orders).post(handler::create_order))
        .route("/manual", post(handler::create_manual_order))
        .route("/manual/{id}", put(handler::update_manual_order))
        .route("/dates", get(handler::get_dates_with_orders))
        .route("/views/cooking", get(handler::get_cooking_view))
        .route("/views/bagging", get(handler::get_bagging_view))
        .route("/views/payment", get(handler::get_payment_view))
        .route("/bagging/{user_id}/mark", post(handler::mark_person_bagged))
        .route("/bagging/{user_id}/unmark", post(handler::unmark_person_bagged))
        .route("/{id}", get(handler::get_order).delete(handler::delete_order))
        .route("/{id}/payment", put(handler::update_payment))
        .route("/{id}/paid-in-full", post(handler::mark_paid_in_full))
}
