use axum::{routing::get, routing::put, Router};

use crate::http::handlers;
use crate::AppState;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn account() -> Router<AppState> {
    Router::new()
        .route("/account", get(handlers::get_account))
        .route("/account/settings", put(handlers::update_settings))
        .route(
            "/account/device-tokens",
            get(handlers::list_device_tokens)
                .post(handlers::register_device_token)
                .delete(handlers::remove_device_token),
        )
}

pub fn items() -> Router<AppState> {
    Router::new()
        .route("/items", get(handlers::list_items).post(handlers::create_item))
        .route(
            "/items/:id",
            get(handlers::get_item)
                .patch(handlers::update_item)
                .delete(handlers::delete_item),
        )
}
