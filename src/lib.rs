// src/lib.rs

pub mod common;
pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod services;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::config::AppState;

// Monta todas as rotas da API
pub fn app_router(app_state: AppState) -> Router {
    let pallet_product_routes = Router::new()
        .route("/", get(handlers::pallets::get_snapshot))
        .route("/view", get(handlers::pallets::get_view))
        .route(
            "/{id}",
            patch(handlers::pallets::update_unit_count)
                .delete(handlers::pallets::remove_product),
        );

    let pallet_position_routes = Router::new()
        .route("/", post(handlers::pallets::create_position))
        .route(
            "/{id}",
            patch(handlers::pallets::set_position_enabled)
                .delete(handlers::pallets::delete_position),
        )
        .route("/{id}/products", post(handlers::pallets::add_product));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/pallet-products", pallet_product_routes)
        .nest("/api/pallet-positions", pallet_position_routes)
        .with_state(app_state)
}
