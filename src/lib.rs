//! CRIPS transport backend
//!
//! API de scheduling y seguimiento de shipments del vivero: programación de
//! órdenes confirmadas, disponibilidad de vehículos y conductores, tracker de
//! estados, controles de calidad, flota, combustible y reportes.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::Router;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors::cors_layer;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .nest("/api", routes::create_api_router(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}
