//! Bookshop API Library
//!
//! Members, books and orders of a small online bookstore over SeaORM, served
//! as server-rendered forms and a versioned JSON API.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod queries;
pub mod repositories;
pub mod seed;
pub mod services;
pub mod tracing;
pub mod web;

use axum::Router;
use http::HeaderValue;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::db::{DbPool, StatementCounter};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: Arc<config::AppConfig>,
    pub services: handlers::AppServices,
    pub statements: StatementCounter,
}

impl AppState {
    pub fn new(db: DbPool, config: config::AppConfig, statements: StatementCounter) -> Self {
        let db = Arc::new(db);
        let services = handlers::AppServices::new(db.clone(), config.batch_fetch_size());
        Self {
            db,
            config: Arc::new(config),
            services,
            statements,
        }
    }
}

/// Builds the CORS layer from config: explicit origins when configured,
/// otherwise permissive (development or explicit opt-in).
pub fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Pages, JSON API, health and Swagger UI behind the tracing, CORS and
/// request-id layers.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::<AppState>::new()
        .merge(web::web_routes())
        .merge(handlers::api_routes())
        .merge(health::health_routes())
        .merge(openapi::swagger_ui())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        .layer(cors)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}
