//! Garage API Library
//!
//! Backend for vehicle-repair-shop management: customers, vehicles,
//! job cards, inspection reports and quotations, with PDF export.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod openapi;
pub mod pdf;
pub mod services;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

/// Full `/api/v1` surface.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/customers", handlers::customers::routes())
        .nest("/vehicles", handlers::vehicles::routes())
        .nest("/job-cards", handlers::job_cards::routes())
        .nest("/inspections", handlers::inspections::routes())
        .nest("/quotations", handlers::quotations::routes())
        .route("/dashboard", get(handlers::dashboard::dashboard))
}
