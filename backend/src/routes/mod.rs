//! Route definitions for the AgroNond Mandi Platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - lot records and the sale lifecycle
        .nest("/records", record_routes())
        // Protected routes - committee ledger
        .nest("/transactions", transaction_routes())
        // Protected routes - party bills
        .nest("/bills", bill_routes())
        // Protected routes - profiles
        .nest("/profiles", profile_routes())
        // Protected routes - reporting
        .nest("/reports", report_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/otp/request", post(handlers::request_otp))
        .route("/otp/verify", post(handlers::verify_otp))
        .route("/refresh", post(handlers::refresh))
}

/// Lot record routes (protected)
fn record_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_records).post(handlers::create_record),
        )
        .route(
            "/:record_id",
            get(handlers::get_record).delete(handlers::delete_record),
        )
        // Lilav: sale rate assignment
        .route("/:record_id/rate", post(handlers::assign_rate))
        // Weighing station
        .route("/:record_id/weight", post(handlers::finalize_weight))
        // Per-party payment updates
        .route("/:record_id/payments", post(handlers::update_record_payment))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Committee ledger routes (protected)
fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_transactions))
        .route("/export", get(handlers::export_transactions))
        .route("/:transaction_id", get(handlers::get_transaction))
        .route(
            "/:transaction_id/payments",
            post(handlers::update_transaction_payment),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Bill routes (protected)
fn bill_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_bills))
        .route("/:bill_id", get(handlers::get_bill))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Profile routes (protected)
fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_profiles).post(handlers::create_profile),
        )
        .route("/me", get(handlers::get_me))
        .route("/:profile_id", get(handlers::get_profile))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Reporting routes (protected)
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/summary", get(handlers::market_summary))
        .route_layer(middleware::from_fn(auth_middleware))
}
