#![allow(missing_docs)]

pub mod config;

mod auth;
mod error;
mod payload;
mod routes;

use std::sync::Arc;

use axum::{Router, routing};
use bon::Builder;
use digibank_engine::DigibankEngine;
use dissolve_derive::Dissolve;

pub use self::auth::TokenIssuer;

pub fn create_router(app: App) -> Router {
    Router::new()
        .route("/health", routing::get(routes::health))
        .route("/api/health", routing::get(routes::health))
        .route("/api/auth/register", routing::post(routes::register))
        .route("/api/auth/login", routing::post(routes::login))
        .route("/api/auth/me", routing::get(routes::me))
        .route("/api/accounts", routing::get(routes::list_accounts).post(routes::open_account))
        .route("/api/accounts/stats", routing::get(routes::account_stats))
        .route("/api/accounts/id/{id}", routing::get(routes::get_account_by_id))
        .route("/api/accounts/{number}", routing::get(routes::get_account))
        .route("/api/transactions", routing::get(routes::list_transactions))
        .route("/api/transactions/recent", routing::get(routes::recent_transactions))
        .route("/api/transactions/deposit", routing::post(routes::deposit))
        .route("/api/transactions/withdraw", routing::post(routes::withdraw))
        .route("/api/transactions/transfer", routing::post(routes::transfer))
        .route("/api/operations/calculate-interest", routing::post(routes::calculate_interest))
        .route(
            "/api/operations/reset-withdrawal-limit",
            routing::post(routes::reset_withdrawal_limit),
        )
        .route(
            "/api/operations/overdraft-status/{number}",
            routing::get(routes::overdraft_status),
        )
        .route("/api/payments/process", routing::post(routes::process_payment))
        .route("/api/payments/history", routing::get(routes::payment_history))
        .route("/api/payments/categories", routing::get(routes::payment_categories))
        .route("/api/dashboard/stats", routing::get(routes::dashboard_stats))
        .route("/api/dashboard/summary", routing::get(routes::dashboard_summary))
        .with_state(app)
}

#[derive(Clone, Builder, Dissolve)]
pub struct App {
    engine: Arc<DigibankEngine>,
    tokens: Arc<TokenIssuer>,
}
