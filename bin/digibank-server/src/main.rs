//! # Configuration
//!
//! The server is configured through:
//! - Base configuration file (`base_config.ron`)
//! - Environment variables prefixed with `DIGIBANK_` (override base config)
//!
//! ## Base Configuration
//!
//! The default configuration is loaded from `base_config.ron`:
//!
//! ```ron
//! Config(
//!     app: AppConfig(
//!         listen: "localhost:5000",
//!         cors_allowed_origins: ["*"],
//!     ),
//!     store: StoreConfig(
//!         data_dir: "./data",
//!     ),
//!     auth: AuthConfig(
//!         token_secret: "change-me-in-production",
//!         token_ttl: "7days",
//!     ),
//! )
//! ```
//!
//! ## Environment Variable Overrides
//!
//! Use double underscores (`__`) to override nested configuration fields:
//!
//! ```bash
//! export DIGIBANK_APP__LISTEN="0.0.0.0:5000"
//!
//! # Comma separated list of allowed origins
//! export DIGIBANK_APP__CORS_ALLOWED_ORIGINS="http://localhost:3000,http://localhost:5173"
//!
//! # Directory holding clients.json, accounts.json and transactions.json
//! export DIGIBANK_STORE__DATA_DIR="/var/lib/digibank"
//!
//! # Always override the token secret outside of local development
//! export DIGIBANK_AUTH__TOKEN_SECRET="..."
//! export DIGIBANK_AUTH__TOKEN_TTL="12h"
//!
//! cargo run --bin digibank-server
//! ```
//!
//! ## CORS Configuration
//!
//! The `cors_allowed_origins` field controls cross-origin resource sharing:
//! - **Specific origins**: Only listed origins are allowed (recommended for production)
//! - **Wildcard `["*"]`**: All origins are allowed (permissive mode, default for development)
//!
//! When specific origins are configured, the server allows:
//! - Methods: GET, POST, PUT, DELETE, OPTIONS
//! - Headers: Content-Type, Authorization
//! - Credentials: Enabled
//!
//! # Logging
//!
//! Logging is controlled via the `RUST_LOG` environment variable. Defaults to `info` level.
//!
//! The server logs:
//! - **HTTP requests**: Method, path, status code, and duration for all incoming requests
//! - **Client errors (4xx)**: Logged at `WARN` level with error details
//! - **Server errors (5xx)**: Logged at `ERROR` level, answered with a generic message
//! - **Not found (404)**: Logged at `INFO` level
//!
//! Passwords, password hashes and tokens are never logged.

use core::str::FromStr;

use std::sync::Arc;

use axum::http::{HeaderValue, Method, header};
use digibank_engine::DigibankEngine;
use digibank_server::{App, TokenIssuer, config};
use digibank_store::DigibankStore;
use tokio::{net::TcpListener, task};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Subscriber, subscriber};
use tracing_subscriber::{EnvFilter, Registry, fmt::format::FmtSpan, layer::SubscriberExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = task::spawn_blocking(config::get_configuration).await??;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    subscriber::set_global_default(make_tracing_subscriber(env_filter))?;

    let app = {
        let store = DigibankStore::new(config.store.data_dir);
        store.ensure_initialized().await?;
        tracing::info!("record store ready at {}", store.data_dir().display());

        let engine = DigibankEngine::new(store);
        let tokens = TokenIssuer::new(&config.auth.token_secret, config.auth.token_ttl);

        App::builder().engine(Arc::new(engine)).tokens(Arc::new(tokens)).build()
    };

    let axum_handle = {
        let router = digibank_server::create_router(app);
        let cors = create_cors_layer(&config.app.cors_allowed_origins)?;
        let router = router.layer(TraceLayer::new_for_http()).layer(cors);

        let listener = TcpListener::bind(&config.app.listen)
            .await
            .inspect(|_| tracing::info!("server listening at {}", config.app.listen))?;

        tokio::spawn(async { axum::serve(listener, router).await })
    };

    axum_handle.await??;

    Ok(())
}

fn create_cors_layer<S>(allowed_origins: &[S]) -> anyhow::Result<CorsLayer>
where
    S: AsRef<str>,
{
    if allowed_origins.iter().map(AsRef::as_ref).any(|s| s == "*") {
        return Ok(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .map(AsRef::as_ref)
        .map(FromStr::from_str)
        .collect::<Result<_, _>>()?;

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    Ok(cors)
}

fn make_tracing_subscriber(env_filter: EnvFilter) -> impl Subscriber {
    Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_line_number(true)
                .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE),
        )
        .with(env_filter)
}
