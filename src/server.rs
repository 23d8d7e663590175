//!
//! nlpdesk HTTP server
//! -------------------
//! Axum router serving the HTML pages of the desk.
//!
//! Responsibilities:
//! - Registration and login backed by the `identity` store (Argon2 hashes).
//! - Signed-cookie sessions and one-shot flash messages.
//! - Dashboard form that forwards text to the hosted NLP provider.
//!
//! Handlers are plain async functions in `routes`; HTML comes from the
//! embedded templates in `views`.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{routing::get, Router};
use tracing::{info, warn};

use crate::config::Config;
use crate::identity::{IdentityStore, InMemoryAccountRepository, SessionManager};
use crate::nlp::{NlpClientFactory, NlpCloudFactory};
use crate::security::SigningKey;

pub mod routes;
pub mod views;

use views::Views;

/// Shared server state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub identity: IdentityStore,
    pub sessions: Arc<SessionManager>,
    /// One client per dashboard request comes out of this.
    pub nlp: Arc<dyn NlpClientFactory>,
    pub views: Arc<Views>,
}

impl AppState {
    pub fn new(identity: IdentityStore, sessions: SessionManager, nlp: Arc<dyn NlpClientFactory>) -> anyhow::Result<Self> {
        let views = Views::new().context("While loading page templates")?;
        Ok(Self { identity, sessions: Arc::new(sessions), nlp, views: Arc::new(views) })
    }

    /// Production wiring: in-memory accounts and the NLP Cloud client.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let key = match &config.secret_key {
            Some(secret) => SigningKey::new(secret),
            None => {
                warn!(target: "startup", "SECRET_KEY is not set; using a random key, sessions end on restart");
                SigningKey::random()?
            }
        };
        if config.nlp.api_key.is_none() {
            warn!(target: "startup", "NLPCLOUD_API_KEY is not set; dashboard tasks will fail");
        }
        let sessions = SessionManager::new(key)
            .with_ttl(config.session_ttl)
            .with_secure(config.cookie_secure);
        let identity = IdentityStore::new(Arc::new(InMemoryAccountRepository::new()));
        let nlp: Arc<dyn NlpClientFactory> = Arc::new(NlpCloudFactory::new(config.nlp.clone()));
        Self::new(identity, sessions, nlp)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/register", get(routes::register_form).post(routes::register))
        .route("/login", get(routes::login_form).post(routes::login))
        .route("/forgot", get(routes::forgot_form).post(routes::forgot))
        .route("/dashboard", get(routes::dashboard).post(routes::analyze))
        .route("/logout", get(routes::logout))
        .with_state(state)
}

/// Start the HTTP server on the configured address and serve until the
/// process is stopped.
pub async fn run(config: Config) -> anyhow::Result<()> {
    info!(
        target: "startup",
        "nlpdesk starting: http_addr={}, model={}, gpu={}, secret_key_set={}, nlp_key_set={}, session_ttl={:?}",
        config.http_addr,
        config.nlp.model,
        config.nlp.gpu,
        config.secret_key.is_some(),
        config.nlp.api_key.is_some(),
        config.session_ttl,
    );
    let state = AppState::from_config(&config)?;
    let app = router(state);

    let addr: SocketAddr = config.http_addr;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
