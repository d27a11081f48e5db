use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use std::sync::Arc;

use crate::{
    MAX_REPORT_SIZE, Notifier, ReportStore, goals, health, pdf, transactions, users,
};
use engine::Engine;

/// Room left for multipart boundaries and text fields around the file.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub reports: ReportStore,
    pub notifier: Notifier,
    /// Public base URL used to build download links, without trailing `/`.
    pub base_url: String,
}

impl ServerState {
    pub fn new(
        engine: Engine,
        reports: ReportStore,
        notifier: Notifier,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            reports,
            notifier,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn download_url(&self, filename: &str) -> String {
        format!("{}/pdf/download/{filename}", self.base_url)
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health::get))
        .route("/users", post(users::user_new).get(users::list))
        .route("/users/blocked", get(users::blocked))
        .route("/users/{id}", put(users::update).delete(users::delete))
        .route("/transactions", post(transactions::transaction_new))
        .route(
            "/transactions/{id}",
            get(transactions::list_for_user).delete(transactions::delete),
        )
        .route("/goals", post(goals::goal_new))
        .route("/goals/user/{user_id}", get(goals::list_for_user))
        .route("/goals/{id}", get(goals::get).delete(goals::delete))
        .route("/goals/{id}/deposit", post(goals::deposit))
        .route("/goals/{id}/withdraw", post(goals::withdraw))
        .route(
            "/pdf/upload",
            post(pdf::upload).layer(DefaultBodyLimit::max(MAX_REPORT_SIZE + MULTIPART_OVERHEAD)),
        )
        .route("/pdf/user/{user_id}", get(pdf::list_for_user))
        .route("/pdf/download/{filename}", get(pdf::download))
        .route("/pdf/{id}", get(pdf::get).delete(pdf::delete))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);
    tracing::info!("Reports stored in {}", state.reports.dir().display());

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
