//! HTTP API over the store, with bearer-token auth and a Server-Sent Events
//! change stream.

mod extract;
mod handlers;
mod routes;

pub use extract::AuthUser;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use crate::auth::Authenticator;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub auth: Authenticator,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(routes::auth_routes())
        .merge(routes::api_routes())
        .with_state(state)
}

/// Serves until the listener fails or the process is stopped.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "server listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}

pub async fn run_server(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener, state).await
}
