//! HTTPサーバー
//!
//! エージェントとモックAPIをJSONエンドポイントとして公開する。

mod error;
mod routes;
mod state;

pub use state::AppState;

use crate::error::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/connections", post(routes::connections))
        .route(
            "/api/multi-file-agent",
            post(routes::multi_file_agent).get(routes::multi_file_agent_info),
        )
        .route(
            "/api/excel-agent",
            post(routes::excel_agent).get(routes::excel_agent_info),
        )
        .route("/api/analyze-file", post(routes::analyze_file))
        .route("/api/mock-api", post(routes::mock_query).get(routes::mock_list))
        .with_state(state)
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
}

/// 指定アドレスで待ち受けを開始
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Minam API running on http://{}/", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
