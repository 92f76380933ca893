use super::state::AppState;
use crate::agent::{AnalyzeFileRequest, Capabilities, ExcelAnswer, ExcelQuery, MultiFileAnswer, MultiFileQuery};
use crate::error::Result;
use crate::mock_api::{self, MockAnswer, MockListing, MockQuery};
use axum::{
    extract::{Query, State},
    Json,
};
use minam_common::{find_connections, ParsedDataset, RelationshipEvidence, ValidationReport};
use serde::{Deserialize, Serialize};

const DEFAULT_MOCK_LIMIT: usize = 10;

pub async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConnectionsRequest {
    pub files: Vec<ParsedDataset>,
}

#[derive(Debug, Serialize)]
pub struct ConnectionsResponse {
    pub connections: Vec<RelationshipEvidence>,
}

/// LLMを使わずに接続のみ計算
pub async fn connections(Json(req): Json<ConnectionsRequest>) -> Json<ConnectionsResponse> {
    Json(ConnectionsResponse {
        connections: find_connections(&req.files),
    })
}

pub async fn multi_file_agent(
    State(state): State<AppState>,
    Json(req): Json<MultiFileQuery>,
) -> Result<Json<MultiFileAnswer>> {
    Ok(Json(state.multi_file.ask(req).await?))
}

pub async fn multi_file_agent_info(State(state): State<AppState>) -> Json<Capabilities> {
    Json(state.multi_file.capabilities())
}

pub async fn excel_agent(
    State(state): State<AppState>,
    Json(req): Json<ExcelQuery>,
) -> Result<Json<ExcelAnswer>> {
    Ok(Json(state.excel.ask(req).await?))
}

pub async fn excel_agent_info(State(state): State<AppState>) -> Json<Capabilities> {
    Json(state.excel.capabilities())
}

pub async fn analyze_file(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeFileRequest>,
) -> Result<Json<ValidationReport>> {
    Ok(Json(state.analyzer.analyze(req).await?))
}

pub async fn mock_query(Json(req): Json<MockQuery>) -> Result<Json<MockAnswer>> {
    Ok(Json(mock_api::answer(&req.query)?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    pub limit: Option<usize>,
}

pub async fn mock_list(Query(params): Query<ListParams>) -> Json<MockListing> {
    Json(mock_api::list(params.limit.unwrap_or(DEFAULT_MOCK_LIMIT)))
}
