use crate::{
    AppState,
    error::AppError,
    extract::{ApiPath, ApiQuery},
    responses::{ApiResponse, ErrorResponse, HealthResponse, PaginatedResponse},
    validation,
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use core_types::{DigimonStats, DigimonSummary, EvolutionData};
use serde::Deserialize;
use std::sync::Arc;

/// Raw list parameters; coercion and clamping happen in `validation`.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub stage: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<String>,
}

/// # GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// # GET /api/digimons
/// Lists Digimon page by page, optionally filtered by stage.
pub async fn list_digimons(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<PaginatedResponse<DigimonSummary>>, AppError> {
    let page = validation::validate_pagination(params.page.as_deref(), params.limit.as_deref());
    let stage = validation::parse_stage(params.stage.as_deref())?;

    let result = state.catalog.list(page, stage).await?;
    Ok(Json(PaginatedResponse::new(result.data, result.pagination)))
}

/// # GET /api/digimons/search
/// Case-insensitive substring search on the name.
pub async fn search_digimons(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<ApiResponse<Vec<DigimonSummary>>>, AppError> {
    let term = validation::sanitize_search_term(params.q.as_deref());
    if term.is_empty() {
        return Err(AppError::Validation(
            "Parâmetro de busca 'q' é obrigatório".to_string(),
        ));
    }
    let limit = validation::validate_search_limit(params.limit.as_deref());

    let results = state.catalog.search(&term, limit).await?;
    let message = format!("{} Digimon(s) encontrado(s)", results.len());
    Ok(Json(ApiResponse::ok(results, message)))
}

/// # GET /api/digimons/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<DigimonStats>>, AppError> {
    let stats = state.catalog.get_stats().await?;
    Ok(Json(ApiResponse::ok(stats, "Estatísticas obtidas com sucesso")))
}

/// # GET /api/digimons/:id
pub async fn get_digimon_by_id(
    ApiPath(id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<DigimonSummary>>, AppError> {
    let id = validation::parse_id(&id)?;
    let digimon = state
        .catalog
        .get_by_id(id)
        .await?
        .ok_or_else(AppError::digimon_not_found)?;
    Ok(Json(ApiResponse::ok(digimon, "Digimon encontrado")))
}

/// # GET /api/digimons/:id/evolutions
/// The Digimon, what it evolves into, what evolves into it, and the requirements.
pub async fn get_evolution_data(
    ApiPath(id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<EvolutionData>>, AppError> {
    let id = validation::parse_id(&id)?;
    let data = state.catalog.get_evolution_data(id).await?;
    if data.digimon.is_none() {
        return Err(AppError::digimon_not_found());
    }
    Ok(Json(ApiResponse::ok(data, "Dados de evolução obtidos com sucesso")))
}

/// # GET /api/digimons/name/:name
pub async fn get_digimon_by_name(
    ApiPath(name): ApiPath<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<DigimonSummary>>, AppError> {
    let name = validation::validate_name(&name)?;
    let digimon = state
        .catalog
        .get_by_name(name)
        .await?
        .ok_or_else(AppError::digimon_not_found)?;
    Ok(Json(ApiResponse::ok(digimon, "Digimon encontrado")))
}

/// Unmatched routes still answer with the error envelope.
pub async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Rota não encontrada", StatusCode::NOT_FOUND.as_u16())),
    )
}
