// src/handlers/leads.rs

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::lead::Lead,
};

// =============================================================================
//  PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, IntoParams)]
pub struct NextSrNoQuery {
    /// Nome da localidade (ex: "virar", "andheri west")
    pub location: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NextSrNoResponse {
    #[schema(example = 2)]
    pub next_sr_no: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeadCreatedResponse {
    #[schema(example = "Lead captured successfully!")]
    pub message: String,
    pub data: Lead,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DeleteLeadsPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "virar")]
    pub location: String,

    // Aceita números ou strings; o que não for inteiro é descartado.
    #[serde(default)]
    #[validate(length(min = 1, message = "required"))]
    #[schema(value_type = Vec<Object>, example = json!(["1", 2, "abc"]))]
    pub ids: Vec<Value>,
}

// =============================================================================
//  HANDLERS
// =============================================================================

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body(
        content = Object,
        description = "Campos do formulário; `locations` escolhe a tabela",
        example = json!({"locations": "VIRAR", "name": "A. Sharma", "contact1": "9999999999", "leadDate": "2025-01-15"})
    ),
    responses(
        (status = 201, description = "Lead registrado", body = LeadCreatedResponse),
        (status = 400, description = "Localidade ausente/desconhecida ou campo inválido"),
        (status = 500, description = "Falha no banco de dados")
    )
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // Corpo fora do formato vira 400 com mensagem traduzida.
    let Json(payload) = payload
        .map_err(|rejection| AppError::from(rejection).to_api_error(&locale, &app_state.i18n_store))?;

    let lead = app_state
        .lead_service
        .create_lead(payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let body = LeadCreatedResponse {
        message: "Lead captured successfully!".to_string(),
        data: lead,
    };

    Ok((StatusCode::CREATED, Json(body)))
}

// GET /api/leads/next-sr-no?location=
#[utoipa::path(
    get,
    path = "/api/leads/next-sr-no",
    tag = "Leads",
    params(NextSrNoQuery),
    responses(
        (status = 200, description = "Próximo número de série sugerido", body = NextSrNoResponse),
        (status = 400, description = "Localidade ausente ou desconhecida")
    )
)]
pub async fn next_sr_no(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<NextSrNoQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let location = query
        .location
        .ok_or_else(|| AppError::MissingLocation.to_api_error(&locale, &app_state.i18n_store))?;

    let next_sr_no = app_state
        .lead_service
        .next_serial(&location)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(NextSrNoResponse { next_sr_no })))
}

// GET /api/leads/{location}
#[utoipa::path(
    get,
    path = "/api/leads/{location}",
    tag = "Leads",
    params(("location" = String, Path, description = "Nome da localidade")),
    responses(
        (status = 200, description = "Leads em ordem crescente de id", body = Vec<Lead>),
        (status = 400, description = "Localidade desconhecida"),
        (status = 500, description = "Tabela inexistente ou falha no banco")
    )
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(location): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let leads = app_state
        .lead_service
        .list_leads(&location)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(leads)))
}

// DELETE /api/leads/delete-multiple
#[utoipa::path(
    delete,
    path = "/api/leads/delete-multiple",
    tag = "Leads",
    request_body = DeleteLeadsPayload,
    responses(
        (status = 204, description = "Leads removidos"),
        (status = 400, description = "Localidade ou lista de ids inválida"),
        (status = 404, description = "Nenhum lead correspondente"),
        (status = 500, description = "Falha no banco de dados")
    )
)]
pub async fn delete_leads(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Result<Json<DeleteLeadsPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload
        .map_err(|rejection| AppError::from(rejection).to_api_error(&locale, &app_state.i18n_store))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .lead_service
        .delete_leads(&payload.location, &payload.ids)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/leads/{location}/{id}
#[utoipa::path(
    delete,
    path = "/api/leads/{location}/{id}",
    tag = "Leads",
    params(
        ("location" = String, Path, description = "Nome da localidade"),
        ("id" = i32, Path, description = "Id do lead")
    ),
    responses(
        (status = 204, description = "Lead removido"),
        (status = 400, description = "Localidade ou id inválido"),
        (status = 404, description = "Lead não encontrado")
    )
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((location, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .lead_service
        .delete_lead(&location, &id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
