// src/handlers/locations.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{common::error::ApiError, config::AppState, middleware::i18n::Locale};

// GET /api/locations
#[utoipa::path(
    get,
    path = "/api/locations",
    tag = "Locations",
    responses(
        (status = 200, description = "Localidades que já têm tabela", body = Vec<String>, example = json!(["andheri_west", "virar"])),
        (status = 500, description = "Falha no banco de dados")
    )
)]
pub async fn list_locations(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let locations = app_state
        .lead_service
        .list_locations()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(locations)))
}
