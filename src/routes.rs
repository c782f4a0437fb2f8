// src/routes.rs

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

/// Monta o router completo: API, docs, CORS, logs e a pasta estática.
pub fn build_router(app_state: AppState, static_dir: &str) -> Router {
    let lead_routes = Router::new()
        .route("/next-sr-no", get(handlers::leads::next_sr_no))
        .route("/delete-multiple", delete(handlers::leads::delete_leads))
        .route("/{location}", get(handlers::leads::list_leads))
        .route("/{location}/{id}", delete(handlers::leads::delete_lead));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/locations", get(handlers::locations::list_locations))
        .route("/api/leads", post(handlers::leads::create_lead))
        .nest("/api/leads", lead_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
