// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "Leads API", description = "Captura de leads por localidade"),
    paths(
        // --- Leads ---
        handlers::leads::create_lead,
        handlers::leads::next_sr_no,
        handlers::leads::list_leads,
        handlers::leads::delete_leads,
        handlers::leads::delete_lead,

        // --- Locations ---
        handlers::locations::list_locations,
    ),
    components(
        schemas(
            models::lead::Lead,

            // --- Payloads ---
            handlers::leads::NextSrNoResponse,
            handlers::leads::LeadCreatedResponse,
            handlers::leads::DeleteLeadsPayload,
        )
    ),
    tags(
        (name = "Leads", description = "Cadastro, listagem e exclusão de leads"),
        (name = "Locations", description = "Localidades (uma tabela por localidade)")
    )
)]
pub struct ApiDoc;
