use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro de domínio. Os handlers convertem para `ApiError`
// (status + corpo traduzido) com `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Corpo ausente, JSON malformado ou tipos errados (ex: `ids: "1"`).
    #[error("Corpo da requisição inválido: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Localidade obrigatória")]
    MissingLocation,

    #[error("Localidade inválida: {0}")]
    InvalidLocation(String),

    #[error("Localidade desconhecida: {0}")]
    UnknownLocation(String),

    #[error("Campo desconhecido: {0}")]
    UnknownField(String),

    #[error("Campo somente leitura: {0}")]
    ReadOnlyField(String),

    #[error("Valor inválido para o campo {field}: esperado {expected}")]
    InvalidFieldValue { field: String, expected: &'static str },

    #[error("Nenhum ID válido informado")]
    NoValidIds,

    #[error("Nenhum lead encontrado para exclusão")]
    LeadsNotFound,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidBody(_)
            | AppError::MissingLocation
            | AppError::InvalidLocation(_)
            | AppError::UnknownLocation(_)
            | AppError::UnknownField(_)
            | AppError::ReadOnlyField(_)
            | AppError::InvalidFieldValue { .. }
            | AppError::NoValidIds => StatusCode::BAD_REQUEST,
            AppError::LeadsNotFound => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Chave da mensagem no `I18nStore`.
    pub fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_failed",
            AppError::InvalidBody(_) => "body_invalid",
            AppError::MissingLocation => "location_required",
            AppError::InvalidLocation(_) => "location_invalid",
            AppError::UnknownLocation(_) => "location_unknown",
            AppError::UnknownField(_) => "field_unknown",
            AppError::ReadOnlyField(_) => "field_read_only",
            AppError::InvalidFieldValue { .. } => "field_invalid_value",
            AppError::NoValidIds => "ids_invalid",
            AppError::LeadsNotFound => "leads_not_found",
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => "internal_error",
        }
    }

    fn message_args(&self) -> Vec<(&'static str, String)> {
        match self {
            AppError::InvalidLocation(loc) | AppError::UnknownLocation(loc) => {
                vec![("location", loc.clone())]
            }
            AppError::UnknownField(field) | AppError::ReadOnlyField(field) => {
                vec![("field", field.clone())]
            }
            AppError::InvalidFieldValue { field, expected } => {
                vec![("field", field.clone()), ("expected", expected.to_string())]
            }
            _ => Vec::new(),
        }
    }

    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();

        if status.is_server_error() {
            // O detalhe fica no log, o cliente recebe só a mensagem genérica.
            tracing::error!("Erro Interno do Servidor: {}", self);
        } else {
            tracing::debug!("Requisição rejeitada ({}): {}", status, self);
        }

        let message = store.translate(&locale.0, self.message_key(), &self.message_args());

        let body = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::BTreeMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({ "error": message, "details": details })
            }
            _ => json!({ "error": message }),
        };

        ApiError { status, body }
    }
}

// O erro que efetivamente sai pela API.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: Value,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> Locale {
        Locale("en".to_string())
    }

    #[test]
    fn client_errors_map_to_400() {
        for err in [
            AppError::MissingLocation,
            AppError::InvalidLocation("--".into()),
            AppError::UnknownLocation("mars".into()),
            AppError::UnknownField("password".into()),
            AppError::ReadOnlyField("id".into()),
            AppError::InvalidFieldValue { field: "budget".into(), expected: "a number" },
            AppError::NoValidIds,
        ] {
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{err:?}");
        }
    }

    #[test]
    fn not_found_is_distinct_from_validation() {
        assert_eq!(AppError::LeadsNotFound.status(), StatusCode::NOT_FOUND);
        assert_ne!(AppError::LeadsNotFound.status(), AppError::NoValidIds.status());
    }

    #[test]
    fn database_errors_do_not_leak_details() {
        let store = I18nStore::new("en");
        let err = AppError::DatabaseError(sqlx::Error::Protocol("relation \"x\" secret".into()));
        let api = err.to_api_error(&en(), &store);
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.body, json!({ "error": "Internal server error" }));
    }

    #[test]
    fn messages_carry_their_arguments() {
        let store = I18nStore::new("en");
        let api = AppError::UnknownField("password".into()).to_api_error(&en(), &store);
        assert_eq!(api.body["error"], "Unknown field: password");
    }

    #[test]
    fn validation_errors_include_field_details() {
        let mut errors = validator::ValidationErrors::new();
        let mut e = validator::ValidationError::new("length");
        e.message = Some("required".into());
        errors.add("ids", e);

        let store = I18nStore::new("en");
        let api = AppError::ValidationError(errors).to_api_error(&en(), &store);
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.body["details"]["ids"][0], "required");
    }
}
