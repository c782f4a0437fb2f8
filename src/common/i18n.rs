// src/common/i18n.rs

// Mensagens de erro por idioma. Chaves iguais às de `AppError::message_key`.
const EN: &[(&str, &str)] = &[
    ("validation_failed", "One or more fields are invalid."),
    ("body_invalid", "Invalid request body"),
    ("location_required", "Location is required"),
    ("location_invalid", "Invalid location: {location}"),
    ("location_unknown", "Unknown location: {location}"),
    ("field_unknown", "Unknown field: {field}"),
    ("field_read_only", "Field is assigned by the server: {field}"),
    ("field_invalid_value", "Invalid value for {field}: expected {expected}"),
    ("ids_invalid", "No valid IDs provided for deletion."),
    ("leads_not_found", "No matching leads found for deletion."),
    ("internal_error", "Internal server error"),
];

const PT: &[(&str, &str)] = &[
    ("validation_failed", "Um ou mais campos são inválidos."),
    ("body_invalid", "Corpo da requisição inválido"),
    ("location_required", "A localidade é obrigatória"),
    ("location_invalid", "Localidade inválida: {location}"),
    ("location_unknown", "Localidade desconhecida: {location}"),
    ("field_unknown", "Campo desconhecido: {field}"),
    ("field_read_only", "Campo definido pelo servidor: {field}"),
    ("field_invalid_value", "Valor inválido para {field}: esperado {expected}"),
    ("ids_invalid", "Nenhum ID válido informado para exclusão."),
    ("leads_not_found", "Nenhum lead correspondente encontrado para exclusão."),
    ("internal_error", "Erro interno do servidor"),
];

#[derive(Debug, Clone)]
pub struct I18nStore {
    default_lang: String,
}

impl I18nStore {
    pub fn new(default_lang: &str) -> Self {
        let default_lang = if table_for(default_lang).is_some() {
            default_lang.to_string()
        } else {
            tracing::warn!("Idioma padrão '{}' não suportado, usando 'en'", default_lang);
            "en".to_string()
        };
        Self { default_lang }
    }

    /// Traduz `key` para `lang`, caindo no idioma padrão e depois na própria chave.
    pub fn translate(&self, lang: &str, key: &str, args: &[(&str, String)]) -> String {
        let template = table_for(lang)
            .and_then(|t| lookup(t, key))
            .or_else(|| table_for(&self.default_lang).and_then(|t| lookup(t, key)))
            .unwrap_or(key);

        args.iter().fold(template.to_string(), |msg, (name, value)| {
            msg.replace(&format!("{{{name}}}"), value)
        })
    }
}

fn table_for(lang: &str) -> Option<&'static [(&'static str, &'static str)]> {
    match lang {
        "en" => Some(EN),
        "pt" => Some(PT),
        _ => None,
    }
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}
