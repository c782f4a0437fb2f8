// src/models/location.rs

use std::fmt;

use crate::common::error::AppError;

/// Limite de identificadores do Postgres (NAMEDATALEN - 1).
pub const MAX_TABLE_NAME_LEN: usize = 63;

/// Troca tudo que não for `[a-zA-Z0-9]` por `_` e põe em minúsculas.
/// "Andheri West" -> "andheri_west".
pub fn sanitize_table_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

// ---
// LocationKey (A chave já sanitizada)
// ---
// Só pode ser construída por `parse`, então o conteúdo é sempre `[a-z0-9_]+`
// e cabe num identificador do Postgres.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationKey(String);

impl LocationKey {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::MissingLocation);
        }

        let key = sanitize_table_name(trimmed);
        if key.len() > MAX_TABLE_NAME_LEN || key.chars().all(|c| c == '_') {
            return Err(AppError::InvalidLocation(raw.to_string()));
        }

        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---
// LeadTable (O "handle" da tabela de uma localidade)
// ---
// Só o `LocationRegistry` entrega um destes, depois de conferir a allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeadTable {
    key: LocationKey,
}

impl LeadTable {
    pub(crate) fn new(key: LocationKey) -> Self {
        Self { key }
    }

    pub fn name(&self) -> &str {
        self.key.as_str()
    }

    /// Nome entre aspas duplas, pronto para ser interpolado no SQL.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.key.as_str())
    }
}
