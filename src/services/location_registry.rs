// src/services/location_registry.rs

use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};
use tokio::sync::RwLock;

use crate::{
    common::error::AppError,
    models::location::{LeadTable, LocationKey},
};

// O mapa "localidade -> tabela". A allow-list vem da configuração; o conjunto
// `ensured` guarda as tabelas que este processo já criou (ou viu existir).
#[derive(Clone)]
pub struct LocationRegistry {
    allowed: Arc<BTreeMap<LocationKey, String>>,
    ensured: Arc<RwLock<HashSet<LeadTable>>>,
}

impl LocationRegistry {
    pub fn new<I, S>(labels: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed = BTreeMap::new();
        for label in labels {
            let label = label.as_ref().trim();
            let key = LocationKey::parse(label)?;
            allowed.entry(key).or_insert_with(|| label.to_string());
        }

        Ok(Self {
            allowed: Arc::new(allowed),
            ensured: Arc::new(RwLock::new(HashSet::new())),
        })
    }

    /// Sanitiza `raw` e confere a allow-list.
    pub fn resolve(&self, raw: &str) -> Result<LeadTable, AppError> {
        let key = LocationKey::parse(raw)?;
        if !self.allowed.contains_key(&key) {
            return Err(AppError::UnknownLocation(raw.trim().to_string()));
        }
        Ok(LeadTable::new(key))
    }

    pub fn is_allowed(&self, table_name: &str) -> bool {
        self.allowed.keys().any(|k| k.as_str() == table_name)
    }

    /// Rótulos configurados, na ordem das chaves.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.allowed.values().map(String::as_str)
    }

    pub async fn is_ensured(&self, table: &LeadTable) -> bool {
        self.ensured.read().await.contains(table)
    }

    pub async fn mark_ensured(&self, table: &LeadTable) {
        self.ensured.write().await.insert(table.clone());
    }

    /// A tabela sumiu por fora (DROP manual); a próxima escrita recria.
    pub async fn forget(&self, table: &LeadTable) {
        self.ensured.write().await.remove(table);
    }
}
