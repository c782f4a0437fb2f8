// src/services/lead_service.rs

use chrono::FixedOffset;
use serde_json::{Map, Value};

use crate::{
    common::{
        db_utils::{is_undefined_table, is_unique_violation},
        error::AppError,
    },
    db::LeadRepository,
    models::{lead::Lead, location::LeadTable},
    services::{
        location_registry::LocationRegistry,
        normalize::{normalize_fields, parse_ids},
    },
};

/// Chave do corpo do formulário que escolhe a tabela.
pub const LOCATION_FIELD: &str = "locations";

#[derive(Clone)]
pub struct LeadService {
    repo: LeadRepository,
    registry: LocationRegistry,
    date_offset: FixedOffset,
}

impl LeadService {
    pub fn new(repo: LeadRepository, registry: LocationRegistry, date_offset: FixedOffset) -> Self {
        Self { repo, registry, date_offset }
    }

    // =========================================================================
    //  ESQUEMA PREGUIÇOSO
    // =========================================================================

    /// Cria a tabela da localidade se ainda não existir. Idempotente.
    pub async fn ensure_table(&self, table: &LeadTable) -> Result<(), AppError> {
        if self.registry.is_ensured(table).await {
            return Ok(());
        }

        match self.repo.create_table(self.repo.pool(), table).await {
            Ok(()) => {}
            // Outro processo criou a mesma tabela no mesmo instante.
            Err(AppError::DatabaseError(e)) if is_unique_violation(&e) => {
                tracing::debug!("Tabela '{}' criada em paralelo por outra conexão", table.name());
            }
            Err(e) => return Err(e),
        }

        tracing::info!("📋 Tabela de leads '{}' pronta", table.name());
        self.registry.mark_ensured(table).await;
        Ok(())
    }

    // =========================================================================
    //  LEADS
    // =========================================================================

    /// Valida a localidade, normaliza os campos, garante a tabela e insere.
    pub async fn create_lead(&self, fields: Map<String, Value>) -> Result<Lead, AppError> {
        let location = match fields.get(LOCATION_FIELD) {
            None | Some(Value::Null) => return Err(AppError::MissingLocation),
            Some(Value::String(s)) => s.as_str(),
            Some(_) => {
                return Err(AppError::InvalidFieldValue {
                    field: LOCATION_FIELD.to_string(),
                    expected: "text",
                })
            }
        };
        let table = self.registry.resolve(location)?;

        let values = normalize_fields(&fields, &self.date_offset)?;

        self.ensure_table(&table).await?;

        let inserted = self.repo.insert_lead(self.repo.pool(), &table, &values).await;
        let lead = self.forget_if_dropped(&table, inserted).await?;

        tracing::info!("✅ Lead {} registrado em '{}'", lead.id, table.name());
        Ok(lead)
    }

    /// Número de série sugerido: 1 se a tabela não existe, senão total + 1.
    /// Apenas indicativo; dois envios simultâneos podem receber o mesmo número.
    pub async fn next_serial(&self, location: &str) -> Result<i64, AppError> {
        let table = self.registry.resolve(location)?;

        let exists = self.registry.is_ensured(&table).await
            || self.repo.table_exists(self.repo.pool(), &table).await?;
        if !exists {
            return Ok(1);
        }

        let counted = self.repo.count_leads(self.repo.pool(), &table).await;
        let count = self.forget_if_dropped(&table, counted).await?;
        Ok(count + 1)
    }

    /// Tabelas existentes no schema que também estão na allow-list.
    pub async fn list_locations(&self) -> Result<Vec<String>, AppError> {
        let tables = self.repo.list_tables(self.repo.pool()).await?;
        Ok(tables
            .into_iter()
            .filter(|name| self.registry.is_allowed(name))
            .collect())
    }

    /// Todas as linhas, por id crescente. Tabela inexistente é erro (500).
    pub async fn list_leads(&self, location: &str) -> Result<Vec<Lead>, AppError> {
        let table = self.registry.resolve(location)?;
        let listed = self.repo.list_leads(self.repo.pool(), &table).await;
        self.forget_if_dropped(&table, listed).await
    }

    /// Apaga em lote. Ids não inteiros são descartados antes.
    pub async fn delete_leads(&self, location: &str, ids: &[Value]) -> Result<u64, AppError> {
        let table = self.registry.resolve(location)?;

        let valid_ids = parse_ids(ids);
        if valid_ids.is_empty() {
            return Err(AppError::NoValidIds);
        }

        let result = self.repo.delete_leads(self.repo.pool(), &table, &valid_ids).await;
        let deleted = self.forget_if_dropped(&table, result).await?;

        if deleted == 0 {
            return Err(AppError::LeadsNotFound);
        }

        tracing::info!("🗑️ {} lead(s) removido(s) de '{}'", deleted, table.name());
        Ok(deleted)
    }

    pub async fn delete_lead(&self, location: &str, id: &str) -> Result<(), AppError> {
        self.delete_leads(location, &[Value::String(id.to_string())])
            .await
            .map(|_| ())
    }

    /// Se a tabela sumiu (42P01), tira da memória para a próxima escrita recriar.
    async fn forget_if_dropped<T>(
        &self,
        table: &LeadTable,
        result: Result<T, AppError>,
    ) -> Result<T, AppError> {
        if let Err(AppError::DatabaseError(e)) = &result {
            if is_undefined_table(e) {
                tracing::warn!("Tabela '{}' não existe", table.name());
                self.registry.forget(table).await;
            }
        }
        result
    }
}
