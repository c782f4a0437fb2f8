// src/config.rs

use anyhow::Context;
use chrono::FixedOffset;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, str::FromStr, time::Duration};

use crate::{
    common::i18n::I18nStore,
    db::LeadRepository,
    services::{lead_service::LeadService, location_registry::LocationRegistry},
};

/// Localidades do formulário quando `LEAD_LOCATIONS` não está definida.
pub const DEFAULT_LOCATIONS: [&str; 8] = [
    "VIRAR", "VASAI", "NAIGAON", "PALGHAR", "KANDIVALI", "BORIVALI", "THANE", "BOISAR",
];

// Configuração lida do ambiente (e do .env, se existir).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub locations: Vec<String>,
    pub date_utc_offset: FixedOffset,
    pub static_dir: String,
    pub default_language: String,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de uma função de busca (o ambiente, nos casos reais).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        let locations = match lookup("LEAD_LOCATIONS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>(),
            None => DEFAULT_LOCATIONS.iter().map(|s| s.to_string()).collect(),
        };
        if locations.is_empty() {
            anyhow::bail!("LEAD_LOCATIONS não pode ser vazia");
        }

        let offset_minutes: i32 = parse_or(&lookup, "LEAD_DATE_UTC_OFFSET_MINUTES", 0)?;
        let date_utc_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .with_context(|| format!("LEAD_DATE_UTC_OFFSET_MINUTES fora do intervalo: {offset_minutes}"))?;

        Ok(Self {
            database_url,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            acquire_timeout: Duration::from_secs(parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 3)?),
            locations,
            date_utc_offset,
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| "public".to_string()),
            default_language: lookup("DEFAULT_LANGUAGE").unwrap_or_else(|| "en".to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Valor inválido para {key}: {e}")),
        None => Ok(default),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub lead_service: LeadService,
    pub i18n_store: I18nStore,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Self::with_pool(db_pool, settings)
    }

    /// Monta o gráfico de dependências em cima de uma pool já criada.
    pub fn with_pool(db_pool: PgPool, settings: &Settings) -> anyhow::Result<Self> {
        let registry = LocationRegistry::new(&settings.locations)
            .map_err(|e| anyhow::anyhow!("LEAD_LOCATIONS inválida: {e}"))?;
        tracing::info!(
            "📍 Localidades permitidas: {}",
            registry.labels().collect::<Vec<_>>().join(", ")
        );

        let lead_repo = LeadRepository::new(db_pool.clone());
        let lead_service = LeadService::new(lead_repo, registry, settings.date_utc_offset);

        Ok(Self {
            db_pool,
            lead_service,
            i18n_store: I18nStore::new(&settings.default_language),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let settings = Settings::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/leads")])).unwrap();
        assert_eq!(settings.bind_addr, "0.0.0.0:3000");
        assert_eq!(settings.max_connections, 5);
        assert_eq!(settings.acquire_timeout, Duration::from_secs(3));
        assert_eq!(settings.locations.len(), DEFAULT_LOCATIONS.len());
        assert_eq!(settings.date_utc_offset.local_minus_utc(), 0);
        assert_eq!(settings.static_dir, "public");
        assert_eq!(settings.default_language, "en");
    }

    #[test]
    fn missing_database_url_is_an_error() {
        assert!(Settings::from_lookup(lookup_from(&[])).is_err());
    }

    #[test]
    fn overrides_are_parsed() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/leads"),
            ("LEAD_LOCATIONS", "Andheri West, VIRAR ,,"),
            ("LEAD_DATE_UTC_OFFSET_MINUTES", "330"),
            ("DB_MAX_CONNECTIONS", "12"),
        ]))
        .unwrap();
        assert_eq!(settings.locations, vec!["Andheri West", "VIRAR"]);
        assert_eq!(settings.date_utc_offset.local_minus_utc(), 330 * 60);
        assert_eq!(settings.max_connections, 12);
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let result = Settings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/leads"),
            ("DB_MAX_CONNECTIONS", "many"),
        ]));
        assert!(result.is_err());

        let result = Settings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/leads"),
            ("LEAD_DATE_UTC_OFFSET_MINUTES", "100000"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn empty_location_list_is_rejected() {
        let result = Settings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/leads"),
            ("LEAD_LOCATIONS", " , "),
        ]));
        assert!(result.is_err());
    }
}
