// src/db/lead_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::{
        lead::{column_definitions, select_list, Lead, LeadField, LeadValue},
        location::LeadTable,
    },
};

// O repositório de leads. Cada localidade tem a sua própria tabela, então
// todo método recebe o `LeadTable` já validado pelo `LocationRegistry`.
#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // =========================================================================
    //  CATÁLOGO
    // =========================================================================

    /// `CREATE TABLE IF NOT EXISTS` com o layout fixo de colunas.
    pub async fn create_table<'e, E>(&self, executor: E, table: &LeadTable) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            table.quoted(),
            column_definitions()
        );

        sqlx::query(&ddl).execute(executor).await?;
        Ok(())
    }

    pub async fn table_exists<'e, E>(&self, executor: E, table: &LeadTable) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = current_schema()
                  AND table_name = $1
            )
            "#,
        )
        .bind(table.name())
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    /// Todas as tabelas do schema, menos as internas (`pg_*`, `sql_*`).
    pub async fn list_tables<'e, E>(&self, executor: E) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tables = sqlx::query_scalar::<_, String>(
            r#"
            SELECT table_name::text
            FROM information_schema.tables
            WHERE table_schema = current_schema()
              AND table_type = 'BASE TABLE'
              AND table_name NOT LIKE 'pg\_%'
              AND table_name NOT LIKE 'sql\_%'
            ORDER BY table_name ASC
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(tables)
    }

    // =========================================================================
    //  LEADS
    // =========================================================================

    /// Insere só as colunas informadas; as demais ficam NULL/default.
    pub async fn insert_lead<'e, E>(
        &self,
        executor: E,
        table: &LeadTable,
        values: &[(LeadField, LeadValue)],
    ) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("INSERT INTO ");
        builder.push(table.quoted());

        if values.is_empty() {
            builder.push(" DEFAULT VALUES");
        } else {
            builder.push(" (");
            let mut columns = builder.separated(", ");
            for (field, _) in values {
                columns.push(field.column());
            }
            builder.push(") VALUES (");

            let mut binds = builder.separated(", ");
            for (_, value) in values {
                match value {
                    LeadValue::Text(v) => binds.push_bind(v.clone()),
                    LeadValue::Integer(v) => binds.push_bind(*v),
                    LeadValue::Decimal(v) => binds.push_bind(*v),
                    LeadValue::Date(v) => binds.push_bind(*v),
                };
            }
            builder.push(")");
        }

        builder.push(" RETURNING ");
        builder.push(select_list());

        let lead = builder
            .build_query_as::<Lead>()
            .fetch_one(executor)
            .await?;

        Ok(lead)
    }

    pub async fn count_leads<'e, E>(&self, executor: E, table: &LeadTable) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT COUNT(*) FROM {}", table.quoted());
        let count = sqlx::query_scalar::<_, i64>(&sql).fetch_one(executor).await?;
        Ok(count)
    }

    /// Varredura completa, em ordem crescente de id.
    pub async fn list_leads<'e, E>(&self, executor: E, table: &LeadTable) -> Result<Vec<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM {} ORDER BY id ASC", select_list(), table.quoted());
        let leads = sqlx::query_as::<_, Lead>(&sql).fetch_all(executor).await?;
        Ok(leads)
    }

    /// Apaga todas as linhas cujo id está em `ids` num único statement.
    /// Retorna quantas linhas foram removidas.
    pub async fn delete_leads<'e, E>(
        &self,
        executor: E,
        table: &LeadTable,
        ids: &[i32],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("DELETE FROM {} WHERE id = ANY($1)", table.quoted());
        let result = sqlx::query(&sql).bind(ids).execute(executor).await?;
        Ok(result.rows_affected())
    }
}
