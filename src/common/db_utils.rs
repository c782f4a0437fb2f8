// ---
// Helpers de erro do Postgres
// ---

/// Violação de unicidade. Também é o que o Postgres devolve quando dois
/// `CREATE TABLE IF NOT EXISTS` concorrentes disputam o mesmo nome no catálogo.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

/// SQLSTATE 42P01: a tabela não existe.
pub(crate) fn is_undefined_table(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db_err| db_err.code())
        .map(|code| code == "42P01")
        .unwrap_or(false)
}
