use dexflow_domain::prelude::*;
use std::fmt;
use std::str::FromStr;
use tracing::error;

/// Maps a database failure onto the shared error taxonomy.
pub fn storage(err: sqlx::Error) -> DexError {
    error!(error = %err, "Database operation failed");
    DexError::external(format!("storage failure: {err}"))
}

/// A stored column that no longer parses into its domain type.
pub fn corrupt(table: &str, column: &str, err: impl fmt::Display) -> DexError {
    DexError::external(format!("{table}.{column} holds an invalid value: {err}"))
}

/// Parses a text column, reporting failures as corrupt storage.
pub fn parse_column<T>(table: &str, column: &str, raw: &str) -> Result<T, DexError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.parse().map_err(|e| corrupt(table, column, e))
}

/// Parses a nullable address column; blank and NULL both mean "not set".
pub fn parse_optional_address(
    table: &str,
    column: &str,
    raw: Option<&str>,
) -> Result<Option<Address>, DexError> {
    match raw {
        Some(raw) => Address::parse_optional(raw).map_err(|e| corrupt(table, column, e)),
        None => Ok(None),
    }
}
