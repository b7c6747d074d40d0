//! Entity ID validation for SurrealDB query safety.
//!
//! Entity IDs follow the `table:key` format (e.g., `series:ELFQUEST`).
//! These functions validate the format to prevent SurrealQL injection
//! when building queries with `format!()`.

use crate::LongboxError;

/// Allowed characters in the key portion of an entity ID.
/// Matches SurrealDB's record ID syntax: alphanumeric, underscores, hyphens.
fn is_valid_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Known entity table names in the Longbox schema.
const KNOWN_TABLES: &[&str] = &[
    "series",
    "installment",
    "page",
    "thread",
    "thread_sequence",
    "character",
    "persona",
    "classification",
    "appearance",
    "creator",
    "role",
    "credit",
];

/// Validate that `entity_id` is a safe `table:key` format.
///
/// Returns the (table, key) parts if valid.
/// Returns `LongboxError::Validation` if the format is invalid.
///
/// ```ignore
/// let (table, key) = validate_entity_id("persona:batman")?;
/// assert_eq!(table, "persona");
/// assert_eq!(key, "batman");
/// ```
pub fn validate_entity_id(entity_id: &str) -> Result<(&str, &str), LongboxError> {
    let (table, key) = entity_id.split_once(':').ok_or_else(|| {
        LongboxError::Validation(format!(
            "Invalid entity ID '{}': expected 'table:key' format",
            entity_id
        ))
    })?;

    if table.is_empty() || !table.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
        return Err(LongboxError::Validation(format!(
            "Invalid entity ID '{}': table name must be lowercase alphanumeric with underscores",
            entity_id
        )));
    }

    if key.is_empty() || !key.chars().all(is_valid_key_char) {
        return Err(LongboxError::Validation(format!(
            "Invalid entity ID '{}': key must be alphanumeric with underscores or hyphens",
            entity_id
        )));
    }

    Ok((table, key))
}

/// Validate that a bare key (without table prefix) is safe for query interpolation.
pub fn validate_key(key: &str) -> Result<&str, LongboxError> {
    if key.is_empty() || !key.chars().all(is_valid_key_char) {
        return Err(LongboxError::Validation(format!(
            "Invalid key '{}': must be alphanumeric with underscores or hyphens",
            key
        )));
    }
    Ok(key)
}

/// Validate that a table name is known and safe.
pub fn validate_table(table: &str) -> Result<&str, LongboxError> {
    if KNOWN_TABLES.contains(&table) {
        Ok(table)
    } else if !table.is_empty() && table.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
        // Unknown but syntactically valid, allow it
        Ok(table)
    } else {
        Err(LongboxError::Validation(format!(
            "Invalid table name '{}'",
            table
        )))
    }
}
