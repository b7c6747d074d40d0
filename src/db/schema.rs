use crate::db::connection::LongboxDb;
use crate::LongboxError;

/// Catalog tables: series, installment, page, thread, thread_sequence
const SCHEMA_001: &str = include_str!("migrations/001_catalog_schema.surql");

/// Roster tables: creator, role, classification, character, persona
const SCHEMA_002: &str = include_str!("migrations/002_roster_schema.surql");

/// Join tables: appearance (persona-on-page) and credit (creator-on-installment)
const SCHEMA_003: &str = include_str!("migrations/003_appearances_credits.surql");

/// Apply the database schema to an initialized database connection.
///
/// This executes all DEFINE statements in the schema files, creating tables,
/// fields, and indexes. Migrations are applied in order:
/// - 001: Catalog (series, installment, page, thread, thread_sequence)
/// - 002: Roster (creator, role, classification, character, persona)
/// - 003: Join tables (appearance, credit) with their uniqueness indexes
///
/// It's safe to call multiple times - SurrealDB will update existing
/// definitions rather than fail.
pub async fn apply_schema(db: &LongboxDb) -> Result<(), LongboxError> {
    db.query(SCHEMA_001).await?;
    db.query(SCHEMA_002).await?;
    db.query(SCHEMA_003).await?;
    Ok(())
}
