use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use surrealdb::{Datetime, RecordId};

use crate::db::connection::LongboxDb;
use crate::LongboxError;

/// A character: the singular entity behind one or more personas.
///
/// The character's display name is its primary persona's name; a character
/// with no primary persona is mid-creation and shows as "(New)".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: RecordId,
    pub primary_persona: Option<RecordId>,
    pub bio: String,
    pub created_at: Datetime,
    pub updated_at: Datetime,
}

/// Data for creating a new character.
#[derive(Debug, Default, Serialize)]
pub struct CharacterCreate {
    pub bio: String,
}

/// Data for updating a character.
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct CharacterUpdate {
    pub primary_persona: Option<RecordId>,
    pub bio: Option<String>,
    pub updated_at: Datetime,
}

/// Create a new character in the database.
pub async fn create_character(
    db: &LongboxDb,
    data: CharacterCreate,
) -> Result<Character, LongboxError> {
    let result: Option<Character> = db
        .create(("character", crate::utils::shortid::short_id()))
        .content(data)
        .await?;
    result.ok_or_else(|| LongboxError::Database("Failed to create character".into()))
}

/// Get a character by ID.
pub async fn get_character(db: &LongboxDb, id: &str) -> Result<Option<Character>, LongboxError> {
    let result: Option<Character> = db.select(("character", id)).await?;
    Ok(result)
}

/// List all characters.
pub async fn list_characters(db: &LongboxDb) -> Result<Vec<Character>, LongboxError> {
    let result: Vec<Character> = db.select("character").await?;
    Ok(result)
}

/// Update a character by ID.
pub async fn update_character(
    db: &LongboxDb,
    id: &str,
    data: CharacterUpdate,
) -> Result<Option<Character>, LongboxError> {
    let result: Option<Character> = db.update(("character", id)).merge(data).await?;
    Ok(result)
}

/// Delete a character, its personas, and their appearances. One transaction.
pub async fn delete_character(
    db: &LongboxDb,
    id: &str,
) -> Result<Option<Character>, LongboxError> {
    let chr_ref = RecordId::from(("character", id));
    let mut result = db
        .query(
            r#"
            BEGIN TRANSACTION;
            LET $doomed = (SELECT VALUE id FROM persona WHERE character = $chr);
            DELETE appearance WHERE persona IN $doomed;
            DELETE persona WHERE character = $chr;
            DELETE $chr RETURN BEFORE;
            COMMIT TRANSACTION;
            "#,
        )
        .bind(("chr", chr_ref))
        .await?
        .check()?;
    let deleted: Option<Character> = result.take(result.num_statements() - 1)?;
    Ok(deleted)
}
