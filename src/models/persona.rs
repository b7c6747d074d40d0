use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use surrealdb::{Datetime, RecordId};

use crate::db::connection::LongboxDb;
use crate::LongboxError;

/// Alter ego type or purpose.
///
/// Multiple given names are allowed (see: Superman).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaKind {
    GivenName,
    SuperIdentity,
    Personality,
    Title,
    Alias,
    Role,
}

impl Default for PersonaKind {
    fn default() -> Self {
        PersonaKind::GivenName
    }
}

/// Alter ego manner of being. (See: Shazam)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub id: RecordId,
    pub name: String,
    pub order: i64,
}

/// Data for creating a classification.
#[derive(Debug, Serialize)]
pub struct ClassificationCreate {
    pub name: String,
    pub order: i64,
}

/// A named identity that can appear on pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub id: RecordId,
    pub character: RecordId,
    /// Full name, without any additional designation.
    pub name: String,
    pub kind: PersonaKind,
    pub classification: Option<RecordId>,
    pub creators: Vec<RecordId>,
    pub created_at: Datetime,
    pub updated_at: Datetime,
}

/// Data for creating a new persona.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct PersonaCreate {
    pub character: RecordId,
    pub name: String,
    pub kind: PersonaKind,
    pub classification: Option<RecordId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub creators: Vec<RecordId>,
}

impl PersonaCreate {
    pub fn new(character: RecordId, name: impl Into<String>) -> Self {
        Self {
            character,
            name: name.into(),
            kind: PersonaKind::default(),
            classification: None,
            creators: Vec::new(),
        }
    }
}

/// Data for updating a persona.
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct PersonaUpdate {
    pub name: Option<String>,
    pub kind: Option<PersonaKind>,
    pub classification: Option<RecordId>,
    pub creators: Option<Vec<RecordId>>,
    pub updated_at: Datetime,
}

/// Create a new persona in the database.
///
/// Minimal cleaning is desirable and proper: the name is trimmed, nothing else.
pub async fn create_persona(db: &LongboxDb, data: PersonaCreate) -> Result<Persona, LongboxError> {
    let data = PersonaCreate {
        name: data.name.trim().to_string(),
        ..data
    };
    if data.name.is_empty() {
        return Err(LongboxError::Validation("Persona name cannot be empty.".into()));
    }
    let result: Option<Persona> = db
        .create(("persona", crate::utils::shortid::short_id()))
        .content(data)
        .await?;
    result.ok_or_else(|| LongboxError::Database("Failed to create persona".into()))
}

/// Get a persona by ID.
pub async fn get_persona(db: &LongboxDb, id: &str) -> Result<Option<Persona>, LongboxError> {
    let result: Option<Persona> = db.select(("persona", id)).await?;
    Ok(result)
}

/// List all personas, sorted by name.
pub async fn list_personas(db: &LongboxDb) -> Result<Vec<Persona>, LongboxError> {
    let mut result = db.query("SELECT * FROM persona ORDER BY name ASC").await?;
    let personas: Vec<Persona> = result.take(0)?;
    Ok(personas)
}

/// List the personas belonging to one character.
pub async fn list_personas_of(
    db: &LongboxDb,
    character: &RecordId,
) -> Result<Vec<Persona>, LongboxError> {
    let mut result = db
        .query("SELECT * FROM persona WHERE character = $character ORDER BY name ASC")
        .bind(("character", character.clone()))
        .await?;
    let personas: Vec<Persona> = result.take(0)?;
    Ok(personas)
}

/// Update a persona by ID.
pub async fn update_persona(
    db: &LongboxDb,
    id: &str,
    data: PersonaUpdate,
) -> Result<Option<Persona>, LongboxError> {
    let result: Option<Persona> = db.update(("persona", id)).merge(data).await?;
    Ok(result)
}

/// Delete a persona and its appearances. One transaction.
///
/// Callers wanting the primary-persona guard should go through
/// `services::roster::delete_persona_guarded` instead.
pub async fn delete_persona(db: &LongboxDb, id: &str) -> Result<Option<Persona>, LongboxError> {
    let persona_ref = RecordId::from(("persona", id));
    let mut result = db
        .query(
            r#"
            BEGIN TRANSACTION;
            DELETE appearance WHERE persona = $persona;
            DELETE $persona RETURN BEFORE;
            COMMIT TRANSACTION;
            "#,
        )
        .bind(("persona", persona_ref))
        .await?
        .check()?;
    let deleted: Option<Persona> = result.take(result.num_statements() - 1)?;
    Ok(deleted)
}

/// Create a classification bucket. The name is normalized to collapsed
/// lowercase so "Human " and "human" cannot coexist.
pub async fn create_classification(
    db: &LongboxDb,
    data: ClassificationCreate,
) -> Result<Classification, LongboxError> {
    let data = ClassificationCreate {
        name: data.name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase(),
        ..data
    };
    let result: Option<Classification> = db.create("classification").content(data).await?;
    result.ok_or_else(|| LongboxError::Database("Failed to create classification".into()))
}

/// List classifications in display order.
pub async fn list_classifications(db: &LongboxDb) -> Result<Vec<Classification>, LongboxError> {
    let mut result = db
        .query("SELECT * FROM classification ORDER BY `order` ASC")
        .await?;
    let classifications: Vec<Classification> = result.take(0)?;
    Ok(classifications)
}
