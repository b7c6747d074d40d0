use std::sync::Arc;

use async_trait::async_trait;
use surrealdb::RecordId;

use crate::db::connection::LongboxDb;
use crate::models::{
    Appearance, Character, CharacterCreate, Classification, ClassificationCreate, Creator,
    CreatorCreate, Credit, CreditCreate, Persona, PersonaCreate, Role, RoleCreate,
};
use crate::services::appearances::{self, AppearanceRange, RangeEntry};
use crate::services::roster;
use crate::LongboxError;

/// Repository trait for the roster aggregate: characters, personas,
/// creators, credits, and per-page appearances.
#[async_trait]
pub trait RosterRepository: Send + Sync {
    // Character operations
    /// Create a character together with its first persona, which becomes the
    /// primary. A character cannot exist without at least one persona.
    async fn create_character(
        &self,
        persona_name: &str,
        bio: &str,
    ) -> Result<(Character, Persona), LongboxError>;
    async fn get_character(&self, id: &str) -> Result<Option<Character>, LongboxError>;
    async fn list_characters(&self) -> Result<Vec<Character>, LongboxError>;
    async fn delete_character(&self, id: &str) -> Result<Option<Character>, LongboxError>;
    async fn character_name(&self, chr: &Character) -> Result<String, LongboxError>;
    async fn set_primary_persona(
        &self,
        character_id: &str,
        persona_id: &str,
    ) -> Result<Character, LongboxError>;
    async fn backfill_creators(&self, character_id: &str) -> Result<usize, LongboxError>;
    async fn first_appearances(
        &self,
        character_id: &str,
    ) -> Result<Vec<roster::FirstAppearance>, LongboxError>;

    // Persona operations
    async fn add_persona(&self, data: PersonaCreate) -> Result<Persona, LongboxError>;
    async fn get_persona(&self, id: &str) -> Result<Option<Persona>, LongboxError>;
    async fn list_personas(&self) -> Result<Vec<Persona>, LongboxError>;
    async fn list_personas_of(
        &self,
        character: &RecordId,
    ) -> Result<Vec<Persona>, LongboxError>;
    async fn delete_persona(&self, id: &str) -> Result<Option<Persona>, LongboxError>;

    // Classification operations
    async fn create_classification(
        &self,
        data: ClassificationCreate,
    ) -> Result<Classification, LongboxError>;
    async fn list_classifications(&self) -> Result<Vec<Classification>, LongboxError>;

    // Appearance operations
    async fn replace_appearances(
        &self,
        installment: &RecordId,
        entries: &[RangeEntry],
    ) -> Result<Vec<RecordId>, LongboxError>;
    async fn appearance_ranges(
        &self,
        installment: &RecordId,
    ) -> Result<Vec<AppearanceRange>, LongboxError>;
    async fn list_appearances(
        &self,
        installment: &RecordId,
    ) -> Result<Vec<Appearance>, LongboxError>;

    // Credit operations
    async fn create_creator(&self, data: CreatorCreate) -> Result<Creator, LongboxError>;
    async fn list_creators(&self) -> Result<Vec<Creator>, LongboxError>;
    async fn create_role(&self, data: RoleCreate) -> Result<Role, LongboxError>;
    async fn list_roles(&self) -> Result<Vec<Role>, LongboxError>;
    async fn add_credit(&self, data: CreditCreate) -> Result<Credit, LongboxError>;
    async fn list_credits(&self, installment: &RecordId) -> Result<Vec<Credit>, LongboxError>;
}

/// SurrealDB implementation of RosterRepository.
pub struct SurrealRosterRepository {
    db: Arc<LongboxDb>,
}

impl SurrealRosterRepository {
    /// Create a new repository with the given database connection.
    pub fn new(db: Arc<LongboxDb>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RosterRepository for SurrealRosterRepository {
    async fn create_character(
        &self,
        persona_name: &str,
        bio: &str,
    ) -> Result<(Character, Persona), LongboxError> {
        let chr = crate::models::character::create_character(
            &self.db,
            CharacterCreate {
                bio: bio.to_string(),
            },
        )
        .await?;

        let persona = crate::models::persona::create_persona(
            &self.db,
            PersonaCreate::new(chr.id.clone(), persona_name),
        )
        .await?;

        let chr = roster::set_primary_persona(
            &self.db,
            &chr.id.key().to_string(),
            &persona.id.key().to_string(),
        )
        .await?;
        Ok((chr, persona))
    }

    async fn get_character(&self, id: &str) -> Result<Option<Character>, LongboxError> {
        crate::models::character::get_character(&self.db, id).await
    }

    async fn list_characters(&self) -> Result<Vec<Character>, LongboxError> {
        crate::models::character::list_characters(&self.db).await
    }

    async fn delete_character(&self, id: &str) -> Result<Option<Character>, LongboxError> {
        crate::models::character::delete_character(&self.db, id).await
    }

    async fn character_name(&self, chr: &Character) -> Result<String, LongboxError> {
        roster::display_name(&self.db, chr).await
    }

    async fn set_primary_persona(
        &self,
        character_id: &str,
        persona_id: &str,
    ) -> Result<Character, LongboxError> {
        roster::set_primary_persona(&self.db, character_id, persona_id).await
    }

    async fn backfill_creators(&self, character_id: &str) -> Result<usize, LongboxError> {
        roster::backfill_creators(&self.db, character_id).await
    }

    async fn first_appearances(
        &self,
        character_id: &str,
    ) -> Result<Vec<roster::FirstAppearance>, LongboxError> {
        roster::first_appearances(&self.db, character_id).await
    }

    async fn add_persona(&self, data: PersonaCreate) -> Result<Persona, LongboxError> {
        crate::models::persona::create_persona(&self.db, data).await
    }

    async fn get_persona(&self, id: &str) -> Result<Option<Persona>, LongboxError> {
        crate::models::persona::get_persona(&self.db, id).await
    }

    async fn list_personas(&self) -> Result<Vec<Persona>, LongboxError> {
        crate::models::persona::list_personas(&self.db).await
    }

    async fn list_personas_of(
        &self,
        character: &RecordId,
    ) -> Result<Vec<Persona>, LongboxError> {
        crate::models::persona::list_personas_of(&self.db, character).await
    }

    async fn delete_persona(&self, id: &str) -> Result<Option<Persona>, LongboxError> {
        roster::delete_persona_guarded(&self.db, id).await
    }

    async fn create_classification(
        &self,
        data: ClassificationCreate,
    ) -> Result<Classification, LongboxError> {
        crate::models::persona::create_classification(&self.db, data).await
    }

    async fn list_classifications(&self) -> Result<Vec<Classification>, LongboxError> {
        crate::models::persona::list_classifications(&self.db).await
    }

    async fn replace_appearances(
        &self,
        installment: &RecordId,
        entries: &[RangeEntry],
    ) -> Result<Vec<RecordId>, LongboxError> {
        appearances::replace_appearances(&self.db, installment, entries).await
    }

    async fn appearance_ranges(
        &self,
        installment: &RecordId,
    ) -> Result<Vec<AppearanceRange>, LongboxError> {
        appearances::appearance_ranges(&self.db, installment).await
    }

    async fn list_appearances(
        &self,
        installment: &RecordId,
    ) -> Result<Vec<Appearance>, LongboxError> {
        crate::models::appearance::list_for_installment(&self.db, installment).await
    }

    async fn create_creator(&self, data: CreatorCreate) -> Result<Creator, LongboxError> {
        crate::models::credit::create_creator(&self.db, data).await
    }

    async fn list_creators(&self) -> Result<Vec<Creator>, LongboxError> {
        crate::models::credit::list_creators(&self.db).await
    }

    async fn create_role(&self, data: RoleCreate) -> Result<Role, LongboxError> {
        crate::models::credit::create_role(&self.db, data).await
    }

    async fn list_roles(&self) -> Result<Vec<Role>, LongboxError> {
        crate::models::credit::list_roles(&self.db).await
    }

    async fn add_credit(&self, data: CreditCreate) -> Result<Credit, LongboxError> {
        crate::models::credit::add_credit(&self.db, data).await
    }

    async fn list_credits(&self, installment: &RecordId) -> Result<Vec<Credit>, LongboxError> {
        crate::models::credit::list_credits(&self.db, installment).await
    }
}
