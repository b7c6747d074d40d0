//! Character/persona maintenance rules and public read queries.

use std::collections::HashMap;

use serde::Deserialize;
use surrealdb::RecordId;

use crate::db::connection::LongboxDb;
use crate::models::character::{self, Character, CharacterUpdate};
use crate::models::installment::Installment;
use crate::models::persona::{self, Persona, PersonaUpdate};
use crate::models::series::Series;
use crate::LongboxError;

/// A character's display name is its primary persona's name.
pub async fn display_name(db: &LongboxDb, chr: &Character) -> Result<String, LongboxError> {
    match &chr.primary_persona {
        Some(primary) => {
            let p = persona::get_persona(db, &primary.key().to_string()).await?;
            Ok(p.map(|p| p.name).unwrap_or_else(|| "(New)".to_string()))
        }
        None => Ok("(New)".to_string()),
    }
}

/// Point a character at a new primary persona. The persona must already
/// belong to the character.
pub async fn set_primary_persona(
    db: &LongboxDb,
    character_id: &str,
    persona_id: &str,
) -> Result<Character, LongboxError> {
    let p = persona::get_persona(db, persona_id)
        .await?
        .ok_or_else(|| LongboxError::NotFound {
            entity_type: "persona".to_string(),
            id: persona_id.to_string(),
        })?;

    if p.character.key().to_string() != character_id {
        return Err(LongboxError::Validation(
            "Persona does not belong to this character.".into(),
        ));
    }

    let update = CharacterUpdate {
        primary_persona: Some(p.id),
        ..Default::default()
    };
    character::update_character(db, character_id, update)
        .await?
        .ok_or_else(|| LongboxError::NotFound {
            entity_type: "character".to_string(),
            id: character_id.to_string(),
        })
}

/// Delete a persona unless it is its character's primary.
pub async fn delete_persona_guarded(
    db: &LongboxDb,
    persona_id: &str,
) -> Result<Option<Persona>, LongboxError> {
    let Some(p) = persona::get_persona(db, persona_id).await? else {
        return Ok(None);
    };

    let chr = character::get_character(db, &p.character.key().to_string()).await?;
    if let Some(chr) = chr {
        if chr.primary_persona.as_ref() == Some(&p.id) {
            return Err(LongboxError::ReferentialIntegrityViolation {
                entity_type: "persona".to_string(),
                entity_id: persona_id.to_string(),
                message: "Cannot delete the primary persona.".to_string(),
            });
        }
    }

    persona::delete_persona(db, persona_id).await
}

/// Cross-populate creators: personas of the character with no creators of
/// their own inherit the primary persona's. Things get non-deterministic if
/// we reach beyond the primary persona, so that is all we do.
///
/// Returns how many personas were updated.
pub async fn backfill_creators(
    db: &LongboxDb,
    character_id: &str,
) -> Result<usize, LongboxError> {
    let chr = character::get_character(db, character_id)
        .await?
        .ok_or_else(|| LongboxError::NotFound {
            entity_type: "character".to_string(),
            id: character_id.to_string(),
        })?;
    let Some(primary_id) = chr.primary_persona else {
        return Ok(0);
    };

    let personas = persona::list_personas_of(db, &chr.id).await?;
    let Some(primary) = personas.iter().find(|p| p.id == primary_id) else {
        return Ok(0);
    };
    if primary.creators.is_empty() {
        return Ok(0);
    }

    let defaults = primary.creators.clone();
    let mut updated = 0;
    for p in personas.iter().filter(|p| p.id != primary_id && p.creators.is_empty()) {
        let update = PersonaUpdate {
            creators: Some(defaults.clone()),
            ..Default::default()
        };
        persona::update_persona(db, &p.id.key().to_string(), update).await?;
        updated += 1;
    }
    Ok(updated)
}

/// A character's entry point into one series.
#[derive(Debug, Clone)]
pub struct FirstAppearance {
    pub series: Series,
    pub installment: Installment,
}

/// For each series any of the character's personas appears in, the earliest
/// installment (lowest ordinal) carrying an appearance. Sorted by series
/// name. A single linear pass over the character's appearance rows.
pub async fn first_appearances(
    db: &LongboxDb,
    character_id: &str,
) -> Result<Vec<FirstAppearance>, LongboxError> {
    let chr_ref = RecordId::from(("character", character_id));
    let personas = persona::list_personas_of(db, &chr_ref).await?;
    if personas.is_empty() {
        return Ok(Vec::new());
    }
    let persona_ids: Vec<RecordId> = personas.into_iter().map(|p| p.id).collect();

    #[derive(Deserialize)]
    struct InstallmentRef {
        installment: RecordId,
    }
    let mut response = db
        .query("SELECT installment FROM appearance WHERE persona IN $personas")
        .bind(("personas", persona_ids))
        .await?;
    let refs: Vec<InstallmentRef> = response.take(0)?;
    if refs.is_empty() {
        return Ok(Vec::new());
    }

    let mut unique: Vec<RecordId> = refs.into_iter().map(|r| r.installment).collect();
    unique.sort_by_key(|id| id.to_string());
    unique.dedup();

    let mut response = db
        .query("SELECT * FROM installment WHERE id IN $ids")
        .bind(("ids", unique))
        .await?;
    let installments: Vec<Installment> = response.take(0)?;

    // earliest installment per series
    let mut first_by_series: HashMap<String, Installment> = HashMap::new();
    for ins in installments {
        let key = ins.series.to_string();
        match first_by_series.get(&key) {
            Some(best) if best.ordinal <= ins.ordinal => {}
            _ => {
                first_by_series.insert(key, ins);
            }
        }
    }

    let fetches: Vec<_> = first_by_series
        .into_values()
        .map(|ins| async move {
            let series = crate::models::series::get_series(db, &ins.series.key().to_string())
                .await?
                .ok_or_else(|| LongboxError::NotFound {
                    entity_type: "series".to_string(),
                    id: ins.series.to_string(),
                })?;
            Ok::<_, LongboxError>(FirstAppearance {
                series,
                installment: ins,
            })
        })
        .collect();

    let mut out = futures::future::join_all(fetches)
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    out.sort_by(|a, b| a.series.name.cmp(&b.series.name));
    Ok(out)
}
