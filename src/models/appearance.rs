use serde::{Deserialize, Serialize};
use surrealdb::{Datetime, RecordId};

use crate::db::connection::LongboxDb;
use crate::LongboxError;

/// Whether a persona is visible on the page, or otherwise present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppearanceKind {
    Normal,
    OffScreen,
    Mentioned,
}

impl Default for AppearanceKind {
    fn default() -> Self {
        AppearanceKind::Normal
    }
}

impl AppearanceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AppearanceKind::Normal => "normal",
            AppearanceKind::OffScreen => "off_screen",
            AppearanceKind::Mentioned => "mentioned",
        }
    }
}

impl std::str::FromStr for AppearanceKind {
    type Err = LongboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" | "n" => Ok(AppearanceKind::Normal),
            "off_screen" | "offscreen" | "o" => Ok(AppearanceKind::OffScreen),
            "mentioned" | "m" => Ok(AppearanceKind::Mentioned),
            other => Err(LongboxError::Validation(format!(
                "Unknown appearance type '{}'.",
                other
            ))),
        }
    }
}

/// A record that a persona is present on one page of one installment.
///
/// At most one appearance exists per (installment, persona, page); these rows
/// are only ever created in bulk by the range expander and are replaced
/// wholesale on every edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appearance {
    pub id: RecordId,
    pub persona: RecordId,
    pub installment: RecordId,
    pub page: RecordId,
    pub kind: AppearanceKind,
    pub is_spoiler: bool,
    pub created_at: Datetime,
}

/// Unsaved appearance row, as produced by range expansion.
#[derive(Debug, Clone, Serialize)]
pub struct AppearanceSeed {
    pub persona: RecordId,
    pub installment: RecordId,
    pub page: RecordId,
    pub kind: AppearanceKind,
    pub is_spoiler: bool,
}

/// List an installment's appearance rows.
pub async fn list_for_installment(
    db: &LongboxDb,
    installment: &RecordId,
) -> Result<Vec<Appearance>, LongboxError> {
    let mut result = db
        .query("SELECT * FROM appearance WHERE installment = $installment")
        .bind(("installment", installment.clone()))
        .await?;
    let appearances: Vec<Appearance> = result.take(0)?;
    Ok(appearances)
}

/// List every appearance of a persona, across all installments.
pub async fn list_for_persona(
    db: &LongboxDb,
    persona: &RecordId,
) -> Result<Vec<Appearance>, LongboxError> {
    let mut result = db
        .query("SELECT * FROM appearance WHERE persona = $persona")
        .bind(("persona", persona.clone()))
        .await?;
    let appearances: Vec<Appearance> = result.take(0)?;
    Ok(appearances)
}

#[derive(Serialize)]
struct SpoilerPatch {
    is_spoiler: bool,
}

/// Flip the spoiler flag on a single appearance row.
pub async fn set_spoiler(
    db: &LongboxDb,
    id: &str,
    is_spoiler: bool,
) -> Result<Option<Appearance>, LongboxError> {
    let result: Option<Appearance> = db
        .update(("appearance", id))
        .merge(SpoilerPatch { is_spoiler })
        .await?;
    Ok(result)
}
