use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use surrealdb::{Datetime, RecordId};

use crate::db::connection::LongboxDb;
use crate::LongboxError;

/// Page-flip direction for a series (manga reads right-to-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipDirection {
    Ltr,
    Rtl,
}

impl Default for FlipDirection {
    fn default() -> Self {
        FlipDirection::Ltr
    }
}

/// A series: an ordered collection of installments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    pub id: RecordId,
    pub name: String,
    pub slug: String,
    /// What this series calls its installments ("issue", "chapter", "strip").
    pub installment_label: String,
    pub is_strip: bool,
    pub flip_direction: FlipDirection,
    pub created_at: Datetime,
    pub updated_at: Datetime,
}

/// Data for creating a new series.
#[derive(Debug, Serialize)]
pub struct SeriesCreate {
    pub name: String,
    pub slug: String,
    pub installment_label: String,
    pub is_strip: bool,
    pub flip_direction: FlipDirection,
}

impl SeriesCreate {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            installment_label: "issue".to_string(),
            is_strip: false,
            flip_direction: FlipDirection::default(),
        }
    }
}

/// Data for updating a series.
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct SeriesUpdate {
    pub name: Option<String>,
    pub installment_label: Option<String>,
    pub is_strip: Option<bool>,
    pub flip_direction: Option<FlipDirection>,
    pub updated_at: Datetime,
}

/// Create a new series, keyed by its slug.
pub async fn create_series(db: &LongboxDb, data: SeriesCreate) -> Result<Series, LongboxError> {
    let key = crate::utils::sanitize::validate_key(&data.slug)?.to_string();
    let result: Option<Series> = db.create(("series", key)).content(data).await?;
    result.ok_or_else(|| LongboxError::Database("Failed to create series".into()))
}

/// Get a series by slug.
pub async fn get_series(db: &LongboxDb, slug: &str) -> Result<Option<Series>, LongboxError> {
    let result: Option<Series> = db.select(("series", slug)).await?;
    Ok(result)
}

/// List all series, sorted by name.
pub async fn list_series(db: &LongboxDb) -> Result<Vec<Series>, LongboxError> {
    let mut result = db.query("SELECT * FROM series ORDER BY name ASC").await?;
    let series: Vec<Series> = result.take(0)?;
    Ok(series)
}

/// Update a series by slug.
pub async fn update_series(
    db: &LongboxDb,
    slug: &str,
    data: SeriesUpdate,
) -> Result<Option<Series>, LongboxError> {
    let result: Option<Series> = db.update(("series", slug)).merge(data).await?;
    Ok(result)
}

/// Delete a series and everything it owns: installments, their pages,
/// appearances, credits, and any thread sequences that referenced them.
/// The whole cascade is one transaction.
pub async fn delete_series(db: &LongboxDb, slug: &str) -> Result<Option<Series>, LongboxError> {
    let series_ref = RecordId::from(("series", slug));
    let mut result = db
        .query(
            r#"
            BEGIN TRANSACTION;
            LET $doomed = (SELECT VALUE id FROM installment WHERE series = $series);
            DELETE appearance WHERE installment IN $doomed;
            DELETE credit WHERE installment IN $doomed;
            DELETE page WHERE installment IN $doomed;
            DELETE thread_sequence WHERE begin_installment IN $doomed OR end_installment IN $doomed;
            DELETE installment WHERE series = $series;
            DELETE $series RETURN BEFORE;
            COMMIT TRANSACTION;
            "#,
        )
        .bind(("series", series_ref))
        .await?
        .check()?;
    let deleted: Option<Series> = result.take(result.num_statements() - 1)?;
    Ok(deleted)
}
