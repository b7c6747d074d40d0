use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use surrealdb::{Datetime, RecordId};

use crate::db::connection::LongboxDb;
use crate::utils::numeral::IssueNumber;
use crate::LongboxError;

/// A single numbered or titled issue within a series.
///
/// `ordinal` is the dense 1-indexed default display position inside the
/// series. It is maintained by `services::ordering` whenever `number`
/// changes; it is not recomputed on reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installment {
    pub id: RecordId,
    pub series: RecordId,
    pub number: Option<IssueNumber>,
    pub title: Option<String>,
    pub synopsis: Option<String>,
    pub release_datetime: Option<Datetime>,
    pub has_cover: bool,
    pub paginated: bool,
    pub page_count: i64,
    pub ordinal: i64,
    pub created_at: Datetime,
    pub updated_at: Datetime,
}

impl Installment {
    /// Human-readable designation: "#7.11", or the title when unnumbered.
    pub fn label(&self) -> String {
        match (self.number, self.title.as_deref()) {
            (Some(n), _) => format!("#{}", n),
            (None, Some(t)) => t.to_string(),
            (None, None) => "(untitled)".to_string(),
        }
    }
}

/// Data for creating a new installment.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct InstallmentCreate {
    pub series: RecordId,
    pub number: Option<IssueNumber>,
    pub title: Option<String>,
    pub synopsis: Option<String>,
    pub release_datetime: Option<Datetime>,
    pub has_cover: Option<bool>,
    pub paginated: Option<bool>,
}

impl InstallmentCreate {
    pub fn new(series: RecordId) -> Self {
        Self {
            series,
            number: None,
            title: None,
            synopsis: None,
            release_datetime: None,
            has_cover: None,
            paginated: None,
        }
    }
}

/// Data for updating an installment.
///
/// Doubly-wrapped options distinguish "leave alone" (outer `None`) from
/// "clear the field" (inner `None`).
#[derive(Debug, Default, Serialize)]
pub struct InstallmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<Option<IssueNumber>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_datetime: Option<Option<Datetime>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_cover: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paginated: Option<bool>,
    pub updated_at: Datetime,
}

/// Create a new installment in the database.
///
/// A number is required if no title is given (there would be nothing to
/// call the installment otherwise). Ordinal maintenance is the caller's
/// job, via `services::ordering::resequence_after_save`.
pub async fn create_installment(
    db: &LongboxDb,
    data: InstallmentCreate,
) -> Result<Installment, LongboxError> {
    if data.number.is_none() && data.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
        return Err(LongboxError::Validation(
            "A number is required if no title is specified.".into(),
        ));
    }
    let result: Option<Installment> = db
        .create(("installment", crate::utils::shortid::short_id()))
        .content(data)
        .await?;
    result.ok_or_else(|| LongboxError::Database("Failed to create installment".into()))
}

/// Get an installment by ID.
pub async fn get_installment(
    db: &LongboxDb,
    id: &str,
) -> Result<Option<Installment>, LongboxError> {
    let result: Option<Installment> = db.select(("installment", id)).await?;
    Ok(result)
}

/// List a series's installments in default display order (by ordinal).
pub async fn list_installments(
    db: &LongboxDb,
    series: &RecordId,
) -> Result<Vec<Installment>, LongboxError> {
    let mut result = db
        .query("SELECT * FROM installment WHERE series = $series ORDER BY ordinal ASC")
        .bind(("series", series.clone()))
        .await?;
    let installments: Vec<Installment> = result.take(0)?;
    Ok(installments)
}

/// Find the installment of a series carrying a specific packed number.
pub async fn find_by_number(
    db: &LongboxDb,
    series: &RecordId,
    number: IssueNumber,
) -> Result<Option<Installment>, LongboxError> {
    let mut result = db
        .query("SELECT * FROM installment WHERE series = $series AND number = $number LIMIT 1")
        .bind(("series", series.clone()))
        .bind(("number", number))
        .await?;
    let found: Option<Installment> = result.take(0)?;
    Ok(found)
}

/// Count installments in a series.
pub async fn count_in_series(db: &LongboxDb, series: &RecordId) -> Result<i64, LongboxError> {
    #[derive(Deserialize)]
    struct CountRow {
        total: i64,
    }
    let mut result = db
        .query("SELECT count() AS total FROM installment WHERE series = $series GROUP ALL")
        .bind(("series", series.clone()))
        .await?;
    let row: Option<CountRow> = result.take(0)?;
    Ok(row.map(|r| r.total).unwrap_or(0))
}

/// The largest packed number currently present in a series, if any.
pub async fn max_number_in_series(
    db: &LongboxDb,
    series: &RecordId,
) -> Result<Option<IssueNumber>, LongboxError> {
    #[derive(Deserialize)]
    struct NumberRow {
        number: Option<IssueNumber>,
    }
    let mut result = db
        .query(
            "SELECT number FROM installment \
             WHERE series = $series AND number IS NOT NONE \
             ORDER BY number DESC LIMIT 1",
        )
        .bind(("series", series.clone()))
        .await?;
    let row: Option<NumberRow> = result.take(0)?;
    Ok(row.and_then(|r| r.number))
}

/// Update an installment by ID.
pub async fn update_installment(
    db: &LongboxDb,
    id: &str,
    data: InstallmentUpdate,
) -> Result<Option<Installment>, LongboxError> {
    let result: Option<Installment> = db.update(("installment", id)).merge(data).await?;
    Ok(result)
}

/// Delete an installment and everything it owns (pages, appearances,
/// credits), plus any thread sequences anchored to it. One transaction.
pub async fn delete_installment(
    db: &LongboxDb,
    id: &str,
) -> Result<Option<Installment>, LongboxError> {
    let ins_ref = RecordId::from(("installment", id));
    let mut result = db
        .query(
            r#"
            BEGIN TRANSACTION;
            DELETE appearance WHERE installment = $ins;
            DELETE credit WHERE installment = $ins;
            DELETE page WHERE installment = $ins;
            DELETE thread_sequence WHERE begin_installment = $ins OR end_installment = $ins;
            DELETE $ins RETURN BEFORE;
            COMMIT TRANSACTION;
            "#,
        )
        .bind(("ins", ins_ref))
        .await?
        .check()?;
    let deleted: Option<Installment> = result.take(result.num_statements() - 1)?;
    Ok(deleted)
}
