//! Natural ordering maintenance for installments within a series.
//!
//! `ordinal` approximates natural reading order (ascending number, ties by
//! title) without a full resort on every write. The maintainer runs after an
//! installment is persisted and only when its number was part of the change;
//! unnumbered installments keep a stable manual position at the end and are
//! never auto-repositioned.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::db::connection::LongboxDb;
use crate::models::installment::{count_in_series, max_number_in_series, Installment};
use crate::utils::numeral::IssueNumber;
use crate::LongboxError;

/// What just happened to the installment being saved.
///
/// The trigger condition is an explicit parameter rather than an implicit
/// persistence hook: callers state whether the record is new and whether the
/// number field was part of the change.
#[derive(Debug, Clone, Copy)]
pub struct SaveChange {
    pub is_new: bool,
    pub number_changed: bool,
}

impl SaveChange {
    /// A freshly created installment. Its number (if any) is by definition
    /// being set for the first time.
    pub fn created() -> Self {
        Self {
            is_new: true,
            number_changed: true,
        }
    }

    /// An update to an existing installment.
    pub fn updated(number_changed: bool) -> Self {
        Self {
            is_new: false,
            number_changed,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct NaturalRow {
    id: RecordId,
    number: Option<IssueNumber>,
    title: Option<String>,
}

/// Natural comparison: number ascending with unnumbered last, then title
/// ascending with missing titles first, then record id as the deterministic
/// tie-break.
fn natural_cmp(a: &NaturalRow, b: &NaturalRow) -> Ordering {
    (a.number.is_none(), a.number, &a.title, a.id.to_string()).cmp(&(
        b.number.is_none(),
        b.number,
        &b.title,
        b.id.to_string(),
    ))
}

#[derive(Serialize)]
struct OrdinalPatch {
    ordinal: i64,
}

async fn set_ordinal(db: &LongboxDb, id: &RecordId, ordinal: i64) -> Result<(), LongboxError> {
    let _: Option<Installment> = db.update(id.clone()).merge(OrdinalPatch { ordinal }).await?;
    Ok(())
}

/// Recompute the saved installment's ordinal, shifting neighbors as needed.
///
/// Invoked after the installment is persisted. The fast paths (no number, or
/// a brand-new installment that is already the latest) append without
/// touching anyone else; otherwise the full natural order is computed and the
/// installment is inserted at its rank, with every ordinal at or above the
/// target shifted up by one. The shift and the final placement are a single
/// transaction, so no reader observes a duplicate ordinal.
pub async fn resequence_after_save(
    db: &LongboxDb,
    saved: &Installment,
    change: SaveChange,
) -> Result<(), LongboxError> {
    // avoid work if we can
    if !change.is_new && !change.number_changed {
        return Ok(());
    }

    // can't make good assumptions without a number
    let Some(number) = saved.number else {
        // put last if new, otherwise leave in place
        if change.is_new {
            let count = count_in_series(db, &saved.series).await?;
            set_ordinal(db, &saved.id, count).await?;
        }
        return Ok(());
    };

    // put last if "latest"
    if change.is_new {
        let max = max_number_in_series(db, &saved.series).await?;
        if Some(number) == max {
            let count = count_in_series(db, &saved.series).await?;
            set_ordinal(db, &saved.id, count).await?;
            return Ok(());
        }
    }

    // full natural sort of the series to find this installment's rank
    let mut response = db
        .query("SELECT id, number, title FROM installment WHERE series = $series")
        .bind(("series", saved.series.clone()))
        .await?;
    let mut rows: Vec<NaturalRow> = response.take(0)?;
    rows.sort_by(natural_cmp);

    let rank = rows
        .iter()
        .position(|r| r.id == saved.id)
        .ok_or_else(|| LongboxError::NotFound {
            entity_type: "installment".to_string(),
            id: saved.id.to_string(),
        })?;
    let target = rank as i64 + 1;

    tracing::debug!(
        installment = %saved.id,
        target_ordinal = target,
        "resequencing installment within series"
    );

    // open a slot and take it, atomically
    db.query(
        r#"
        BEGIN TRANSACTION;
        UPDATE installment SET ordinal = ordinal + 1
            WHERE series = $series AND ordinal >= $target AND id != $ins;
        UPDATE $ins SET ordinal = $target;
        COMMIT TRANSACTION;
        "#,
    )
    .bind(("series", saved.series.clone()))
    .bind(("target", target))
    .bind(("ins", saved.id.clone()))
    .await?
    .check()?;

    Ok(())
}

/// Suggest the number an editor most likely wants next: the series maximum
/// advanced by a whole issue, or by one second-part unit when the maximum is
/// fractional. No suggestion if the series has no numbered installments yet.
pub async fn suggest_next_number(
    db: &LongboxDb,
    series: &RecordId,
) -> Result<Option<IssueNumber>, LongboxError> {
    match max_number_in_series(db, series).await? {
        Some(max) => Ok(Some(max.bump()?)),
        None => Ok(None),
    }
}
