//! Appearance range expansion and replacement.
//!
//! Editors enter compact (persona, begin, end, type) page ranges per
//! installment. This module validates the submission, expands each range into
//! one appearance row per covered page, and replaces the installment's prior
//! rows wholesale. Updating in place is too complicated, so every edit frags
//! the old rows and recreates fresh.

use serde::Serialize;
use surrealdb::RecordId;

use crate::db::connection::LongboxDb;
use crate::models::appearance::{self, Appearance, AppearanceKind, AppearanceSeed};
use crate::models::page;
use crate::LongboxError;

/// Largest addressable page ordinal.
pub const MAX_ORD: i64 = 32_767;

/// One submitted range entry. `delete` marks an entry the editor removed;
/// deleted entries survive validation but contribute no rows.
#[derive(Debug, Clone)]
pub struct RangeEntry {
    pub persona: RecordId,
    pub begin_ord: i64,
    pub end_ord: i64,
    pub kind: AppearanceKind,
    pub delete: bool,
}

/// A contiguous run of pages on which a persona appears, as displayed back
/// to editors. Produced by collapsing stored per-page rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppearanceRange {
    pub persona: RecordId,
    pub begin_ord: i64,
    pub end_ord: i64,
    pub kind: AppearanceKind,
}

/// Per-entry bounds validation. Runs before any mutation; the first failing
/// entry aborts the whole submission with its index.
fn validate_entries(entries: &[RangeEntry], page_count: i64) -> Result<(), LongboxError> {
    for (index, entry) in entries.iter().enumerate() {
        if entry.delete {
            continue;
        }
        if entry.begin_ord < 0 || entry.end_ord < 0 {
            return Err(LongboxError::InvalidEntry {
                index,
                message: "Page ordinals cannot be negative.".into(),
            });
        }
        if entry.begin_ord > entry.end_ord {
            return Err(LongboxError::InvalidEntry {
                index,
                message: "Invalid page ordinal range: begin > end.".into(),
            });
        }
        if entry.end_ord > MAX_ORD {
            return Err(LongboxError::InvalidEntry {
                index,
                message: format!("Page ordinal exceeds {}.", MAX_ORD),
            });
        }
        if entry.end_ord >= page_count {
            return Err(LongboxError::InvalidEntry {
                index,
                message: format!("There are only {} pages.", page_count),
            });
        }
    }
    Ok(())
}

/// Cross-entry overlap validation. Entries are grouped by persona and sorted
/// by begin ordinal; two consecutive ranges where the next begins at or
/// before the previous end conflict. Overlap is checked per persona
/// regardless of appearance type.
fn check_overlaps(survivors: &[&RangeEntry]) -> Result<(), LongboxError> {
    let mut sorted: Vec<&&RangeEntry> = survivors.iter().collect();
    sorted.sort_by_key(|e| (e.persona.to_string(), e.begin_ord));

    let mut prev: Option<&&RangeEntry> = None;
    for entry in sorted {
        if let Some(p) = prev {
            if p.persona == entry.persona && entry.begin_ord <= p.end_ord {
                return Err(LongboxError::Validation(format!(
                    "Overlapping appearance ranges for {}.",
                    entry.persona
                )));
            }
        }
        prev = Some(entry);
    }
    Ok(())
}

/// Collapse per-page rows into contiguous display ranges with a single
/// linear scan: a row extends the open run when it shares persona and type
/// and sits exactly one page after the run's end.
pub fn collapse_runs(rows: &[(RecordId, AppearanceKind, i64)]) -> Vec<AppearanceRange> {
    let mut sorted: Vec<&(RecordId, AppearanceKind, i64)> = rows.iter().collect();
    sorted.sort_by_key(|(persona, kind, ord)| (persona.to_string(), *kind, *ord));

    let mut ranges: Vec<AppearanceRange> = Vec::new();
    for (persona, kind, ord) in sorted {
        match ranges.last_mut() {
            Some(open)
                if open.persona == *persona && open.kind == *kind && *ord == open.end_ord + 1 =>
            {
                open.end_ord = *ord;
            }
            _ => ranges.push(AppearanceRange {
                persona: persona.clone(),
                begin_ord: *ord,
                end_ord: *ord,
                kind: *kind,
            }),
        }
    }
    ranges
}

fn sort_key(r: &AppearanceRange) -> (String, AppearanceKind, i64, i64) {
    (r.persona.to_string(), r.kind, r.begin_ord, r.end_ord)
}

fn same_ranges(a: &[AppearanceRange], b: &[AppearanceRange]) -> bool {
    let mut a: Vec<&AppearanceRange> = a.iter().collect();
    let mut b: Vec<&AppearanceRange> = b.iter().collect();
    a.sort_by_key(|r| sort_key(r));
    b.sort_by_key(|r| sort_key(r));
    a == b
}

/// The installment's current appearances, collapsed into display ranges.
pub async fn appearance_ranges(
    db: &LongboxDb,
    installment: &RecordId,
) -> Result<Vec<AppearanceRange>, LongboxError> {
    let pages = page::list_pages(db, installment).await?;
    let order_of: std::collections::HashMap<String, i64> =
        pages.into_iter().map(|p| (p.id.to_string(), p.order)).collect();

    let rows = appearance::list_for_installment(db, installment).await?;
    let tuples: Vec<(RecordId, AppearanceKind, i64)> = rows
        .into_iter()
        .filter_map(|a| {
            order_of
                .get(&a.page.to_string())
                .map(|ord| (a.persona, a.kind, *ord))
        })
        .collect();

    Ok(collapse_runs(&tuples))
}

/// Validate the submitted ranges and atomically replace the installment's
/// appearance rows with their expansion.
///
/// Validation failures prevent the delete from running at all; the
/// delete-and-recreate pair is one transaction, so a failed insert rolls the
/// delete back and prior rows survive. An unchanged submission short-circuits
/// to zero rows affected.
///
/// Returns the ids of the newly created rows (empty when skipped).
pub async fn replace_appearances(
    db: &LongboxDb,
    installment: &RecordId,
    entries: &[RangeEntry],
) -> Result<Vec<RecordId>, LongboxError> {
    let pages = page::list_pages(db, installment).await?;
    let page_count = pages.len() as i64;

    validate_entries(entries, page_count)?;
    let survivors: Vec<&RangeEntry> = entries.iter().filter(|e| !e.delete).collect();
    check_overlaps(&survivors)?;

    // no-op short circuit: resubmitting the current state touches nothing
    let current = appearance_ranges(db, installment).await?;
    let submitted: Vec<AppearanceRange> = survivors
        .iter()
        .map(|e| AppearanceRange {
            persona: e.persona.clone(),
            begin_ord: e.begin_ord,
            end_ord: e.end_ord,
            kind: e.kind,
        })
        .collect();
    if same_ranges(&current, &submitted) {
        return Ok(Vec::new());
    }

    // expand ranges into individual appearances
    let mut seeds: Vec<AppearanceSeed> = Vec::new();
    for entry in &survivors {
        for ord in entry.begin_ord..=entry.end_ord {
            seeds.push(AppearanceSeed {
                persona: entry.persona.clone(),
                installment: installment.clone(),
                page: pages[ord as usize].id.clone(),
                kind: entry.kind,
                is_spoiler: false,
            });
        }
    }

    tracing::debug!(
        installment = %installment,
        rows = seeds.len(),
        "replacing appearance rows"
    );

    let mut response = db
        .query(
            r#"
            BEGIN TRANSACTION;
            DELETE appearance WHERE installment = $installment;
            INSERT INTO appearance $seeds;
            COMMIT TRANSACTION;
            "#,
        )
        .bind(("installment", installment.clone()))
        .bind(("seeds", seeds))
        .await?
        .check()?;

    let created: Vec<Appearance> = response.take(response.num_statements() - 1)?;
    Ok(created.into_iter().map(|a| a.id).collect())
}
