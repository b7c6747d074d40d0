//! Reading-order expansion for threads.
//!
//! A thread's sequences each cover a run of installments inside one series;
//! expanding a thread walks its sequences in order and concatenates each
//! run's installments by ordinal.

use surrealdb::RecordId;

use crate::db::connection::LongboxDb;
use crate::models::installment::{self, Installment};
use crate::models::thread::{self, Thread};
use crate::LongboxError;

async fn fetch_installment(
    db: &LongboxDb,
    id: &RecordId,
) -> Result<Installment, LongboxError> {
    installment::get_installment(db, &id.key().to_string())
        .await?
        .ok_or_else(|| LongboxError::NotFound {
            entity_type: "installment".to_string(),
            id: id.to_string(),
        })
}

/// Expand one begin/end pair into its run of installments, inclusive,
/// ordered by ordinal.
async fn expand_run(
    db: &LongboxDb,
    begin: &Installment,
    end: &Installment,
) -> Result<Vec<Installment>, LongboxError> {
    if begin.series != end.series {
        return Err(LongboxError::Validation(
            "Thread sequence endpoints must belong to the same series.".into(),
        ));
    }
    if end.ordinal < begin.ordinal {
        return Err(LongboxError::Validation(
            "Thread sequence runs backwards: end precedes begin.".into(),
        ));
    }

    let mut response = db
        .query(
            "SELECT * FROM installment \
             WHERE series = $series AND ordinal >= $lo AND ordinal <= $hi \
             ORDER BY ordinal ASC",
        )
        .bind(("series", begin.series.clone()))
        .bind(("lo", begin.ordinal))
        .bind(("hi", end.ordinal))
        .await?;
    let run: Vec<Installment> = response.take(0)?;
    Ok(run)
}

/// The full reading order of a thread: every sequence expanded and
/// concatenated in sequence order.
pub async fn reading_order(
    db: &LongboxDb,
    thread: &Thread,
) -> Result<Vec<Installment>, LongboxError> {
    let sequences = thread::list_sequences(db, &thread.id).await?;

    let mut out = Vec::new();
    for seq in sequences {
        let begin = fetch_installment(db, &seq.begin_installment).await?;
        let end = match &seq.end_installment {
            Some(id) => fetch_installment(db, id).await?,
            None => begin.clone(),
        };
        out.extend(expand_run(db, &begin, &end).await?);
    }
    Ok(out)
}
