use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use surrealdb::{Datetime, RecordId};

use crate::db::connection::LongboxDb;
use crate::LongboxError;

/// A cross-series reading order.
///
/// Threads stitch runs of installments (possibly from different series)
/// into one sequence: "read Moon Saga 1-5, then Sun Saga 1-3, then...".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: RecordId,
    pub name: String,
    pub slug: String,
    pub synopsis: Option<String>,
    /// The canonical reading order for a site, shown by default.
    pub is_primary: bool,
    pub created_at: Datetime,
}

/// Data for creating a new thread.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct ThreadCreate {
    pub name: String,
    pub slug: String,
    pub synopsis: Option<String>,
    pub is_primary: bool,
}

/// One run of installments inside a thread.
///
/// Covers `begin_installment` through `end_installment` (inclusive) in the
/// begin installment's series, walking by ordinal. A missing end means the
/// run is the single begin installment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadSequence {
    pub id: RecordId,
    pub thread: RecordId,
    pub order: i64,
    pub begin_installment: RecordId,
    pub end_installment: Option<RecordId>,
}

/// Data for appending a sequence to a thread.
#[derive(Debug, Serialize)]
pub struct ThreadSequenceCreate {
    pub thread: RecordId,
    pub order: i64,
    pub begin_installment: RecordId,
    pub end_installment: Option<RecordId>,
}

/// Create a new thread, keyed by its slug.
pub async fn create_thread(db: &LongboxDb, data: ThreadCreate) -> Result<Thread, LongboxError> {
    let key = crate::utils::sanitize::validate_key(&data.slug)?.to_string();
    let result: Option<Thread> = db.create(("thread", key)).content(data).await?;
    result.ok_or_else(|| LongboxError::Database("Failed to create thread".into()))
}

/// Get a thread by slug.
pub async fn get_thread(db: &LongboxDb, slug: &str) -> Result<Option<Thread>, LongboxError> {
    let result: Option<Thread> = db.select(("thread", slug)).await?;
    Ok(result)
}

/// List all threads, primary first.
pub async fn list_threads(db: &LongboxDb) -> Result<Vec<Thread>, LongboxError> {
    let mut result = db
        .query("SELECT * FROM thread ORDER BY is_primary DESC, name ASC")
        .await?;
    let threads: Vec<Thread> = result.take(0)?;
    Ok(threads)
}

/// Delete a thread and its sequences. One transaction.
pub async fn delete_thread(db: &LongboxDb, slug: &str) -> Result<Option<Thread>, LongboxError> {
    let thread_ref = RecordId::from(("thread", slug));
    let mut result = db
        .query(
            r#"
            BEGIN TRANSACTION;
            DELETE thread_sequence WHERE thread = $thread;
            DELETE $thread RETURN BEFORE;
            COMMIT TRANSACTION;
            "#,
        )
        .bind(("thread", thread_ref))
        .await?
        .check()?;
    let deleted: Option<Thread> = result.take(result.num_statements() - 1)?;
    Ok(deleted)
}

/// Append a sequence to a thread.
pub async fn add_sequence(
    db: &LongboxDb,
    data: ThreadSequenceCreate,
) -> Result<ThreadSequence, LongboxError> {
    let result: Option<ThreadSequence> = db.create("thread_sequence").content(data).await?;
    result.ok_or_else(|| LongboxError::Database("Failed to create thread sequence".into()))
}

/// List a thread's sequences in reading order.
pub async fn list_sequences(
    db: &LongboxDb,
    thread: &RecordId,
) -> Result<Vec<ThreadSequence>, LongboxError> {
    let mut result = db
        .query("SELECT * FROM thread_sequence WHERE thread = $thread ORDER BY `order` ASC")
        .bind(("thread", thread.clone()))
        .await?;
    let sequences: Vec<ThreadSequence> = result.take(0)?;
    Ok(sequences)
}
