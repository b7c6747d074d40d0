use serde::{Deserialize, Serialize};
use surrealdb::{Datetime, RecordId};

use crate::db::connection::LongboxDb;
use crate::LongboxError;

/// A single page of an installment.
///
/// `order` is the dense 0-indexed position within the installment; it is the
/// index appearance ranges address, not a printed page label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: RecordId,
    pub installment: RecordId,
    pub order: i64,
    pub original_name: Option<String>,
    pub created_at: Datetime,
}

/// Data for creating a new page.
#[derive(Debug, Serialize)]
pub struct PageCreate {
    pub installment: RecordId,
    pub order: i64,
    pub original_name: Option<String>,
}

/// Create a single page.
pub async fn create_page(db: &LongboxDb, data: PageCreate) -> Result<Page, LongboxError> {
    let result: Option<Page> = db.create("page").content(data).await?;
    result.ok_or_else(|| LongboxError::Database("Failed to create page".into()))
}

/// List an installment's pages in reading order.
pub async fn list_pages(
    db: &LongboxDb,
    installment: &RecordId,
) -> Result<Vec<Page>, LongboxError> {
    let mut result = db
        .query("SELECT * FROM page WHERE installment = $installment ORDER BY `order` ASC")
        .bind(("installment", installment.clone()))
        .await?;
    let pages: Vec<Page> = result.take(0)?;
    Ok(pages)
}

/// Fetch the page at a given 0-indexed position.
pub async fn get_page_at(
    db: &LongboxDb,
    installment: &RecordId,
    order: i64,
) -> Result<Option<Page>, LongboxError> {
    let mut result = db
        .query("SELECT * FROM page WHERE installment = $installment AND `order` = $order LIMIT 1")
        .bind(("installment", installment.clone()))
        .bind(("order", order))
        .await?;
    let page: Option<Page> = result.take(0)?;
    Ok(page)
}

/// Count an installment's pages.
pub async fn count_pages(db: &LongboxDb, installment: &RecordId) -> Result<i64, LongboxError> {
    #[derive(Deserialize)]
    struct CountRow {
        total: i64,
    }
    let mut result = db
        .query("SELECT count() AS total FROM page WHERE installment = $installment GROUP ALL")
        .bind(("installment", installment.clone()))
        .await?;
    let row: Option<CountRow> = result.take(0)?;
    Ok(row.map(|r| r.total).unwrap_or(0))
}
