pub mod builders;
pub mod harness;

use surrealdb::RecordId;

use longbox::db::connection::LongboxDb;
use longbox::models::Page;
use longbox::services::ingest;

/// Seed an installment with `count` pages named `page_01.png`.. and keep its
/// `page_count`/`has_cover` fields in sync, the same way ingest does.
#[allow(dead_code)]
pub async fn seed_pages(db: &LongboxDb, installment: &RecordId, count: usize) -> Vec<Page> {
    let names: Vec<String> = (1..=count).map(|i| format!("page_{:02}.png", i)).collect();
    let plan = ingest::plan_image_pages(&names);
    ingest::replace_installment_pages(db, installment, &plan)
        .await
        .expect("Failed to seed pages")
}
