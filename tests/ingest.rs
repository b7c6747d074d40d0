//! Integration tests for upload ingestion: page replacement and strip
//! re-seeding.

mod common;

use pretty_assertions::assert_eq;

use common::builders::{InstallmentBuilder, SeriesBuilder};
use common::harness::TestHarness;
use longbox::models::AppearanceKind;
use longbox::repository::{
    CatalogRepository, RosterRepository, SurrealCatalogRepository, SurrealRosterRepository,
};
use longbox::services::appearances::RangeEntry;
use longbox::services::ingest;

fn names(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn image_ingest_orders_pages_and_sets_cover() {
    let harness = TestHarness::new().await;
    let repo = SurrealCatalogRepository::new(harness.db.clone());
    let series = repo
        .create_series(SeriesBuilder::new("Moon Saga").build())
        .await
        .unwrap();
    let installment = repo
        .create_installment(InstallmentBuilder::new(series.id.clone()).number(1).build())
        .await
        .unwrap();

    let plan = ingest::plan_image_pages(&names(&[
        "page_02.png",
        "cover.png",
        "page_10.png",
        "page_01.png",
    ]));
    let pages = repo.replace_pages(&installment.id, &plan).await.unwrap();
    assert_eq!(pages.len(), 4);

    let stored = repo.list_pages(&installment.id).await.unwrap();
    let by_order: Vec<&str> = stored
        .iter()
        .map(|p| p.original_name.as_deref().unwrap())
        .collect();
    assert_eq!(
        by_order,
        ["cover.png", "page_01.png", "page_02.png", "page_10.png"]
    );

    let refreshed = repo
        .get_installment(&installment.id.key().to_string())
        .await
        .unwrap()
        .unwrap();
    assert!(refreshed.has_cover);
    assert_eq!(refreshed.page_count, 4);
}

#[tokio::test]
async fn reingest_replaces_pages_and_drops_stale_appearances() {
    let harness = TestHarness::new().await;
    let catalog = SurrealCatalogRepository::new(harness.db.clone());
    let roster = SurrealRosterRepository::new(harness.db.clone());
    let series = catalog
        .create_series(SeriesBuilder::new("Moon Saga").build())
        .await
        .unwrap();
    let installment = catalog
        .create_installment(InstallmentBuilder::new(series.id.clone()).number(1).build())
        .await
        .unwrap();

    let first = ingest::plan_image_pages(&names(&["p1.png", "p2.png", "p3.png"]));
    catalog.replace_pages(&installment.id, &first).await.unwrap();

    let (_, persona) = roster.create_character("Dark Claw", "").await.unwrap();
    roster
        .replace_appearances(
            &installment.id,
            &[RangeEntry {
                persona: persona.id.clone(),
                begin_ord: 0,
                end_ord: 2,
                kind: AppearanceKind::Normal,
                delete: false,
            }],
        )
        .await
        .unwrap();

    // a corrected upload arrives; old pages and their appearances are stale
    let second = ingest::plan_image_pages(&names(&["q1.png", "q2.png"]));
    catalog.replace_pages(&installment.id, &second).await.unwrap();

    let stored = catalog.list_pages(&installment.id).await.unwrap();
    assert_eq!(stored.len(), 2);
    let appearances = roster.list_appearances(&installment.id).await.unwrap();
    assert!(
        appearances.is_empty(),
        "appearances must not outlive the pages they point at"
    );
}

#[tokio::test]
async fn pdf_ingest_counts_pages() {
    let harness = TestHarness::new().await;
    let repo = SurrealCatalogRepository::new(harness.db.clone());
    let series = repo
        .create_series(SeriesBuilder::new("Moon Saga").build())
        .await
        .unwrap();
    let installment = repo
        .create_installment(InstallmentBuilder::new(series.id.clone()).number(2).build())
        .await
        .unwrap();

    let plan = ingest::plan_pdf_pages("MoonSaga_02.pdf", 12);
    repo.replace_pages(&installment.id, &plan).await.unwrap();

    let refreshed = repo
        .get_installment(&installment.id.key().to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.page_count, 12);
    assert!(refreshed.has_cover);
}

#[tokio::test]
async fn strip_ingest_reseeds_the_series() {
    let harness = TestHarness::new().await;
    let repo = SurrealCatalogRepository::new(harness.db.clone());
    let series = repo
        .create_series(SeriesBuilder::new("Daily Moon").build())
        .await
        .unwrap();

    // a pre-existing installment is replaced by the strip upload
    repo.create_installment(
        InstallmentBuilder::new(series.id.clone())
            .title("Old junk")
            .build(),
    )
    .await
    .unwrap();

    let created = repo
        .ingest_strip(&series, &names(&["003.png", "001.png", "002.png"]))
        .await
        .unwrap();
    assert_eq!(created.len(), 3);

    let all = repo.list_installments(&series.id).await.unwrap();
    assert_eq!(all.len(), 3, "old installments must be gone");
    let numbers: Vec<String> = all
        .iter()
        .map(|i| i.number.map(|n| n.to_string()).unwrap_or_default())
        .collect();
    assert_eq!(numbers, ["1", "2", "3"]);

    // each strip installment carries exactly one page
    for ins in &all {
        let pages = repo.list_pages(&ins.id).await.unwrap();
        assert_eq!(pages.len(), 1);
        assert!(!ins.has_cover);
    }

    let refreshed = repo.get_series(&series.slug).await.unwrap().unwrap();
    assert!(refreshed.is_strip);
}

#[tokio::test]
async fn strip_ingest_rejects_archives() {
    let harness = TestHarness::new().await;
    let repo = SurrealCatalogRepository::new(harness.db.clone());
    let series = repo
        .create_series(SeriesBuilder::new("Daily Moon").build())
        .await
        .unwrap();

    assert!(repo.ingest_strip(&series, &names(&["all.pdf"])).await.is_err());
    assert!(repo.ingest_strip(&series, &names(&["all.zip"])).await.is_err());
}
