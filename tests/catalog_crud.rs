//! Integration tests for series/installment/page CRUD through the catalog
//! repository, including ownership cascades.

mod common;

use pretty_assertions::assert_eq;

use common::builders::{InstallmentBuilder, SeriesBuilder};
use common::harness::TestHarness;
use common::seed_pages;
use longbox::models::SeriesUpdate;
use longbox::repository::{CatalogRepository, SurrealCatalogRepository};
use longbox::utils::numeral::IssueNumber;

#[tokio::test]
async fn series_crud_workflow() {
    let harness = TestHarness::new().await;
    let repo = SurrealCatalogRepository::new(harness.db.clone());

    // CREATE
    let series = repo
        .create_series(SeriesBuilder::new("Moon Saga").build())
        .await
        .expect("Failed to create series");
    assert_eq!(series.name, "Moon Saga");
    assert_eq!(series.slug, "MOONSAGA");
    assert_eq!(series.installment_label, "issue");

    // READ
    let fetched = repo
        .get_series("MOONSAGA")
        .await
        .expect("Failed to get series")
        .expect("Series should exist");
    assert_eq!(fetched.id, series.id);

    // UPDATE
    let update = SeriesUpdate {
        installment_label: Some("chapter".to_string()),
        ..Default::default()
    };
    let updated = repo
        .update_series("MOONSAGA", update)
        .await
        .unwrap()
        .expect("Series should exist for update");
    assert_eq!(updated.installment_label, "chapter");
    assert_eq!(updated.name, "Moon Saga");

    // LIST
    repo.create_series(SeriesBuilder::new("Sun Saga").build())
        .await
        .unwrap();
    let all = repo.list_series().await.unwrap();
    let names: Vec<&str> = all.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Moon Saga", "Sun Saga"]);

    // DELETE
    repo.delete_series("MOONSAGA").await.unwrap();
    assert!(repo.get_series("MOONSAGA").await.unwrap().is_none());
    assert_eq!(repo.list_series().await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_slug_is_rejected() {
    let harness = TestHarness::new().await;
    let repo = SurrealCatalogRepository::new(harness.db.clone());

    repo.create_series(SeriesBuilder::new("Moon Saga").build())
        .await
        .unwrap();
    let dup = repo
        .create_series(SeriesBuilder::new("Other").slug("MOONSAGA").build())
        .await;
    assert!(dup.is_err(), "duplicate slug must not create a second series");
}

#[tokio::test]
async fn installment_requires_number_or_title() {
    let harness = TestHarness::new().await;
    let repo = SurrealCatalogRepository::new(harness.db.clone());
    let series = repo
        .create_series(SeriesBuilder::new("Moon Saga").build())
        .await
        .unwrap();

    let bare = repo
        .create_installment(InstallmentBuilder::new(series.id.clone()).build())
        .await;
    assert!(bare.is_err());

    let titled = repo
        .create_installment(
            InstallmentBuilder::new(series.id.clone())
                .title("Prologue")
                .build(),
        )
        .await;
    assert!(titled.is_ok());
}

#[tokio::test]
async fn installment_lookup_by_packed_number() {
    let harness = TestHarness::new().await;
    let repo = SurrealCatalogRepository::new(harness.db.clone());
    let series = repo
        .create_series(SeriesBuilder::new("Moon Saga").build())
        .await
        .unwrap();

    let created = repo
        .create_installment(
            InstallmentBuilder::new(series.id.clone())
                .number_parts(7, 11)
                .build(),
        )
        .await
        .unwrap();
    assert_eq!(created.label(), "#7.11");

    let number: IssueNumber = "7-11".parse().unwrap();
    let found = longbox::models::installment::find_by_number(&harness.db, &series.id, number)
        .await
        .unwrap()
        .expect("lookup by number should find the installment");
    assert_eq!(found.id, created.id);
}

#[tokio::test]
async fn deleting_series_cascades_to_installments_and_pages() {
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
    seed_pages(&harness.db, &installment.id, 4).await;

    repo.delete_series("MOONSAGA").await.unwrap();

    assert!(repo
        .get_installment(&installment.id.key().to_string())
        .await
        .unwrap()
        .is_none());
    let orphans = longbox::models::page::list_pages(&harness.db, &installment.id)
        .await
        .unwrap();
    assert!(orphans.is_empty(), "pages must not survive their series");
}

#[tokio::test]
async fn deleting_installment_cascades_to_pages() {
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
    seed_pages(&harness.db, &installment.id, 3).await;

    let deleted = repo
        .delete_installment(&installment.id.key().to_string())
        .await
        .unwrap();
    assert!(deleted.is_some());

    let orphans = longbox::models::page::list_pages(&harness.db, &installment.id)
        .await
        .unwrap();
    assert!(orphans.is_empty());
}

#[tokio::test]
async fn page_listing_is_ordered_and_counted() {
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
    seed_pages(&harness.db, &installment.id, 4).await;

    let pages = repo.list_pages(&installment.id).await.unwrap();
    let orders: Vec<i64> = pages.iter().map(|p| p.order).collect();
    assert_eq!(orders, [0, 1, 2, 3]);

    let refreshed = repo
        .get_installment(&installment.id.key().to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.page_count, 4);
}
