//! Integration tests for cross-series reading orders.

mod common;

use pretty_assertions::assert_eq;

use common::builders::{InstallmentBuilder, SeriesBuilder};
use common::harness::TestHarness;
use longbox::models::{Installment, Series, ThreadCreate, ThreadSequenceCreate};
use longbox::repository::{CatalogRepository, SurrealCatalogRepository};

async fn series_with_issues(
    repo: &SurrealCatalogRepository,
    name: &str,
    count: i64,
) -> (Series, Vec<Installment>) {
    let series = repo
        .create_series(SeriesBuilder::new(name).build())
        .await
        .unwrap();
    let mut issues = Vec::new();
    for n in 1..=count {
        issues.push(
            repo.create_installment(InstallmentBuilder::new(series.id.clone()).number(n).build())
                .await
                .unwrap(),
        );
    }
    (series, issues)
}

fn thread_data(name: &str, slug: &str) -> ThreadCreate {
    ThreadCreate {
        name: name.to_string(),
        slug: slug.to_string(),
        synopsis: None,
        is_primary: false,
    }
}

#[tokio::test]
async fn reading_order_concatenates_runs_across_series() {
    let harness = TestHarness::new().await;
    let repo = SurrealCatalogRepository::new(harness.db.clone());
    let (_, moon) = series_with_issues(&repo, "Moon Saga", 3).await;
    let (_, sun) = series_with_issues(&repo, "Sun Saga", 2).await;

    let thread = repo
        .create_thread(thread_data("Grand Crossover", "crossover"))
        .await
        .unwrap();
    repo.add_thread_sequence(ThreadSequenceCreate {
        thread: thread.id.clone(),
        order: 1,
        begin_installment: moon[0].id.clone(),
        end_installment: Some(moon[2].id.clone()),
    })
    .await
    .unwrap();
    repo.add_thread_sequence(ThreadSequenceCreate {
        thread: thread.id.clone(),
        order: 2,
        begin_installment: sun[0].id.clone(),
        end_installment: Some(sun[1].id.clone()),
    })
    .await
    .unwrap();

    let order = repo.reading_order(&thread).await.unwrap();
    let labels: Vec<String> = order.iter().map(|i| i.label()).collect();
    assert_eq!(labels, ["#1", "#2", "#3", "#1", "#2"]);
}

#[tokio::test]
async fn run_without_end_is_a_single_installment() {
    let harness = TestHarness::new().await;
    let repo = SurrealCatalogRepository::new(harness.db.clone());
    let (_, moon) = series_with_issues(&repo, "Moon Saga", 3).await;

    let thread = repo
        .create_thread(thread_data("Essentials", "essentials"))
        .await
        .unwrap();
    repo.add_thread_sequence(ThreadSequenceCreate {
        thread: thread.id.clone(),
        order: 1,
        begin_installment: moon[1].id.clone(),
        end_installment: None,
    })
    .await
    .unwrap();

    let order = repo.reading_order(&thread).await.unwrap();
    assert_eq!(order.len(), 1);
    assert_eq!(order[0].id, moon[1].id);
}

#[tokio::test]
async fn backwards_run_is_rejected() {
    let harness = TestHarness::new().await;
    let repo = SurrealCatalogRepository::new(harness.db.clone());
    let (_, moon) = series_with_issues(&repo, "Moon Saga", 3).await;

    let thread = repo
        .create_thread(thread_data("Backwards", "backwards"))
        .await
        .unwrap();
    repo.add_thread_sequence(ThreadSequenceCreate {
        thread: thread.id.clone(),
        order: 1,
        begin_installment: moon[2].id.clone(),
        end_installment: Some(moon[0].id.clone()),
    })
    .await
    .unwrap();

    assert!(repo.reading_order(&thread).await.is_err());
}

#[tokio::test]
async fn cross_series_endpoints_are_rejected() {
    let harness = TestHarness::new().await;
    let repo = SurrealCatalogRepository::new(harness.db.clone());
    let (_, moon) = series_with_issues(&repo, "Moon Saga", 2).await;
    let (_, sun) = series_with_issues(&repo, "Sun Saga", 2).await;

    let thread = repo
        .create_thread(thread_data("Confused", "confused"))
        .await
        .unwrap();
    repo.add_thread_sequence(ThreadSequenceCreate {
        thread: thread.id.clone(),
        order: 1,
        begin_installment: moon[0].id.clone(),
        end_installment: Some(sun[1].id.clone()),
    })
    .await
    .unwrap();

    assert!(repo.reading_order(&thread).await.is_err());
}

#[tokio::test]
async fn deleting_a_thread_removes_its_runs() {
    let harness = TestHarness::new().await;
    let repo = SurrealCatalogRepository::new(harness.db.clone());
    let (_, moon) = series_with_issues(&repo, "Moon Saga", 2).await;

    let thread = repo
        .create_thread(thread_data("Short Lived", "shortlived"))
        .await
        .unwrap();
    repo.add_thread_sequence(ThreadSequenceCreate {
        thread: thread.id.clone(),
        order: 1,
        begin_installment: moon[0].id.clone(),
        end_installment: None,
    })
    .await
    .unwrap();

    longbox::models::thread::delete_thread(&harness.db, "shortlived")
        .await
        .unwrap();

    let sequences = longbox::models::thread::list_sequences(&harness.db, &thread.id)
        .await
        .unwrap();
    assert!(sequences.is_empty());
    assert!(repo.get_thread("shortlived").await.unwrap().is_none());
}
