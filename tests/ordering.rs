//! Integration tests for the natural-ordering maintainer.
//!
//! Ordinals within a series must track natural order (number ascending,
//! ties by title) across inserts and number edits, without disturbing
//! unrelated installments beyond the shift that opens a slot.

mod common;

use std::collections::HashSet;

use pretty_assertions::assert_eq;

use common::builders::{InstallmentBuilder, SeriesBuilder};
use common::harness::TestHarness;
use longbox::models::{Installment, InstallmentUpdate, Series};
use longbox::repository::{CatalogRepository, SurrealCatalogRepository};
use longbox::utils::numeral::IssueNumber;

async fn make_series(repo: &SurrealCatalogRepository, name: &str) -> Series {
    repo.create_series(SeriesBuilder::new(name).build())
        .await
        .expect("Failed to create series")
}

fn numbers_by_ordinal(installments: &[Installment]) -> Vec<String> {
    installments
        .iter()
        .map(|i| {
            i.number
                .map(|n| n.to_string())
                .unwrap_or_else(|| i.title.clone().unwrap_or_default())
        })
        .collect()
}

fn assert_unique_ordinals(installments: &[Installment]) {
    let ordinals: HashSet<i64> = installments.iter().map(|i| i.ordinal).collect();
    assert_eq!(
        ordinals.len(),
        installments.len(),
        "duplicate ordinals: {:?}",
        installments.iter().map(|i| i.ordinal).collect::<Vec<_>>()
    );
}

/// Appending the latest number assigns count + 1 and touches nobody else.
#[tokio::test]
async fn append_latest_leaves_other_ordinals_alone() {
    let harness = TestHarness::new().await;
    let repo = SurrealCatalogRepository::new(harness.db.clone());
    let series = make_series(&repo, "Moon Saga").await;

    for n in 1..=3 {
        repo.create_installment(InstallmentBuilder::new(series.id.clone()).number(n).build())
            .await
            .expect("Failed to create installment");
    }
    let before = repo.list_installments(&series.id).await.unwrap();
    let before_ordinals: Vec<(String, i64)> = before
        .iter()
        .map(|i| (i.id.to_string(), i.ordinal))
        .collect();

    let latest = repo
        .create_installment(InstallmentBuilder::new(series.id.clone()).number(4).build())
        .await
        .unwrap();
    assert_eq!(latest.ordinal, 4);

    let after = repo.list_installments(&series.id).await.unwrap();
    for (id, ordinal) in before_ordinals {
        let survivor = after.iter().find(|i| i.id.to_string() == id).unwrap();
        assert_eq!(survivor.ordinal, ordinal, "ordinal of {} moved", id);
    }
}

/// Inserting a back-issue shifts the tail open and lands at its rank.
#[tokio::test]
async fn back_issue_insert_matches_natural_order() {
    let harness = TestHarness::new().await;
    let repo = SurrealCatalogRepository::new(harness.db.clone());
    let series = make_series(&repo, "Moon Saga").await;

    for n in [1, 2, 3] {
        repo.create_installment(InstallmentBuilder::new(series.id.clone()).number(n).build())
            .await
            .unwrap();
    }
    // issue 1.5 arrives late
    let inserted = repo
        .create_installment(
            InstallmentBuilder::new(series.id.clone())
                .number_parts(1, 50)
                .build(),
        )
        .await
        .unwrap();
    assert_eq!(inserted.ordinal, 2);

    let all = repo.list_installments(&series.id).await.unwrap();
    assert_eq!(numbers_by_ordinal(&all), ["1", "1.5", "2", "3"]);
    assert_unique_ordinals(&all);
}

/// Changing a number repositions the installment.
#[tokio::test]
async fn number_edit_repositions_installment() {
    let harness = TestHarness::new().await;
    let repo = SurrealCatalogRepository::new(harness.db.clone());
    let series = make_series(&repo, "Moon Saga").await;

    let mut created = Vec::new();
    for n in [1, 2, 3] {
        created.push(
            repo.create_installment(InstallmentBuilder::new(series.id.clone()).number(n).build())
                .await
                .unwrap(),
        );
    }

    // issue 3 turns out to be a prologue
    let update = InstallmentUpdate {
        number: Some(Some(IssueNumber::pack(0, 50).unwrap())),
        ..Default::default()
    };
    let moved = repo
        .update_installment(&created[2].id.key().to_string(), update)
        .await
        .unwrap()
        .expect("installment exists");
    assert_eq!(moved.ordinal, 1);

    let all = repo.list_installments(&series.id).await.unwrap();
    assert_eq!(numbers_by_ordinal(&all), ["0.5", "1", "2"]);
    assert_unique_ordinals(&all);
}

/// An update that does not touch the number leaves every ordinal alone.
#[tokio::test]
async fn non_number_edit_never_resequences() {
    let harness = TestHarness::new().await;
    let repo = SurrealCatalogRepository::new(harness.db.clone());
    let series = make_series(&repo, "Moon Saga").await;

    // deliberately scrambled ordinals would be disturbed by any resort;
    // delete issue 1 to leave a gap instead
    for n in [1, 2, 3] {
        repo.create_installment(InstallmentBuilder::new(series.id.clone()).number(n).build())
            .await
            .unwrap();
    }
    let all = repo.list_installments(&series.id).await.unwrap();
    repo.delete_installment(&all[0].id.key().to_string())
        .await
        .unwrap();

    let before = repo.list_installments(&series.id).await.unwrap();
    let target = before[0].id.key().to_string();

    let update = InstallmentUpdate {
        title: Some(Some("Retitled".to_string())),
        ..Default::default()
    };
    repo.update_installment(&target, update).await.unwrap();

    let after = repo.list_installments(&series.id).await.unwrap();
    let ordinals = |v: &[Installment]| v.iter().map(|i| i.ordinal).collect::<Vec<_>>();
    assert_eq!(ordinals(&before), ordinals(&after));
}

/// Unnumbered installments append at the end and stay there.
#[tokio::test]
async fn unnumbered_installments_stay_last() {
    let harness = TestHarness::new().await;
    let repo = SurrealCatalogRepository::new(harness.db.clone());
    let series = make_series(&repo, "Moon Saga").await;

    for n in [1, 2] {
        repo.create_installment(InstallmentBuilder::new(series.id.clone()).number(n).build())
            .await
            .unwrap();
    }
    let annual = repo
        .create_installment(
            InstallmentBuilder::new(series.id.clone())
                .title("Annual Special")
                .build(),
        )
        .await
        .unwrap();
    assert_eq!(annual.ordinal, 3);

    // a back-issue insert shifts the annual but keeps it after every number
    repo.create_installment(
        InstallmentBuilder::new(series.id.clone())
            .number_parts(1, 50)
            .build(),
    )
    .await
    .unwrap();

    let all = repo.list_installments(&series.id).await.unwrap();
    assert_eq!(
        numbers_by_ordinal(&all),
        ["1", "1.5", "2", "Annual Special"]
    );
    assert_unique_ordinals(&all);
}

/// Equal numbers fall back to title order.
#[tokio::test]
async fn title_breaks_number_ties() {
    let harness = TestHarness::new().await;
    let repo = SurrealCatalogRepository::new(harness.db.clone());
    let series = make_series(&repo, "Moon Saga").await;

    repo.create_installment(
        InstallmentBuilder::new(series.id.clone())
            .number(5)
            .title("Beta")
            .build(),
    )
    .await
    .unwrap();
    repo.create_installment(InstallmentBuilder::new(series.id.clone()).number(6).build())
        .await
        .unwrap();

    // same number as Beta, earlier title, not the series max: full resort path
    repo.create_installment(
        InstallmentBuilder::new(series.id.clone())
            .number(5)
            .title("Alpha")
            .build(),
    )
    .await
    .unwrap();

    let all = repo.list_installments(&series.id).await.unwrap();
    let titles: Vec<Option<&str>> = all.iter().map(|i| i.title.as_deref()).collect();
    assert_eq!(titles, [Some("Alpha"), Some("Beta"), None]);
    assert_unique_ordinals(&all);
}

/// Next-number suggestion: whole max advances by one, fractional max by a
/// second-part unit.
#[tokio::test]
async fn next_number_suggestions() {
    let harness = TestHarness::new().await;
    let repo = SurrealCatalogRepository::new(harness.db.clone());
    let series = make_series(&repo, "Moon Saga").await;

    assert_eq!(repo.suggest_next_number(&series.id).await.unwrap(), None);

    repo.create_installment(InstallmentBuilder::new(series.id.clone()).number(7).build())
        .await
        .unwrap();
    assert_eq!(
        repo.suggest_next_number(&series.id).await.unwrap(),
        Some(IssueNumber::pack(8, 0).unwrap())
    );

    repo.create_installment(
        InstallmentBuilder::new(series.id.clone())
            .number_parts(7, 50)
            .build(),
    )
    .await
    .unwrap();
    assert_eq!(
        repo.suggest_next_number(&series.id).await.unwrap(),
        Some(IssueNumber::pack(7, 51).unwrap())
    );
}
