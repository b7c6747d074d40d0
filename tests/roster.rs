//! Integration tests for character/persona maintenance rules and the
//! first-appearance query.

mod common;

use pretty_assertions::assert_eq;

use common::builders::{InstallmentBuilder, SeriesBuilder};
use common::harness::TestHarness;
use common::seed_pages;
use longbox::models::{AppearanceKind, CreatorCreate, PersonaCreate, PersonaKind};
use longbox::repository::{
    CatalogRepository, RosterRepository, SurrealCatalogRepository, SurrealRosterRepository,
};
use longbox::services::appearances::RangeEntry;
use longbox::LongboxError;

#[tokio::test]
async fn character_creation_sets_primary_persona() {
    let harness = TestHarness::new().await;
    let roster = SurrealRosterRepository::new(harness.db.clone());

    let (chr, persona) = roster.create_character("Dark Claw", "Half bat.").await.unwrap();
    assert_eq!(chr.primary_persona.as_ref(), Some(&persona.id));
    assert_eq!(roster.character_name(&chr).await.unwrap(), "Dark Claw");
}

#[tokio::test]
async fn primary_persona_cannot_be_deleted() {
    let harness = TestHarness::new().await;
    let roster = SurrealRosterRepository::new(harness.db.clone());

    let (chr, primary) = roster.create_character("Dark Claw", "").await.unwrap();
    let err = roster
        .delete_persona(&primary.id.key().to_string())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LongboxError::ReferentialIntegrityViolation { .. }
    ));

    // a secondary persona deletes fine
    let mut data = PersonaCreate::new(chr.id.clone(), "Bruce Jones");
    data.kind = PersonaKind::GivenName;
    let secondary = roster.add_persona(data).await.unwrap();
    let deleted = roster
        .delete_persona(&secondary.id.key().to_string())
        .await
        .unwrap();
    assert!(deleted.is_some());
}

#[tokio::test]
async fn set_primary_rejects_foreign_personas() {
    let harness = TestHarness::new().await;
    let roster = SurrealRosterRepository::new(harness.db.clone());

    let (claw, _) = roster.create_character("Dark Claw", "").await.unwrap();
    let (_, sparrow_persona) = roster.create_character("Sparrow", "").await.unwrap();

    let err = roster
        .set_primary_persona(
            &claw.id.key().to_string(),
            &sparrow_persona.id.key().to_string(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LongboxError::Validation(_)));
}

#[tokio::test]
async fn switching_primary_updates_display_name() {
    let harness = TestHarness::new().await;
    let roster = SurrealRosterRepository::new(harness.db.clone());

    let (chr, _) = roster.create_character("Dark Claw", "").await.unwrap();
    let mut data = PersonaCreate::new(chr.id.clone(), "Bruce Jones");
    data.kind = PersonaKind::SuperIdentity;
    let alter = roster.add_persona(data).await.unwrap();

    let chr = roster
        .set_primary_persona(&chr.id.key().to_string(), &alter.id.key().to_string())
        .await
        .unwrap();
    assert_eq!(roster.character_name(&chr).await.unwrap(), "Bruce Jones");
}

#[tokio::test]
async fn duplicate_persona_name_within_character_is_rejected() {
    let harness = TestHarness::new().await;
    let roster = SurrealRosterRepository::new(harness.db.clone());

    let (chr, _) = roster.create_character("Dark Claw", "").await.unwrap();
    let dup = roster
        .add_persona(PersonaCreate::new(chr.id.clone(), "Dark Claw"))
        .await;
    assert!(dup.is_err());
}

#[tokio::test]
async fn backfill_copies_primary_creators_to_orphans() {
    let harness = TestHarness::new().await;
    let roster = SurrealRosterRepository::new(harness.db.clone());

    let creator = roster
        .create_creator(CreatorCreate {
            working_name: "A. Artist".to_string(),
        })
        .await
        .unwrap();

    let (chr, primary) = roster.create_character("Dark Claw", "").await.unwrap();
    // give the primary its creators after the fact
    let update = longbox::models::persona::PersonaUpdate {
        creators: Some(vec![creator.id.clone()]),
        ..Default::default()
    };
    longbox::models::persona::update_persona(
        &harness.db,
        &primary.id.key().to_string(),
        update,
    )
    .await
    .unwrap();

    let orphan = roster
        .add_persona(PersonaCreate::new(chr.id.clone(), "Bruce Jones"))
        .await
        .unwrap();

    let updated = roster
        .backfill_creators(&chr.id.key().to_string())
        .await
        .unwrap();
    assert_eq!(updated, 1);

    let refreshed = roster
        .get_persona(&orphan.id.key().to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.creators, vec![creator.id]);
}

#[tokio::test]
async fn first_appearances_pick_the_earliest_installment_per_series() {
    let harness = TestHarness::new().await;
    let catalog = SurrealCatalogRepository::new(harness.db.clone());
    let roster = SurrealRosterRepository::new(harness.db.clone());

    let moon = catalog
        .create_series(SeriesBuilder::new("Moon Saga").build())
        .await
        .unwrap();
    let sun = catalog
        .create_series(SeriesBuilder::new("Sun Saga").build())
        .await
        .unwrap();

    let mut moon_issues = Vec::new();
    for n in 1..=3 {
        let ins = catalog
            .create_installment(InstallmentBuilder::new(moon.id.clone()).number(n).build())
            .await
            .unwrap();
        seed_pages(&harness.db, &ins.id, 3).await;
        moon_issues.push(ins);
    }
    let sun_issue = catalog
        .create_installment(InstallmentBuilder::new(sun.id.clone()).number(1).build())
        .await
        .unwrap();
    seed_pages(&harness.db, &sun_issue.id, 3).await;

    let (chr, persona) = roster.create_character("Dark Claw", "").await.unwrap();
    // appears in Moon Saga #2 and #3, and Sun Saga #1
    for ins in [&moon_issues[1], &moon_issues[2], &sun_issue] {
        let entry = RangeEntry {
            persona: persona.id.clone(),
            begin_ord: 0,
            end_ord: 1,
            kind: AppearanceKind::Normal,
            delete: false,
        };
        roster.replace_appearances(&ins.id, &[entry]).await.unwrap();
    }

    let first = roster
        .first_appearances(&chr.id.key().to_string())
        .await
        .unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].series.name, "Moon Saga");
    assert_eq!(first[0].installment.id, moon_issues[1].id);
    assert_eq!(first[1].series.name, "Sun Saga");
    assert_eq!(first[1].installment.id, sun_issue.id);
}

#[tokio::test]
async fn deleting_character_cascades_to_personas_and_appearances() {
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
    seed_pages(&harness.db, &installment.id, 3).await;

    let (chr, persona) = roster.create_character("Dark Claw", "").await.unwrap();
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

    roster.delete_character(&chr.id.key().to_string()).await.unwrap();

    assert!(roster
        .get_persona(&persona.id.key().to_string())
        .await
        .unwrap()
        .is_none());
    let rows = roster.list_appearances(&installment.id).await.unwrap();
    assert!(rows.is_empty());
}
