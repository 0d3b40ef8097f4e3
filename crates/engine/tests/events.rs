use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, EngineError, EventDetails, MoneyCents};

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::ensure_schema(&db).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn engine_with_user() -> (Engine, i64) {
    let (engine, _db) = engine_with_db().await;
    let user_id = engine
        .create_user("alice", "alice@example.com", "hunter22")
        .await
        .unwrap();
    (engine, user_id)
}

fn details(name: &str, date: &str, time: &str) -> EventDetails {
    EventDetails {
        event_name: name.to_string(),
        description: Some("A nice evening".to_string()),
        host_name: Some("Alice".to_string()),
        date: date.to_string(),
        time: time.to_string(),
        venue: "Town hall".to_string(),
        budget: None,
        guest_count: Some(40),
    }
}

async fn finalized_event(engine: &Engine, owner: i64, name: &str, date: &str, time: &str) -> i64 {
    let id = engine.create_draft(owner).await.unwrap();
    engine
        .update_event(id, &details(name, date, time), false)
        .await
        .unwrap();
    id
}

#[tokio::test]
async fn new_draft_is_empty_and_hidden_from_finalized_listing() {
    let (engine, alice) = engine_with_user().await;

    let id = engine.create_draft(alice).await.unwrap();
    let event = engine.event(id).await.unwrap().unwrap();

    assert!(event.draft);
    assert_eq!(event.user_id, alice);
    assert_eq!(event.event_name, "");
    assert_eq!(event.description, None);
    assert_eq!(event.host_name, None);
    assert_eq!(event.date, "");
    assert_eq!(event.time, "");
    assert_eq!(event.venue, "");
    assert_eq!(event.budget, None);
    assert_eq!(event.guest_count, None);

    assert!(engine.list_events(alice, false).await.unwrap().is_empty());
    let all = engine.list_events(alice, true).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, id);
}

#[tokio::test]
async fn create_draft_for_unknown_user_fails() {
    let (engine, _db) = engine_with_db().await;
    let err = engine.create_draft(42).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("user not exists".to_string()));
}

#[tokio::test]
async fn saving_a_draft_keeps_it_a_draft() {
    let (engine, alice) = engine_with_user().await;
    let id = engine.create_draft(alice).await.unwrap();

    let mut partial = EventDetails::default();
    partial.event_name = "Half planned".to_string();
    engine.update_event(id, &partial, true).await.unwrap();

    let event = engine.event(id).await.unwrap().unwrap();
    assert!(event.draft);
    assert_eq!(event.event_name, "Half planned");
    assert!(engine.list_events(alice, false).await.unwrap().is_empty());
}

#[tokio::test]
async fn finalized_events_are_listed_by_date_then_time() {
    let (engine, alice) = engine_with_user().await;

    let late = finalized_event(&engine, alice, "Late", "2026-06-01", "20:00").await;
    let early = finalized_event(&engine, alice, "Early", "2026-06-01", "09:30").await;
    let first = finalized_event(&engine, alice, "First", "2026-01-15", "23:00").await;
    let _draft = engine.create_draft(alice).await.unwrap();

    let ids: Vec<i64> = engine
        .list_events(alice, false)
        .await
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec![first, early, late]);
    assert_eq!(engine.list_events(alice, true).await.unwrap().len(), 4);
}

#[tokio::test]
async fn finalize_requires_complete_details() {
    let (engine, alice) = engine_with_user().await;
    let id = engine.create_draft(alice).await.unwrap();

    let mut incomplete = details("Picnic", "2026-07-01", "12:00");
    incomplete.venue = "  ".to_string();
    let err = engine.update_event(id, &incomplete, false).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidField { field: "venue", .. }));

    let event = engine.event(id).await.unwrap().unwrap();
    assert!(event.draft);
    assert_eq!(event.event_name, "");
}

#[tokio::test]
async fn finalized_event_cannot_return_to_draft() {
    let (engine, alice) = engine_with_user().await;
    let id = finalized_event(&engine, alice, "Gala", "2026-03-03", "19:00").await;

    let err = engine
        .update_event(id, &details("Gala", "2026-03-03", "19:00"), true)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));
    assert!(engine.event(id).await.unwrap().unwrap().is_finalized());

    engine
        .update_event(id, &details("Gala night", "2026-03-03", "19:00"), false)
        .await
        .unwrap();
    assert_eq!(
        engine.event(id).await.unwrap().unwrap().event_name,
        "Gala night"
    );
}

#[tokio::test]
async fn update_unknown_event_is_not_found() {
    let (engine, _alice) = engine_with_user().await;
    let err = engine
        .update_event(99, &details("Ghost", "2026-01-01", "10:00"), false)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("event not exists".to_string()));
}

#[tokio::test]
async fn search_matches_name_and_skips_drafts() {
    let (engine, alice) = engine_with_user().await;
    let bob = engine
        .create_user("bob", "bob@example.com", "hunter22")
        .await
        .unwrap();

    let birthday = finalized_event(&engine, alice, "Birthday party", "2026-02-01", "18:00").await;
    let office = finalized_event(&engine, alice, "Office Party", "2026-12-20", "17:00").await;
    let _meeting = finalized_event(&engine, alice, "Board meeting", "2026-04-01", "09:00").await;
    let _bobs = finalized_event(&engine, bob, "Bob's party", "2026-05-01", "20:00").await;
    let draft = engine.create_draft(alice).await.unwrap();
    let mut draft_details = EventDetails::default();
    draft_details.event_name = "Secret party".to_string();
    engine.update_event(draft, &draft_details, true).await.unwrap();

    let ids: Vec<i64> = engine
        .search_events(alice, "party")
        .await
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec![office, birthday]);

    assert_eq!(engine.search_events(alice, "").await.unwrap().len(), 3);
    assert!(engine.search_events(alice, "100%").await.unwrap().is_empty());
}

#[tokio::test]
async fn ownership_check_hides_foreign_events() {
    let (engine, alice) = engine_with_user().await;
    let bob = engine
        .create_user("bob", "bob@example.com", "hunter22")
        .await
        .unwrap();
    let id = finalized_event(&engine, alice, "Dinner", "2026-08-08", "20:00").await;

    let event = engine.require_owned_event(id, alice).await.unwrap();
    assert_eq!(event.id, id);

    let foreign = engine.require_owned_event(id, bob).await.unwrap_err();
    let missing = engine.require_owned_event(id + 1, bob).await.unwrap_err();
    assert_eq!(foreign, missing);
}

#[tokio::test]
async fn budget_total_is_zero_without_items() {
    let (engine, alice) = engine_with_user().await;
    let id = engine.create_draft(alice).await.unwrap();

    assert_eq!(engine.budget_total(id).await.unwrap(), MoneyCents::ZERO);
    assert!(engine.budget_items(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn budget_items_keep_insertion_order() {
    let (engine, alice) = engine_with_user().await;
    let id = engine.create_draft(alice).await.unwrap();

    engine
        .add_budget_item(id, "Venue", MoneyCents::from_units(500))
        .await
        .unwrap();
    engine
        .add_budget_item(id, "Catering", MoneyCents::from_units(300))
        .await
        .unwrap();
    engine
        .add_budget_item(id, "Flowers", MoneyCents::new(4_250))
        .await
        .unwrap();

    let categories: Vec<String> = engine
        .budget_items(id)
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.category)
        .collect();
    assert_eq!(categories, vec!["Venue", "Catering", "Flowers"]);
    assert_eq!(engine.budget_total(id).await.unwrap(), MoneyCents::new(84_250));
}

#[tokio::test]
async fn add_budget_item_validates_input() {
    let (engine, alice) = engine_with_user().await;
    let id = engine.create_draft(alice).await.unwrap();

    let err = engine
        .add_budget_item(id, "Venue", MoneyCents::new(-1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .add_budget_item(id, " ", MoneyCents::new(1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidField { field: "category", .. }));

    let err = engine
        .add_budget_item(id + 100, "Venue", MoneyCents::new(1))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("event not exists".to_string()));
}

#[tokio::test]
async fn replace_budget_items_swaps_the_whole_set() {
    let (engine, alice) = engine_with_user().await;
    let id = engine.create_draft(alice).await.unwrap();
    engine
        .add_budget_item(id, "Old", MoneyCents::from_units(10))
        .await
        .unwrap();

    engine
        .replace_budget_items(
            id,
            &[
                ("Music".to_string(), MoneyCents::from_units(200)),
                ("Drinks".to_string(), MoneyCents::from_units(150)),
            ],
        )
        .await
        .unwrap();

    let items = engine.budget_items(id).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].category, "Music");
    assert_eq!(items[1].category, "Drinks");
    assert_eq!(engine.budget_total(id).await.unwrap(), MoneyCents::from_units(350));

    engine.replace_budget_items(id, &[]).await.unwrap();
    assert!(engine.budget_items(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_replacement_keeps_previous_items() {
    let (engine, alice) = engine_with_user().await;
    let id = engine.create_draft(alice).await.unwrap();
    engine
        .add_budget_item(id, "Venue", MoneyCents::from_units(500))
        .await
        .unwrap();

    let err = engine
        .replace_budget_items(
            id,
            &[
                ("Music".to_string(), MoneyCents::from_units(200)),
                ("Refund".to_string(), MoneyCents::from_units(-50)),
            ],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let items = engine.budget_items(id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].category, "Venue");
}

#[tokio::test]
async fn budget_totals_that_overflow_are_rejected() {
    let (engine, alice) = engine_with_user().await;
    let id = engine.create_draft(alice).await.unwrap();
    let half = MoneyCents::new(i64::MAX / 2 + 1);
    engine
        .add_budget_item(id, "Venue", MoneyCents::from_units(500))
        .await
        .unwrap();

    let err = engine
        .replace_budget_items(id, &[("A".to_string(), half), ("B".to_string(), half)])
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::InvalidAmount("amount too large".to_string()));
    assert_eq!(engine.budget_items(id).await.unwrap().len(), 1);

    engine
        .replace_budget_items(id, &[("A".to_string(), half)])
        .await
        .unwrap();
    let err = engine.add_budget_item(id, "B", half).await.unwrap_err();
    assert_eq!(err, EngineError::InvalidAmount("amount too large".to_string()));

    let summary = engine.budget_summary(id).await.unwrap();
    assert_eq!(summary.spent, half);
    assert_eq!(engine.budget_total(id).await.unwrap(), half);
}

#[tokio::test]
async fn declared_budget_is_independent_of_items() {
    let (engine, alice) = engine_with_user().await;
    let id = engine.create_draft(alice).await.unwrap();
    engine
        .add_budget_item(id, "Venue", MoneyCents::from_units(500))
        .await
        .unwrap();

    engine
        .set_declared_budget(id, Some(MoneyCents::from_units(1000)))
        .await
        .unwrap();
    let event = engine.event(id).await.unwrap().unwrap();
    assert_eq!(event.budget, Some(MoneyCents::from_units(1000)));
    assert_eq!(engine.budget_items(id).await.unwrap().len(), 1);

    engine.set_declared_budget(id, None).await.unwrap();
    assert_eq!(engine.event(id).await.unwrap().unwrap().budget, None);

    let err = engine
        .set_declared_budget(id + 1, Some(MoneyCents::ZERO))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("event not exists".to_string()));
}

#[tokio::test]
async fn delete_event_removes_budget_items() {
    let (engine, alice) = engine_with_user().await;
    let id = finalized_event(&engine, alice, "Wedding", "2026-09-09", "15:00").await;
    engine
        .add_budget_item(id, "Venue", MoneyCents::from_units(500))
        .await
        .unwrap();
    engine
        .add_budget_item(id, "Catering", MoneyCents::from_units(300))
        .await
        .unwrap();

    engine.delete_event(id).await.unwrap();

    assert!(engine.event(id).await.unwrap().is_none());
    assert!(engine.budget_items(id).await.unwrap().is_empty());
    assert_eq!(engine.budget_total(id).await.unwrap(), MoneyCents::ZERO);
    assert!(engine.list_events(alice, true).await.unwrap().is_empty());

    let err = engine.delete_event(id).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("event not exists".to_string()));
}

#[tokio::test]
async fn planning_scenario_end_to_end() {
    let (engine, alice) = engine_with_user().await;
    let id = engine.create_draft(alice).await.unwrap();

    engine
        .add_budget_item(id, "Venue", MoneyCents::from_units(500))
        .await
        .unwrap();
    engine
        .add_budget_item(id, "Catering", MoneyCents::from_units(300))
        .await
        .unwrap();
    engine
        .set_declared_budget(id, Some(MoneyCents::from_units(1000)))
        .await
        .unwrap();

    assert_eq!(engine.budget_total(id).await.unwrap(), MoneyCents::from_units(800));
    let summary = engine.budget_summary(id).await.unwrap();
    assert_eq!(summary.spent, MoneyCents::from_units(800));
    assert_eq!(summary.remaining, MoneyCents::from_units(200));

    let mut final_details = details("Anniversary", "2026-10-10", "19:30");
    final_details.budget = Some(MoneyCents::from_units(1000));
    engine.update_event(id, &final_details, false).await.unwrap();

    let listed: Vec<i64> = engine
        .list_events(alice, false)
        .await
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(listed, vec![id]);
}
