//! End-to-end projection properties through the record stores.

use std::sync::Arc;

use menu_projection::catalog::{DESSERT, MAIN, MAIN_A, MAIN_B, SOUP};
use menu_projection::{
    placeholder_plan, DayPlan, DietFlags, DietPlan, FileStore, InMemoryStore, Institution,
    InstitutionType, MainSlot, MenuItem, MenuStore, ProjectionEngine, Registries, RegistryCache,
    SnapshotService, StaticRegistrySource, WeekKey, WeeklyMenuPlan, Weekday,
};

const YEAR: i32 = 2024;
const WEEK: u32 = 10;

fn kindergarten(id: &str, flags: DietFlags) -> Institution {
    Institution::new(id, "Sunflower Kindergarten")
        .with_population_group("kindergarten children")
        .with_diet_plan(DietPlan::uniform(flags))
}

fn full_day() -> DayPlan {
    DayPlan::default()
        .with_content(SOUP, ["soup-3"])
        .with_content(MAIN_A, ["recipe-7"])
        .with_content(MAIN_B, ["recipe-8"])
        .with_content(DESSERT, ["dessert-2"])
}

fn week_plan(day: DayPlan) -> WeeklyMenuPlan {
    Weekday::ALL
        .iter()
        .fold(WeeklyMenuPlan::new(YEAR, WEEK), |plan, weekday| {
            plan.with_day(*weekday, day.clone())
        })
}

fn engine(store: Arc<InMemoryStore>) -> ProjectionEngine {
    let registries = Arc::new(RegistryCache::new(Arc::new(StaticRegistrySource::builtin())));
    ProjectionEngine::new(store, registries)
}

/// Kindergarten with soup and main on Monday, no dessert, assigned to mainA.
#[tokio::test]
async fn test_kindergarten_monday_scenario() {
    let institution = kindergarten(
        "inst-1",
        DietFlags {
            soup: true,
            main: true,
            dessert: false,
        },
    );
    let plan = WeeklyMenuPlan::new(YEAR, WEEK)
        .with_day(Weekday::Monday, full_day().with_assignment(MAIN_A, ["inst-1"]));
    let store = Arc::new(InMemoryStore::with_records([institution], [plan]).await);

    let projected = engine(store).project("inst-1", YEAR, WEEK).await.unwrap();
    assert_eq!(projected.institution_type, InstitutionType::Kindergarten);

    let monday = &projected.days[&Weekday::Monday];
    assert_eq!(monday.content[SOUP], vec![MenuItem::recipe("soup-3")]);
    assert_eq!(monday.content[MAIN], vec![MenuItem::recipe("recipe-7")]);
    assert!(!monday.content.contains_key(DESSERT));
    assert!(!monday.content.contains_key(MAIN_B));
    assert!(!monday.content.contains_key(MAIN_A));
    assert_eq!(monday.content.len(), 2);
    assert_eq!(monday.assigned_slot, Some(MainSlot::A));
    assert!(monday.assignments[MAIN_A].contains("inst-1"));
}

/// Internal institutions see every rule category on every day.
#[tokio::test]
async fn test_internal_sees_all_categories() {
    let kitchen = Institution::new("kitchen", "Central Kitchen")
        .internal()
        .with_diet_plan(DietPlan::uniform(DietFlags::default()));
    let store = Arc::new(InMemoryStore::with_records([kitchen], [week_plan(full_day())]).await);

    let projected = engine(store).project("kitchen", YEAR, WEEK).await.unwrap();
    assert_eq!(projected.institution_type, InstitutionType::Internal);

    let rule = Registries::builtin();
    let rule = rule.rules.get(InstitutionType::Internal).unwrap();
    for weekday in Weekday::ALL {
        let day = &projected.days[&weekday];
        for category in &rule.visible_categories {
            assert!(
                day.content.contains_key(category),
                "{} missing on {}",
                category,
                weekday
            );
        }
        assert!(!day.content.contains_key(MAIN));
    }
}

/// Soup and dessert follow each day's diet flags for diet-plan-based rules.
#[tokio::test]
async fn test_diet_flags_drive_soup_and_dessert() {
    let diet_plan = DietPlan::default()
        .with_day(
            Weekday::Monday,
            DietFlags {
                soup: true,
                main: true,
                dessert: false,
            },
        )
        .with_day(
            Weekday::Tuesday,
            DietFlags {
                soup: false,
                main: true,
                dessert: true,
            },
        );
    let school = Institution::new("school-1", "Elm School")
        .with_population_group("school children")
        .with_diet_plan(diet_plan.clone());
    let store = Arc::new(InMemoryStore::with_records([school], [week_plan(full_day())]).await);

    let projected = engine(store).project("school-1", YEAR, WEEK).await.unwrap();
    for weekday in Weekday::ALL {
        let flags = diet_plan.flags(weekday);
        let day = &projected.days[&weekday];
        assert_eq!(day.content.contains_key(SOUP), flags.soup, "soup on {}", weekday);
        assert_eq!(
            day.content.contains_key(DESSERT),
            flags.dessert,
            "dessert on {}",
            weekday
        );
    }
}

/// A single assigned slot becomes "main" verbatim and the slots disappear.
#[tokio::test]
async fn test_single_slot_merges_exactly() {
    let institution = kindergarten("inst-2", DietFlags::all());
    let plan = week_plan(full_day().with_assignment(MAIN_B, ["inst-2"]));
    let store = Arc::new(InMemoryStore::with_records([institution], [plan.clone()]).await);

    let projected = engine(store).project("inst-2", YEAR, WEEK).await.unwrap();
    for weekday in Weekday::ALL {
        let day = &projected.days[&weekday];
        assert_eq!(&day.content[MAIN], &plan.day(weekday).content[MAIN_B]);
        assert!(!day.content.contains_key(MAIN_A));
        assert!(!day.content.contains_key(MAIN_B));
    }
}

/// Unassigned institutions get exactly one placeholder under "main".
#[tokio::test]
async fn test_unassigned_gets_one_placeholder() {
    let institution = kindergarten("inst-3", DietFlags::all());
    let plan = week_plan(full_day().with_assignment(MAIN_A, ["someone-else"]));
    let store = Arc::new(InMemoryStore::with_records([institution], [plan]).await);

    let projected = engine(store).project("inst-3", YEAR, WEEK).await.unwrap();
    for day in projected.days.values() {
        let placeholders = day
            .content
            .values()
            .flatten()
            .filter(|item| item.is_placeholder())
            .count();
        assert_eq!(placeholders, 1);
        assert_eq!(day.content[MAIN].len(), 1);
        assert!(day.content[MAIN][0].is_placeholder());
        assert_eq!(day.assigned_slot, None);
    }
}

/// Changing live diet flags does not change a snapshotted week.
#[tokio::test]
async fn test_snapshot_keeps_history_stable() {
    let before_flags = DietFlags {
        soup: true,
        main: true,
        dessert: false,
    };
    let institution = kindergarten("inst-4", before_flags);
    let plan = week_plan(full_day().with_assignment(MAIN_A, ["inst-4"]));
    let store = Arc::new(InMemoryStore::with_records([institution], [plan]).await);

    SnapshotService::new(store.clone())
        .refresh(YEAR, WEEK, "admin")
        .await
        .unwrap();

    let engine = engine(store.clone());
    let before = engine.project("inst-4", YEAR, WEEK).await.unwrap();
    assert!(before.used_snapshot);

    let changed = kindergarten(
        "inst-4",
        DietFlags {
            soup: false,
            main: true,
            dessert: true,
        },
    );
    store.save_institution(&changed).await.unwrap();

    let after = engine.project("inst-4", YEAR, WEEK).await.unwrap();
    assert_eq!(before, after);

    // Without a snapshot the same change is visible
    let mut live_plan = store
        .plan(WeekKey::new(YEAR, WEEK).unwrap())
        .await
        .unwrap()
        .unwrap();
    live_plan.institution_snapshot = None;
    let live = engine
        .project_plan(&Registries::builtin(), &changed, &live_plan)
        .unwrap();
    assert!(!live.used_snapshot);
    assert!(live.days[&Weekday::Monday].content.contains_key(DESSERT));
}

/// Unpublished weeks project from a canonically shaped placeholder.
#[tokio::test]
async fn test_placeholder_week_shape() {
    let registries = Registries::builtin();
    let plan = placeholder_plan(YEAR, 40, &registries.categories);
    for weekday in Weekday::ALL {
        let day = plan.day(weekday);
        let keys: Vec<&str> = day.content.keys().map(String::as_str).collect();
        let mut expected: Vec<&str> = registries.categories.keys().collect();
        expected.sort();
        assert_eq!(keys, expected);
        assert!(day.content.values().all(|items| items.is_empty()));
    }

    let store = Arc::new(
        InMemoryStore::with_records([kindergarten("inst-5", DietFlags::all())], []).await,
    );
    let projected = engine(store).project("inst-5", YEAR, 40).await.unwrap();
    assert!(projected.is_placeholder);
    assert_eq!(projected.days.len(), 7);
}

/// Identical inputs give byte-identical output under concurrency.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_projection_is_pure() {
    let institutions = [
        kindergarten("inst-6", DietFlags::all()),
        Institution::new("ext-6", "Office Tower"),
    ];
    let plan = week_plan(
        full_day()
            .with_assignment(MAIN_A, ["inst-6"])
            .with_assignment(MAIN_B, ["ext-6"]),
    );
    let store = Arc::new(InMemoryStore::with_records(institutions, [plan]).await);
    let engine = Arc::new(engine(store));

    let mut handles = Vec::new();
    for i in 0..16 {
        let engine = Arc::clone(&engine);
        let id = if i % 2 == 0 { "inst-6" } else { "ext-6" };
        handles.push(tokio::spawn(async move {
            let projected = engine.project(id, YEAR, WEEK).await.unwrap();
            (id, serde_json::to_vec(&projected).unwrap())
        }));
    }

    let mut kita_outputs = Vec::new();
    let mut ext_outputs = Vec::new();
    for handle in handles {
        let (id, bytes) = handle.await.unwrap();
        if id == "inst-6" {
            kita_outputs.push(bytes);
        } else {
            ext_outputs.push(bytes);
        }
    }

    assert!(kita_outputs.windows(2).all(|w| w[0] == w[1]));
    assert!(ext_outputs.windows(2).all(|w| w[0] == w[1]));
    assert_ne!(kita_outputs[0], ext_outputs[0]);
}

/// Malformed plan data degrades to "nothing assigned".
#[tokio::test]
async fn test_sparse_plan_degrades_gracefully() {
    let raw = r#"{"year": 2024, "week": 10, "days": {"monday": {"content": {"soup": ["soup-1"]}}}}"#;
    let plan: WeeklyMenuPlan = serde_json::from_str(raw).unwrap();
    let store = Arc::new(
        InMemoryStore::with_records([kindergarten("inst-7", DietFlags::all())], [plan]).await,
    );

    let projected = engine(store).project("inst-7", YEAR, WEEK).await.unwrap();
    let monday = &projected.days[&Weekday::Monday];
    assert_eq!(monday.content[SOUP], vec![MenuItem::recipe("soup-1")]);
    assert!(monday.content[MAIN][0].is_placeholder());
    assert!(monday.content[DESSERT].is_empty());
    assert!(projected.days[&Weekday::Sunday].content[SOUP].is_empty());
}

/// Switching a snapshotted institution to internal leaves its history alone.
#[tokio::test]
async fn test_snapshot_keeps_institution_type() {
    let institution = kindergarten(
        "inst-8",
        DietFlags {
            soup: true,
            main: true,
            dessert: false,
        },
    );
    let plan = week_plan(full_day().with_assignment(MAIN_A, ["inst-8"]));
    let store = Arc::new(InMemoryStore::with_records([institution.clone()], [plan]).await);
    SnapshotService::new(store.clone())
        .refresh(YEAR, WEEK, "admin")
        .await
        .unwrap();

    let engine = engine(store.clone());
    let before = engine.project("inst-8", YEAR, WEEK).await.unwrap();

    store.save_institution(&institution.internal()).await.unwrap();
    let after = engine.project("inst-8", YEAR, WEEK).await.unwrap();

    assert_eq!(after.institution_type, InstitutionType::Kindergarten);
    assert_eq!(before, after);
}

/// Overlapping refreshes of one week all succeed; the last write wins.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refreshes_on_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::new(dir.path()));
    store
        .save_institution(&kindergarten("inst-9", DietFlags::all()))
        .await
        .unwrap();
    store.save_plan(&week_plan(full_day())).await.unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = SnapshotService::new(store.clone());
            tokio::spawn(async move { service.refresh(YEAR, WEEK, &format!("admin-{}", i)).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = store
        .plan(WeekKey::new(YEAR, WEEK).unwrap())
        .await
        .unwrap()
        .unwrap();
    let snapshot = stored.institution_snapshot.unwrap();
    assert!(snapshot.entry("inst-9").is_some());
    assert!(snapshot
        .generated_by
        .as_deref()
        .map(|actor| actor.starts_with("admin-"))
        .unwrap_or(false));
}
