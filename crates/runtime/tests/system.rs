mod common;

use std::path::PathBuf;
use std::sync::Arc;

use common::Recorder;
use trait_core::{Entity, SchedulerConfig, TraitDefinition, TraitTimer};
use trait_runtime::{EntityHandle, ManualClock, RuntimeConfig, TraitEvent, TraitSystem};

fn content_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../trait/content/data")
}

async fn system(clock: Arc<ManualClock>) -> TraitSystem {
    let content = trait_content::load_content_dir(&content_dir()).unwrap();
    // Long period: passes in these tests are driven through `tick_now`.
    let config = RuntimeConfig::default()
        .with_scheduler(SchedulerConfig::new().with_tick_interval_ms(3_600_000));

    TraitSystem::builder()
        .config(config)
        .clock(clock)
        .traits(content.traits)
        .classes(content.classes)
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn chill_scenario_through_worker() {
    let clock = Arc::new(ManualClock::new(0));
    let system = system(clock.clone()).await;
    let recorder = Recorder::new("speed");
    system.register_behaviour(recorder.clone());
    let mut events = system.subscribe_events();

    let entity = Arc::new(EntityHandle::in_memory("p1"));
    system.join(entity.clone()).unwrap();
    assert!(system.apply_trait(&*entity, "chill").unwrap());

    for now in [60, 120, 180] {
        clock.set(now);
        let report = system.tick_now().await.unwrap();
        assert_eq!(report.fired, 1);
    }

    assert_eq!(recorder.calls().len(), 3);
    assert!(!system.has_trait(&*entity, "chill").unwrap());

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    assert!(matches!(seen.first(), Some(TraitEvent::Applied { .. })));
    assert!(matches!(seen.last(), Some(TraitEvent::Expired { .. })));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn join_restores_modifiers_from_store() {
    let clock = Arc::new(ManualClock::new(0));
    let system = system(clock).await;

    let entity = EntityHandle::in_memory("p1");
    system.apply_trait(&entity, "strongback").unwrap();

    let rejoined = Arc::new(EntityHandle::new("p1", Arc::clone(entity.attribute_store())));
    assert_eq!(rejoined.stat_sheet().sources("walkspeed"), Vec::<String>::new());

    system.join(rejoined.clone()).unwrap();
    assert_eq!(
        rejoined.stat_sheet().sources("walkspeed"),
        vec!["trait-strongback"]
    );

    assert!(system.leave(rejoined.id()).is_some());
    assert!(system.leave(rejoined.id()).is_none());
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn reload_turns_dropped_codes_stale() {
    let clock = Arc::new(ManualClock::new(0));
    let system = system(clock.clone()).await;
    assert_eq!(system.classes().get("hunter").unwrap().traits, vec!["nimble"]);

    let entity = Arc::new(EntityHandle::in_memory("p1"));
    system.join(entity.clone()).unwrap();
    system.apply_trait(&*entity, "chill").unwrap();

    system
        .reload(
            vec![TraitDefinition::new("strongback").with_attribute("walkspeed", 0.05)],
            Vec::new(),
        )
        .unwrap();
    assert!(system.classes().get("hunter").is_none());

    clock.set(60);
    let report = system.tick_now().await.unwrap();
    assert_eq!(report.stale, 1);
    assert_eq!(report.fired, 0);
    assert!(system.has_trait(&*entity, "chill").unwrap());
    assert!(system.apply_trait(&*entity, "chill").unwrap_err().is_unknown_trait());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn invalid_definitions_fail_the_build() {
    let result = TraitSystem::builder()
        .clock(Arc::new(ManualClock::new(0)))
        .traits(vec![
            TraitDefinition::new("broken")
                .with_attribute("speed", -1.0)
                .temporary(3, -5),
        ])
        .build()
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn deadline_mode_reschedules_from_deadline() {
    let clock = Arc::new(ManualClock::new(0));
    let config = RuntimeConfig::default().with_scheduler(
        SchedulerConfig::new()
            .with_tick_interval_ms(3_600_000)
            .with_reschedule(trait_core::RescheduleMode::FromDeadline),
    );
    let system = TraitSystem::builder()
        .config(config)
        .clock(clock.clone())
        .traits(vec![common::chill()])
        .build()
        .await
        .unwrap();

    let entity = Arc::new(EntityHandle::in_memory("p1"));
    system.join(entity.clone()).unwrap();
    system.apply_trait(&*entity, "chill").unwrap();

    clock.set(95);
    system.tick_now().await.unwrap();

    let snapshot = system.lifecycle().state_snapshot(&*entity).unwrap();
    assert_eq!(snapshot.timers["chill"], TraitTimer::new(2, 120));
    system.shutdown().await.unwrap();
}
