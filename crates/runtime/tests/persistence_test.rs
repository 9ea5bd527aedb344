//! Restart scenarios: cooldowns and profiles surviving through the file
//! repositories.

mod common;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use interact_core::{Action, ActionCategory, ActionProfile, ClickKind, EntityId, Outcome};
use interact_runtime::{
    Engine, EngineConfig, FileCooldownRepository, FileProfileRepository,
};

use common::{ManualClock, RecordingExecutor, T0, TestRig, actor};

const SHOP: EntityId = EntityId(7);

fn greeter() -> ActionProfile {
    ActionProfile::new()
        .with_actions(
            ClickKind::Right,
            ActionCategory::Command,
            vec![Action::ConsoleCommand {
                template: "say hi %p%".to_owned(),
            }],
        )
        .with_cooldown(60_000)
}

fn engine_with_files(dir: &Path, clock: Arc<ManualClock>) -> Engine {
    common::init_tracing();
    let cooldown_repo = FileCooldownRepository::new(dir.join("cooldowns.json"))
        .expect("cooldown repository");
    let profile_repo =
        FileProfileRepository::new(dir.join("profiles.json")).expect("profile repository");

    Engine::builder()
        .config(EngineConfig::default())
        .executor(RecordingExecutor::new())
        .clock(clock)
        .cooldown_repository(Arc::new(cooldown_repo))
        .profile_repository(Arc::new(profile_repo))
        .build()
        .expect("engine should assemble")
}

#[tokio::test]
async fn committed_cooldowns_survive_a_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let steve = actor();
    let clock = ManualClock::new(T0);

    let engine = engine_with_files(dir.path(), clock.clone());
    engine.replace_profile(SHOP, greeter()).expect("profile bound");
    assert!(engine.handle_click(&steve, SHOP, ClickKind::Right, false).await.executed());
    assert_eq!(engine.remaining(&steve, SHOP), Some(60_000));
    // Shutdown performs the final flush.
    engine.shutdown().await.expect("clean shutdown");

    clock.advance(10_000);
    let engine = engine_with_files(dir.path(), clock.clone());
    assert_eq!(engine.remaining(&steve, SHOP), Some(50_000));
    assert!(matches!(
        engine.handle_click(&steve, SHOP, ClickKind::Right, false).await,
        Outcome::OnCooldown(50_000)
    ));
    engine.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn flush_now_writes_without_shutting_down() {
    let dir = tempfile::tempdir().expect("tempdir");
    let steve = actor();
    let clock = ManualClock::new(T0);

    let engine = engine_with_files(dir.path(), clock.clone());
    engine.replace_profile(SHOP, greeter()).expect("profile bound");
    assert!(engine.handle_click(&steve, SHOP, ClickKind::Right, false).await.executed());
    engine.flush_now().await.expect("flush");

    // A second engine reading the same files sees the committed cooldown
    // while the first is still running.
    let other = engine_with_files(dir.path(), clock.clone());
    assert_eq!(other.remaining(&steve, SHOP), Some(60_000));

    other.shutdown().await.expect("clean shutdown");
    engine.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn profile_edits_persist_across_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = ManualClock::new(T0);

    let engine = engine_with_files(dir.path(), clock.clone());
    engine.replace_profile(SHOP, greeter().with_price(25.0)).expect("profile bound");
    assert!(engine.remove_profile(EntityId(99)).is_ok());
    engine.shutdown().await.expect("clean shutdown");

    let engine = engine_with_files(dir.path(), clock.clone());
    let profile = engine.profiles().get(SHOP).expect("profile restored");
    assert_eq!(profile.price, 25.0);
    assert_eq!(profile.cooldown, Some(60_000));
    engine.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn failed_reload_keeps_the_previous_snapshot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = ManualClock::new(T0);

    let engine = engine_with_files(dir.path(), clock.clone());
    engine.replace_profile(SHOP, greeter()).expect("profile bound");

    fs::write(dir.path().join("profiles.json"), "not json {").expect("corrupt file");
    assert!(engine.reload_profiles().is_err());

    // The published snapshot is untouched by the rejected reload.
    assert!(engine.profiles().get(SHOP).is_some());
    engine.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn expired_entries_are_dropped_on_flush_sweep_cycle() {
    let dir = tempfile::tempdir().expect("tempdir");
    let steve = actor();
    let clock = ManualClock::new(T0);

    let engine = engine_with_files(dir.path(), clock.clone());
    engine.replace_profile(SHOP, greeter()).expect("profile bound");
    assert!(engine.handle_click(&steve, SHOP, ClickKind::Right, false).await.executed());

    clock.advance(120_000);
    let report = engine.sweep_now().await.expect("sweep ran");
    assert_eq!(report.cooldowns, 1);
    engine.shutdown().await.expect("clean shutdown");

    let engine = engine_with_files(dir.path(), clock.clone());
    assert_eq!(engine.remaining(&steve, SHOP), None);
    engine.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn in_memory_defaults_start_empty() {
    // No repositories wired at all: the engine still assembles and runs.
    let rig = TestRig::new(EngineConfig::default(), 0.0);
    let steve = actor();
    assert_eq!(
        rig.engine.handle_click(&steve, SHOP, ClickKind::Right, false).await,
        Outcome::NoProfile
    );
    rig.engine.shutdown().await.expect("clean shutdown");
}
