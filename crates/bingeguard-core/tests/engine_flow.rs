//! End-to-end engine flows on an in-memory store.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, NaiveDate, TimeZone};

use bingeguard_core::{
    seed_defaults, BlockDirective, BlockSink, Broadcaster, DeliveryError, Engine, MemoryStore,
    SchedulerCommand, Settings, Store, WatchEvent, WatchStats,
};

struct CollectingSink {
    delivered: Arc<Mutex<Vec<BlockDirective>>>,
}

impl BlockSink for CollectingSink {
    fn label(&self) -> &str {
        "test-page"
    }

    fn deliver(&self, directive: &BlockDirective) -> Result<(), DeliveryError> {
        self.delivered.lock().unwrap().push(*directive);
        Ok(())
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn engine(store: MemoryStore) -> (Engine<MemoryStore>, Arc<Mutex<Vec<BlockDirective>>>) {
    let delivered = Arc::new(Mutex::new(Vec::new()));
    let mut broadcaster = Broadcaster::new();
    broadcaster.register(Box::new(CollectingSink {
        delivered: Arc::clone(&delivered),
    }));
    (Engine::new(store, broadcaster), delivered)
}

#[test]
fn install_seeds_defaults_exactly_once() {
    let mut store = MemoryStore::new();
    seed_defaults(&mut store, date(2025, 6, 9)).unwrap();

    let settings = store.load_settings().unwrap().unwrap();
    assert_eq!(settings, Settings::default());
    let stats = store.load_stats().unwrap().unwrap();
    assert_eq!(stats, WatchStats::zeroed(date(2025, 6, 9)));

    // A second install signal never overwrites existing records.
    let mut custom = settings;
    custom.daily_limit = 120.0;
    store.save_settings(&custom).unwrap();
    seed_defaults(&mut store, date(2025, 6, 10)).unwrap();
    assert_eq!(store.load_settings().unwrap().unwrap().daily_limit, 120.0);
    assert_eq!(
        store.load_stats().unwrap().unwrap().last_updated,
        date(2025, 6, 9)
    );
}

#[test]
fn install_heals_a_missing_stats_record() {
    let mut store = MemoryStore::with_settings(Settings::default());
    seed_defaults(&mut store, date(2025, 6, 9)).unwrap();
    assert!(store.load_stats().unwrap().is_some());
}

#[test]
fn a_session_accrues_and_survives_pause_resume() {
    let (mut engine, delivered) = engine(MemoryStore::with_settings(Settings {
        daily_limit: 1000.0,
        weekly_limit: 1000.0,
        ..Settings::default()
    }));

    let commands = engine
        .handle_at(WatchEvent::WatchingStarted, local(2025, 6, 9, 20, 0))
        .unwrap();
    assert!(commands.contains(&SchedulerCommand::EnablePeriodic));

    engine
        .handle_at(WatchEvent::Tick, local(2025, 6, 9, 20, 10))
        .unwrap();
    let commands = engine
        .handle_at(WatchEvent::WatchingPaused, local(2025, 6, 9, 20, 15))
        .unwrap();
    assert!(commands.contains(&SchedulerCommand::DisablePeriodic));
    assert!(commands.contains(&SchedulerCommand::CancelDeferredBlock));

    // Half an hour paused, then resume and watch five more minutes. The
    // paused interval must not be counted.
    engine
        .handle_at(WatchEvent::WatchingStarted, local(2025, 6, 9, 20, 45))
        .unwrap();
    engine
        .handle_at(WatchEvent::WatchingStopped, local(2025, 6, 9, 20, 50))
        .unwrap();

    let stats = engine.store().load_stats().unwrap().unwrap();
    assert_eq!(stats.daily_watch_time, 20.0);
    assert_eq!(stats.weekly_watch_time, 20.0);
    assert_eq!(stats.daily_history[0], 20.0);
    assert_eq!(stats.longest_session, 15.0);
    assert!(delivered.lock().unwrap().is_empty());
    assert!(!engine.session().is_active());
}

#[test]
fn exhausted_weekly_limit_blocks_immediately() {
    let mut stats = WatchStats::zeroed(date(2025, 6, 9));
    stats.weekly_watch_time = 580.0;
    stats.mirror_weekly();
    let settings = Settings {
        daily_limit: 10_000.0,
        weekly_limit: 600.0,
        ..Settings::default()
    };
    let (mut engine, delivered) = engine(MemoryStore::with_records(stats, settings));

    engine
        .handle_at(WatchEvent::WatchingStarted, local(2025, 6, 9, 20, 0))
        .unwrap();
    // One 25-minute tick overshoots the weekly limit.
    let commands = engine
        .handle_at(WatchEvent::Tick, local(2025, 6, 9, 20, 25))
        .unwrap();

    assert!(commands.is_empty());
    assert_eq!(
        delivered.lock().unwrap().as_slice(),
        &[BlockDirective::BlockPlayback]
    );
}

#[test]
fn sub_minute_remainder_requests_a_deferred_block() {
    let mut stats = WatchStats::zeroed(date(2025, 6, 9));
    stats.daily_watch_time = 29.0;
    stats.mirror_daily();
    let settings = Settings {
        daily_limit: 30.0,
        weekly_limit: 10_000.0,
        ..Settings::default()
    };
    let (mut engine, delivered) = engine(MemoryStore::with_records(stats, settings));

    engine
        .handle_at(WatchEvent::WatchingStarted, local(2025, 6, 9, 20, 0))
        .unwrap();
    let commands = engine
        .handle_at(
            WatchEvent::Tick,
            local(2025, 6, 9, 20, 0) + chrono::Duration::seconds(30),
        )
        .unwrap();

    match commands.as_slice() {
        [SchedulerCommand::DeferBlock(delay)] => {
            assert_eq!(delay.as_secs(), 30);
        }
        other => panic!("expected a deferred block, got {other:?}"),
    }
    assert!(delivered.lock().unwrap().is_empty());
}

#[test]
fn missing_settings_mean_no_enforcement() {
    let (mut engine, delivered) = engine(MemoryStore::new());

    engine
        .handle_at(WatchEvent::WatchingStarted, local(2025, 6, 9, 20, 0))
        .unwrap();
    engine
        .handle_at(WatchEvent::Tick, local(2025, 6, 9, 23, 0))
        .unwrap();

    let stats = engine.store().load_stats().unwrap().unwrap();
    assert_eq!(stats.daily_watch_time, 180.0);
    assert!(delivered.lock().unwrap().is_empty());
}

#[test]
fn leaving_the_watch_page_ends_the_session() {
    let (mut engine, _delivered) = engine(MemoryStore::with_settings(Settings {
        daily_limit: 1000.0,
        weekly_limit: 1000.0,
        ..Settings::default()
    }));

    engine
        .handle_at(WatchEvent::WatchingStarted, local(2025, 6, 9, 20, 0))
        .unwrap();
    let commands = engine
        .handle_at(WatchEvent::LeftWatchPage, local(2025, 6, 9, 20, 8))
        .unwrap();

    assert!(commands.contains(&SchedulerCommand::DisablePeriodic));
    assert!(!engine.session().is_active());
    assert_eq!(engine.session().current_session_mins, 0.0);
    let stats = engine.store().load_stats().unwrap().unwrap();
    assert_eq!(stats.daily_watch_time, 8.0);
}
