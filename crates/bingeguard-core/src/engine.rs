//! The background engine.
//!
//! Owns the session state, the persisted store, and the enforcement
//! broadcaster. Every inbound [`WatchEvent`] runs through a single
//! dispatch point: the handler ticks the accrual engine (a read-modify-
//! write against the one stats record), feeds the limit evaluator, fires
//! the broadcaster on an immediate block, and reports scheduling side
//! effects for the driver to apply.
//!
//! The engine itself is synchronous and wall-clock based; the caller
//! (normally [`crate::scheduler::Dispatcher`]) serializes calls into it.

use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate};

use crate::accrual;
use crate::error::Result;
use crate::events::WatchEvent;
use crate::limits::{self, LimitDecision};
use crate::notifier::{BlockDirective, Broadcaster};
use crate::session::SessionState;
use crate::stats::WatchStats;
use crate::storage::Store;

/// Scheduling side effect requested by an event handler.
///
/// The driver owns the actual timers; enable/disable must be idempotent
/// there, and a canceled deferred block must never fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerCommand {
    /// Start the periodic accrual tick (no-op if already running).
    EnablePeriodic,
    /// Stop the periodic accrual tick (no-op if not running).
    DisablePeriodic,
    /// Cancel a pending deferred block, if any.
    CancelDeferredBlock,
    /// Fire a block after the given delay, replacing any pending one.
    DeferBlock(Duration),
}

/// The background-process singleton.
pub struct Engine<S: Store> {
    store: S,
    broadcaster: Broadcaster,
    session: SessionState,
}

impl<S: Store> Engine<S> {
    pub fn new(store: S, broadcaster: Broadcaster) -> Self {
        Self {
            store,
            broadcaster,
            session: SessionState::new(Local::now()),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Handle an inbound event at the current wall-clock instant.
    pub fn handle(&mut self, event: WatchEvent) -> Result<Vec<SchedulerCommand>> {
        self.handle_at(event, Local::now())
    }

    /// Handle an inbound event at an explicit instant.
    pub fn handle_at(
        &mut self,
        event: WatchEvent,
        now: DateTime<Local>,
    ) -> Result<Vec<SchedulerCommand>> {
        match event {
            WatchEvent::WatchingStarted => {
                self.session.start(now);
                self.session.periodic_enabled = true;
                let mut commands = vec![SchedulerCommand::EnablePeriodic];
                if let Some(command) = self.tick_at(now)? {
                    commands.push(command);
                }
                Ok(commands)
            }
            WatchEvent::WatchingPaused => {
                // Account for the elapsed interval before suspending.
                self.tick_at(now)?;
                self.session.pause();
                self.session.periodic_enabled = false;
                Ok(vec![
                    SchedulerCommand::DisablePeriodic,
                    SchedulerCommand::CancelDeferredBlock,
                ])
            }
            WatchEvent::WatchingStopped | WatchEvent::LeftWatchPage => {
                self.tick_at(now)?;
                self.session.stop();
                self.session.periodic_enabled = false;
                Ok(vec![
                    SchedulerCommand::DisablePeriodic,
                    SchedulerCommand::CancelDeferredBlock,
                ])
            }
            WatchEvent::Tick => {
                let mut commands = Vec::new();
                if let Some(command) = self.tick_at(now)? {
                    commands.push(command);
                }
                Ok(commands)
            }
            WatchEvent::Installed => {
                seed_defaults(&mut self.store, now.date_naive())?;
                Ok(Vec::new())
            }
        }
    }

    /// Broadcast the block directive to every registered page.
    ///
    /// Called directly when a deferred block fires.
    pub fn fire_block(&self) -> usize {
        self.broadcaster.broadcast(&BlockDirective::BlockPlayback)
    }

    /// One accrual tick: read, mutate, write the stats record, then
    /// evaluate limits. Returns a deferred-block request if one is due.
    fn tick_at(&mut self, now: DateTime<Local>) -> Result<Option<SchedulerCommand>> {
        let mut stats = self
            .store
            .load_stats()?
            .unwrap_or_else(|| WatchStats::zeroed(now.date_naive()));

        let was_active = self.session.is_active();
        accrual::run_tick(&mut stats, &mut self.session, now);
        self.store.save_stats(&stats)?;

        // Idle ticks are maintenance only; limits apply to live sessions.
        if !was_active {
            return Ok(None);
        }

        let settings = self.store.load_settings()?;
        match limits::evaluate(&stats, settings.as_ref()) {
            LimitDecision::Within => Ok(None),
            LimitDecision::BlockNow => {
                self.fire_block();
                Ok(None)
            }
            LimitDecision::BlockAfter(delay) => Ok(Some(SchedulerCommand::DeferBlock(delay))),
        }
    }
}

/// Seed default records on first run.
///
/// Each record is checked independently, so a half-seeded profile heals
/// on the next install signal; existing records are never overwritten.
pub fn seed_defaults<S: Store>(store: &mut S, today: NaiveDate) -> Result<()> {
    if store.load_settings()?.is_none() {
        store.save_settings(&crate::settings::Settings::default())?;
    }
    if store.load_stats()?.is_none() {
        store.save_stats(&WatchStats::zeroed(today))?;
    }
    Ok(())
}
