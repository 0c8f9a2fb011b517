//! The scheduler/dispatcher.
//!
//! A tokio driver around the synchronous [`Engine`]. All engine access
//! happens on one event loop, so every tick's read-modify-write of the
//! stats record is serialized through the queue; there is no shared-state
//! locking anywhere.
//!
//! Timers are owned, abortable tasks: the periodic tick (idempotent
//! enable/disable) and the one-shot deferred block, which is canceled on
//! any session-ending transition so a stale block can never fire after
//! the session ended.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::engine::{Engine, SchedulerCommand};
use crate::error::Result;
use crate::events::WatchEvent;
use crate::storage::Store;

/// Period of the accrual tick while a session is active.
pub const TICK_PERIOD: Duration = Duration::from_secs(60);

/// Internal signals sent by the timer tasks back into the event loop.
#[derive(Debug, Clone, Copy)]
enum TimerFired {
    Periodic,
    Deferred,
}

/// Event-loop driver owning the engine and its timers.
pub struct Dispatcher<S: Store> {
    engine: Engine<S>,
    period: Duration,
    periodic: Option<JoinHandle<()>>,
    deferred: Option<JoinHandle<()>>,
    timer_tx: mpsc::Sender<TimerFired>,
    timer_rx: Option<mpsc::Receiver<TimerFired>>,
}

impl<S: Store> Dispatcher<S> {
    pub fn new(engine: Engine<S>) -> Self {
        Self::with_period(engine, TICK_PERIOD)
    }

    /// Use a non-default tick period (tests, debugging).
    pub fn with_period(engine: Engine<S>, period: Duration) -> Self {
        let (timer_tx, timer_rx) = mpsc::channel(8);
        Self {
            engine,
            period,
            periodic: None,
            deferred: None,
            timer_tx,
            timer_rx: Some(timer_rx),
        }
    }

    /// Run the event loop until the inbound channel closes.
    ///
    /// Handler failures (transient storage errors) are reported on stderr
    /// and the loop keeps going; the next periodic tick is the retry.
    pub async fn run(mut self, mut events: mpsc::Receiver<WatchEvent>) -> Result<()> {
        let mut timer_rx = self
            .timer_rx
            .take()
            .expect("dispatcher event loop started twice");

        loop {
            tokio::select! {
                maybe_event = events.recv() => {
                    let Some(event) = maybe_event else { break };
                    if let Err(e) = self.dispatch(event) {
                        eprintln!("Warning: failed to process {event:?}: {e}");
                    }
                }
                Some(fired) = timer_rx.recv() => match fired {
                    TimerFired::Periodic => {
                        if let Err(e) = self.dispatch(WatchEvent::Tick) {
                            eprintln!("Warning: watch-time tick failed: {e}");
                        }
                    }
                    TimerFired::Deferred => {
                        self.deferred = None;
                        self.disable_periodic();
                        self.engine.fire_block();
                    }
                },
            }
        }

        self.disable_periodic();
        self.cancel_deferred();
        Ok(())
    }

    /// Feed one event to the engine and apply its scheduling commands.
    fn dispatch(&mut self, event: WatchEvent) -> Result<()> {
        let commands = self.engine.handle(event)?;
        for command in commands {
            self.apply(command);
        }
        Ok(())
    }

    fn apply(&mut self, command: SchedulerCommand) {
        match command {
            SchedulerCommand::EnablePeriodic => self.enable_periodic(),
            SchedulerCommand::DisablePeriodic => self.disable_periodic(),
            SchedulerCommand::CancelDeferredBlock => self.cancel_deferred(),
            SchedulerCommand::DeferBlock(delay) => self.schedule_block(delay),
        }
    }

    fn enable_periodic(&mut self) {
        if self.periodic.is_some() {
            return;
        }
        let tx = self.timer_tx.clone();
        let period = self.period;
        self.periodic = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick completes immediately; skip it, the
            // start event already ran an accrual.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(TimerFired::Periodic).await.is_err() {
                    break;
                }
            }
        }));
    }

    fn disable_periodic(&mut self) {
        if let Some(handle) = self.periodic.take() {
            handle.abort();
        }
    }

    fn cancel_deferred(&mut self) {
        if let Some(handle) = self.deferred.take() {
            handle.abort();
        }
    }

    /// Replace any pending deferred block with a new one.
    fn schedule_block(&mut self, delay: Duration) {
        self.cancel_deferred();
        let tx = self.timer_tx.clone();
        self.deferred = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(TimerFired::Deferred).await;
        }));
    }
}

impl<S: Store> Drop for Dispatcher<S> {
    fn drop(&mut self) {
        self.disable_periodic();
        self.cancel_deferred();
    }
}
