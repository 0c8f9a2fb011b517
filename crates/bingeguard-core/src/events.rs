//! Inbound events consumed by the background engine.
//!
//! These arrive from the external messaging/event layer (the content
//! script, navigation watcher, timer service, and install hook). The wire
//! form is a tagged object, e.g. `{"type": "WATCHING_STARTED"}`.

use serde::{Deserialize, Serialize};

/// A session-lifecycle or control signal delivered to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WatchEvent {
    /// Playback began or resumed on the watch page.
    WatchingStarted,
    /// Playback paused.
    WatchingPaused,
    /// Playback ended.
    WatchingStopped,
    /// The page navigated away from the watch page.
    LeftWatchPage,
    /// Periodic accrual tick from the timer service.
    Tick,
    /// First-run/install signal; seeds default records if absent.
    Installed,
}
