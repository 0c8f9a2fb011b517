//! # Bingeguard Core Library
//!
//! This library provides the core business logic for Bingeguard, a
//! watch-time limiter for a streaming site. It implements the background
//! process of the browser extension: session tracking, periodic watch-time
//! accrual, day/week rollover of the historical buckets, and
//! threshold-triggered playback blocking.
//!
//! ## Architecture
//!
//! - **Accrual Engine**: A wall-clock-based state machine that requires
//!   the caller to invoke ticks for progress updates
//! - **Storage**: Two persisted key-value namespaces (local watch stats,
//!   synced settings), JSON/TOML files by default
//! - **Scheduler**: A tokio event loop serializing all engine access,
//!   owning the periodic tick and the cancelable deferred block
//!
//! ## Key Components
//!
//! - [`Engine`]: Background-process event dispatch and accrual driver
//! - [`Dispatcher`]: Event loop plus timer ownership
//! - [`WatchStats`] / [`Settings`]: The two persisted records
//! - [`Broadcaster`]: Best-effort fan-out of block directives

pub mod accrual;
pub mod calendar;
pub mod engine;
pub mod error;
pub mod events;
pub mod limits;
pub mod notifier;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod stats;
pub mod storage;

pub use accrual::{run_tick, TickOutcome};
pub use engine::{seed_defaults, Engine, SchedulerCommand};
pub use error::{CoreError, Result, SettingsError, StorageError};
pub use events::WatchEvent;
pub use limits::{evaluate, LimitDecision};
pub use notifier::{BlockDirective, BlockSink, Broadcaster, DeliveryError};
pub use scheduler::{Dispatcher, TICK_PERIOD};
pub use session::SessionState;
pub use settings::Settings;
pub use stats::{WatchStats, DAILY_HISTORY_LEN, WEEKLY_HISTORY_LEN};
pub use storage::{data_dir, FileStore, MemoryStore, Store};
