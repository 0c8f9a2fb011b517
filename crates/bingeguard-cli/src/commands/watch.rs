use std::io::BufRead;
use std::time::Duration;

use clap::Subcommand;

use bingeguard_core::{
    seed_defaults, BlockDirective, BlockSink, Broadcaster, DeliveryError, Dispatcher, Engine,
    FileStore, WatchEvent,
};

#[derive(Subcommand)]
pub enum WatchAction {
    /// Seed default settings and stats if absent (first-run signal)
    Init,
    /// Run the background tracker, reading JSON events from stdin
    ///
    /// One event per line, e.g. {"type":"WATCHING_STARTED"}. Emitted
    /// block directives are printed to stdout as JSON lines.
    Run {
        /// Accrual tick period in seconds while a session is active
        #[arg(long, default_value_t = 60)]
        period_secs: u64,
    },
}

/// Delivers block directives to stdout, standing in for an open page.
struct StdoutSink;

impl BlockSink for StdoutSink {
    fn label(&self) -> &str {
        "stdout"
    }

    fn deliver(&self, directive: &BlockDirective) -> Result<(), DeliveryError> {
        let line = serde_json::to_string(directive).map_err(|e| DeliveryError(e.to_string()))?;
        println!("{line}");
        Ok(())
    }
}

pub fn run(action: WatchAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        WatchAction::Init => {
            let mut store = FileStore::open()?;
            seed_defaults(&mut store, chrono::Local::now().date_naive())?;
            println!("Defaults seeded; existing records untouched.");
            Ok(())
        }
        WatchAction::Run { period_secs } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_loop(Duration::from_secs(period_secs)))
        }
    }
}

async fn run_loop(period: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open()?;
    let mut broadcaster = Broadcaster::new();
    broadcaster.register(Box::new(StdoutSink));

    let engine = Engine::new(store, broadcaster);
    let dispatcher = Dispatcher::with_period(engine, period);

    let (tx, rx) = tokio::sync::mpsc::channel(32);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<WatchEvent>(line) {
                Ok(event) => {
                    if tx.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(e) => eprintln!("Warning: ignoring malformed event: {e}"),
            }
        }
    });

    dispatcher.run(rx).await?;
    Ok(())
}
