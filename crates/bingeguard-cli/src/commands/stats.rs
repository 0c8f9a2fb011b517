use clap::Subcommand;

use bingeguard_core::{calendar, FileStore, Store, WatchStats};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Current totals and history windows
    Show {
        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Zero the watch-time record
    Reset,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = FileStore::open()?;

    match action {
        StatsAction::Show { json } => {
            let stats = store
                .load_stats()?
                .unwrap_or_else(|| WatchStats::zeroed(calendar::local_today()));
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Today:           {:.1} min", stats.daily_watch_time);
                println!("This week:       {:.1} min", stats.weekly_watch_time);
                println!("Longest session: {:.1} min", stats.longest_session);
                println!("Last updated:    {}", stats.last_updated);
                println!(
                    "Daily history:   {}",
                    stats
                        .daily_history
                        .iter()
                        .map(|m| format!("{m:.0}"))
                        .collect::<Vec<_>>()
                        .join(" ")
                );
                println!(
                    "Weekly history:  {}",
                    stats
                        .weekly_history
                        .iter()
                        .map(|m| format!("{m:.0}"))
                        .collect::<Vec<_>>()
                        .join(" ")
                );
            }
        }
        StatsAction::Reset => {
            store.save_stats(&WatchStats::zeroed(calendar::local_today()))?;
            println!("Watch stats reset.");
        }
    }
    Ok(())
}
