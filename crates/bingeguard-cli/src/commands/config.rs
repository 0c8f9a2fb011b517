use clap::Subcommand;

use bingeguard_core::{FileStore, Settings, Store};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the current settings
    Show,
    /// Get a single value by key (e.g. daily_limit)
    Get { key: String },
    /// Set a value by key (e.g. daily_limit 45)
    Set { key: String, value: String },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = FileStore::open()?;
    let mut settings = store.load_settings()?.unwrap_or_default();

    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigAction::Get { key } => match settings.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown settings key: {key}").into()),
        },
        ConfigAction::Set { key, value } => {
            settings.set(&key, &value)?;
            store.save_settings(&settings)?;
            println!("{key} = {value}");
        }
    }
    Ok(())
}
