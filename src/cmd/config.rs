use crate::reports;
use clap::Subcommand;
use std::path::Path;
use std::sync::Arc;
use syllaforge::config::ConfigStore;
use syllaforge::storage::FileStorage;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print one setting, e.g. `typoNoticeDelay.mean`.
    Get { path: String },
    /// Change one setting. Out-of-range values are clamped.
    Set {
        path: String,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Restore every setting to its default.
    Reset,
    /// Print all settings.
    Show {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

pub fn run(command: ConfigCommand, config_dir: &Path) -> i32 {
    let mut store = ConfigStore::open(Arc::new(FileStorage::new(config_dir)));

    match command {
        ConfigCommand::Get { path } => match store.get(&path) {
            Ok(v) => {
                println!("{} = {}", path, v);
                0
            }
            Err(e) => {
                eprintln!("❌ {}", e);
                2
            }
        },
        ConfigCommand::Set { path, value } => match store.set(&path, value) {
            Ok(stored) => {
                if stored != value {
                    eprintln!("⚠️  {} clamped to {}", path, stored);
                }
                println!("{} = {}", path, stored);
                0
            }
            Err(e) => {
                eprintln!("❌ {}", e);
                2
            }
        },
        ConfigCommand::Reset => {
            let cfg = store.reset_to_defaults();
            println!("✅ Settings reset to defaults.");
            reports::print_config(&cfg);
            0
        }
        ConfigCommand::Show { json } => {
            let cfg = store.current();
            if json {
                match cfg.to_blob() {
                    Ok(blob) => println!("{}", blob),
                    Err(e) => {
                        eprintln!("❌ {}", e);
                        return 1;
                    }
                }
            } else {
                reports::print_config(&cfg);
            }
            0
        }
    }
}
