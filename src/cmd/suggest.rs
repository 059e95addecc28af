use crate::reports;
use clap::Args;
use std::path::Path;
use std::sync::Arc;
use syllaforge::dictionary::{FileFetcher, DEFAULT_DICTIONARY};
use syllaforge::ranking::{SortDirection, SortMethod, SortSpec};
use syllaforge::storage::FileStorage;
use syllaforge::{Assistant, DEFAULT_SUGGESTION_LIMIT};

#[derive(Args, Debug, Clone)]
pub struct SuggestArgs {
    /// The syllable every suggestion must contain.
    pub syllable: String,

    #[arg(short, long, default_value = DEFAULT_DICTIONARY)]
    pub dict: String,

    #[arg(short, long, default_value_t = SortMethod::Frequency)]
    pub sort: SortMethod,

    #[arg(long, default_value_t = SortDirection::Descending)]
    pub direction: SortDirection,

    #[arg(short, long, default_value_t = DEFAULT_SUGGESTION_LIMIT)]
    pub limit: usize,

    /// Print all matches as JSON instead of a table.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub async fn run(args: SuggestArgs, data_dir: &Path, config_dir: &Path) -> i32 {
    let assistant = Assistant::with_defaults(
        Arc::new(FileFetcher::new(data_dir)),
        Arc::new(FileStorage::new(config_dir)),
    );

    if let Err(e) = assistant.select_dictionary(&args.dict) {
        eprintln!("❌ {}", e);
        eprintln!("   Known dictionaries: {}", assistant.store().ids().join(", "));
        return 2;
    }
    if let Err(e) = assistant.load_dictionary(&args.dict).await {
        eprintln!("❌ Could not load dictionary '{}': {}", args.dict, e);
        return 1;
    }
    assistant.set_sort(SortSpec::new(args.sort, args.direction));

    let Some(suggestions) = assistant.on_query_changed(&args.syllable) else {
        eprintln!("⚠️  Empty syllable; nothing to suggest.");
        return 2;
    };

    if args.json {
        match serde_json::to_string_pretty(&suggestions) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("❌ {}", e);
                return 1;
            }
        }
    } else {
        reports::print_suggestions(&suggestions, args.limit);
    }
    0
}
