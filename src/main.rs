use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Local mirror of the word lists, one file per source.
    #[arg(global = true, long, default_value = "data/dictionaries")]
    data_dir: PathBuf,

    /// Where typer settings are persisted.
    #[arg(global = true, long, default_value = ".syllaforge")]
    config_dir: PathBuf,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank words containing a syllable.
    Suggest(cmd::suggest::SuggestArgs),
    /// Type a word the way a person would.
    Type(cmd::typing::TypeArgs),
    /// Inspect or change typer settings.
    #[command(subcommand)]
    Config(cmd::config::ConfigCommand),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let code = match cli.command {
        Commands::Suggest(args) => cmd::suggest::run(args, &cli.data_dir, &cli.config_dir).await,
        Commands::Type(args) => cmd::typing::run(args, &cli.data_dir, &cli.config_dir).await,
        Commands::Config(command) => cmd::config::run(command, &cli.config_dir),
    };
    std::process::exit(code);
}
