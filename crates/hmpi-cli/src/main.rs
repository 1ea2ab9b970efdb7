mod commands;
mod output;

use clap::{Args, Parser, Subcommand};
use hmpi_core::standards::ReferenceStandard;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hmpi",
    version,
    about = "Heavy Metal Pollution Index assessment for groundwater samples"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the permissible limits come from.
#[derive(Args)]
struct StandardsSource {
    /// Reference standard for the limits: bis or who
    #[arg(short, long = "standard", value_name = "bis|who")]
    standard: ReferenceStandard,

    /// Predefined standards table
    #[arg(long, default_value = "india", conflicts_with = "standards")]
    preset: String,

    /// Custom JSON standards file (overrides --preset)
    #[arg(long = "standards", value_name = "FILE")]
    standards: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score samples from a JSON or XLSX file without storing them
    Score {
        /// Path to JSON or XLSX sample file
        input_file: PathBuf,

        #[command(flatten)]
        source: StandardsSource,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Show per-metal contributions
        #[arg(long)]
        verbose: bool,
    },
    /// Validate, score and store samples for the current user
    Submit {
        /// Path to JSON or XLSX sample file
        input_file: PathBuf,

        #[command(flatten)]
        source: StandardsSource,

        /// Sample store (JSON file, created if missing)
        #[arg(long, value_name = "FILE")]
        store: PathBuf,

        /// Submitting user (default: $HMPI_USER)
        #[arg(long)]
        user: Option<String>,
    },
    /// Rescore every stored sample against the given standards
    Rescore {
        #[command(flatten)]
        source: StandardsSource,

        /// Sample store (JSON file)
        #[arg(long, value_name = "FILE")]
        store: PathBuf,
    },
    /// Show the current user's summary and most recent samples
    Dashboard {
        /// Sample store (JSON file)
        #[arg(long, value_name = "FILE")]
        store: PathBuf,

        /// User to show (default: $HMPI_USER)
        #[arg(long)]
        user: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Inspect and validate standards tables
    Standards {
        #[command(subcommand)]
        action: StandardsAction,
    },
}

#[derive(Subcommand)]
enum StandardsAction {
    /// List predefined standards tables
    List,
    /// Explain a standards table in plain language
    Explain {
        /// Preset name (e.g., "india")
        preset: String,
    },
    /// Print the JSON schema with field descriptions and example
    Schema,
    /// Validate a custom standards file
    Validate {
        /// Path to JSON standards file
        file: PathBuf,
    },
}

fn main() {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            input_file,
            source,
            output,
            verbose,
        } => commands::score::run(&input_file, &source, &output, verbose),
        Commands::Submit {
            input_file,
            source,
            store,
            user,
        } => commands::submit::run(&input_file, &source, &store, user),
        Commands::Rescore { source, store } => commands::submit::rescore(&source, &store),
        Commands::Dashboard {
            store,
            user,
            output,
        } => commands::dashboard::run(&store, user, &output),
        Commands::Standards { action } => match action {
            StandardsAction::List => commands::standards::list(),
            StandardsAction::Explain { preset } => commands::standards::explain(&preset),
            StandardsAction::Schema => commands::standards::schema(),
            StandardsAction::Validate { file } => commands::standards::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
