//! mathquiz CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mathquiz", version, about = "Math quiz authoring toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a quiz file
    Validate {
        /// Path to the quiz file
        #[arg(long)]
        file: PathBuf,
    },

    /// Reformat a quiz file (canonical text or JSON)
    Fmt {
        /// Path to the quiz file
        #[arg(long)]
        file: PathBuf,

        /// Output path (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: txt, json
        #[arg(long, default_value = "txt")]
        format: String,
    },

    /// Suggest catalog symbols for a piece of question text
    Suggest {
        /// Question text to analyze
        text: String,

        /// Suggester to use (default from config)
        #[arg(long)]
        suggester: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Fill missing symbol lists in a quiz file
    Autofill {
        /// Path to the quiz file
        #[arg(long)]
        file: PathBuf,

        /// Output path (rewrites the input file when omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Suggester to use (default from config)
        #[arg(long)]
        suggester: Option<String>,

        /// Max concurrent suggestion requests
        #[arg(long)]
        parallelism: Option<usize>,

        /// Re-suggest questions that already have symbols
        #[arg(long)]
        overwrite: bool,

        /// Disable the deterministic fallback scan on suggester failure
        #[arg(long)]
        no_fallback: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the symbol catalog
    Symbols,

    /// Create starter config and example quiz file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mathquiz=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { file } => commands::validate::execute(file),
        Commands::Fmt {
            file,
            output,
            format,
        } => commands::fmt::execute(file, output, format),
        Commands::Suggest {
            text,
            suggester,
            config,
        } => commands::suggest::execute(text, suggester, config).await,
        Commands::Autofill {
            file,
            output,
            suggester,
            parallelism,
            overwrite,
            no_fallback,
            config,
        } => {
            commands::autofill::execute(
                file,
                output,
                suggester,
                parallelism,
                overwrite,
                no_fallback,
                config,
            )
            .await
        }
        Commands::Symbols => commands::symbols::execute(),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
