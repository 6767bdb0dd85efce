//! jwsutil CLI - Command-line interface for converting and inspecting JWS serializations.

use clap::{Parser, Subcommand};
use jwsutil::Serialization;
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod output;

use commands::{convert, inspect};

#[derive(Parser)]
#[command(name = "jwsutil")]
#[command(about = "Convert JSON Web Signatures between Compact, Flattened and General serializations")]
struct Cli {
    /// Log debug details to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a JWS into another serialization
    Convert {
        /// Input file (or stdin if not provided)
        input: Option<String>,
        /// Target serialization: compact, flattened or general
        #[arg(long, default_value = "flattened")]
        to: Serialization,
        /// Unprotected header as a JSON object (JSON targets only)
        #[arg(long, conflicts_with = "header_file")]
        header: Option<String>,
        /// File containing the unprotected header as a JSON object
        #[arg(long)]
        header_file: Option<String>,
        /// Fail instead of dropping signatures beyond the first
        #[arg(long)]
        strict: bool,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Show the detected serialization and fields of a JWS
    Inspect {
        /// Input file (or stdin if not provided)
        input: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            input,
            to,
            header,
            header_file,
            strict,
            pretty,
        } => convert::run(input, to, header, header_file, strict, pretty),
        Commands::Inspect { input } => inspect::run(input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
