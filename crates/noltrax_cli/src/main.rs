//! noltrax CLI
//!
//! Session JSON → analysis JSON, text report, timeline CSV

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use noltrax_core::LengthAxis;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "noltrax")]
#[command(about = "Analyze tagged football match sessions", long_about = None)]
struct Cli {
    /// Verbose logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Analyze a session file
    Analyze {
        /// Input session JSON file path
        #[arg(long)]
        r#in: PathBuf,

        /// Output analysis JSON file path (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Analysis config JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Use the ten-bucket density scheme
        #[arg(long, default_value = "false")]
        legacy_buckets: bool,

        /// Fixed density bucket width in minutes
        #[arg(long)]
        bucket_minutes: Option<u32>,

        /// Goal-to-goal axis of the pitch board (x or y)
        #[arg(long)]
        length_axis: Option<LengthAxis>,
    },

    /// Print a plain-text report
    Report {
        /// Input session JSON file path
        #[arg(long)]
        r#in: PathBuf,

        /// Analysis config JSON file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Export the normalized timeline as CSV
    ExportCsv {
        /// Input session JSON file path
        #[arg(long)]
        r#in: PathBuf,

        /// Output CSV file path
        #[arg(long)]
        out: PathBuf,
    },

    /// Print the JSON Schema of the analysis result
    Schema,
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze {
            r#in,
            out,
            config,
            legacy_buckets,
            bucket_minutes,
            length_axis,
        } => {
            let overrides = noltrax_cli::ConfigOverrides {
                legacy_buckets,
                bucket_minutes,
                length_axis,
            };
            let config = noltrax_cli::resolve_config(config.as_deref(), overrides)?;
            let loaded = noltrax_cli::load_session(&r#in)?;
            let envelope = noltrax_cli::build_envelope(&loaded, &config);

            match out {
                Some(path) => {
                    noltrax_cli::write_envelope(&path, &envelope)?;
                    eprintln!("Analysis saved to: {}", path.display());
                    eprintln!("   Events:     {}", envelope.result.total_events);
                    eprintln!(
                        "   Confidence: {} ({}/100)",
                        envelope.result.confidence.level, envelope.result.confidence.score
                    );
                    eprintln!("   Digest:     {}", envelope.session_digest);
                }
                None => println!("{}", serde_json::to_string_pretty(&envelope)?),
            }
        }

        Commands::Report { r#in, config } => {
            let config =
                noltrax_cli::resolve_config(config.as_deref(), noltrax_cli::ConfigOverrides::default())?;
            let loaded = noltrax_cli::load_session(&r#in)?;
            let result = noltrax_core::analyze(&loaded.session, &config);
            print!("{}", noltrax_cli::render_report(&loaded.session, &result));
        }

        Commands::ExportCsv { r#in, out } => {
            let loaded = noltrax_cli::load_session(&r#in)?;
            let rows = noltrax_cli::write_timeline_csv(&loaded.session, &out)?;
            eprintln!("{} events exported to: {}", rows, out.display());
        }

        Commands::Schema => {
            let schema = noltrax_core::analysis_result_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("noltrax CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
