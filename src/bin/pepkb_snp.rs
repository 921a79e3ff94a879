use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use pepkb_snp::api::PepkbHttpClient;
use pepkb_snp::app::App;
use pepkb_snp::config::ApiConfig;
use pepkb_snp::error::PepkbError;
use pepkb_snp::output::{JsonOutput, OutputMode, TextOutput};
use pepkb_snp::query::RangeQuery;
use pepkb_snp::session::StudySession;

#[derive(Parser)]
#[command(name = "pepkb-snp")]
#[command(about = "Query SNP markers from the PepperKB genomics knowledge base")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    non_interactive: bool,

    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Fetch a study's full SNP marker dataset")]
    Fetch(FetchArgs),
    #[command(about = "Filter a study's SNP markers by chromosome and position range")]
    Query(QueryArgs),
    #[command(about = "Show the observed position range of a chromosome in a study")]
    Range(RangeArgs),
}

#[derive(Args)]
struct FetchArgs {
    study: String,
}

#[derive(Args)]
struct QueryArgs {
    study: String,

    #[arg(long)]
    chromosome: String,

    #[arg(long)]
    start: String,

    #[arg(long)]
    end: String,
}

#[derive(Args)]
struct RangeArgs {
    study: String,

    #[arg(long)]
    chromosome: String,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(pepkb) = report.downcast_ref::<PepkbError>() {
            return ExitCode::from(map_exit_code(pepkb));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &PepkbError) -> u8 {
    match error {
        PepkbError::StudyNotFound(_) | PepkbError::InvalidQuery(_) => 2,
        PepkbError::ApiHttp(_) | PepkbError::ApiStatus { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    let config = ApiConfig::resolve(cli.base_url.as_deref()).into_diagnostic()?;
    let client = PepkbHttpClient::new(&config).into_diagnostic()?;
    let app = App::new(client);
    let mut session = StudySession::new();

    match cli.command {
        Commands::Fetch(args) => {
            let report = match output_mode {
                OutputMode::NonInteractive => {
                    app.fetch(&args.study, &mut session, &JsonOutput)
                        .into_diagnostic()?
                }
                OutputMode::Interactive => {
                    app.fetch(&args.study, &mut session, &TextOutput)
                        .into_diagnostic()?
                }
            };
            match output_mode {
                OutputMode::NonInteractive => JsonOutput::print_load(&report).into_diagnostic()?,
                OutputMode::Interactive => TextOutput::print_load(&report),
            }
            Ok(())
        }
        Commands::Query(args) => {
            // Bounds are validated before any network call; a malformed query
            // never starts a load.
            let query = RangeQuery::parse(&args.chromosome, &args.start, &args.end)
                .into_diagnostic()?;
            let report = match output_mode {
                OutputMode::NonInteractive => {
                    app.query(&args.study, query, &mut session, &JsonOutput)
                        .into_diagnostic()?
                }
                OutputMode::Interactive => {
                    app.query(&args.study, query, &mut session, &TextOutput)
                        .into_diagnostic()?
                }
            };
            match output_mode {
                OutputMode::NonInteractive => JsonOutput::print_query(&report).into_diagnostic()?,
                OutputMode::Interactive => TextOutput::print_query(&report),
            }
            Ok(())
        }
        Commands::Range(args) => {
            let report = match output_mode {
                OutputMode::NonInteractive => {
                    app.range(&args.study, &args.chromosome, &mut session, &JsonOutput)
                        .into_diagnostic()?
                }
                OutputMode::Interactive => {
                    app.range(&args.study, &args.chromosome, &mut session, &TextOutput)
                        .into_diagnostic()?
                }
            };
            match output_mode {
                OutputMode::NonInteractive => JsonOutput::print_range(&report).into_diagnostic()?,
                OutputMode::Interactive => TextOutput::print_range(&report),
            }
            Ok(())
        }
    }
}
