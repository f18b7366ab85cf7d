use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use kira_expression_curator::app::{App, ProgressSink};
use kira_expression_curator::config::{ConfigLoader, CurationConfig};
use kira_expression_curator::domain::GeoSampleAccession;
use kira_expression_curator::error::CurateError;
use kira_expression_curator::geo::{GeoClient, GeoHttpClient};
use kira_expression_curator::output::{
    ConsoleOutput, JsonOutput, OutputMode, render_curation, render_inspect,
};
use kira_expression_curator::store::Store;

#[derive(Parser)]
#[command(name = "kira-ec")]
#[command(about = "Curate the GSE144259 FPKM matrix and check sample metadata availability")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true, help = "Path to a JSON config (default: ./kira-ec.json)")]
    config: Option<String>,

    #[arg(long, global = true, help = "Print results as JSON")]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Fetch the expression matrix and write the curation table")]
    Curate,
    #[command(about = "Fetch one sample's SOFT record and report field availability")]
    Inspect(InspectArgs),
}

#[derive(Args)]
struct InspectArgs {
    sample: Option<String>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<CurateError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &CurateError) -> u8 {
    match error {
        CurateError::InvalidSeriesAccession(_)
        | CurateError::InvalidSampleAccession(_)
        | CurateError::ConfigRead(_)
        | CurateError::ConfigParse(_) => 2,
        CurateError::GeoHttp(_) | CurateError::GeoStatus { .. } | CurateError::GeoEncoding(_) => 3,
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
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let config = ConfigLoader::resolve(cli.config.as_deref())?;
    let store = Store::new(config.data_dir.clone());
    let geo = GeoHttpClient::new()?;
    let app = App::new(store, geo);

    match cli.command {
        Some(Commands::Curate) => run_curate(&app, &config, output_mode),
        Some(Commands::Inspect(args)) => {
            let sample: GeoSampleAccession = match args.sample {
                Some(sample) => sample.parse()?,
                None => config.sample.clone(),
            };
            run_inspect(&app, &sample, output_mode)
        }
        None => {
            run_curate(&app, &config, output_mode)?;
            run_inspect(&app, &config.sample, output_mode)
        }
    }
}

fn sink_for(output_mode: OutputMode) -> &'static dyn ProgressSink {
    match output_mode {
        OutputMode::Human => &ConsoleOutput,
        OutputMode::Json => &JsonOutput,
    }
}

fn run_curate<G: GeoClient>(
    app: &App<G>,
    config: &CurationConfig,
    output_mode: OutputMode,
) -> miette::Result<()> {
    let result = app.curate(config, sink_for(output_mode))?;
    match output_mode {
        OutputMode::Human => print!("{}", render_curation(&result)),
        OutputMode::Json => JsonOutput::print_curation(&result).into_diagnostic()?,
    }
    Ok(())
}

fn run_inspect<G: GeoClient>(
    app: &App<G>,
    sample: &GeoSampleAccession,
    output_mode: OutputMode,
) -> miette::Result<()> {
    let result = app.inspect(sample, sink_for(output_mode))?;
    match output_mode {
        OutputMode::Human => {
            println!();
            print!("{}", render_inspect(&result));
        }
        OutputMode::Json => JsonOutput::print_inspect(&result).into_diagnostic()?,
    }
    Ok(())
}
