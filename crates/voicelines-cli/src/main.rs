use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use voicelines::{BatchRunner, FailureMode, ItemOutcome, RunConfig, RunOptions, read_input};
use voicelines_audio::Transcoder;
use voicelines_speech::{TTSModelsProvider, TTSProvider};
use voicelines_speech::providers::elevenlabs::ElevenLabs;

#[derive(Parser)]
#[command(name = "voicelines")]
#[command(about = "Generate, convert and catalogue voice lines with ElevenLabs", long_about = None)]
struct Cli {
    /// Environment file to load (defaults to the nearest .env, if any)
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every line of an input file that has no converted clip yet
    Generate(GenerateArgs),
    /// List the models available to the configured API key
    Models {
        /// TOML configuration file (defaults to ./voicelines.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Input file: a .json voice document or a .csv with one line per row
    input: PathBuf,

    /// Regenerate lines even when their converted clip exists
    #[arg(long)]
    regen: bool,

    /// Stop at the first failing line instead of continuing
    #[arg(long)]
    fail_fast: bool,

    /// Root of the converted output tree
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Directory for raw generator output (defaults to the system temp dir)
    #[arg(long)]
    scratch_dir: Option<PathBuf>,

    /// Report file (defaults to <output-dir>/report.csv)
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// TOML configuration file (defaults to ./voicelines.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let env_file = load_env_file(cli.env_file.as_deref())?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Some(path) = env_file {
        log::debug!("Loaded environment from {}", path.display());
    }

    match cli.command {
        Commands::Generate(args) => generate(args).await?,
        Commands::Models { config } => list_models(config).await?,
    }

    Ok(())
}

/// Load variables from an env file. Variables already set in the process are
/// kept. An explicit file must exist; the default `.env` is optional.
fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            Ok(Some(path.to_path_buf()))
        }
        None => Ok(dotenvy::dotenv().ok()),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<RunConfig> {
    RunConfig::load(path.as_deref()).context("Failed to load configuration")
}

fn connect(config: &RunConfig) -> Result<ElevenLabs> {
    let provider = ElevenLabs::new(config.elevenlabs.clone()).map_err(|err| {
        log::error!("{err}");
        anyhow::Error::new(err).context("Cannot create the ElevenLabs client")
    })?;
    log::info!("Using the {} provider", provider.provider_name());
    Ok(provider)
}

async fn generate(args: GenerateArgs) -> Result<()> {
    let config = load_config(args.config)?;
    let provider = connect(&config)?;
    let transcoder = Transcoder::new(config.audio.clone());

    let output_root = args.output_dir.unwrap_or_else(|| config.output.root.clone());
    let report_path = args
        .report
        .or_else(|| config.output.report.clone())
        .unwrap_or_else(|| output_root.join("report.csv"));
    let scratch_dir = args.scratch_dir.or_else(|| config.output.scratch.clone());
    let failure_mode = if args.fail_fast {
        FailureMode::FailFast
    } else {
        FailureMode::Resilient
    };

    let rows = read_input(&args.input)
        .with_context(|| format!("Failed to read input {}", args.input.display()))?;
    log::info!(
        "Loaded {} lines from {} (output: {}, report: {})",
        rows.len(),
        args.input.display(),
        output_root.display(),
        report_path.display()
    );

    let options = RunOptions::new(output_root)
        .with_report_path(report_path)
        .with_scratch_dir(scratch_dir)
        .with_regenerate(args.regen)
        .with_failure_mode(failure_mode);

    let summary = BatchRunner::new(&provider, &transcoder, options)
        .run(&rows)
        .await
        .context("Batch run stopped")?;

    for outcome in &summary.outcomes {
        if let ItemOutcome::Failed { row, key, error } = outcome {
            println!(
                "FAILED row {} ({}): {}",
                row,
                key.as_deref().unwrap_or("-"),
                error
            );
        }
    }
    println!(
        "{} generated, {} skipped, {} failed",
        summary.generated(),
        summary.skipped(),
        summary.failed()
    );

    Ok(())
}

async fn list_models(config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config)?;
    let provider = connect(&config)?;

    let models = provider
        .list_models()
        .await
        .context("Failed to list models")?;

    let current = provider.get_current_model();
    for model in models {
        let marker = if model.id == current.id { "*" } else { " " };
        println!("{} {:<28} {}", marker, model.id, model.name);
    }

    Ok(())
}
