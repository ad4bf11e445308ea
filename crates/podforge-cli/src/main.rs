use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use podforge_core::config::Config;
use podforge_core::voices;
use podforge_engine::PodcastGenerator;
use podforge_engine::events::TracingEventSink;
use podforge_provider::gemini::GeminiTtsProvider;
use podforge_store::local::LocalFileStore;

#[derive(Parser)]
#[command(
    name = "podforge",
    about = "Turn a two-speaker transcript into a multi-speaker podcast",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a podcast from a transcript file (use "-" for stdin)
    Generate {
        /// Transcript file path
        #[arg(short, long)]
        input: String,

        /// Base name for the generated files
        #[arg(long, default_value = "audio")]
        name: String,

        /// Owning user id for file access control
        #[arg(long, default_value = "local")]
        user: String,
    },

    /// Validate a transcript without generating audio
    Validate {
        /// Transcript file path (use "-" for stdin)
        #[arg(short, long)]
        input: String,
    },

    /// List the available prebuilt voices
    Voices,

    /// List the supported output languages
    Languages,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Validate the configuration
    Check,
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(input)?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    // Load config
    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)?;

    match cli.command {
        Commands::Generate { input, name, user } => {
            let (warnings, errors) = config.validate();
            for warning in &warnings {
                tracing::warn!(%warning, "config");
            }
            if !errors.is_empty() {
                for error in &errors {
                    tracing::error!(%error, "config");
                }
                anyhow::bail!("invalid configuration");
            }

            let transcript = read_input(&input)?;
            let storage = config.storage();

            let generator = PodcastGenerator::new(
                Arc::new(GeminiTtsProvider::new(config.tts().base_url.as_deref())),
                Arc::new(LocalFileStore::new(
                    storage.resolved_dir(),
                    storage.public_base_url.clone(),
                )),
                Arc::new(TracingEventSink),
                Arc::new(config),
            );

            let file_ids = generator.run(&transcript, &user, &name).await?;
            for id in file_ids {
                println!("{id}");
            }
        }

        Commands::Validate { input } => {
            let transcript = read_input(&input)?;
            let report = podforge_core::transcript::validate_transcript(
                &transcript,
                &config.tts().style_instructions,
            );

            if let Some(warning) = &report.warning {
                println!("warning: {warning}");
            }

            if report.valid {
                println!(
                    "Valid transcript: {} turns (Speaker 1: {}, Speaker 2: {})",
                    report.turns.len(),
                    report.speaker_1_count,
                    report.speaker_2_count
                );
            } else {
                let error = report
                    .error
                    .as_deref()
                    .unwrap_or("unknown validation failure");
                anyhow::bail!("invalid transcript: {error}");
            }
        }

        Commands::Voices => {
            for voice in voices::VOICES {
                println!("{} ({})", voice.name, voice.gender.as_str());
            }
        }

        Commands::Languages => {
            for language in voices::LANGUAGES {
                println!("{}  {}", language.tag, language.name);
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            ConfigAction::Check => {
                let (warnings, errors) = config.validate();
                for warning in &warnings {
                    println!("warning: {warning}");
                }
                for error in &errors {
                    println!("error: {error}");
                }
                if errors.is_empty() {
                    println!("Configuration OK");
                } else {
                    anyhow::bail!("invalid configuration");
                }
            }
        },
    }

    Ok(())
}
