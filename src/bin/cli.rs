//! CLI for inspecting and editing the voice-sample library.
//!
//! Tracing output goes to stderr so stdout stays clean for listings.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vaani::{LibraryConfig, SampleLibrary};

/// Manage the Vaani voice-sample library.
#[derive(Parser)]
#[command(name = "vaani-samples", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List samples from both tiers.
    List,

    /// Add an audio file to the library.
    Add {
        file: PathBuf,
        /// Display name (defaults to the file name).
        #[arg(short, long)]
        name: Option<String>,
        /// Media type (guessed from the extension when omitted).
        #[arg(long)]
        media_type: Option<String>,
    },

    /// Rename a locally stored sample.
    Rename { id: String, name: String },

    /// Remove a sample from local storage.
    Delete { id: String },

    /// Write a sample's payload to a file.
    Get { id: String, out: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vaani=info")),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(LibraryConfig::default_config_path);
    let config = if config_path.exists() {
        LibraryConfig::from_file(&config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))?
    } else {
        LibraryConfig::default()
    };
    let library = SampleLibrary::from_config(&config)?;

    match cli.command {
        Command::List => {
            for sample in library.list().await {
                println!(
                    "{}\t{}\t{}\t{} bytes\t{:?}",
                    sample.id,
                    sample.name,
                    sample.media_type,
                    sample.size,
                    sample.availability()
                );
            }
        }
        Command::Add {
            file,
            name,
            media_type,
        } => {
            let bytes =
                std::fs::read(&file).with_context(|| format!("failed to read {}", file.display()))?;
            let media_type = media_type.unwrap_or_else(|| guess_media_type(&file).to_owned());
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let sample = library
                .add(&bytes, &media_type, &file_name, name.as_deref())
                .await;
            println!("{}", sample.id);
        }
        Command::Rename { id, name } => library.rename(&id, &name).await,
        Command::Delete { id } => library.delete(&id).await,
        Command::Get { id, out } => {
            let payload = library.get_payload(&id).await?;
            std::fs::write(&out, &payload.bytes)
                .with_context(|| format!("failed to write {}", out.display()))?;
            tracing::info!(id, bytes = payload.bytes.len(), media_type = %payload.media_type, "payload written");
        }
    }
    Ok(())
}

fn guess_media_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("m4a" | "mp4") => "audio/mp4",
        Some("webm") => "audio/webm",
        _ => vaani::codec::DEFAULT_MEDIA_TYPE,
    }
}
