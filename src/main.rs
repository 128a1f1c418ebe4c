use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ativeplay_provider::{Config, ProviderClient, ProviderDescriptor};

#[derive(Parser)]
#[command(name = "ativeplay-provider")]
#[command(about = "List and resolve channels of an IPTV provider")]
#[command(version)]
struct Cli {
    /// Provider descriptor (JSON); refreshed STB sessions are written back
    #[arg(short, long)]
    descriptor: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every channel as `id<TAB>name<TAB>cmd`
    List,
    /// Print the playable URL of a channel
    Resolve {
        /// Channel id as printed by `list`
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ativeplay_provider=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let client = ProviderClient::new(&config)?;

    let descriptor = read_descriptor(&cli.descriptor)?;
    tracing::info!("Provider type: {}", descriptor.kind);

    let listing = client.load_channels(&descriptor).await?;
    if listing.descriptor != descriptor {
        write_descriptor(&cli.descriptor, &listing.descriptor)?;
        tracing::info!("Provider session saved");
    }

    match cli.command {
        Command::List => {
            for channel in &listing.channels {
                println!("{}\t{}\t{}", channel.id, channel.display_name(), channel.cmd);
            }
        }
        Command::Resolve { id } => {
            let Some(channel) = listing.channels.iter().find(|c| c.id == id) else {
                bail!("No channel with id {}", id);
            };
            let url = client
                .resolve_for_playback(&listing.descriptor, channel)
                .await
                .context("Failed to create link")?;
            println!("{}", url);
        }
    }

    Ok(())
}

fn read_descriptor(path: &Path) -> Result<ProviderDescriptor> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid descriptor in {}", path.display()))
}

fn write_descriptor(path: &Path, descriptor: &ProviderDescriptor) -> Result<()> {
    let text = serde_json::to_string_pretty(descriptor)?;
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}
