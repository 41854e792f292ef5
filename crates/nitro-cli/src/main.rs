//! Nitro CLI - upload a GIF avatar to your account.

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use nitro_client::{Config, JsonFileStorage, LocalStorage};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod i18n;
mod terminal;

/// Nitro - GIF avatars for everyone
#[derive(Parser, Debug)]
#[command(name = "nitro")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Config file (default: <config dir>/nitro/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storage file (default: <config dir>/nitro/storage.json)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and remember the access token
    Login {
        /// Account name
        #[arg(short, long)]
        username: String,
        /// Account password
        #[arg(short, long, env = "NITRO_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log out and forget the access token
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Upload a GIF as your avatar
    Upload {
        /// Image to upload
        file: PathBuf,
    },

    /// List languages, or switch the UI language
    Lang {
        /// Language code, e.g. `de`
        code: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("nitro={log_level},nitro_client={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let storage: Arc<dyn LocalStorage> = Arc::new(match cli.storage {
        Some(path) => JsonFileStorage::open(path),
        None => JsonFileStorage::open_default(),
    });

    let mut ctx =
        commands::Context::new(config, storage).context("failed to set up the HTTP client")?;

    // Same startup sequence as opening the window: restore the stored
    // session, silently staying signed out if it is gone.
    if !matches!(cli.command, Commands::Lang { .. }) {
        if let Err(e) = ctx.session.initialize().await {
            tracing::debug!(error = %e, "Starting signed out");
        }
    }

    match cli.command {
        Commands::Login { username, password } => {
            commands::login(&ctx, &username, &password).await?;
        }
        Commands::Logout => commands::logout(&mut ctx).await?,
        Commands::Whoami => commands::whoami(&ctx)?,
        Commands::Upload { file } => commands::upload(&ctx, &file).await?,
        Commands::Lang { code } => commands::lang(&ctx, code.as_deref())?,
    }

    Ok(())
}
