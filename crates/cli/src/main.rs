//! Checkout CLI - page rendering and event replay tools.
//!
//! # Usage
//!
//! ```bash
//! # Bootstrap a page from a config file and write the HTML
//! checkout-cli render --config checkout.json --manifest dist/manifest.json --out page.html
//!
//! # Replay a recorded event stream against a checkout state snapshot
//! checkout-cli replay --state state.json --events events.jsonl
//! ```
//!
//! # Commands
//!
//! - `render` - Run the page bootstrap and render the selected view
//! - `replay` - Dispatch recorded checkout events through logging trackers

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::borrow::Cow;
use std::path::PathBuf;
use std::process::ExitCode;

use checkout_loader::{LoaderConfig, SentrySettings};
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "checkout-cli")]
#[command(author, version, about = "Checkout analytics CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bootstrap a checkout page and render the selected view
    Render {
        /// Page configuration JSON file (overrides `CHECKOUT_CONFIG`)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Asset manifest of the app build (overrides `CHECKOUT_MANIFEST_PATH`)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Page title
        #[arg(long, default_value = "Checkout")]
        title: String,
    },
    /// Replay recorded checkout events
    Replay {
        /// Checkout state snapshot (JSON with `data.order`)
        #[arg(short, long)]
        state: PathBuf,

        /// Recorded events, one JSON object per line
        #[arg(short, long)]
        events: PathBuf,
    },
}

impl Cli {
    /// The `--config` page configuration file, if the command takes one.
    fn config_path(&self) -> Option<&std::path::Path> {
        match &self.command {
            Commands::Render { config, .. } => config.as_deref(),
            Commands::Replay { .. } => None,
        }
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &LoaderConfig) -> Option<sentry::ClientInitGuard> {
    let settings = config.sentry_settings()?;
    Some(sentry::init((
        settings.dsn.clone(),
        sentry_client_options(&settings),
    )))
}

fn sentry_client_options(settings: &SentrySettings) -> sentry::ClientOptions {
    sentry::ClientOptions {
        release: settings
            .release
            .clone()
            .map(Cow::Owned)
            .or_else(|| sentry::release_name!()),
        environment: settings.environment.clone().map(Cow::Owned),
        sample_rate: settings.sample_rate.unwrap_or(1.0),
        attach_stacktrace: true,
        ..Default::default()
    }
}

/// Map tracing levels to Sentry: warnings and errors become events, the rest
/// breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "checkout_cli=info,checkout_analytics=info,checkout_loader=info".into()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match LoaderConfig::from_env(cli.config_path()) {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Dropped when main returns, which flushes queued events
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: LoaderConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Render {
            manifest,
            out,
            title,
            ..
        } => {
            let options = commands::render::RenderOptions {
                manifest_path: manifest,
                out,
                title,
            };
            commands::render::run(config, options).await?;
        }
        Commands::Replay { state, events } => {
            commands::replay::run(&state, &events)?;
        }
    }
    Ok(())
}
