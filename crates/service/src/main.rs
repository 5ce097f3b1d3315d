//! thumbmoused - thumb joystick and trackball to HID mouse daemon

#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use thumbmoused::{Daemon, DaemonConfig, ModeKind, RunOptions, SourceKind};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "thumbmoused=info,thumbmouse_scheduler=info";

#[derive(Parser, Debug)]
#[command(name = "thumbmoused")]
#[command(about = "Turn a thumb joystick or trackball into relative mouse reports")]
#[command(version)]
struct Cli {
    /// JSON configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Device family to simulate
    #[arg(long, value_enum, default_value_t = SourceKind::Adc)]
    source: SourceKind,

    /// Override the configured scheduling mode
    #[arg(long, value_enum)]
    mode: Option<ModeKind>,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long)]
    duration_secs: Option<u64>,

    /// Print the default configuration as JSON and exit
    #[arg(long)]
    print_default_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        println!("{}", DaemonConfig::default().to_json_pretty()?);
        return Ok(());
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().with_thread_names(true))
        .init();

    info!("Starting thumbmoused v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => DaemonConfig::load(path).await?,
        None => DaemonConfig::default(),
    };

    let daemon = Daemon::new(
        config,
        RunOptions {
            source: cli.source,
            mode: cli.mode,
        },
    )?;

    let duration = cli.duration_secs.map(Duration::from_secs);
    let shutdown = async move {
        let deadline = async {
            match duration {
                Some(d) => tokio::time::sleep(d).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!(error = %e, "failed to listen for Ctrl-C");
                    deadline.await;
                }
            }
            () = &mut deadline => info!("run duration elapsed"),
        }
    };

    let summary = daemon
        .run_until(shutdown)
        .await
        .context("thumbmoused failed")?;
    info!(profile = summary.profile, "thumbmoused stopped");
    Ok(())
}
