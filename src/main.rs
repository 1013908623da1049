use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use adminwatch::data::units::parse_duration;
use adminwatch::{export, report, DashboardAssembler, DashboardState, Overrides, Settings};

#[derive(Parser, Debug)]
#[command(name = "adminwatch")]
#[command(about = "Poll the admin service dashboard and summarize service and process health")]
struct Args {
    /// Path to a TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Admin service base URL (e.g., "http://localhost:8002")
    #[arg(short, long)]
    base_url: Option<String>,

    /// Bearer access token sent with every request
    #[arg(short, long)]
    token: Option<String>,

    /// Refresh interval (e.g., "30s", "2m"); a bare number is seconds
    #[arg(short, long)]
    interval: Option<String>,

    /// Export the current snapshot to a JSON file and exit
    #[arg(short, long, conflicts_with = "once")]
    export: Option<PathBuf>,

    /// Print a single summary and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so summaries on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("adminwatch=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let poll_interval_secs = match &args.interval {
        Some(interval) => {
            let secs = parse_duration(interval)?.as_secs();
            if secs == 0 {
                bail!("Refresh interval must be at least one second: {}", interval);
            }
            Some(secs)
        }
        None => None,
    };

    let overrides = Overrides {
        base_url: args.base_url.clone(),
        access_token: args.token.clone(),
        poll_interval_secs,
    };
    let settings = Settings::load(args.config.as_deref(), &overrides)?;
    tracing::debug!(?settings, "Loaded settings");

    let assembler = DashboardAssembler::builder(settings.client()?)
        .interval(settings.poll_interval())
        .build();

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        let snapshot = assembler.poll_once().await?;
        export::export_to_file(&snapshot, &export_path)?;
        println!("Exported dashboard snapshot to: {}", export_path.display());
        return Ok(());
    }

    if args.once {
        let snapshot = assembler.poll_once().await?;
        let summary = adminwatch::data::aggregate(&snapshot.service_health);
        let mut out = String::new();
        report::render_snapshot(&mut out, &snapshot, &summary);
        print!("{}", out);
        return Ok(());
    }

    run_polling(assembler).await
}

/// Print a summary after every tick until interrupted.
async fn run_polling(assembler: DashboardAssembler) -> Result<()> {
    let handle = assembler.start();
    let mut updates = handle.subscribe();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state: DashboardState = updates.borrow_and_update().clone();
                println!("{}", report::render(&state));
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}
