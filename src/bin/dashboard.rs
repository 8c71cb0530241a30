//! safepath-dashboard binary
//!
//! Polls the SafePath Shield backend and keeps the plan summary, the map
//! and the room zones current. Also exposes the one-shot operator actions.
//!
//! ## Configuration (file / env via `config` crate, flags on top)
//!
//! | Key                          | Default                 | Description                    |
//! |------------------------------|-------------------------|--------------------------------|
//! | `SAFEPATH_BASE_URL`          | `http://127.0.0.1:8000` | Backend origin                 |
//! | `SAFEPATH_POLL_INTERVAL_MS`  | `1000`                  | Period of both poll loops      |
//! | `SAFEPATH_REQUEST_TIMEOUT_MS`| `5000`                  | Per-request timeout            |
//! | `SAFEPATH_SVG_OUT`           | unset                   | Write the map here as SVG      |
//! | `SAFEPATH_PROFILE_PATH`      | `<config dir>/safepath/operator.json` | Operator profile |

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use safepath_dashboard::{
    gateway::HttpGateway,
    override_ctl::OverrideController,
    profile::OperatorProfile,
    scheduler::PollScheduler,
    service::DashboardService,
    settings::load_config,
    topology::Topology,
    types::DashboardConfig,
    uploads::{upload, UploadTarget},
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "safepath-dashboard", about = "SafePath Shield live dashboard", version)]
struct Args {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, global = true, env = "SAFEPATH_CONFIG")]
    config: Option<PathBuf>,

    /// Backend origin, e.g. http://127.0.0.1:8000
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Poll interval in milliseconds
    #[arg(long, global = true)]
    poll_interval_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run both poll loops until Ctrl-C (default)
    Run {
        /// Log the rendered summaries every N seconds (0 disables)
        #[arg(long, default_value_t = 5)]
        report_secs: u64,
    },
    /// Submit an operator hazard override and print the resulting plan
    Override {
        /// Comma-separated node ids, e.g. "X1, H2". Empty clears all hazards.
        #[arg(long, default_value = "")]
        hazards: String,
    },
    /// Upload a floorplan image (PNG/JPG)
    UploadFloorplan { file: PathBuf },
    /// Upload a 3D building layout image (PNG/JPG)
    #[command(name = "upload-3d")]
    Upload3d { file: PathBuf },
    /// Operator display name
    Operator {
        #[command(subcommand)]
        action: OperatorAction,
    },
}

#[derive(Subcommand, Debug)]
enum OperatorAction {
    /// Set (or with an empty name, clear) the display name
    Set { name: String },
    /// Print the current display name
    Show,
}

impl Args {
    fn resolve_config(&self) -> Result<DashboardConfig> {
        let mut config = load_config(self.config.as_deref()).context("loading configuration")?;
        if let Some(url) = &self.base_url {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(ms) = self.poll_interval_ms {
            config.poll_interval_ms = ms;
        }
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("safepath_dashboard=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = args.resolve_config()?;
    let profile_path = config
        .profile_path
        .clone()
        .unwrap_or_else(OperatorProfile::default_path);

    match args.command.unwrap_or(Command::Run { report_secs: 5 }) {
        Command::Run { report_secs } => run(&config, profile_path, report_secs).await,
        Command::Override { hazards } => {
            let service = Arc::new(build_service(&config)?);
            let controller = OverrideController::new(service.clone());
            let receipt = controller
                .submit(&hazards)
                .await
                .context("override request failed")?;
            info!("Override {:?} -> {:?}", receipt.hazards, receipt.outcome);
            println!("{}", service.plan_view().lock().summary.text());
            Ok(())
        }
        Command::UploadFloorplan { file } => {
            upload_one(&config, UploadTarget::Floorplan, file).await
        }
        Command::Upload3d { file } => upload_one(&config, UploadTarget::Layout3d, file).await,
        Command::Operator { action } => {
            let mut profile = OperatorProfile::load(&profile_path)
                .with_context(|| format!("reading {}", profile_path.display()))?;
            if let OperatorAction::Set { name } = action {
                profile.set_display_name(&name);
                profile
                    .save(&profile_path)
                    .with_context(|| format!("writing {}", profile_path.display()))?;
            }
            println!("{}", profile.greeting());
            Ok(())
        }
    }
}

fn build_service(config: &DashboardConfig) -> Result<DashboardService<HttpGateway>> {
    let gateway = HttpGateway::from_config(config).context("building HTTP client")?;
    Ok(DashboardService::new(gateway, Topology::building()).with_svg_out(config.svg_out.clone()))
}

async fn run(config: &DashboardConfig, profile_path: PathBuf, report_secs: u64) -> Result<()> {
    let profile = match OperatorProfile::load(&profile_path) {
        Ok(p) => p,
        Err(e) => {
            warn!("Ignoring unreadable operator profile {}: {}", profile_path.display(), e);
            OperatorProfile::default()
        }
    };

    info!(
        "Starting safepath-dashboard (backend='{}', interval={}ms) – {}",
        config.base_url,
        config.poll_interval_ms,
        profile.greeting(),
    );

    let service = Arc::new(build_service(config)?);
    let handle = PollScheduler::new(config.poll_interval()).start(service.clone());

    let reporter = (report_secs > 0).then(|| {
        let svc = service.clone();
        tokio::spawn(async move {
            let mut timer = tokio::time::interval(Duration::from_secs(report_secs));
            loop {
                timer.tick().await;
                let plan = svc.plan_view().lock().summary.text();
                let rooms = svc.room_view().lock().summary.text();
                info!("Plan:\n{}\nRoom states:\n{}", plan, rooms);
                info!("Stats: {:?}", svc.stats());
            }
        })
    });

    tokio::signal::ctrl_c().await.context("waiting for Ctrl-C")?;
    info!("Shutdown requested");

    if let Some(task) = reporter {
        task.abort();
    }
    handle.stop().await;
    Ok(())
}

async fn upload_one(config: &DashboardConfig, target: UploadTarget, file: PathBuf) -> Result<()> {
    let gateway = HttpGateway::from_config(config).context("building HTTP client")?;
    let url = upload(&gateway, target, &file)
        .await
        .with_context(|| format!("uploading {}", file.display()))?;
    info!("Upload complete");
    println!("{url}");
    Ok(())
}
