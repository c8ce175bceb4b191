/// ferrite-live Board
///
/// Browser dashboard for a live training run. Polls the CSV run log written
/// by the training process and streams accuracy and cross-entropy charts over
/// Server-Sent Events. Served by a synchronous tiny_http server.
///
/// Run with:
///   cargo run --bin board --release -- path/to/run_log.csv
/// Then open http://127.0.0.1:8050

mod chart;
mod handlers;
mod params;
mod render;
mod routes;
mod state;
mod util;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tiny_http::Server;
use tracing::info;

use ferrite_live::{RefreshRate, TriggerKind, ViewerConfig};
use state::BoardState;

#[derive(Parser, Debug)]
#[command(author, version, about = "Live training-log dashboard", long_about = None)]
struct Args {
    /// Run log to watch (overrides the config file)
    log: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind, e.g. 0.0.0.0:8050
    #[arg(long)]
    addr: Option<String>,

    /// Initial refresh rate: fast | regular | slow | no
    #[arg(long)]
    rate: Option<RefreshRate>,

    /// interval | change
    #[arg(long)]
    trigger: Option<TriggerKind>,

    /// Initial smoothing slider value
    #[arg(long)]
    weight: Option<f64>,
}

impl Args {
    fn into_config(self) -> Result<ViewerConfig> {
        let mut config = ViewerConfig::load_or_default(self.config.as_deref())
            .context("failed to read config file")?;
        if let Some(log) = self.log {
            config.log_path = log;
        }
        if let Some(addr) = self.addr {
            config.addr = addr;
        }
        if let Some(rate) = self.rate {
            config.refresh = rate;
        }
        if let Some(trigger) = self.trigger {
            config.trigger = trigger;
        }
        if let Some(weight) = self.weight {
            config.default_weight = weight;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Args::parse().into_config()?;
    let addr = config.addr.clone();
    let shared_state = Arc::new(BoardState::new(config)?);

    let server = Server::http(&addr).map_err(|e| anyhow!("failed to bind {}: {}", addr, e))?;

    let cfg = shared_state.pipeline.config();
    info!(
        log = %cfg.log_path.display(),
        refresh = %cfg.refresh,
        trigger = ?cfg.trigger,
        "board listening on http://{}",
        addr
    );

    // One thread per request: an SSE stream blocks its thread for as long as
    // the browser keeps the page open.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }

    Ok(())
}
