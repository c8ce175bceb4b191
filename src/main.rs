//! Headless viewer: prints the current state of a run log once, or follows it.
//!
//! The browser dashboard lives in the `board` binary:
//!   cargo run --bin board -- run_log.csv

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, warn};

use ferrite_live::{
    make_trigger, FamilyCurves, MetricFamily, Pipeline, RefreshRate, Snapshot, TickOutcome,
    TriggerKind, ViewRequest, ViewerConfig,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Print accuracy and loss from a live training log", long_about = None)]
struct Cli {
    /// Run log to read (overrides the config file)
    log: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Smoothing weight in [0, 1]
    #[arg(long)]
    weight: Option<f64>,

    /// Smooth the training curves
    #[arg(long, action)]
    smooth_train: bool,

    /// Smooth the validation curves
    #[arg(long, action)]
    smooth_val: bool,

    /// Print the full snapshot as JSON
    #[arg(long, action)]
    json: bool,

    /// Keep running and print on every refresh
    #[arg(long, action)]
    follow: bool,

    /// fast | regular | slow | no
    #[arg(long)]
    rate: Option<RefreshRate>,

    /// interval | change
    #[arg(long)]
    trigger: Option<TriggerKind>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ViewerConfig::load_or_default(cli.config.as_deref())
        .context("failed to read config file")?;
    if let Some(log) = cli.log.clone() {
        config.log_path = log;
    }
    if let Some(w) = cli.weight {
        config.default_weight = w;
    }
    if let Some(rate) = cli.rate {
        config.refresh = rate;
    }
    if let Some(trigger) = cli.trigger {
        config.trigger = trigger;
    }

    let pipeline = Pipeline::new(config)?;
    let mut request = pipeline.default_request();
    for family in MetricFamily::ALL {
        let opts = request.options_mut(family);
        opts.train = cli.smooth_train;
        opts.val = cli.smooth_val;
    }

    if !cli.follow {
        let outcome = pipeline.tick(&request)?;
        print_outcome(&outcome, &request, cli.json)?;
        return Ok(());
    }

    let cfg = pipeline.config();
    let mut trigger = make_trigger(cfg.trigger, cfg.refresh, pipeline.log_path());
    loop {
        if !trigger.ready(Instant::now()) {
            std::thread::sleep(trigger.idle());
            continue;
        }
        match pipeline.tick(&request) {
            Ok(outcome) => print_outcome(&outcome, &request, cli.json)?,
            // The writer may be mid-row; the next tick usually recovers.
            Err(e) => error!("tick failed: {e}"),
        }
    }
}

fn print_outcome(outcome: &TickOutcome, request: &ViewRequest, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(outcome)?);
        return Ok(());
    }
    match outcome {
        TickOutcome::NoData { reason } => warn!("{}", reason.message()),
        TickOutcome::Ready(snapshot) => print_snapshot(snapshot, request),
    }
    Ok(())
}

fn print_snapshot(snapshot: &Snapshot, request: &ViewRequest) {
    let step = snapshot.latest_step.map(|s| s.to_string()).unwrap_or_else(|| "-".into());
    println!("Step: {}  ({} rows)", step, snapshot.rows);
    for family in MetricFamily::ALL {
        let curves = snapshot.family(family);
        println!("{:<20} {}", curves.title, current_line(curves, request.options(family).weight));
    }
}

fn current_line(curves: &FamilyCurves, weight: f64) -> String {
    let Some((train, val)) = curves.latest else {
        return "-".into();
    };
    let mut line = format!("Training: {:.4}  Validation: {:.4}", train, val);
    if curves.train_smoothed || curves.val_smoothed {
        let last = |v: &[f64]| v.last().map(|x| format!("{:.4}", x)).unwrap_or_default();
        line.push_str(&format!(
            "  [smoothed w={:.2}: {} / {}]",
            weight,
            if curves.train_smoothed { last(&curves.train) } else { "-".into() },
            if curves.val_smoothed { last(&curves.val) } else { "-".into() },
        ));
    }
    line
}
