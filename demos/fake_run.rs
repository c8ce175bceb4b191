/// Stand-in for a training process: appends noisy but improving metrics to a
/// run log so the board has something to show.
///
/// Run with:
///   cargo run --bin fake-run -- run_log.csv --delay-ms 200
/// and, in another terminal:
///   cargo run --bin board -- run_log.csv

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;

#[derive(Parser, Debug)]
#[command(author, version, about = "Append fake training metrics to a CSV run log", long_about = None)]
struct Args {
    /// Log file to append to
    #[arg(default_value = "run_log.csv")]
    path: PathBuf,

    /// Number of steps to write
    #[arg(long, default_value_t = 1_000_000)]
    steps: u64,

    /// Pause between rows, in milliseconds
    #[arg(long, default_value_t = 100)]
    delay_ms: u64,

    /// Append to an existing log, continuing after its last step
    #[arg(long, action)]
    keep: bool,
}

/// First step to write when appending to the log at `path`.
fn resume_step(path: &Path) -> Result<u64> {
    match ferrite_live::load(path) {
        Ok(table) => Ok(table.last().map_or(0, |r| r.step + 1)),
        Err(e) if e.is_no_data() => Ok(0),
        Err(e) => Err(e).with_context(|| format!("cannot resume from {}", path.display())),
    }
}

/// Accuracy climbs towards ~0.95 and cross-entropy decays towards ~0.1.
fn fake_row<R: Rng>(rng: &mut R, step: u64) -> String {
    let progress = 1.0 - (-(step as f64) / 400.0).exp();
    let mut noise = |scale: f64| rng.gen_range(-scale..=scale);

    let train_acc = (0.1 + 0.85 * progress + noise(0.03)).clamp(0.0, 1.0);
    let val_acc = (0.1 + 0.80 * progress + noise(0.05)).clamp(0.0, 1.0);
    let train_ce = (2.3 * (1.0 - progress) + 0.10 + noise(0.05)).max(0.0);
    let val_ce = (2.3 * (1.0 - progress) + 0.18 + noise(0.08)).max(0.0);

    format!("{},{:.6},{:.6},{:.6},{:.6}\n", step, train_acc, val_acc, train_ce, val_ce)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let start = if args.keep {
        resume_step(&args.path)?
    } else {
        match fs::remove_file(&args.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e).with_context(|| format!("cannot remove {}", args.path.display())),
        }
        0
    };

    let mut rng = rand::thread_rng();
    for step in start..start + args.steps {
        // Reopen per row so readers always see whole, flushed lines.
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&args.path)
            .with_context(|| format!("cannot open {}", args.path.display()))?;
        file.write_all(fake_row(&mut rng, step).as_bytes())?;
        println!("{}", step);

        thread::sleep(Duration::from_millis(args.delay_ms));
    }

    Ok(())
}
