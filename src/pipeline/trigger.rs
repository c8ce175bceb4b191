use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant, SystemTime};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;
use crate::pipeline::refresh::RefreshRate;

/// How often a [`ChangeTrigger`] looks at the log's metadata.
pub const CHANGE_POLL: Duration = Duration::from_millis(200);

/// Decides when the next tick runs.
///
/// Callers loop: `if trigger.ready(Instant::now()) { tick } else { sleep(trigger.idle()) }`.
pub trait RefreshTrigger: Send {
    /// Returns `true` when a tick should run now. The first call always fires.
    fn ready(&mut self, now: Instant) -> bool;

    /// How long the caller may sleep before asking again.
    fn idle(&self) -> Duration;
}

/// Which [`RefreshTrigger`] strategy to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// Fixed-interval polling.
    #[default]
    Interval,
    /// Tick only when the log's size or modification time changes.
    Change,
}

impl FromStr for TriggerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interval" | "poll" => Ok(TriggerKind::Interval),
            "change" | "watch" => Ok(TriggerKind::Change),
            other => Err(Error::Config(format!("unknown trigger '{other}'"))),
        }
    }
}

/// Builds the trigger for `kind`.
///
/// A change trigger ignores `rate` except for [`RefreshRate::Paused`], which
/// always gets the once-a-day interval so "no updates" holds while the file grows.
pub fn make_trigger(kind: TriggerKind, rate: RefreshRate, path: &Path) -> Box<dyn RefreshTrigger> {
    match (kind, rate) {
        (TriggerKind::Change, RefreshRate::Paused) | (TriggerKind::Interval, _) => {
            Box::new(IntervalTrigger::new(rate.interval()))
        }
        (TriggerKind::Change, _) => Box::new(ChangeTrigger::new(path, CHANGE_POLL)),
    }
}

// ---------------------------------------------------------------------------
// Interval
// ---------------------------------------------------------------------------

pub struct IntervalTrigger {
    interval: Duration,
    last_fired: Option<Instant>,
}

impl IntervalTrigger {
    pub fn new(interval: Duration) -> Self {
        IntervalTrigger { interval, last_fired: None }
    }
}

impl RefreshTrigger for IntervalTrigger {
    fn ready(&mut self, now: Instant) -> bool {
        let due = match self.last_fired {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if due {
            self.last_fired = Some(now);
        }
        due
    }

    fn idle(&self) -> Duration {
        // Never sleep longer than half a second so keep-alives stay timely.
        self.interval.min(Duration::from_millis(500))
    }
}

// ---------------------------------------------------------------------------
// File change
// ---------------------------------------------------------------------------

/// Size and modification time of the log; `None` while the file is absent.
type FileStamp = Option<(u64, Option<SystemTime>)>;

pub struct ChangeTrigger {
    path: PathBuf,
    poll: Duration,
    last_checked: Option<Instant>,
    last_stamp: FileStamp,
}

impl ChangeTrigger {
    pub fn new(path: impl Into<PathBuf>, poll: Duration) -> Self {
        ChangeTrigger {
            path: path.into(),
            poll,
            last_checked: None,
            last_stamp: None,
        }
    }

    fn stamp(&self) -> FileStamp {
        fs::metadata(&self.path)
            .ok()
            .map(|m| (m.len(), m.modified().ok()))
    }
}

impl RefreshTrigger for ChangeTrigger {
    fn ready(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_checked {
            if now.saturating_duration_since(last) < self.poll {
                return false;
            }
        }

        let first = self.last_checked.is_none();
        self.last_checked = Some(now);

        let stamp = self.stamp();
        let changed = stamp != self.last_stamp;
        if changed && !first {
            debug!(path = %self.path.display(), "run log changed");
        }
        self.last_stamp = stamp;
        first || changed
    }

    fn idle(&self) -> Duration {
        self.poll
    }
}
