use std::io::Write;
use std::time::{Duration, Instant};

use serde::Serialize;
use tiny_http::Request;
use tracing::{debug, error, info, warn};

use ferrite_live::{make_trigger, FamilyCurves, MetricFamily, NoDataReason, Snapshot, TickOutcome};

use crate::chart::render_family;
use crate::params::ViewParams;
use crate::state::SharedState;
use crate::util::sse::{format_sse_event, format_sse_keepalive, write_sse, SSE_RESPONSE_HEAD};

/// Idle time after which a keep-alive comment is sent.
const KEEPALIVE: Duration = Duration::from_secs(15);

/// One rendered chart panel in a `tick` event.
#[derive(Debug, Serialize)]
pub struct PanelFrame {
    pub key: &'static str,
    pub chart: String,
    pub current: String,
}

/// Payload of a `tick` event.
#[derive(Debug, Serialize)]
pub struct TickFrame {
    pub rows: usize,
    pub step: Option<u64>,
    pub panels: Vec<PanelFrame>,
}

impl TickFrame {
    pub fn build(snapshot: &Snapshot, params: &ViewParams) -> Self {
        let panels = MetricFamily::ALL
            .iter()
            .map(|&family| {
                let curves = snapshot.family(family);
                PanelFrame {
                    key: family.key(),
                    chart: render_family(curves, params.mode(family)),
                    current: current_value_html(family, curves),
                }
            })
            .collect();
        TickFrame { rows: snapshot.rows, step: snapshot.latest_step, panels }
    }
}

fn current_value_html(family: MetricFamily, curves: &FamilyCurves) -> String {
    let title = match family {
        MetricFamily::Accuracy     => "Current Accuracy:",
        MetricFamily::CrossEntropy => "Current Loss:",
    };
    match curves.latest {
        Some((train, val)) => format!(
            "<p class=\"ctl-title\">{}</p><div>Training: {:.4}</div><div>Validation: {:.4}</div>",
            title, train, val
        ),
        None => String::new(),
    }
}

/// Stream state used to log transitions once rather than every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
enum StreamStatus {
    Ready,
    NoData(NoDataReason),
    Failed,
}

/// Renders one tick into an SSE frame.
fn tick_event(state: &SharedState, params: &ViewParams) -> (StreamStatus, String) {
    match state.pipeline.tick(&params.request) {
        Ok(TickOutcome::Ready(snapshot)) => {
            let frame = TickFrame::build(&snapshot, params);
            match serde_json::to_string(&frame) {
                Ok(json) => (StreamStatus::Ready, format_sse_event("tick", &json)),
                Err(e) => (StreamStatus::Failed, error_event(&e.to_string())),
            }
        }
        Ok(TickOutcome::NoData { reason }) => {
            let json = serde_json::json!({ "reason": reason, "message": reason.message() });
            (StreamStatus::NoData(reason), format_sse_event("nodata", &json.to_string()))
        }
        Err(e) => (StreamStatus::Failed, error_event(&e.to_string())),
    }
}

fn error_event(message: &str) -> String {
    format_sse_event("error", &serde_json::json!({ "message": message }).to_string())
}

/// `GET /events`: Server-Sent Events handler.
///
/// Takes ownership of `request` to write over the raw connection, then loops:
/// 1. When the refresh trigger fires, runs one tick and writes a `tick`,
///    `nodata` or `error` frame.
/// 2. Otherwise sleeps for the trigger's idle time, sending `: ping` after
///    15 s of silence.
/// 3. Returns as soon as a write fails (client disconnected).
///
/// Errors do not end the stream; the next tick may succeed once the writer
/// finishes its row.
pub fn handle(request: Request, query: &str, state: SharedState) {
    let params = ViewParams::from_query(query, &state.pipeline);
    let mut writer = request.into_writer();

    if write_sse(&mut writer, SSE_RESPONSE_HEAD).is_err() {
        return;
    }

    let params = match params {
        Ok(p) => p,
        Err(msg) => {
            let _ = write_sse(&mut writer, &error_event(&msg));
            return;
        }
    };

    let cfg = state.pipeline.config();
    let mut trigger = make_trigger(cfg.trigger, params.rate, state.pipeline.log_path());
    info!(rate = %params.rate, trigger = ?cfg.trigger, "event stream opened");

    stream(&mut writer, &state, &params, trigger.as_mut());
    debug!("event stream closed");
}

fn stream<W: Write>(
    writer: &mut W,
    state: &SharedState,
    params: &ViewParams,
    trigger: &mut dyn ferrite_live::RefreshTrigger,
) {
    let mut last_status: Option<StreamStatus> = None;
    let mut last_write = Instant::now();

    loop {
        let now = Instant::now();

        if trigger.ready(now) {
            let (status, msg) = tick_event(state, params);
            if last_status != Some(status) {
                match status {
                    StreamStatus::NoData(reason) => warn!("{}", reason.message()),
                    StreamStatus::Failed => error!("tick failed; showing placeholder"),
                    StreamStatus::Ready => info!("run log data available"),
                }
                last_status = Some(status);
            }
            if write_sse(writer, &msg).is_err() {
                return;
            }
            last_write = now;
            continue;
        }

        if now.saturating_duration_since(last_write) >= KEEPALIVE {
            if write_sse(writer, format_sse_keepalive()).is_err() {
                return;
            }
            last_write = now;
        }
        std::thread::sleep(trigger.idle());
    }
}
