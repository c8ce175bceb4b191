use std::io::Cursor;
use tiny_http::Response;

use ferrite_live::{MetricFamily, RefreshRate};

use crate::chart::{html_escape, DisplayMode};
use crate::params::query_prefix;
use crate::render::render_page;
use crate::state::SharedState;

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub fn handle_get(state: &SharedState) -> Response<Cursor<Vec<u8>>> {
    let cfg = state.pipeline.config();
    let log_path = cfg.log_path.display().to_string();
    let rate = cfg.refresh;
    let weight = cfg.default_weight;

    crate::routes::html_response(render_page(|tmpl| {
        tmpl
            .replace("{{LOG_PATH}}", &html_escape(&log_path))
            .replace("{{INTERVAL_OPTIONS}}", &interval_options(rate))
            .replace("{{GRAPH_ACCURACY}}", &div_graph(MetricFamily::Accuracy, weight))
            .replace("{{GRAPH_CROSS_ENTROPY}}", &div_graph(MetricFamily::CrossEntropy, weight))
    }))
}

fn interval_options(selected: RefreshRate) -> String {
    RefreshRate::ALL
        .iter()
        .map(|&r| {
            format!(
                "<option value=\"{}\"{}>{}</option>",
                r.key(),
                if r == selected { " selected" } else { "" },
                r.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Graph panel plus its smoothing and display controls.
fn div_graph(family: MetricFamily, weight: f64) -> String {
    let key = family.key();
    let prefix = query_prefix(family);

    let modes: String = DisplayMode::ALL
        .iter()
        .map(|m| {
            format!(
                r#"<label><input type="radio" name="{prefix}_mode" value="{value}"{checked}> {label}</label>"#,
                prefix = prefix,
                value = m.key(),
                checked = if *m == DisplayMode::default() { " checked" } else { "" },
                label = m.label(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<div class="row graph-row" data-prefix="{prefix}">
          <div id="div-{key}-graph" class="graph"><p class="hint">Waiting for data…</p></div>
          <div class="controls">
            <p class="ctl-title">Smoothing:</p>
            <label><input type="checkbox" name="{prefix}_smooth" value="train"> Training</label>
            <label><input type="checkbox" name="{prefix}_smooth" value="val"> Validation</label>
            <div class="slider">
              <input type="range" name="{prefix}_weight" min="0" max="1" step="0.05" value="{weight}">
              <span class="slider-val">{weight}</span>
            </div>
            <p class="ctl-title">Plot Display mode:</p>
            {modes}
            <div id="div-current-{key}-value" class="current"></div>
          </div>
        </div>"#,
        prefix = prefix,
        key = key,
        weight = weight,
        modes = modes,
    )
}
