/// Server-side SVG charts for the dashboard.
///
/// Each metric family is drawn in one of three layouts over the same series:
/// - `Overlap`: train and val share one plot
/// - `SeparateVertical`: two plots stacked (2 rows × 1 col)
/// - `SeparateHorizontal`: two plots side by side (1 row × 2 cols)

use std::str::FromStr;

use ferrite_live::FamilyCurves;

const TRAIN_COLOR: &str = "#dc2626";
const VAL_COLOR:   &str = "#1e40af";
const GRID_COLOR:  &str = "#f0f2f5";
const AXIS_TEXT:   &str = "#999";
const DARK_TEXT:   &str = "#333";

const FULL_W: f64 = 760.0;
const FULL_H: f64 = 260.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Overlap,
    SeparateVertical,
    SeparateHorizontal,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 3] = [
        DisplayMode::Overlap,
        DisplayMode::SeparateVertical,
        DisplayMode::SeparateHorizontal,
    ];

    pub fn key(self) -> &'static str {
        match self {
            DisplayMode::Overlap            => "overlap",
            DisplayMode::SeparateVertical   => "separate_vertical",
            DisplayMode::SeparateHorizontal => "separate_horizontal",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Overlap            => "Overlapping",
            DisplayMode::SeparateVertical   => "Separate (Vertical)",
            DisplayMode::SeparateHorizontal => "Separate (Horizontal)",
        }
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DisplayMode::ALL
            .into_iter()
            .find(|m| m.key() == s.trim())
            .ok_or_else(|| format!("unknown display mode '{s}'"))
    }
}

/// One line of a plot.
struct Trace<'a> {
    name: String,
    color: &'static str,
    dashed: bool,
    values: &'a [f64],
}

/// Plot area in SVG user units.
#[derive(Clone, Copy)]
struct Panel {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

/// Renders the chart for one family, or a hint if there is too little data.
pub fn render_family(curves: &FamilyCurves, mode: DisplayMode) -> String {
    if curves.step.len() < 2 {
        return "<p class=\"hint\">Not enough data to draw a curve.</p>".into();
    }

    let train = Trace {
        name: trace_name("Training", curves.train_smoothed),
        color: TRAIN_COLOR,
        dashed: false,
        values: &curves.train,
    };
    let val = Trace {
        name: trace_name("Validation", curves.val_smoothed),
        color: VAL_COLOR,
        dashed: true,
        values: &curves.val,
    };

    let (w, h, body) = match mode {
        DisplayMode::Overlap => {
            let panel = Panel { x: 0.0, y: 0.0, w: FULL_W, h: FULL_H };
            (FULL_W, FULL_H, draw_panel(panel, &curves.step, &[train, val]))
        }
        DisplayMode::SeparateVertical => {
            let half = FULL_H * 0.75;
            let top    = Panel { x: 0.0, y: 0.0,  w: FULL_W, h: half };
            let bottom = Panel { x: 0.0, y: half, w: FULL_W, h: half };
            let body = draw_panel(top, &curves.step, &[train]) + &draw_panel(bottom, &curves.step, &[val]);
            (FULL_W, half * 2.0, body)
        }
        DisplayMode::SeparateHorizontal => {
            let half = FULL_W / 2.0;
            let left  = Panel { x: 0.0,  y: 0.0, w: half, h: FULL_H };
            let right = Panel { x: half, y: 0.0, w: half, h: FULL_H };
            let body = draw_panel(left, &curves.step, &[train]) + &draw_panel(right, &curves.step, &[val]);
            (FULL_W, FULL_H, body)
        }
    };

    format!(
        "<svg class=\"curve-svg\" viewBox=\"0 0 {w} {h}\" width=\"{w}\" height=\"{h}\" xmlns=\"http://www.w3.org/2000/svg\">\n\
         <title>{title}</title>\n{body}</svg>",
        w = w,
        h = h,
        title = html_escape(&curves.title),
        body = body,
    )
}

fn trace_name(base: &str, smoothed: bool) -> String {
    if smoothed { format!("{base} (smoothed)") } else { base.to_owned() }
}

fn draw_panel(panel: Panel, steps: &[u64], traces: &[Trace<'_>]) -> String {
    let pad_l = 60.0;
    let pad_r = 16.0;
    let pad_t = 24.0;
    let pad_b = 30.0;

    // Step order is not guaranteed (a restarted writer counts from 0 again).
    let (x_min, x_max) = steps
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| (lo.min(s as f64), hi.max(s as f64)));
    let x_span = if x_max > x_min { x_max - x_min } else { 1.0 };

    let (mut y_min, mut y_max) = traces
        .iter()
        .flat_map(|t| t.values.iter().copied())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !y_min.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    }
    let margin = if y_max > y_min { (y_max - y_min) * 0.05 } else { y_min.abs().max(1.0) * 0.5 };
    y_min -= margin;
    y_max += margin;

    let plot_w = panel.w - pad_l - pad_r;
    let plot_h = panel.h - pad_t - pad_b;
    let px = |step: u64, v: f64| -> (f64, f64) {
        let x = panel.x + pad_l + (step as f64 - x_min) / x_span * plot_w;
        let y = panel.y + pad_t + (y_max - v) / (y_max - y_min) * plot_h;
        (x, y)
    };

    let mut out = String::new();

    // Y grid and labels.
    for g in 0..=4 {
        let frac = g as f64 / 4.0;
        let val = y_min + (y_max - y_min) * frac;
        let y = panel.y + pad_t + (1.0 - frac) * plot_h;
        out.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" fill=\"{}\" font-size=\"10\">{:.3}</text>\n\
             <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"1\"/>\n",
            panel.x + pad_l - 4.0, y + 4.0, AXIS_TEXT, val,
            panel.x + pad_l, y, panel.x + panel.w - pad_r, y, GRID_COLOR,
        ));
    }

    // X labels: lowest, middle, highest step.
    let x_mid = (x_min + x_max) / 2.0;
    for step in [x_min, x_mid, x_max].map(|s| s.round() as u64) {
        let (x, _) = px(step, y_min);
        out.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"{}\" font-size=\"10\">{}</text>\n",
            x, panel.y + panel.h - 6.0, AXIS_TEXT, step,
        ));
    }

    // Lines and legend.
    let mut legend_x = panel.x + pad_l;
    for trace in traces {
        let path: String = steps
            .iter()
            .zip(trace.values.iter())
            .filter(|(_, v)| v.is_finite())
            .enumerate()
            .map(|(i, (&s, &v))| {
                let (x, y) = px(s, v);
                if i == 0 { format!("M{:.1},{:.1}", x, y) } else { format!(" L{:.1},{:.1}", x, y) }
            })
            .collect();
        let dash = if trace.dashed { " stroke-dasharray=\"5,4\"" } else { "" };
        out.push_str(&format!(
            "<path d=\"{}\" stroke=\"{}\" stroke-width=\"2\" fill=\"none\"{}/>\n",
            path, trace.color, dash,
        ));
        out.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"2\"{}/>\n\
             <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"11\">{}</text>\n",
            legend_x, panel.y + 10.0, legend_x + 18.0, panel.y + 10.0, trace.color, dash,
            legend_x + 22.0, panel.y + 14.0, DARK_TEXT, html_escape(&trace.name),
        ));
        legend_x += 150.0;
    }

    out
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
     .replace('<', "&lt;")
     .replace('>', "&gt;")
     .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrite_live::{family_curves, parse_log, MetricFamily, SmoothingOptions};

    fn curves(text: &str, smooth_val: bool) -> FamilyCurves {
        let table = parse_log(text).unwrap();
        let opts = SmoothingOptions { val: smooth_val, ..SmoothingOptions::default() };
        family_curves(&table, MetricFamily::Accuracy, &opts).unwrap()
    }

    const LOG: &str = "0,0.1,0.2,1.0,1.1\n1,0.3,0.4,0.9,1.0\n2,0.5,0.6,0.8,0.9\n";

    #[test]
    fn single_point_renders_hint() {
        let out = render_family(&curves("0,0.1,0.2,1.0,1.1\n", false), DisplayMode::Overlap);
        assert!(out.contains("Not enough data"));
    }

    #[test]
    fn overlap_draws_both_traces_in_one_panel() {
        let out = render_family(&curves(LOG, false), DisplayMode::Overlap);
        assert!(out.starts_with("<svg"));
        assert_eq!(out.matches("<path ").count(), 2);
        assert!(out.contains("Training") && out.contains("Validation"));
        assert!(out.contains("height=\"260\""));
    }

    #[test]
    fn separate_layouts_differ_in_geometry() {
        let c = curves(LOG, false);
        let vertical = render_family(&c, DisplayMode::SeparateVertical);
        let horizontal = render_family(&c, DisplayMode::SeparateHorizontal);
        assert_eq!(vertical.matches("<path ").count(), 2);
        assert_eq!(horizontal.matches("<path ").count(), 2);
        assert!(vertical.contains("height=\"390\""));
        assert!(horizontal.contains("height=\"260\""));
        assert_ne!(vertical, horizontal);
    }

    #[test]
    fn smoothed_traces_are_labelled() {
        let out = render_family(&curves(LOG, true), DisplayMode::Overlap);
        assert!(out.contains("Validation (smoothed)"));
        assert!(!out.contains("Training (smoothed)"));
    }

    #[test]
    fn flat_series_still_renders() {
        let out = render_family(&curves("0,0.5,0.5,1,1\n1,0.5,0.5,1,1\n", false), DisplayMode::Overlap);
        assert!(!out.contains("NaN"));
    }

    fn path_xs(svg: &str) -> Vec<f64> {
        svg.split("<path d=\"")
            .skip(1)
            .flat_map(|rest| {
                let d = &rest[..rest.find('"').unwrap()];
                d.split(|c| c == 'M' || c == 'L')
                    .filter_map(|pt| pt.trim().split(',').next()?.parse::<f64>().ok())
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    #[test]
    fn restarted_steps_stay_inside_the_plot() {
        let log = "0,0.1,0.2,1,1\n1,0.2,0.3,1,1\n2,0.3,0.4,1,1\n3,0.4,0.5,1,1\n0,0.5,0.6,1,1\n1,0.6,0.7,1,1\n";
        let c = curves(log, false);
        for mode in DisplayMode::ALL {
            let xs = path_xs(&render_family(&c, mode));
            assert_eq!(xs.len(), 12, "{mode:?}");
            assert!(xs.iter().all(|&x| (0.0..=FULL_W).contains(&x)), "{mode:?}: {xs:?}");
        }
    }

    #[test]
    fn display_mode_keys_parse() {
        for m in DisplayMode::ALL {
            assert_eq!(m.key().parse::<DisplayMode>().unwrap(), m);
        }
        assert!("stacked".parse::<DisplayMode>().is_err());
    }
}
