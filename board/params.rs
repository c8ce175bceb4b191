use ferrite_live::curve::validate_weight;
use ferrite_live::{MetricFamily, Pipeline, RefreshRate, ViewRequest};

use crate::chart::DisplayMode;
use crate::util::form::{parse_query, query_get};

/// View controls carried in the query string of `/api/snapshot` and `/events`.
///
/// Keys: `rate`, and per family (`acc_` / `ce_` prefix) `smooth`
/// (comma list of `train`, `val`), `weight` and `mode`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewParams {
    pub rate: RefreshRate,
    pub request: ViewRequest,
    pub accuracy_mode: DisplayMode,
    pub cross_entropy_mode: DisplayMode,
}

pub fn query_prefix(family: MetricFamily) -> &'static str {
    match family {
        MetricFamily::Accuracy     => "acc",
        MetricFamily::CrossEntropy => "ce",
    }
}

impl ViewParams {
    /// Parses `query`, falling back to the pipeline's configured defaults.
    /// Returns a user-facing message on invalid input.
    pub fn from_query(query: &str, pipeline: &Pipeline) -> Result<Self, String> {
        let pairs = parse_query(query);

        let rate = match query_get(&pairs, "rate") {
            Some(r) => r.parse::<RefreshRate>().map_err(|e| format!("{e}"))?,
            None => pipeline.config().refresh,
        };

        let mut params = ViewParams {
            rate,
            request: pipeline.default_request(),
            accuracy_mode: DisplayMode::default(),
            cross_entropy_mode: DisplayMode::default(),
        };

        for family in MetricFamily::ALL {
            let prefix = query_prefix(family);
            let opts = params.request.options_mut(family);

            if let Some(list) = query_get(&pairs, &format!("{prefix}_smooth")) {
                for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    match item {
                        "train" => opts.train = true,
                        "val" => opts.val = true,
                        other => return Err(format!("unknown curve '{other}' in {prefix}_smooth")),
                    }
                }
            }

            if let Some(w) = query_get(&pairs, &format!("{prefix}_weight")) {
                let w: f64 = w.trim().parse().map_err(|_| format!("{prefix}_weight '{w}' is not a number"))?;
                opts.weight = validate_weight(w).map_err(|e| e.to_string())?;
            }

            if let Some(m) = query_get(&pairs, &format!("{prefix}_mode")) {
                let mode: DisplayMode = m.parse()?;
                match family {
                    MetricFamily::Accuracy     => params.accuracy_mode = mode,
                    MetricFamily::CrossEntropy => params.cross_entropy_mode = mode,
                }
            }
        }

        Ok(params)
    }

    pub fn mode(&self, family: MetricFamily) -> DisplayMode {
        match family {
            MetricFamily::Accuracy     => self.accuracy_mode,
            MetricFamily::CrossEntropy => self.cross_entropy_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrite_live::ViewerConfig;

    fn pipeline() -> Pipeline {
        Pipeline::new(ViewerConfig::default()).unwrap()
    }

    #[test]
    fn empty_query_uses_defaults() {
        let p = ViewParams::from_query("", &pipeline()).unwrap();
        assert_eq!(p.rate, RefreshRate::Regular);
        assert_eq!(p.request, pipeline().default_request());
        assert_eq!(p.accuracy_mode, DisplayMode::Overlap);
    }

    #[test]
    fn full_query() {
        let q = "rate=fast&acc_smooth=train%2Cval&acc_weight=0.8&ce_smooth=val&ce_mode=separate_horizontal";
        let p = ViewParams::from_query(q, &pipeline()).unwrap();
        assert_eq!(p.rate, RefreshRate::Fast);
        assert!(p.request.accuracy.train && p.request.accuracy.val);
        assert_eq!(p.request.accuracy.weight, 0.8);
        assert!(!p.request.cross_entropy.train && p.request.cross_entropy.val);
        assert_eq!(p.request.cross_entropy.weight, 0.6);
        assert_eq!(p.mode(MetricFamily::CrossEntropy), DisplayMode::SeparateHorizontal);
        assert_eq!(p.mode(MetricFamily::Accuracy), DisplayMode::Overlap);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(ViewParams::from_query("rate=hourly", &pipeline()).is_err());
        assert!(ViewParams::from_query("acc_weight=1.5", &pipeline()).is_err());
        assert!(ViewParams::from_query("acc_weight=abc", &pipeline()).is_err());
        assert!(ViewParams::from_query("ce_smooth=test", &pipeline()).is_err());
        assert!(ViewParams::from_query("ce_mode=stacked", &pipeline()).is_err());
    }
}
