use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use ferrite_live::pipeline::ChangeTrigger;
use ferrite_live::{
    load, select_and_optionally_smooth, smooth, Column, Error, MetricFamily, NoDataReason,
    Pipeline, RefreshTrigger, TickOutcome, ViewRequest, ViewerConfig,
};

const THREE_ROWS: &str = "0,0.1,0.2,1.0,1.1\n1,0.3,0.4,0.9,1.0\n2,0.5,0.6,0.8,0.9\n";

fn pipeline(path: PathBuf) -> Pipeline {
    Pipeline::new(ViewerConfig { log_path: path, ..ViewerConfig::default() }).unwrap()
}

fn round6(v: &[f64]) -> Vec<f64> {
    v.iter().map(|x| (x * 1e6).round() / 1e6).collect()
}

#[test]
fn three_row_log_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run_log.csv");
    std::fs::write(&path, THREE_ROWS).unwrap();

    let table = load(&path).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.steps(), vec![0, 1, 2]);
    assert_eq!(table.column(Column::TrainAccuracy), vec![0.1, 0.3, 0.5]);

    let smoothed = select_and_optionally_smooth(&table, "train accuracy", true, 0.6).unwrap();
    assert_eq!(round6(&smoothed), vec![0.1, 0.18, 0.308]);
}

#[test]
fn smoothing_properties_hold_across_weights() {
    let series = [0.42, 0.1, 0.77, 0.3, 0.3, 0.95, 0.05];
    assert_eq!(smooth(&series, 0.0).unwrap(), series.to_vec());
    for i in 0..=20 {
        let w = i as f64 / 20.0;
        let a = smooth(&series, w).unwrap();
        assert_eq!(a[0], series[0]);
        assert_eq!(a.len(), series.len());
        assert_eq!(a, smooth(&series, w).unwrap());
    }
    assert!(matches!(smooth(&[], 0.3), Err(Error::EmptyInput)));
}

#[test]
fn log_appearing_and_growing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run_log.csv");
    let p = pipeline(path.clone());
    let req = ViewRequest::with_weight(0.6);

    // Writer has not started yet.
    assert_eq!(p.tick(&req).unwrap(), TickOutcome::NoData { reason: NoDataReason::Missing });

    // Writer created the file but has not written a row.
    std::fs::write(&path, "").unwrap();
    assert_eq!(p.tick(&req).unwrap(), TickOutcome::NoData { reason: NoDataReason::Empty });

    let mut f = OpenOptions::new().append(true).open(&path).unwrap();
    f.write_all(THREE_ROWS.as_bytes()).unwrap();
    f.flush().unwrap();

    let TickOutcome::Ready(first) = p.tick(&req).unwrap() else {
        panic!("expected data after three rows");
    };
    assert_eq!(first.latest_step, Some(2));

    f.write_all(b"3,0.7,0.65,0.6,0.75\n").unwrap();
    f.flush().unwrap();

    let TickOutcome::Ready(second) = p.tick(&req).unwrap() else {
        panic!("expected data after append");
    };
    assert_eq!(second.rows, 4);
    assert_eq!(second.family(MetricFamily::Accuracy).latest, Some((0.7, 0.65)));
}

#[test]
fn repeated_ticks_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run_log.csv");
    std::fs::write(&path, THREE_ROWS).unwrap();
    let p = pipeline(path);

    let mut req = ViewRequest::with_weight(0.45);
    req.accuracy.val = true;
    req.cross_entropy.train = true;

    let a = serde_json::to_vec(&p.tick(&req).unwrap()).unwrap();
    let b = serde_json::to_vec(&p.tick(&req).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn garbled_row_fails_the_tick_then_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run_log.csv");
    std::fs::write(&path, "0,0.1,0.2,1.0,1.1\n1,0.3,0.4,0.9,nan?\n").unwrap();
    let p = pipeline(path.clone());
    let req = ViewRequest::default();

    let err = p.tick(&req).unwrap_err();
    assert!(matches!(err, Error::Parse { line: 2, .. }), "got {err:?}");

    std::fs::write(&path, THREE_ROWS).unwrap();
    assert!(matches!(p.tick(&req).unwrap(), TickOutcome::Ready(_)));
}

#[test]
fn change_trigger_drives_ticks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run_log.csv");
    let p = pipeline(path.clone());
    let poll = Duration::from_millis(5);
    let mut trigger = ChangeTrigger::new(&path, poll);
    let t0 = Instant::now();

    let mut ticks = 0;
    for i in 0..6u32 {
        if i == 3 {
            std::fs::write(&path, THREE_ROWS).unwrap();
        }
        if trigger.ready(t0 + poll * i) {
            ticks += 1;
            p.tick(&ViewRequest::default()).unwrap();
        }
    }
    // Initial firing plus one for the file appearing.
    assert_eq!(ticks, 2);
}
