use anyhow::Result;
use std::io::Cursor;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use offroad_watch::detect::COCO_CAR;
use offroad_watch::ingest::SourceOptions;
use offroad_watch::{
    AlertDispatcher, EmailAlert, FileSource, Mailer, MonitorConfig, ReplayBackend,
    ScriptedBackend, SnapshotDisplay, SourceSpec, TrackEventKind, TrackedObject, Watcher,
    ZoneMonitor, ZoneSet,
};

struct ChannelMailer {
    tx: Mutex<mpsc::Sender<EmailAlert>>,
}

impl Mailer for ChannelMailer {
    fn send(&self, alert: &EmailAlert) -> Result<()> {
        self.tx.lock().unwrap().send(alert.clone()).unwrap();
        Ok(())
    }
}

fn stub_source(frames: u64) -> FileSource {
    FileSource::open(
        &SourceSpec::parse("stub://test").unwrap(),
        SourceOptions {
            width: 640,
            height: 360,
            max_frames: Some(frames),
        },
    )
    .unwrap()
}

#[test]
fn zone_alerts_reach_the_mailer_and_scrolling_log() {
    // West verge covers the top-left corner; (152, 40) is on the road.
    let script = vec![
        vec![TrackedObject::new(1, COCO_CAR, 152.0, 40.0)],
        vec![TrackedObject::new(1, COCO_CAR, 20.0, 40.0)],
        vec![TrackedObject::new(1, COCO_CAR, 20.0, 40.0)],
        vec![TrackedObject::new(1, COCO_CAR, 152.0, 40.0)],
    ];
    let (tx, rx) = mpsc::channel();
    let dispatcher = AlertDispatcher::new(Arc::new(ChannelMailer { tx: Mutex::new(tx) }));
    let monitor = ZoneMonitor::new(ZoneSet::default_verges(), MonitorConfig::default());
    let mut watcher = Watcher::new(
        Box::new(stub_source(5)),
        Box::new(ScriptedBackend::new(script)),
        monitor,
        dispatcher,
    );

    let summary = watcher.run(&AtomicBool::new(false)).unwrap();
    assert_eq!(summary.frames, 5);
    assert_eq!(summary.entered_zone, 1);
    assert_eq!(summary.left_zone, 1);
    assert_eq!(summary.emails_dispatched, 2);

    let lines: Vec<&str> = watcher.log().lines().collect();
    assert_eq!(
        lines,
        vec![
            "INFO: Vehicle ID 1 appeared on the screen.",
            "ALERT! Vehicle ID 1 entered the off-road zone.",
            "ALERT! Vehicle ID 1 left the off-road zone.",
            "INFO: Vehicle ID 1 disappeared from the screen.",
        ]
    );

    // Delivery happens on detached threads, so order is not guaranteed.
    let mut subjects = vec![
        rx.recv_timeout(Duration::from_secs(5)).unwrap().subject,
        rx.recv_timeout(Duration::from_secs(5)).unwrap().subject,
    ];
    subjects.sort();
    assert_eq!(
        subjects,
        vec!["Vehicle ID 1 Off-Road Alert", "Vehicle ID 1 Off-Road Exit"]
    );
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
}

#[test]
fn replayed_detections_drive_the_monitor() {
    let jsonl = r#"{"frame": 0, "objects": [{"id": 4, "cls": 7, "x": 152, "y": 40, "w": 30, "h": 20, "conf": 0.9}]}
{"frame": 1, "objects": [{"id": 4, "cls": 7, "x": 600, "y": 300, "w": 30, "h": 20, "conf": 0.9}]}

{"frame": 2, "objects": [{"id": 4, "cls": 7, "x": 600, "y": 300, "w": 30, "h": 20, "conf": 0.9}, {"id": 5, "cls": 0, "x": 10, "y": 10, "w": 5, "h": 9, "conf": 0.7}]}
"#;
    let backend = ReplayBackend::from_reader(Cursor::new(jsonl)).unwrap();
    assert_eq!(backend.frames_recorded(), 3);

    let monitor = ZoneMonitor::new(ZoneSet::default_verges(), MonitorConfig::default());
    let mut watcher = Watcher::new(
        Box::new(stub_source(4)),
        Box::new(backend),
        monitor,
        AlertDispatcher::disabled(),
    );

    let mut kinds = Vec::new();
    while let Some(events) = watcher.step().unwrap() {
        kinds.extend(events.into_iter().map(|e| (e.frame_index, e.kind)));
    }
    assert_eq!(
        kinds,
        vec![
            (0, TrackEventKind::Appeared),
            (1, TrackEventKind::EnteredZone),
            (3, TrackEventKind::Disappeared),
        ]
    );
    assert_eq!(watcher.monitor().tracks_seen(), 1);
    assert_eq!(watcher.summary().emails_dispatched, 0);
}

#[test]
fn snapshots_are_written_for_selected_frames() {
    let dir = tempfile::tempdir().unwrap();
    let display = SnapshotDisplay::new(dir.path(), 2).unwrap();
    let expected = [display.path_for(0), display.path_for(2), display.path_for(4)];

    let script = (0..5)
        .map(|i| vec![TrackedObject::new(1, COCO_CAR, 150.0 + i as f32, 40.0)])
        .collect();
    let mut watcher = Watcher::new(
        Box::new(stub_source(5)),
        Box::new(ScriptedBackend::new(script)),
        ZoneMonitor::new(ZoneSet::default_verges(), MonitorConfig::default()),
        AlertDispatcher::disabled(),
    )
    .with_display(Box::new(display));

    watcher.run(&AtomicBool::new(false)).unwrap();
    for path in &expected {
        assert!(path.exists(), "missing {}", path.display());
    }
    assert!(!dir.path().join("frame_000001.jpg").exists());
}

#[test]
fn scrolling_log_keeps_only_the_newest_lines() {
    let script = (0..6)
        .map(|i| vec![TrackedObject::new(i, COCO_CAR, 152.0, 40.0)])
        .collect();
    let mut watcher = Watcher::new(
        Box::new(stub_source(6)),
        Box::new(ScriptedBackend::new(script)),
        ZoneMonitor::new(ZoneSet::default_verges(), MonitorConfig::default()),
        AlertDispatcher::disabled(),
    )
    .with_log_capacity(3);

    let summary = watcher.run(&AtomicBool::new(false)).unwrap();
    assert_eq!(summary.appeared, 6);
    assert_eq!(summary.disappeared, 5);
    assert_eq!(watcher.log().len(), 3);
    assert_eq!(watcher.log().total(), 11);
    assert_eq!(
        watcher.log().last(),
        Some("INFO: Vehicle ID 4 disappeared from the screen.")
    );
}
