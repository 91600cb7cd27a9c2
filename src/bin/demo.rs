//! demo - end-to-end synthetic run of the off-road watch
//!
//! Plays a scripted scene over synthetic frames against the default verge
//! zones: a car drifts from the road onto the east verge and back, a truck
//! stays on the road, and a pedestrian is ignored. Emails are printed instead
//! of sent.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use offroad_watch::detect::{COCO_CAR, COCO_TRUCK};
use offroad_watch::ingest::SourceOptions;
use offroad_watch::{
    AlertDispatcher, Display, EmailAlert, FileSource, Mailer, MonitorConfig, NullDisplay,
    ScriptedBackend, SnapshotDisplay, SourceSpec, TrackedObject, Watcher, ZoneMonitor, ZoneSet,
};

const COCO_PERSON: u32 = 0;
const ROAD_X: f32 = 152.0;
const ROAD_Y: f32 = 40.0;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of synthetic frames.
    #[arg(long, default_value_t = 60)]
    frames: u64,
    /// Write annotated frames into this directory.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Snapshot interval in frames.
    #[arg(long, default_value_t = 10)]
    every: u64,
}

/// Prints each alert instead of delivering it.
struct PrintMailer;

impl Mailer for PrintMailer {
    fn send(&self, alert: &EmailAlert) -> Result<()> {
        println!("[mail] {}: {}", alert.subject, alert.body);
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    if args.frames == 0 {
        return Err(anyhow!("frames must be >= 1"));
    }

    stage("open synthetic source");
    let source = FileSource::open(
        &SourceSpec::parse("stub://demo")?,
        SourceOptions {
            max_frames: Some(args.frames),
            ..SourceOptions::default()
        },
    )?;

    stage("script scene");
    let backend = ScriptedBackend::new((0..args.frames).map(scene).collect());

    let display: Box<dyn Display> = match &args.out {
        Some(dir) => Box::new(SnapshotDisplay::new(dir, args.every)?),
        None => Box::new(NullDisplay),
    };

    stage("run watcher");
    let monitor = ZoneMonitor::new(ZoneSet::default_verges(), MonitorConfig::default());
    let mut watcher = Watcher::new(
        Box::new(source),
        Box::new(backend),
        monitor,
        AlertDispatcher::new(Arc::new(PrintMailer)),
    )
    .with_display(display);
    let summary = watcher.run(&AtomicBool::new(false))?;

    // Give the detached mail threads a moment to print.
    std::thread::sleep(std::time::Duration::from_millis(100));

    stage("event log");
    for line in watcher.log().lines() {
        println!("  {}", line);
    }

    stage("summary");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    if let Some(dir) = &args.out {
        println!("annotated frames in {}", dir.display());
    }
    Ok(())
}

/// Objects visible in frame `i`.
fn scene(i: u64) -> Vec<TrackedObject> {
    let mut objects = Vec::new();

    // Car: on the road, then a drift east onto the verge, then back.
    if i < 45 {
        let drift = match i {
            0..=9 => 0.0,
            10..=24 => (i - 9) as f32 * 4.0,
            25..=34 => 60.0 - (i - 24) as f32 * 6.0,
            _ => 0.0,
        };
        objects.push(
            TrackedObject::new(1, COCO_CAR, ROAD_X + drift, ROAD_Y + i as f32)
                .with_size(30.0, 20.0),
        );
    }

    // Truck: stays on the road.
    if (5..40).contains(&i) {
        objects.push(
            TrackedObject::new(2, COCO_TRUCK, ROAD_X - 2.0, ROAD_Y + 60.0).with_size(40.0, 30.0),
        );
    }

    // Pedestrian deep in the west verge; not a target class.
    objects.push(TrackedObject::new(3, COCO_PERSON, 40.0, 100.0));

    objects
}

fn stage(name: &str) {
    println!("== {}", name);
}
