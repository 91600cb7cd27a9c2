//! offroad_watch - watch a video stream for vehicles leaving the road
//!
//! This daemon:
//! 1. Opens the configured source (video file, camera index, or stub://)
//! 2. Feeds every frame through the tracker backend
//! 3. Reports appear/disappear and zone entry/exit events to the log
//! 4. Emails zone entry/exit alerts through Mailtrap when credentials are set
//! 5. Shows annotated frames in a window (feature `display-window`) or writes
//!    every Nth one to a snapshot directory

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use offroad_watch::config::SnapshotSettings;
use offroad_watch::{
    AlertDispatcher, Display, FileSource, MailtrapMailer, NullDisplay, ReplayBackend,
    ScriptedBackend, SnapshotDisplay, TrackerBackend, WatchConfig, Watcher, ZoneMonitor,
};

#[cfg(feature = "display-window")]
const WINDOW_TITLE: &str = "Off-Road Detector";

#[derive(Parser, Debug)]
#[command(author, version, about = "Alert on vehicles entering off-road zones")]
struct Args {
    /// Path to a JSON config file.
    #[arg(long, env = "OFFROAD_CONFIG")]
    config: Option<PathBuf>,

    /// Video file, camera index, or stub://name. Overrides the config file.
    #[arg(long)]
    source: Option<String>,

    /// JSONL tracker output to replay against the source.
    #[arg(long)]
    detections: Option<PathBuf>,

    /// Write every Nth annotated frame as JPEG into this directory.
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Snapshot interval in frames.
    #[arg(long, default_value_t = 30)]
    snapshot_every: u64,

    /// Never send email, even with MAILTRAP_TOKEN and EMAIL_TO set.
    #[arg(long)]
    no_email: bool,

    /// Show annotated frames in a live window (Esc or q closes it).
    #[arg(long)]
    window: bool,

    /// Do not print event lines to stdout; they still go to the log.
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg = WatchConfig::load_from(args.config.as_deref())?;
    if let Some(source) = args.source {
        cfg.source = source;
    }
    if let Some(detections) = args.detections {
        cfg.detections = Some(detections);
    }
    if let Some(dir) = args.snapshot_dir {
        cfg.snapshots = Some(SnapshotSettings {
            dir,
            every: args.snapshot_every,
        });
    }

    let spec = cfg.source_spec()?;
    let source = FileSource::open(&spec, cfg.synthetic.clone())
        .with_context(|| format!("open source {}", spec))?;

    let backend: Box<dyn TrackerBackend> = match &cfg.detections {
        Some(path) => Box::new(ReplayBackend::open(path)?),
        None => {
            log::warn!("no detections configured; no vehicles will be tracked");
            Box::new(ScriptedBackend::default())
        }
    };

    let dispatcher = if args.no_email {
        log::info!("email alerts disabled by --no-email");
        AlertDispatcher::disabled()
    } else {
        match (&cfg.mailtrap_token, cfg.mail_enabled()) {
            (Some(token), true) => {
                let mailer = MailtrapMailer::new(cfg.mail.clone(), token.clone())?;
                log::info!("email alerts go to {:?}", cfg.mail.recipient);
                AlertDispatcher::new(Arc::new(mailer))
            }
            _ => {
                log::warn!("MAILTRAP_TOKEN or EMAIL_TO not set; email alerts disabled");
                AlertDispatcher::disabled()
            }
        }
    };

    let display: Box<dyn Display> = match (&cfg.snapshots, args.window) {
        (Some(_), true) => {
            return Err(anyhow!("--window cannot be combined with snapshots"));
        }
        (None, true) => open_window()?,
        (Some(snapshots), false) => {
            log::info!(
                "writing every {} frame(s) to {}",
                snapshots.every,
                snapshots.dir.display()
            );
            Box::new(SnapshotDisplay::new(&snapshots.dir, snapshots.every)?)
        }
        (None, false) => Box::new(NullDisplay),
    };

    let monitor = ZoneMonitor::new(cfg.zones.clone(), cfg.monitor_config());
    let mut watcher = Watcher::new(Box::new(source), backend, monitor, dispatcher)
        .with_display(display)
        .with_log_capacity(cfg.log_capacity)
        .with_frame_interval(cfg.frame_interval)
        .with_stdout_echo(!args.quiet);

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })
    .context("install Ctrl-C handler")?;

    let summary = watcher.run(&shutdown)?;
    log::info!(
        "processed {} frames: {} appeared, {} disappeared, {} entered, {} left, {} emails",
        summary.frames,
        summary.appeared,
        summary.disappeared,
        summary.entered_zone,
        summary.left_zone,
        summary.emails_dispatched
    );
    if summary.tracker_errors > 0 {
        log::warn!("tracker failed on {} frame(s)", summary.tracker_errors);
    }
    Ok(())
}

#[cfg(feature = "display-window")]
fn open_window() -> Result<Box<dyn Display>> {
    let window = offroad_watch::display::WindowDisplay::open(WINDOW_TITLE)?;
    Ok(Box::new(window))
}

#[cfg(not(feature = "display-window"))]
fn open_window() -> Result<Box<dyn Display>> {
    Err(anyhow!(
        "--window requires the display-window feature (rebuild with --features display-window)"
    ))
}
