//! Off-road vehicle watch
//!
//! Watches a video stream for tracked vehicles that drive onto road verges.
//!
//! # Pipeline
//!
//! 1. A `FrameSource` yields decoded frames (video file, camera, or `stub://`).
//! 2. A `TrackerBackend` turns each frame into tracked objects with stable ids.
//! 3. The `ZoneMonitor` keeps per-track state and emits appear, disappear,
//!    zone-entry and zone-exit events.
//! 4. Events are written to the log and a bounded scrolling log; zone entry and
//!    exit are also mailed through the `AlertDispatcher`.
//! 5. The annotated frame (zones and trails) goes to a `Display`.
//!
//! # Module Structure
//!
//! - `zone`: polygon zones and the inclusive point-in-polygon test
//! - `monitor`, `track`: per-track state machine and trail history
//! - `detect`: tracker seam plus replay and scripted backends
//! - `ingest`, `frame`: frame sources and the RGB frame type
//! - `alert`: alert texts, Mailtrap client, fire-and-forget dispatch
//! - `annotate`, `display`, `event_log`: presentation
//! - `pipeline`: the frame loop
//! - `config`: JSON file plus environment overrides

pub mod alert;
pub mod annotate;
pub mod config;
pub mod detect;
pub mod display;
pub mod event_log;
pub mod frame;
pub mod ingest;
pub mod monitor;
pub mod pipeline;
pub mod track;
pub mod zone;

pub use alert::{AlertDispatcher, EmailAlert, Mailer, MailtrapMailer};
pub use config::WatchConfig;
pub use detect::{ReplayBackend, ScriptedBackend, TrackId, TrackedObject, TrackerBackend};
pub use display::{Display, NullDisplay, SnapshotDisplay};
pub use event_log::ScrollingLog;
pub use frame::Frame;
pub use ingest::{FileSource, FrameSource, SourceSpec};
pub use monitor::{MonitorConfig, TrackEvent, TrackEventKind, ZoneMonitor};
pub use pipeline::{RunSummary, Watcher};
pub use zone::{Point, Zone, ZoneSet};
