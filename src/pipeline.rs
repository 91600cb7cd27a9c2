//! The frame loop.
//!
//! One frame at a time: read, track, update the zone monitor, report events,
//! annotate, display. Nothing runs in parallel except email delivery, which the
//! dispatcher hands to detached threads.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::alert::{email_for, log_line, AlertDispatcher};
use crate::annotate::annotate;
use crate::detect::TrackerBackend;
use crate::display::{Display, NullDisplay};
use crate::event_log::ScrollingLog;
use crate::ingest::FrameSource;
use crate::monitor::{TrackEvent, TrackEventKind, ZoneMonitor};

/// Totals for one run of the loop.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub appeared: u64,
    pub disappeared: u64,
    pub entered_zone: u64,
    pub left_zone: u64,
    pub emails_dispatched: u64,
    pub tracker_errors: u64,
}

impl RunSummary {
    fn record(&mut self, kind: TrackEventKind) {
        match kind {
            TrackEventKind::Appeared => self.appeared += 1,
            TrackEventKind::Disappeared => self.disappeared += 1,
            TrackEventKind::EnteredZone => self.entered_zone += 1,
            TrackEventKind::LeftZone => self.left_zone += 1,
        }
    }

    pub fn events(&self) -> u64 {
        self.appeared + self.disappeared + self.entered_zone + self.left_zone
    }
}

pub struct Watcher {
    source: Box<dyn FrameSource>,
    backend: Box<dyn TrackerBackend>,
    monitor: ZoneMonitor,
    dispatcher: AlertDispatcher,
    display: Box<dyn Display>,
    log: ScrollingLog,
    frame_interval: Duration,
    echo: Option<Box<dyn Write>>,
    summary: RunSummary,
}

impl Watcher {
    pub fn new(
        source: Box<dyn FrameSource>,
        backend: Box<dyn TrackerBackend>,
        monitor: ZoneMonitor,
        dispatcher: AlertDispatcher,
    ) -> Self {
        Self {
            source,
            backend,
            monitor,
            dispatcher,
            display: Box::new(NullDisplay),
            log: ScrollingLog::default(),
            frame_interval: Duration::ZERO,
            echo: None,
            summary: RunSummary::default(),
        }
    }

    pub fn with_display(mut self, display: Box<dyn Display>) -> Self {
        self.display = display;
        self
    }

    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log = ScrollingLog::new(capacity);
        self
    }

    /// Pause between frames (the periodic timer).
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Also write every log line to `out`.
    pub fn with_echo(mut self, out: Box<dyn Write>) -> Self {
        self.echo = Some(out);
        self
    }

    /// Also print every log line to stdout.
    pub fn with_stdout_echo(self, enabled: bool) -> Self {
        if enabled {
            self.with_echo(Box::new(std::io::stdout()))
        } else {
            Self { echo: None, ..self }
        }
    }

    /// Process one frame. `Ok(None)` means the source has ended.
    pub fn step(&mut self) -> Result<Option<Vec<TrackEvent>>> {
        let Some(frame) = self.source.next_frame()? else {
            return Ok(None);
        };

        let objects = match self.backend.track(&frame) {
            Ok(objects) => objects,
            Err(e) => {
                log::warn!(
                    "tracker {} failed on frame {}: {:#}",
                    self.backend.name(),
                    frame.index,
                    e
                );
                self.summary.tracker_errors += 1;
                Vec::new()
            }
        };

        let events = self.monitor.observe(frame.index, &objects);
        for event in &events {
            self.report(event);
        }

        if self.display.wants_frame(frame.index) {
            let image = annotate(&frame, self.monitor.zones(), self.monitor.tracks());
            self.display
                .show(frame.index, &image)
                .with_context(|| format!("display frame {}", frame.index))?;
        }

        self.summary.frames += 1;
        Ok(Some(events))
    }

    fn report(&mut self, event: &TrackEvent) {
        let line = log_line(event);
        if event.kind.is_alert() {
            log::warn!("{} (frame {})", line, event.frame_index);
        } else {
            log::info!("{} (frame {})", line, event.frame_index);
        }
        if let Some(out) = self.echo.as_mut() {
            if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
                log::warn!("cannot echo event line: {}", e);
            }
        }
        self.log.push(line);
        self.summary.record(event.kind);

        if let Some(email) = email_for(event) {
            if self.dispatcher.is_enabled() {
                self.summary.emails_dispatched += 1;
            }
            self.dispatcher.dispatch(email);
        }
    }

    /// Drive `step` until the stream ends, the display closes, or `shutdown`
    /// is set.
    pub fn run(&mut self, shutdown: &AtomicBool) -> Result<RunSummary> {
        self.backend
            .warm_up()
            .with_context(|| format!("warm up tracker {}", self.backend.name()))?;
        log::info!(
            "watching {} with tracker {} ({} zones)",
            self.source.stats().source,
            self.backend.name(),
            self.monitor.zones().len()
        );

        loop {
            if shutdown.load(Ordering::SeqCst) {
                log::info!("shutdown requested; stopping after {} frames", self.summary.frames);
                break;
            }
            if self.step()?.is_none() {
                log::info!("end of stream after {} frames", self.summary.frames);
                break;
            }
            if self.display.closed() {
                log::info!("display closed after {} frames", self.summary.frames);
                break;
            }
            if !self.frame_interval.is_zero() {
                std::thread::sleep(self.frame_interval);
            }
        }

        Ok(self.summary.clone())
    }

    pub fn log(&self) -> &ScrollingLog {
        &self.log
    }

    pub fn monitor(&self) -> &ZoneMonitor {
        &self.monitor
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }
}
