use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::alert::MailSettings;
use crate::detect::DEFAULT_TARGET_CLASSES;
use crate::event_log::DEFAULT_LOG_CAPACITY;
use crate::ingest::{SourceOptions, SourceSpec};
use crate::monitor::MonitorConfig;
use crate::track::DEFAULT_HISTORY_LEN;
use crate::zone::{Point, Zone, ZoneSet};

const DEFAULT_SOURCE: &str = "input2.mp4";
const DEFAULT_FRAME_INTERVAL_MS: u64 = 10;
const DEFAULT_SNAPSHOT_EVERY: u64 = 30;

#[derive(Debug, Deserialize, Default)]
struct WatchConfigFile {
    source: Option<String>,
    detections: Option<PathBuf>,
    target_classes: Option<Vec<u32>>,
    history_len: Option<usize>,
    frame_interval_ms: Option<u64>,
    log_capacity: Option<usize>,
    zones: Option<Vec<ZoneConfigFile>>,
    synthetic: Option<SyntheticConfigFile>,
    mail: Option<MailConfigFile>,
    snapshots: Option<SnapshotConfigFile>,
}

#[derive(Debug, Deserialize)]
struct ZoneConfigFile {
    id: String,
    points: Vec<[i32; 2]>,
}

#[derive(Debug, Deserialize, Default)]
struct SyntheticConfigFile {
    width: Option<u32>,
    height: Option<u32>,
    max_frames: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct MailConfigFile {
    api_url: Option<String>,
    sender_email: Option<String>,
    sender_name: Option<String>,
    category: Option<String>,
    recipient: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SnapshotConfigFile {
    dir: PathBuf,
    every: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub source: String,
    pub detections: Option<PathBuf>,
    pub target_classes: Vec<u32>,
    pub history_len: usize,
    pub frame_interval: Duration,
    pub log_capacity: usize,
    pub zones: ZoneSet,
    pub synthetic: SourceOptions,
    pub mail: MailSettings,
    /// Mailtrap API token, read from `MAILTRAP_TOKEN` only.
    pub mailtrap_token: Option<String>,
    pub snapshots: Option<SnapshotSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSettings {
    pub dir: PathBuf,
    pub every: u64,
}

impl WatchConfig {
    /// File named by `OFFROAD_CONFIG` (optional), then env overrides, then validation.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("OFFROAD_CONFIG")
            .ok()
            .filter(|p| !p.trim().is_empty());
        Self::load_from(config_path.as_deref().map(Path::new))
    }

    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file_cfg = match path {
            Some(path) => Some(read_config_file(path)?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: WatchConfigFile) -> Result<Self> {
        let zones = match file.zones {
            Some(zones) => ZoneSet::new(
                zones
                    .into_iter()
                    .map(|z| Zone::new(&z.id, z.points.into_iter().map(Point::from).collect()))
                    .collect::<Result<Vec<_>>>()?,
            )?,
            None => ZoneSet::default_verges(),
        };
        let synthetic_defaults = SourceOptions::default();
        let synthetic = SourceOptions {
            width: file
                .synthetic
                .as_ref()
                .and_then(|s| s.width)
                .unwrap_or(synthetic_defaults.width),
            height: file
                .synthetic
                .as_ref()
                .and_then(|s| s.height)
                .unwrap_or(synthetic_defaults.height),
            max_frames: file.synthetic.as_ref().and_then(|s| s.max_frames),
        };
        let mail_defaults = MailSettings::default();
        let mail = match file.mail {
            Some(mail) => MailSettings {
                api_url: mail.api_url.unwrap_or(mail_defaults.api_url),
                sender_email: mail.sender_email.unwrap_or(mail_defaults.sender_email),
                sender_name: mail.sender_name.unwrap_or(mail_defaults.sender_name),
                category: mail.category.unwrap_or(mail_defaults.category),
                recipient: mail.recipient,
            },
            None => mail_defaults,
        };
        let snapshots = file.snapshots.map(|s| SnapshotSettings {
            dir: s.dir,
            every: s.every.unwrap_or(DEFAULT_SNAPSHOT_EVERY),
        });
        Ok(Self {
            source: file.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            detections: file.detections,
            target_classes: file
                .target_classes
                .unwrap_or_else(|| DEFAULT_TARGET_CLASSES.to_vec()),
            history_len: file.history_len.unwrap_or(DEFAULT_HISTORY_LEN),
            frame_interval: Duration::from_millis(
                file.frame_interval_ms.unwrap_or(DEFAULT_FRAME_INTERVAL_MS),
            ),
            log_capacity: file.log_capacity.unwrap_or(DEFAULT_LOG_CAPACITY),
            zones,
            synthetic,
            mail,
            mailtrap_token: None,
            snapshots,
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(source) = non_empty_env("OFFROAD_SOURCE") {
            self.source = source;
        }
        if let Some(path) = non_empty_env("OFFROAD_DETECTIONS") {
            self.detections = Some(PathBuf::from(path));
        }
        if let Some(classes) = non_empty_env("OFFROAD_TARGET_CLASSES") {
            self.target_classes = split_csv(&classes)
                .iter()
                .map(|c| {
                    c.parse()
                        .map_err(|_| anyhow!("OFFROAD_TARGET_CLASSES entry '{}' is not a class id", c))
                })
                .collect::<Result<Vec<u32>>>()?;
        }
        if let Some(ms) = non_empty_env("OFFROAD_FRAME_INTERVAL_MS") {
            let ms: u64 = ms.parse().map_err(|_| {
                anyhow!("OFFROAD_FRAME_INTERVAL_MS must be an integer number of milliseconds")
            })?;
            self.frame_interval = Duration::from_millis(ms);
        }
        if let Some(recipient) = non_empty_env("EMAIL_TO") {
            self.mail.recipient = Some(recipient);
        }
        if let Some(url) = non_empty_env("MAILTRAP_API_URL") {
            self.mail.api_url = url;
        }
        self.mailtrap_token = non_empty_env("MAILTRAP_TOKEN");
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        SourceSpec::parse(&self.source)?;
        if self.target_classes.is_empty() {
            return Err(anyhow!("target_classes must name at least one class id"));
        }
        self.target_classes.sort_unstable();
        self.target_classes.dedup();
        if self.history_len == 0 {
            return Err(anyhow!("history_len must be greater than zero"));
        }
        if self.log_capacity == 0 {
            return Err(anyhow!("log_capacity must be greater than zero"));
        }
        if let Some(snapshots) = &self.snapshots {
            if snapshots.every == 0 {
                return Err(anyhow!("snapshots.every must be greater than zero"));
            }
        }
        let api_url = url::Url::parse(&self.mail.api_url)
            .map_err(|e| anyhow!("invalid mail api_url {}: {}", self.mail.api_url, e))?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(anyhow!(
                "mail api_url must be http(s), got {}",
                api_url.scheme()
            ));
        }
        Ok(())
    }

    pub fn source_spec(&self) -> Result<SourceSpec> {
        SourceSpec::parse(&self.source)
    }

    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            target_classes: self.target_classes.clone(),
            history_len: self.history_len,
        }
    }

    /// Email goes out only with both a token and a recipient.
    pub fn mail_enabled(&self) -> bool {
        self.mailtrap_token.is_some() && self.mail.recipient.is_some()
    }
}

fn read_config_file(path: &Path) -> Result<WatchConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.to_string())
        .collect()
}
