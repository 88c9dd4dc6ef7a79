// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use time::UtcOffset;
use trxview_app::{DEFAULT_MAX_PAGE_BUTTONS, DEFAULT_PAGE_SIZE, ViewSettings};

pub const APP_NAME: &str = "trxview";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_TIMEOUT: &str = "10s";
const DEFAULT_LOG_LEVEL: &str = "off";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub view: View,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            source: Source::default(),
            view: View::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Source {
    pub url: Option<String>,
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct View {
    pub page_size: Option<i64>,
    pub max_page_buttons: Option<i64>,
    pub utc_offset: Option<String>,
}

impl Default for View {
    fn default() -> Self {
        Self {
            page_size: Some(DEFAULT_PAGE_SIZE as i64),
            max_page_buttons: Some(DEFAULT_MAX_PAGE_BUTTONS as i64),
            utc_offset: Some("Z".to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("TRXVIEW_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set TRXVIEW_CONFIG_PATH to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` and put settings under [source], [view], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(timeout) = &self.source.timeout {
            let parsed = parse_duration(timeout)
                .with_context(|| format!("source.timeout in {}", path.display()))?;
            if parsed.is_zero() {
                bail!(
                    "source.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        for (key, value) in [
            ("view.page_size", self.view.page_size),
            ("view.max_page_buttons", self.view.max_page_buttons),
        ] {
            if let Some(value) = value
                && value <= 0
            {
                bail!("{key} in {} must be positive, got {value}", path.display());
            }
        }

        if let Some(offset) = &self.view.utc_offset {
            parse_utc_offset(offset)
                .with_context(|| format!("view.utc_offset in {}", path.display()))?;
        }

        if let Some(level) = &self.log.level
            && level.trim().is_empty()
        {
            bail!(
                "log.level in {} must not be empty; use \"off\" to disable logging",
                path.display()
            );
        }

        Ok(())
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source.url.as_deref().map(str::trim)
    }

    pub fn source_timeout(&self) -> Result<Duration> {
        parse_duration(self.source.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn view_settings(&self) -> Result<ViewSettings> {
        let page_size = self
            .view
            .page_size
            .map_or(DEFAULT_PAGE_SIZE, |value| value.max(1) as usize);
        let max_page_buttons = self
            .view
            .max_page_buttons
            .map_or(DEFAULT_MAX_PAGE_BUTTONS, |value| value.max(1) as usize);
        let display_offset = parse_utc_offset(self.view.utc_offset.as_deref().unwrap_or("Z"))?;
        Ok(ViewSettings {
            page_size,
            max_page_buttons,
            display_offset,
        })
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.log.file.as_deref().map(PathBuf::from)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# trxview config\n# Place this file at: {}\n\nversion = 1\n\n[source]\n# Endpoint returning a JSON array of transaction records\nurl = \"http://localhost:8080/get-tran\"\ntimeout = \"{}\"\n\n[view]\npage_size = {}\nmax_page_buttons = {}\n# Display offset for timestamps: Z, +HH:MM, or -HH:MM\nutc_offset = \"Z\"\n\n[log]\n# tracing filter directive, for example \"info\" or \"trxview_fetch=debug\"\nlevel = \"{}\"\n# Logs are only written when a file is set\n# file = \"/tmp/trxview.log\"\n",
            path.display(),
            DEFAULT_TIMEOUT,
            DEFAULT_PAGE_SIZE,
            DEFAULT_MAX_PAGE_BUTTONS,
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 10s)")
}

/// Accepts `Z`, `+HH:MM`, or `-HH:MM`.
fn parse_utc_offset(raw: &str) -> Result<UtcOffset> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("z") {
        return Ok(UtcOffset::UTC);
    }

    let (sign, rest) = match trimmed.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => bail!("invalid UTC offset {raw:?}; use Z, +HH:MM, or -HH:MM"),
    };
    let (hours, minutes) = rest
        .split_once(':')
        .ok_or_else(|| anyhow!("invalid UTC offset {raw:?}; use Z, +HH:MM, or -HH:MM"))?;
    if hours.len() != 2 || minutes.len() != 2 {
        bail!("invalid UTC offset {raw:?}; use Z, +HH:MM, or -HH:MM");
    }
    let hours: i8 = hours
        .parse()
        .with_context(|| format!("invalid UTC offset hours in {raw:?}"))?;
    let minutes: i8 = minutes
        .parse()
        .with_context(|| format!("invalid UTC offset minutes in {raw:?}"))?;
    if minutes >= 60 {
        bail!("invalid UTC offset {raw:?}; minutes must be below 60");
    }

    UtcOffset::from_hms(sign * hours, sign * minutes, 0)
        .with_context(|| format!("UTC offset {raw:?} is out of range"))
}
