// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TRXVIEW_LOG";

/// `TRXVIEW_LOG` wins over the configured level.
pub fn filter_directive(configured: &str) -> String {
    match env::var(LOG_ENV) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => configured.to_owned(),
    }
}

/// Installs a file-backed subscriber. Returns false when no file is set.
pub fn init(directive: &str, file: Option<&Path>) -> Result<bool> {
    let Some(path) = file else {
        return Ok(false);
    };
    let filter = EnvFilter::try_new(directive).with_context(|| {
        format!("invalid log filter {directive:?}; fix [log] level or {LOG_ENV}")
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let sink = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(sink))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|error| anyhow::anyhow!("install log subscriber: {error}"))?;
    Ok(true)
}
