// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};
use trxview_app::{Record, decode_records};
use url::Url;

/// Blocking client for the transaction snapshot endpoint.
#[derive(Debug, Clone)]
pub struct Client {
    endpoint: Url,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = validate_endpoint(endpoint)?;
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            endpoint,
            timeout,
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches the full snapshot. A blank or `null` body is an empty snapshot.
    pub fn fetch_records(&self) -> Result<Vec<Record>> {
        let result = self.fetch_records_inner();
        match &result {
            Ok(records) => info!(
                endpoint = %self.endpoint,
                records = records.len(),
                "fetched snapshot"
            ),
            Err(error) => warn!(
                endpoint = %self.endpoint,
                error = %error,
                "snapshot fetch failed"
            ),
        }
        result
    }

    fn fetch_records_inner(&self) -> Result<Vec<Record>> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|error| connection_error(self.endpoint.as_str(), error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let body = response.text().context("read snapshot body")?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        decode_records(&body)
    }
}

pub fn validate_endpoint(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("source.url must not be empty; set [source] url or pass --url");
    }

    let url = Url::parse(trimmed)
        .with_context(|| format!("source.url {trimmed:?} is not a valid URL"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!(
            "source.url {trimmed:?} uses unsupported scheme {other:?}; use http or https"
        ),
    }
}

fn connection_error(endpoint: &str, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!(
            "timed out fetching {endpoint} -- raise [source] timeout or check the server"
        );
    }
    anyhow!("cannot reach {endpoint} -- check the URL and your network ({error})")
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body) {
        let message = match parsed.error {
            Some(ErrorField::Text(text)) => Some(text),
            Some(ErrorField::Detailed { message }) => Some(message),
            None => parsed.message,
        };
        if let Some(message) = message
            && !message.is_empty()
        {
            return anyhow!("server error ({}): {}", status.as_u16(), message);
        }
    }

    let body = body.trim();
    if !body.is_empty() && body.len() < 100 && !body.contains('{') && !body.contains('<') {
        return anyhow!("server error ({}): {}", status.as_u16(), body);
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorField>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Text(String),
    Detailed { message: String },
}
