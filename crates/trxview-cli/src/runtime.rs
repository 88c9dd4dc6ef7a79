// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use time::OffsetDateTime;
use trxview_app::Record;
use trxview_fetch::Client;

/// Pulls snapshots from the configured endpoint.
pub struct FetchRuntime {
    client: Client,
}

impl FetchRuntime {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl trxview_tui::AppRuntime for FetchRuntime {
    fn load_snapshot(&mut self) -> Result<Vec<Record>> {
        self.client.fetch_records()
    }
}

/// Serves generated records anchored to the time of each reload.
pub struct DemoRuntime {
    clock: fn() -> OffsetDateTime,
}

impl DemoRuntime {
    pub fn new() -> Self {
        Self {
            clock: OffsetDateTime::now_utc,
        }
    }

    #[cfg(test)]
    fn with_clock(clock: fn() -> OffsetDateTime) -> Self {
        Self { clock }
    }
}

impl Default for DemoRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl trxview_tui::AppRuntime for DemoRuntime {
    fn load_snapshot(&mut self) -> Result<Vec<Record>> {
        Ok(trxview_testkit::demo_snapshot((self.clock)()))
    }
}
