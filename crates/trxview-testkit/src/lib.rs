// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde_json::{Value, json};
use time::format_description::well_known::Rfc3339;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};
use trxview_app::Record;

const MOBILE_PREFIXES: [&str; 6] = ["013", "015", "016", "017", "018", "019"];
const TRXID_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const MAX_AGE_MINUTES: usize = 30 * 24 * 60;

const DEMO_SEED: u64 = 7;
const DEMO_RECORDS: usize = 180;
const DEMO_GROUPS: usize = 37;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn one_in(&mut self, n: usize) -> bool {
        self.int_n(n) == 0
    }
}

/// Generates plausible transaction snapshots from a fixed seed.
#[derive(Debug, Clone)]
pub struct TransactionFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl TransactionFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }

    pub fn mobile(&mut self) -> String {
        let prefix = MOBILE_PREFIXES[self.rng.int_n(MOBILE_PREFIXES.len())];
        format!("{prefix}{:08}", self.rng.int_n(100_000_000))
    }

    pub fn trxid(&mut self) -> String {
        let suffix: String = (0..8)
            .map(|_| char::from(TRXID_ALPHABET[self.rng.int_n(TRXID_ALPHABET.len())]))
            .collect();
        format!("8N{suffix}")
    }

    /// `count` records spread over `groups` mobiles. Roughly one record in
    /// twenty has no mobile and one in forty has no timestamp, so snapshots
    /// exercise the absent-field paths.
    pub fn snapshot(&mut self, count: usize, groups: usize, now: OffsetDateTime) -> Vec<Record> {
        let pool: Vec<String> = (0..groups.max(1)).map(|_| self.mobile()).collect();

        (0..count)
            .map(|index| {
                let beneficiary_mobile = if self.rng.one_in(20) {
                    None
                } else {
                    Some(pool[self.rng.int_n(pool.len())].clone())
                };
                let beneficiary_id = if self.rng.one_in(15) {
                    None
                } else {
                    Some(format!("{}", 10_000 + self.rng.int_n(90_000)))
                };
                let timestamp = if self.rng.one_in(40) {
                    None
                } else {
                    let age = self.rng.int_n(MAX_AGE_MINUTES) as i64;
                    Some(now - Duration::minutes(age))
                };

                let id = self
                    .seed
                    .wrapping_mul(1_000_003)
                    .wrapping_add(index as u64);
                Record {
                    id: format!("{id:024x}"),
                    beneficiary_id,
                    beneficiary_mobile,
                    trxid: Some(self.trxid()),
                    timestamp,
                }
            })
            .collect()
    }
}

pub fn fixture_now() -> OffsetDateTime {
    datetime!(2026-02-19 12:34:56 UTC)
}

pub fn demo_snapshot(now: OffsetDateTime) -> Vec<Record> {
    TransactionFaker::new(DEMO_SEED).snapshot(DEMO_RECORDS, DEMO_GROUPS, now)
}

/// Renders records the way the upstream endpoint sends them.
pub fn to_wire_json(records: &[Record]) -> String {
    let items: Vec<Value> = records
        .iter()
        .map(|record| {
            json!({
                "_id": record.id,
                "beneficiaryId": record.beneficiary_id,
                "beneficiaryMobile": record.beneficiary_mobile,
                "trxid": record.trxid,
                "timestamp": record
                    .timestamp
                    .and_then(|timestamp| timestamp.format(&Rfc3339).ok()),
            })
        })
        .collect();
    Value::Array(items).to_string()
}
