use std::net::{IpAddr, Ipv4Addr};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, Utc};
use fake::Fake;
use fake::faker::internet::en::DomainSuffix;
use fake::faker::lorem::en::Word;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use fixtura_core::{ScalarKind, Value};

/// Source of primitive values.
pub trait ScalarProvider {
    fn next_scalar(&mut self, kind: ScalarKind) -> Value;

    /// Index in `0..len`; `0` when `len` is zero.
    fn next_index(&mut self, len: usize) -> usize;

    /// Number in `min..=max`.
    fn next_in_range(&mut self, min: usize, max: usize) -> usize;
}

/// Default provider backed by a seeded `ChaCha8Rng`.
///
/// Dates are offsets from a fixed base date so that two providers built from
/// the same seed yield identical streams.
#[derive(Debug, Clone)]
pub struct SeededScalars {
    rng: ChaCha8Rng,
    base_date: NaiveDateTime,
}

impl SeededScalars {
    pub fn new(seed: Option<u64>) -> Self {
        Self::from_seed(seed.unwrap_or_else(rand::random))
    }

    pub fn from_seed(seed: u64) -> Self {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            base_date: NaiveDateTime::new(date, NaiveTime::MIN),
        }
    }

    fn word(&mut self) -> String {
        Word().fake_with_rng(&mut self.rng)
    }

    fn datetime(&mut self) -> NaiveDateTime {
        let days = self.rng.random_range(0..=365_i64);
        let seconds = self.rng.random_range(0..86_400_i64);
        self.base_date + TimeDelta::days(days) + TimeDelta::seconds(seconds)
    }

    fn uuid(&mut self) -> uuid::Uuid {
        let mut bytes = [0_u8; 16];
        self.rng.fill_bytes(&mut bytes);
        bytes[6] = (bytes[6] & 0x0f) | 0x40;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;
        uuid::Uuid::from_bytes(bytes)
    }
}

impl ScalarProvider for SeededScalars {
    fn next_scalar(&mut self, kind: ScalarKind) -> Value {
        match kind {
            ScalarKind::Bool => Value::Bool(self.rng.random_bool(0.5)),
            ScalarKind::U8 => Value::U8(self.rng.random()),
            ScalarKind::I8 => Value::I8(self.rng.random()),
            ScalarKind::Char => Value::Char(char::from(b'a' + self.rng.random_range(0..26_u8))),
            ScalarKind::I16 => Value::I16(self.rng.random()),
            ScalarKind::U16 => Value::U16(self.rng.random()),
            ScalarKind::I32 => Value::I32(self.rng.random()),
            ScalarKind::U32 => Value::U32(self.rng.random()),
            ScalarKind::I64 => Value::I64(self.rng.random()),
            ScalarKind::U64 => Value::U64(self.rng.random()),
            ScalarKind::F32 => Value::F32(self.rng.random_range(0.0..1000.0)),
            ScalarKind::F64 => Value::F64(self.rng.random_range(0.0..1000.0)),
            ScalarKind::Decimal => {
                let cents = self.rng.random_range(0..10_000_000_i64);
                Value::Decimal(cents as f64 / 100.0)
            }
            ScalarKind::String => Value::Text(self.word()),
            ScalarKind::DateTime => Value::DateTime(self.datetime()),
            ScalarKind::DateTimeOffset => {
                let hours = self.rng.random_range(-12..=12_i32);
                let offset = FixedOffset::east_opt(hours * 3600).unwrap_or(Utc.fix());
                Value::DateTimeOffset(DateTime::from_naive_utc_and_offset(self.datetime(), offset))
            }
            ScalarKind::TimeSpan => {
                Value::TimeSpan(TimeDelta::seconds(self.rng.random_range(0..2_592_000_i64)))
            }
            ScalarKind::Uuid => Value::Uuid(self.uuid()),
            ScalarKind::IpAddr => {
                let octets: [u8; 4] = self.rng.random();
                Value::IpAddr(IpAddr::V4(Ipv4Addr::from(octets)))
            }
            ScalarKind::Uri => {
                let host = self.word();
                let suffix: String = DomainSuffix().fake_with_rng(&mut self.rng);
                let path = self.word();
                Value::Uri(format!("https://{host}.{suffix}/{path}"))
            }
        }
    }

    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }

    fn next_in_range(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..=max)
    }
}
