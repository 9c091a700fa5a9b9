//! Snowflake identifiers
//!
//! Every persisted record (users, communities, messages, artworks) is keyed by a
//! 64-bit, time-ordered id:
//! - Bits 63-22: milliseconds since [`Snowflake::EPOCH`]
//! - Bits 21-12: worker id (0-1023)
//! - Bits 11-0:  per-millisecond sequence (0-4095)
//!
//! Because ids sort by creation time, a message id doubles as a polling cursor.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const WORKER_BITS: i64 = 10;
const SEQUENCE_BITS: i64 = 12;
const WORKER_MASK: i64 = (1 << WORKER_BITS) - 1;
const SEQUENCE_MASK: i64 = (1 << SEQUENCE_BITS) - 1;
const TIMESTAMP_SHIFT: i64 = WORKER_BITS + SEQUENCE_BITS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(i64);

impl Snowflake {
    /// 2025-01-01 00:00:00 UTC in milliseconds
    pub const EPOCH: i64 = 1_735_689_600_000;

    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Milliseconds since the Unix epoch at which the id was minted
    #[inline]
    pub fn timestamp(&self) -> i64 {
        (self.0 >> TIMESTAMP_SHIFT) + Self::EPOCH
    }

    #[inline]
    pub fn worker_id(&self) -> u16 {
        ((self.0 >> SEQUENCE_BITS) & WORKER_MASK) as u16
    }

    pub fn parse(s: &str) -> Result<Self, SnowflakeParseError> {
        s.trim()
            .parse::<i64>()
            .ok()
            .filter(|v| *v >= 0)
            .map(Snowflake)
            .ok_or(SnowflakeParseError::InvalidFormat)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnowflakeParseError {
    #[error("invalid snowflake format")]
    InvalidFormat,
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Snowflake {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for i64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

impl FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Snowflake::parse(s)
    }
}

// Strings on the wire so browsers never round 64-bit ids
impl Serialize for Snowflake {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Number(i64),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(Snowflake(n)),
            Repr::Text(s) => Snowflake::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

/// Lock-free id generator, one per process
pub struct SnowflakeGenerator {
    worker_id: i64,
    // Packed as (elapsed_ms << SEQUENCE_BITS) | sequence
    state: AtomicI64,
}

impl SnowflakeGenerator {
    /// Worker ids wrap into the 10 bits available
    pub fn new(worker_id: u16) -> Self {
        Self {
            worker_id: i64::from(worker_id) & WORKER_MASK,
            state: AtomicI64::new(0),
        }
    }

    pub fn generate(&self) -> Snowflake {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            let now = Self::elapsed_millis();
            let last_millis = current >> SEQUENCE_BITS;
            let last_sequence = current & SEQUENCE_MASK;

            let next = if now > last_millis {
                now << SEQUENCE_BITS
            } else if last_sequence < SEQUENCE_MASK {
                // Same millisecond (or the clock stepped back): keep counting on the last tick
                current + 1
            } else {
                // Sequence exhausted, borrow the next millisecond
                (last_millis + 1) << SEQUENCE_BITS
            };

            match self
                .state
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    let millis = next >> SEQUENCE_BITS;
                    let sequence = next & SEQUENCE_MASK;
                    return Snowflake::new(
                        (millis << TIMESTAMP_SHIFT) | (self.worker_id << SEQUENCE_BITS) | sequence,
                    );
                }
                Err(actual) => current = actual,
            }
        }
    }

    pub fn worker_id(&self) -> u16 {
        self.worker_id as u16
    }

    fn elapsed_millis() -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(Snowflake::EPOCH);
        (now - Snowflake::EPOCH).max(0)
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use std::thread;

    #[test]
    fn test_parse_and_display() {
        let id = Snowflake::parse("987654321").unwrap();
        assert_eq!(id.into_inner(), 987_654_321);
        assert_eq!(id.to_string(), "987654321");
        assert!(Snowflake::parse("abc").is_err());
        assert!(Snowflake::parse("-5").is_err());
    }

    #[test]
    fn test_json_uses_strings() {
        let id = Snowflake::new(123_456_789_012_345_678);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"123456789012345678\"");

        let from_str: Snowflake = serde_json::from_str("\"42\"").unwrap();
        let from_num: Snowflake = serde_json::from_str("42").unwrap();
        assert_eq!(from_str, from_num);
    }

    #[test]
    fn test_generator_is_monotonic() {
        let generator = SnowflakeGenerator::new(3);
        let mut last = Snowflake::default();
        for _ in 0..5000 {
            let id = generator.generate();
            assert!(id > last);
            assert_eq!(id.worker_id(), 3);
            last = id;
        }
    }

    #[test]
    fn test_generator_across_threads() {
        let generator = Arc::new(SnowflakeGenerator::new(1));
        let seen = Arc::new(Mutex::new(HashSet::new()));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = Arc::clone(&generator);
                let seen = Arc::clone(&seen);
                thread::spawn(move || {
                    let ids: Vec<_> = (0..1000).map(|_| generator.generate()).collect();
                    seen.lock().unwrap().extend(ids);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(seen.lock().unwrap().len(), 4000);
    }

    #[test]
    fn test_worker_id_wraps() {
        assert_eq!(SnowflakeGenerator::new(1025).worker_id(), 1);
    }

    #[test]
    fn test_timestamp_is_recent() {
        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as i64;
        let id = SnowflakeGenerator::default().generate();
        assert!(id.timestamp() >= before - 1);
    }
}
