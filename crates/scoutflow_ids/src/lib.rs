//! Time-sortable record identifiers for scoutflow.
//!
//! A [`RecordId`] is a 128-bit value: the high 48 bits hold the creation time
//! in Unix milliseconds and the low 80 bits hold randomness. Comparing two ids
//! compares the raw `u128`, so ids minted later sort after ids minted earlier.
//! The text form is 26 characters of Crockford base32, which sorts
//! lexicographically in the same order as the numeric value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of low-order bits holding the random component.
pub const RANDOM_BITS: u32 = 80;

/// Largest millisecond timestamp an id can carry (48 bits).
pub const MAX_TIMESTAMP_MS: u64 = (1 << 48) - 1;

const RANDOM_MASK: u128 = (1 << RANDOM_BITS) - 1;
const ENCODED_LEN: usize = 26;
const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Error returned when parsing an identifier from text fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdParseError {
    message: String,
}

impl IdParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for IdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for IdParseError {}

/// Identifier assigned to every accepted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u128);

impl RecordId {
    /// Build an id from a millisecond timestamp and a random component.
    ///
    /// The timestamp is clamped to 48 bits and the random part is masked to 80 bits.
    pub fn from_parts(timestamp_ms: u64, random: u128) -> Self {
        let timestamp = u128::from(timestamp_ms.min(MAX_TIMESTAMP_MS));
        Self((timestamp << RANDOM_BITS) | (random & RANDOM_MASK))
    }

    pub fn from_u128(value: u128) -> Self {
        Self(value)
    }

    pub fn as_u128(&self) -> u128 {
        self.0
    }

    /// Milliseconds since the Unix epoch encoded in the high bits.
    pub fn timestamp_ms(&self) -> u64 {
        // 48 significant bits always fit.
        (self.0 >> RANDOM_BITS) as u64
    }

    pub fn random(&self) -> u128 {
        self.0 & RANDOM_MASK
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.timestamp_ms())
            .ok()
            .and_then(DateTime::from_timestamp_millis)
    }

    /// Calendar time of the timestamp component, `YYYY-MM-DD HH:MM:SS.mmm` in UTC.
    pub fn readable_time(&self) -> String {
        match self.datetime() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            None => format!("{}ms", self.timestamp_ms()),
        }
    }

    fn successor(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn parse(value: &str) -> Result<Self, IdParseError> {
        if value.len() != ENCODED_LEN {
            return Err(IdParseError::new(format!(
                "Invalid record ID '{}': expected {} characters, got {}",
                value,
                ENCODED_LEN,
                value.len()
            )));
        }

        let mut acc: u128 = 0;
        for (idx, ch) in value.chars().enumerate() {
            let digit = decode_digit(ch).ok_or_else(|| {
                IdParseError::new(format!("Invalid record ID '{}': bad character '{}'", value, ch))
            })?;
            // 26 * 5 = 130 bits, so the leading digit may only carry 3.
            if idx == 0 && digit > 7 {
                return Err(IdParseError::new(format!(
                    "Invalid record ID '{}': value overflows 128 bits",
                    value
                )));
            }
            acc = (acc << 5) | u128::from(digit);
        }
        Ok(Self(acc))
    }
}

fn decode_digit(ch: char) -> Option<u8> {
    let upper = ch.to_ascii_uppercase();
    ALPHABET
        .iter()
        .position(|&b| char::from(b) == upper)
        .and_then(|pos| u8::try_from(pos).ok())
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; ENCODED_LEN];
        let mut value = self.0;
        for slot in buf.iter_mut().rev() {
            *slot = ALPHABET[(value & 0x1f) as usize];
            value >>= 5;
        }
        // Every byte comes from ALPHABET, which is ASCII.
        f.write_str(std::str::from_utf8(&buf).map_err(|_| fmt::Error)?)
    }
}

impl FromStr for RecordId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = <String as Deserialize>::deserialize(deserializer)?;
        RecordId::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Mints strictly increasing [`RecordId`]s for one process.
///
/// When the clock has not moved past the previous id's millisecond (same
/// millisecond, or a clock that stepped backwards) the previous timestamp is
/// kept and the random component is incremented. Overflowing the random field
/// carries into the timestamp.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: Option<RecordId>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Mint an id stamped with the current wall-clock time.
    pub fn next_id(&mut self) -> RecordId {
        self.next_at(now_millis())
    }

    /// Mint an id for an explicit clock reading.
    pub fn next_at(&mut self, timestamp_ms: u64) -> RecordId {
        let id = match self.last {
            Some(last) if timestamp_ms.min(MAX_TIMESTAMP_MS) <= last.timestamp_ms() => {
                last.successor()
            }
            _ => RecordId::from_parts(timestamp_ms, rand::random::<u128>()),
        };
        self.last = Some(id);
        id
    }

    pub fn last(&self) -> Option<RecordId> {
        self.last
    }
}

/// Current wall-clock time in Unix milliseconds (0 if the clock is before the epoch).
pub fn now_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_round_trip() {
        let id = RecordId::from_parts(1_700_000_000_123, 0xABCDEF);
        assert_eq!(id.timestamp_ms(), 1_700_000_000_123);
        assert_eq!(id.random(), 0xABCDEF);
    }

    #[test]
    fn test_random_part_is_masked() {
        let id = RecordId::from_parts(5, u128::MAX);
        assert_eq!(id.timestamp_ms(), 5);
        assert_eq!(id.random(), RANDOM_MASK);
    }

    #[test]
    fn test_timestamp_dominates_ordering() {
        let early = RecordId::from_parts(1_000, RANDOM_MASK);
        let late = RecordId::from_parts(1_001, 0);
        assert!(early < late);
        assert!(early.to_string() < late.to_string());
    }

    #[test]
    fn test_text_form() {
        let id = RecordId::from_parts(1_700_000_000_000, 42);
        let text = id.to_string();
        assert_eq!(text.len(), 26);
        assert_eq!(text.parse::<RecordId>().unwrap(), id);
        assert_eq!(text.to_lowercase().parse::<RecordId>().unwrap(), id);
        assert_eq!(RecordId::from_u128(0).to_string(), "0".repeat(26));
        assert_eq!(RecordId::from_u128(u128::MAX).to_string(), format!("7{}", "Z".repeat(25)));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(RecordId::parse("short").is_err());
        assert!(RecordId::parse(&"U".repeat(26)).is_err());
        assert!(RecordId::parse(&format!("8{}", "0".repeat(25))).is_err());
    }

    #[test]
    fn test_readable_time() {
        let id = RecordId::from_parts(1_700_000_000_123, 7);
        assert_eq!(id.readable_time(), "2023-11-14 22:13:20.123");
    }

    #[test]
    fn test_serde_as_string() {
        let id = RecordId::from_parts(1_700_000_000_000, 99);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_generator_same_millisecond_is_strictly_increasing() {
        let mut gen = IdGenerator::new();
        let a = gen.next_at(10_000);
        let b = gen.next_at(10_000);
        let c = gen.next_at(10_000);
        assert!(a < b && b < c);
        assert_eq!(b.timestamp_ms(), 10_000);
        assert_eq!(b.as_u128(), a.as_u128() + 1);
    }

    #[test]
    fn test_generator_survives_clock_regression() {
        let mut gen = IdGenerator::new();
        let a = gen.next_at(20_000);
        let b = gen.next_at(19_000);
        assert!(a < b);
        assert_eq!(b.timestamp_ms(), 20_000);
    }

    #[test]
    fn test_generator_random_overflow_carries_into_timestamp() {
        let mut gen = IdGenerator {
            last: Some(RecordId::from_parts(30_000, RANDOM_MASK)),
        };
        let next = gen.next_at(30_000);
        assert_eq!(next.timestamp_ms(), 30_001);
        assert_eq!(next.random(), 0);
    }

    #[test]
    fn test_generator_wall_clock_sequence() {
        let mut gen = IdGenerator::new();
        let ids: Vec<RecordId> = (0..1_000).map(|_| gen.next_id()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(gen.last(), ids.last().copied());
    }
}
