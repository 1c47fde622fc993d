//! Snowflake value object.
//!
//! Wraps the packed 64-bit identifier minted by
//! [`crate::shared::snowflake::SnowflakeGenerator`] and knows how to unpack
//! it back into its fields. The only persisted/transmitted form is the
//! decimal string of the packed integer, so JSON serialization goes through
//! `Display`/`FromStr` and must round-trip exactly.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::shared::snowflake::{
    Category, SnowflakeError, CATEGORY_MASK, CATEGORY_SHIFT, ROLLPLAYER_EPOCH, SEQUENCE_MASK,
    TIMESTAMP_MASK, TIMESTAMP_SHIFT,
};

/// A packed (timestamp, category, sequence) identifier.
///
/// Totally ordered: IDs minted later compare greater, and IDs minted within
/// the same millisecond order by sequence. Immutable once minted, never
/// reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Snowflake(i64);

impl Snowflake {
    /// Wrap a raw value already known to be valid (e.g. read back from the
    /// database, where IDs were minted by us).
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Pack an ID from its logical fields. `elapsed_ms` is relative to the
    /// Rollplayer epoch.
    pub fn from_parts(elapsed_ms: u64, category: Category, sequence: u64) -> Self {
        let ts = (elapsed_ms & TIMESTAMP_MASK) << TIMESTAMP_SHIFT;
        let cat = (category as u64 & CATEGORY_MASK) << CATEGORY_SHIFT;
        let seq = sequence & SEQUENCE_MASK;
        Self((ts | cat | seq) as i64)
    }

    /// Unpack into (unix timestamp ms, category, sequence).
    pub fn parts(&self) -> Result<(u64, Category, u64), SnowflakeError> {
        if self.0 < 0 {
            return Err(SnowflakeError::MalformedId(self.0.to_string()));
        }
        Ok((self.timestamp_ms(), self.category()?, self.sequence()))
    }

    /// Milliseconds since the Unix epoch at which this ID was minted.
    pub fn timestamp_ms(&self) -> u64 {
        ((self.0 as u64 >> TIMESTAMP_SHIFT) & TIMESTAMP_MASK) + ROLLPLAYER_EPOCH
    }

    /// Creation time as a `DateTime`.
    pub fn created_at(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.timestamp_ms() as i64)
            .single()
            .unwrap_or_else(Utc::now)
    }

    /// The category field, classifying what kind of entity this ID names.
    pub fn category(&self) -> Result<Category, SnowflakeError> {
        Category::try_from((self.0 as u64 >> CATEGORY_SHIFT) & CATEGORY_MASK)
    }

    /// The per-millisecond sequence field.
    pub fn sequence(&self) -> u64 {
        self.0 as u64 & SEQUENCE_MASK
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Snowflake {
    type Err = SnowflakeError;

    /// Parse the decimal wire form. Rejects anything that does not fit the
    /// fixed-width layout, including negative values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .parse()
            .map_err(|_| SnowflakeError::MalformedId(s.to_string()))?;
        if value < 0 {
            return Err(SnowflakeError::MalformedId(s.to_string()));
        }
        Ok(Self(value))
    }
}

impl From<i64> for Snowflake {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Snowflake> for i64 {
    fn from(snowflake: Snowflake) -> Self {
        snowflake.0
    }
}

impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parts_round_trip() {
        let id = Snowflake::from_parts(1_000_000, Category::User, 42);
        let (ts, category, sequence) = id.parts().unwrap();
        assert_eq!(ts, ROLLPLAYER_EPOCH + 1_000_000);
        assert_eq!(category, Category::User);
        assert_eq!(sequence, 42);
    }

    #[test]
    fn wire_form_round_trips_exactly() {
        let id = Snowflake::from_parts(123_456_789, Category::Message, 7);
        let wire = id.to_string();
        let back: Snowflake = wire.parse().unwrap();
        assert_eq!(back, id);
        assert_eq!(back.to_string(), wire);
    }

    #[test]
    fn json_serializes_as_decimal_string() {
        let id = Snowflake::from_parts(5_000, Category::Server, 1);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_i64()));

        let back: Snowflake = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn negative_and_garbage_inputs_are_malformed() {
        assert!(matches!(
            "-5".parse::<Snowflake>(),
            Err(SnowflakeError::MalformedId(_))
        ));
        assert!(matches!(
            "not-a-number".parse::<Snowflake>(),
            Err(SnowflakeError::MalformedId(_))
        ));
        assert!("99999999999999999999999".parse::<Snowflake>().is_err());
    }

    #[test]
    fn unknown_category_bits_are_rejected() {
        // Category field set to 999, which no variant claims.
        let raw = (1_u64 << TIMESTAMP_SHIFT) | (999 << CATEGORY_SHIFT);
        let id = Snowflake::new(raw as i64);
        assert!(matches!(
            id.category(),
            Err(SnowflakeError::InvalidCategory(999))
        ));
    }

    #[test]
    fn later_timestamp_always_compares_greater() {
        let older = Snowflake::from_parts(1_000, Category::Message, 4_000);
        let newer = Snowflake::from_parts(1_001, Category::Message, 0);
        assert!(older < newer);
    }
}
