//! Serde helpers for the loosely typed upstream wire format, where numbers
//! routinely arrive as strings.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serializer};

/// A JSON value that is either a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl NumberOrString {
    /// Integer value, or `None` for blank text. Fractional parts are
    /// truncated.
    ///
    /// ## Errors
    ///
    /// Returns the offending text if it is neither blank nor numeric.
    #[expect(clippy::cast_possible_truncation)]
    pub fn to_i64(&self) -> Result<Option<i64>, String> {
        match self {
            Self::Integer(value) => Ok(Some(*value)),
            Self::Float(value) if value.is_finite() => Ok(Some(value.trunc() as i64)),
            Self::Float(value) => Err(value.to_string()),
            Self::Text(text) if text.trim().is_empty() => Ok(None),
            Self::Text(text) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_e| text.clone()),
        }
    }

    /// Textual form, trimmed. Used for identifiers.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Text(text) => text.trim().to_string(),
        }
    }
}

/// Minutes serialized as a decimal string (`"60"`), accepting either form
/// on input.
pub mod duration_string {
    use super::{Deserialize, Deserializer, NumberOrString, Serializer, de};

    /// ## Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(minutes: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(minutes)
    }

    /// ## Errors
    ///
    /// Fails on non-numeric text or values outside the `u32` range.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let raw = NumberOrString::deserialize(deserializer)?;
        let value = raw
            .to_i64()
            .map_err(|text| de::Error::custom(format!("invalid duration {text:?}")))?
            .unwrap_or_default();
        u32::try_from(value).map_err(de::Error::custom)
    }
}
