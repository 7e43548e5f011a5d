//! Helpers for the optional free-text fields (descriptions and notes).

use serde::{Deserialize, Deserializer};

/// Trim `text` and treat an empty result as no text at all.
pub fn normalize(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

/// Deserialize a field that is present in the JSON body as `Some`.
///
/// Combined with `#[serde(default)]` on an `Option<Option<T>>` field this
/// distinguishes a missing field (`None`) from an explicit `null` (`Some(None)`).
pub fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
