//! Decoding helper for JSON written by encoders that emit `null` for empty
//! strings, lists, and maps.

use serde::{Deserialize, Deserializer};

/// Decodes an explicit `null` to `T::default()`. Pair with `#[serde(default)]`
/// so an absent member behaves the same way.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
