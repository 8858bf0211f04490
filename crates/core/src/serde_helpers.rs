//! Serde helpers shared by request DTOs.

use serde::{Deserialize, Deserializer};

/// Deserialize a nullable field so that "absent" and "explicit null" differ.
///
/// Pair with `#[serde(default, deserialize_with = "double_option")]`:
///
/// | JSON             | Result           |
/// |------------------|------------------|
/// | key missing      | `None`           |
/// | `"key": null`    | `Some(None)`     |
/// | `"key": value`   | `Some(Some(v))`  |
///
/// Update DTOs use this for columns that a client may want to clear.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
