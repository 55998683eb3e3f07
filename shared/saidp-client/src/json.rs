use serde::{Deserialize, Deserializer};

/// Decodes an explicit `null` the same way as a missing member.
///
/// Use together with `#[serde(default)]` on members the IdP sometimes sends
/// as `null`.
///
/// # Errors
///
/// Returns an error if the value is neither `null` nor a valid `T`
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
