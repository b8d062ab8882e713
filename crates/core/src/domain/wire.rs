//! Decoding helpers for the backend's ORM-shaped JSON.
//!
//! The backend serializes unset foreign keys as `0` and unloaded associations
//! as zero-valued objects, and emits `null` for empty slices.

use serde::{Deserialize, Deserializer};

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn zero_id_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<u64>,
{
    let raw = Option::<u64>::deserialize(deserializer)?;
    Ok(raw.filter(|id| *id != 0).map(T::from))
}

/// Associations whose `ID` is zero were not preloaded by the backend.
pub(crate) fn unloaded_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Loaded,
{
    let raw = Option::<T>::deserialize(deserializer)?;
    Ok(raw.filter(Loaded::is_loaded))
}

pub(crate) trait Loaded {
    fn is_loaded(&self) -> bool;
}
