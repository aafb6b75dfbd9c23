//! Explicit-presence field updates.
//!
//! A partial update must tell "key not sent" apart from "key sent with a
//! falsy value". `FieldUpdate` makes that a type-level distinction:
//!
//! | JSON             | FieldUpdate          |
//! |------------------|----------------------|
//! | key absent       | `Absent`             |
//! | `"price": null`  | `Present(None)`      |
//! | `"price": 0`     | `Present(Some(0))`   |
//!
//! Fields must be declared with `#[serde(default)]` so that a missing key
//! deserializes to `Absent`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    #[default]
    Absent,
    Present(Option<T>),
}

impl<T> FieldUpdate<T> {
    pub fn set(value: T) -> Self {
        FieldUpdate::Present(Some(value))
    }

    pub fn clear() -> Self {
        FieldUpdate::Present(None)
    }

    /// Overwrite `target` if the field was supplied, whatever its value.
    /// Returns whether `target` was written.
    pub fn apply_to(&self, target: &mut Option<T>) -> bool
    where
        T: Clone,
    {
        match self {
            FieldUpdate::Absent => false,
            FieldUpdate::Present(value) => {
                *target = value.clone();
                true
            }
        }
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(value: Option<T>) -> Self {
        FieldUpdate::Present(value)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldUpdate<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Only reached when the key exists.
        Option::<T>::deserialize(deserializer).map(FieldUpdate::Present)
    }
}

impl<T: Serialize> Serialize for FieldUpdate<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldUpdate::Absent => serializer.serialize_none(),
            FieldUpdate::Present(value) => value.serialize(serializer),
        }
    }
}
