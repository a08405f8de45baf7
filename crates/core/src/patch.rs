//! Tri-state partial updates.

use serde::{Deserialize, Deserializer};

/// One field of a partial-update request.
///
/// Distinguishes "field absent" (keep the current value) from "field null"
/// (clear it) from "field present" (replace it). Containers must tag fields
/// with `#[serde(default)]` so absent keys deserialize to `Patch::Missing`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Missing,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Patch::Missing)
    }

    /// Apply to an optional field: absent keeps, null clears, value replaces.
    pub fn apply_to(self, field: &mut Option<T>) {
        match self {
            Patch::Missing => {}
            Patch::Null => *field = None,
            Patch::Value(v) => *field = Some(v),
        }
    }

    /// Apply to a required field: only an explicit value replaces it.
    pub fn apply_to_required(self, field: &mut T) {
        if let Patch::Value(v) = self {
            *field = v;
        }
    }

    /// The new value, if one was supplied.
    pub fn into_value(self) -> Option<T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(|opt| match opt {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}
