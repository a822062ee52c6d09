//! Latest-value snapshot of one entity.

use crate::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Names of the fields the transform engine writes on its own.
pub mod fields {
    /// RFC 3339 instant of the last accepted message.
    pub const DATE: &str = "Date";
    /// Distance unit label (`km` or `imperial`).
    pub const MEASURE: &str = "measure";
    /// Temperature unit label (`C` or `F`).
    pub const TEMPERATURE: &str = "temperature";
    /// Human-readable vehicle state derived from `state`.
    pub const CAR_STATE: &str = "carState";
    /// Alias of the converted rated battery range.
    pub const BATTERY_RANGE: &str = "battery_range";
    /// Fahrenheit rendering of `inside_temp`.
    pub const INSIDE_TEMP_F: &str = "inside_tempF";

    pub const STATE: &str = "state";
    pub const RATED_BATTERY_RANGE_KM: &str = "rated_battery_range_km";
    pub const INSIDE_TEMP: &str = "inside_temp";
    pub const DISPLAY_NAME: &str = "display_name";

    /// Suffix marking a field reported in kilometres.
    pub const KM_SUFFIX: &str = "_km";
}

/// Mapping from field name to the latest known value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    values: BTreeMap<String, FieldValue>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of a field, if set.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Sets a field, returning the previous value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.values.insert(field.into(), value.into())
    }

    /// Clears a field, returning its value.
    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.values.remove(field)
    }

    /// Returns true if the field is set.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Number of fields set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates fields in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.values.iter()
    }

    /// The vehicle's display name rendered as text, if one was received.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        self.get(fields::DISPLAY_NAME).map(ToString::to_string)
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
