//! Derived-field rules.
//!
//! Every accepted update writes, in order:
//! 1. the primary field itself;
//! 2. `Date`, the RFC 3339 instant of the update;
//! 3. for `*_km` fields, the suffix-less field in the configured distance
//!    unit plus the `measure` label;
//! 4. for `state`, the human-readable `carState`;
//! 5. for `rated_battery_range_km`, the `battery_range` alias of the
//!    converted value from step 3;
//! 6. for `inside_temp`, `inside_tempF`.
//!
//! A derived field whose source value is not numeric is cleared rather than
//! left holding a value derived from an earlier reading.
//!
//! A new entity starts out with the `measure` and `temperature` labels.

use carstate_types::{
    DistanceUnit, FieldValue, Snapshot, TemperatureUnit, celsius_to_fahrenheit, fields,
};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

/// Units the relay reports in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitConfig {
    pub distance: DistanceUnit,
    pub temperature: TemperatureUnit,
}

/// One whitelisted field update.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate<'a> {
    /// Field name taken from the topic.
    pub field: &'a str,
    /// Payload text before coercion.
    pub raw: &'a str,
    /// Coerced payload.
    pub value: FieldValue,
}

/// Maps a TeslaMate state to the label shown by widgets. Unknown states pass
/// through unchanged.
pub fn car_state_label(state: &str) -> &str {
    match state {
        "asleep" | "suspended" => "Sleeping",
        "online" => "Idle",
        "charging" => "Charging",
        "driving" => "Driving",
        other => other,
    }
}

/// Applies the derived-field rules. Pure apart from the `now` argument.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformEngine {
    units: UnitConfig,
}

impl TransformEngine {
    pub fn new(units: UnitConfig) -> Self {
        Self { units }
    }

    /// Snapshot for an entity seen for the first time.
    pub fn initial_snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot::new();
        snapshot.set(fields::MEASURE, self.units.distance.as_str());
        snapshot.set(fields::TEMPERATURE, self.units.temperature.as_str());
        snapshot
    }

    /// Writes the update and everything derived from it into `snapshot`.
    pub fn apply(&self, snapshot: &mut Snapshot, update: &FieldUpdate<'_>, now: DateTime<Utc>) {
        let field = update.field;

        snapshot.set(field, update.value.clone());
        snapshot.set(
            fields::DATE,
            now.to_rfc3339_opts(SecondsFormat::Secs, true),
        );

        let mut distance = None;
        if let Some(base) = field
            .strip_suffix(fields::KM_SUFFIX)
            .filter(|base| !base.is_empty())
        {
            snapshot.set(fields::MEASURE, self.units.distance.as_str());
            distance = self.distance_value(&update.value);
            match &distance {
                Some(value) => {
                    snapshot.set(base, value.clone());
                }
                None => {
                    debug!("Skipping {} conversion of non-numeric {:?}", base, update.value);
                    snapshot.remove(base);
                }
            }
        }

        if field == fields::STATE {
            snapshot.set(fields::CAR_STATE, car_state_label(update.raw));
        }

        // Aliases the converted value, so in imperial mode this is miles
        // rather than the raw km reading TeslaMate widgets historically got.
        if field == fields::RATED_BATTERY_RANGE_KM {
            match distance {
                Some(range) => {
                    snapshot.set(fields::BATTERY_RANGE, range);
                }
                None => {
                    snapshot.remove(fields::BATTERY_RANGE);
                }
            }
        }

        if field == fields::INSIDE_TEMP {
            match update.value.as_f64() {
                Some(celsius) => {
                    snapshot.set(fields::INSIDE_TEMP_F, celsius_to_fahrenheit(celsius));
                }
                None => {
                    debug!("Skipping inside_tempF for non-numeric {:?}", update.value);
                    snapshot.remove(fields::INSIDE_TEMP_F);
                }
            }
        }
    }

    // Km values are copied as-is; imperial needs a number to convert.
    fn distance_value(&self, value: &FieldValue) -> Option<FieldValue> {
        match self.units.distance {
            DistanceUnit::Km => Some(value.clone()),
            DistanceUnit::Imperial => value
                .as_f64()
                .and_then(|km| self.units.distance.convert_km(km))
                .map(FieldValue::Float),
        }
    }
}
