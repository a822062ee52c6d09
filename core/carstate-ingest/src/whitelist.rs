//! Field whitelist.
//!
//! Two fixed sets: the basic fields are always stored, the authenticated
//! fields (location, locks, odometer and similar) only when the relay runs
//! with an API key.

use std::collections::HashSet;

/// Fields accepted in every mode.
pub const BASIC_FIELDS: &[&str] = &[
    "battery_level",
    "charge_energy_added",
    "charge_limit_soc",
    "display_name",
    "est_battery_range_km",
    "exterior_color",
    "ideal_battery_range_km",
    "inside_temp",
    "is_climate_on",
    "is_preconditioning",
    "outside_temp",
    "model",
    "plugged_in",
    "rated_battery_range_km",
    "spoiler_type",
    "state",
    "time_to_full_charge",
    "update_available",
    "update_version",
    "usable_battery_level",
    "version",
    "wheel_type",
];

/// Fields accepted only in authenticated mode.
pub const AUTHENTICATED_FIELDS: &[&str] = &[
    "doors_open",
    "elevation",
    "is_user_present",
    "latitude",
    "longitude",
    "locked",
    "odometer",
    "sentry_mode",
    "speed",
    "trunk_open",
];

/// Authorization level of the whole process, fixed at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AccessMode {
    #[default]
    Anonymous,
    Authenticated,
}

impl AccessMode {
    /// Authenticated iff a non-empty API key is configured.
    pub fn from_api_key(api_key: Option<&str>) -> Self {
        match api_key {
            Some(key) if !key.is_empty() => Self::Authenticated,
            _ => Self::Anonymous,
        }
    }

    pub fn is_authenticated(self) -> bool {
        self == Self::Authenticated
    }
}

/// Computes the accepted field set for an authentication flag.
pub fn valid_fields(authenticated: bool) -> HashSet<&'static str> {
    let mut fields: HashSet<&'static str> = BASIC_FIELDS.iter().copied().collect();
    if authenticated {
        fields.extend(AUTHENTICATED_FIELDS.iter().copied());
    }
    fields
}

/// Accepts or rejects field names for one access mode.
#[derive(Debug, Clone)]
pub struct FieldWhitelist {
    mode: AccessMode,
    fields: HashSet<&'static str>,
}

impl FieldWhitelist {
    pub fn new(mode: AccessMode) -> Self {
        Self {
            mode,
            fields: valid_fields(mode.is_authenticated()),
        }
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    pub fn accepts(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for FieldWhitelist {
    fn default() -> Self {
        Self::new(AccessMode::default())
    }
}
