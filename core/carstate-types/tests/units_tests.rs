use carstate_types::{
    DistanceUnit, Error, TemperatureUnit, celsius_to_fahrenheit, round2,
};

// ── Distance ─────────────────────────────────────────────────────

#[test]
fn distance_unit_parses_known_labels() {
    assert_eq!("km".parse::<DistanceUnit>().unwrap(), DistanceUnit::Km);
    assert_eq!("imperial".parse::<DistanceUnit>().unwrap(), DistanceUnit::Imperial);
}

#[test]
fn distance_unit_rejects_other_labels() {
    let err = "miles".parse::<DistanceUnit>().unwrap_err();
    assert_eq!(err, Error::InvalidDistanceUnit("miles".into()));
}

#[test]
fn distance_default_is_km() {
    assert_eq!(DistanceUnit::default(), DistanceUnit::Km);
    assert_eq!(DistanceUnit::default().to_string(), "km");
}

#[test]
fn km_has_no_conversion() {
    assert_eq!(DistanceUnit::Km.convert_km(100.0), None);
}

#[test]
fn imperial_converts_and_rounds() {
    assert_eq!(DistanceUnit::Imperial.convert_km(100.0), Some(62.15));
    assert_eq!(DistanceUnit::Imperial.convert_km(0.0), Some(0.0));
}

// ── Temperature ──────────────────────────────────────────────────

#[test]
fn temperature_unit_round_trips_labels() {
    for unit in [TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit] {
        assert_eq!(unit.as_str().parse::<TemperatureUnit>().unwrap(), unit);
    }
}

#[test]
fn temperature_unit_rejects_lowercase() {
    assert!(matches!(
        "c".parse::<TemperatureUnit>(),
        Err(Error::InvalidTemperatureUnit(_))
    ));
}

#[test]
fn fahrenheit_conversion() {
    assert_eq!(celsius_to_fahrenheit(20.0), 68.0);
    assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
    assert_eq!(celsius_to_fahrenheit(21.3), 70.34);
}

#[test]
fn round2_half_away_from_zero() {
    assert_eq!(round2(1.005_000_1), 1.01);
    assert_eq!(round2(-2.345_000_1), -2.35);
}
