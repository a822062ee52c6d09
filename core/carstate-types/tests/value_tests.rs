use carstate_types::FieldValue;
use proptest::prelude::*;

// ── Rule order ───────────────────────────────────────────────────

#[test]
fn false_literal_is_zero() {
    assert_eq!(FieldValue::coerce("false"), FieldValue::Integer(0));
}

#[test]
fn true_literal_is_one() {
    assert_eq!(FieldValue::coerce("true"), FieldValue::Integer(1));
}

#[test]
fn one_is_integer_not_boolean() {
    assert_eq!(FieldValue::coerce("1"), FieldValue::Integer(1));
    assert_eq!(FieldValue::coerce("0"), FieldValue::Integer(0));
}

#[test]
fn boolean_literals_are_case_sensitive() {
    assert_eq!(FieldValue::coerce("True"), FieldValue::String("True".into()));
    assert_eq!(FieldValue::coerce("FALSE"), FieldValue::String("FALSE".into()));
}

#[test]
fn signed_integers() {
    assert_eq!(FieldValue::coerce("-42"), FieldValue::Integer(-42));
    assert_eq!(FieldValue::coerce("+7"), FieldValue::Integer(7));
}

#[test]
fn integer_overflow_falls_back_to_float() {
    let v = FieldValue::coerce("99999999999999999999");
    assert!(matches!(v, FieldValue::Float(f) if f > 9.9e19));
}

#[test]
fn decimals_are_float() {
    assert_eq!(FieldValue::coerce("21.5"), FieldValue::Float(21.5));
    assert_eq!(FieldValue::coerce("-0.25"), FieldValue::Float(-0.25));
    assert_eq!(FieldValue::coerce("1e3"), FieldValue::Float(1000.0));
}

#[test]
fn non_numeric_is_string() {
    assert_eq!(FieldValue::coerce("online"), FieldValue::String("online".into()));
    assert_eq!(FieldValue::coerce(""), FieldValue::String(String::new()));
    assert_eq!(FieldValue::coerce(" 12"), FieldValue::String(" 12".into()));
}

#[test]
fn non_finite_floats_stay_strings() {
    assert_eq!(FieldValue::coerce("NaN"), FieldValue::String("NaN".into()));
    assert_eq!(FieldValue::coerce("inf"), FieldValue::String("inf".into()));
    assert_eq!(FieldValue::coerce("-infinity"), FieldValue::String("-infinity".into()));
}

#[test]
fn invalid_utf8_payload_is_lossy_string() {
    let v = FieldValue::from_payload(&[0x66, 0xff, 0x6f]);
    assert_eq!(v, FieldValue::String("f\u{fffd}o".into()));
}

// ── Accessors ────────────────────────────────────────────────────

#[test]
fn as_f64_for_numeric_only() {
    assert_eq!(FieldValue::Integer(3).as_f64(), Some(3.0));
    assert_eq!(FieldValue::Float(2.5).as_f64(), Some(2.5));
    assert_eq!(FieldValue::String("3".into()).as_f64(), None);
}

#[test]
fn display_renders_plain_scalars() {
    assert_eq!(FieldValue::Integer(5).to_string(), "5");
    assert_eq!(FieldValue::Float(1.5).to_string(), "1.5");
    assert_eq!(FieldValue::String("Model 3".into()).to_string(), "Model 3");
}

// ── Serialization ────────────────────────────────────────────────

#[test]
fn serializes_as_bare_scalars() {
    assert_eq!(serde_json::to_string(&FieldValue::Integer(1)).unwrap(), "1");
    assert_eq!(serde_json::to_string(&FieldValue::Float(62.15)).unwrap(), "62.15");
    assert_eq!(serde_json::to_string(&FieldValue::from("x")).unwrap(), "\"x\"");
}

#[test]
fn deserializes_numbers_by_shape() {
    let v: FieldValue = serde_json::from_str("68.0").unwrap();
    assert_eq!(v, FieldValue::Float(68.0));
    let v: FieldValue = serde_json::from_str("68").unwrap();
    assert_eq!(v, FieldValue::Integer(68));
}

// ── Properties ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn any_i64_text_coerces_to_itself(n in any::<i64>()) {
        prop_assert_eq!(FieldValue::coerce(&n.to_string()), FieldValue::Integer(n));
    }

    #[test]
    fn alphabetic_payloads_are_strings(s in "[g-z]{1,12}") {
        prop_assume!(!["true", "false", "inf", "infinity", "nan"].contains(&s.as_str()));
        prop_assert_eq!(FieldValue::coerce(&s), FieldValue::String(s.clone()));
    }
}
