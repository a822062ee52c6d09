use carstate_types::{EntityId, Error, FieldValue, Snapshot, fields};

// ── EntityId ─────────────────────────────────────────────────────

#[test]
fn entity_id_parses_opaque_segment() {
    let id = EntityId::parse("1").unwrap();
    assert_eq!(id.as_str(), "1");
    assert_eq!(id.to_string(), "1");
}

#[test]
fn entity_id_rejects_empty_and_slashes() {
    assert_eq!(EntityId::parse(""), Err(Error::InvalidEntityId(String::new())));
    assert!("a/b".parse::<EntityId>().is_err());
}

#[test]
fn entity_id_serializes_as_string() {
    let id = EntityId::parse("car-7").unwrap();
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"car-7\"");
}

// ── Snapshot ─────────────────────────────────────────────────────

#[test]
fn set_returns_previous_value() {
    let mut snap = Snapshot::new();
    assert_eq!(snap.set("speed", 10_i64), None);
    assert_eq!(snap.set("speed", 20_i64), Some(FieldValue::Integer(10)));
    assert_eq!(snap.get("speed"), Some(&FieldValue::Integer(20)));
    assert_eq!(snap.len(), 1);
}

#[test]
fn display_name_renders_any_scalar() {
    let mut snap = Snapshot::new();
    assert_eq!(snap.display_name(), None);
    snap.set(fields::DISPLAY_NAME, "Blue Thunder");
    assert_eq!(snap.display_name().as_deref(), Some("Blue Thunder"));
    snap.set(fields::DISPLAY_NAME, 42_i64);
    assert_eq!(snap.display_name().as_deref(), Some("42"));
}

#[test]
fn serializes_as_flat_object() {
    let snap: Snapshot = [
        ("battery_level", FieldValue::Integer(80)),
        ("measure", FieldValue::from("km")),
        ("inside_tempF", FieldValue::Float(68.5)),
    ]
    .into_iter()
    .collect();

    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"battery_level": 80, "measure": "km", "inside_tempF": 68.5})
    );
}
