use tessera::collection::Document;
use tessera::common::Value;
use tessera::doc;
use tessera::errors::ErrorKind;
use tessera_int_test::test_util::timestamp;

#[test]
fn test_nested_paths() {
    let mut document = doc! {
        name: "Ada",
        address: {
            city: "London",
            lines: ["12 Baker St", "Marylebone"],
        },
    };

    assert_eq!(
        document.get_string("address.city").unwrap(),
        Some("London".to_string())
    );
    assert_eq!(
        document.get_string("address.lines.1").unwrap(),
        Some("Marylebone".to_string())
    );
    assert!(document.get("address.zip").is_none());
    assert!(document.get("name.first").is_none());

    document.set("address.geo.lat", 51.52);
    assert!(document.has("address.geo"));
    assert_eq!(document.get_float("address.geo.lat").unwrap(), Some(51.52));

    let removed = document.unset("address.city");
    assert_eq!(removed, Some(Value::from("London")));
    assert!(!document.has("address.city"));
    assert!(document.has("address.lines"));
}

#[test]
fn test_set_replaces_scalar_segment() {
    let mut document = doc! { profile: "none" };
    document.set("profile.bio", "hello");
    assert_eq!(
        document.get_string("profile.bio").unwrap(),
        Some("hello".to_string())
    );
}

#[test]
fn test_typed_getters_coerce() {
    let document = doc! {
        count: "42",
        ratio: 3,
        flag: "TRUE",
        joined: "2021-03-04T05:06:07Z",
        empty: (Value::Null),
    };

    assert_eq!(document.get_int("count").unwrap(), Some(42));
    assert_eq!(document.get_long("count").unwrap(), Some(42));
    assert_eq!(document.get_float("ratio").unwrap(), Some(3.0));
    assert_eq!(document.get_boolean("flag").unwrap(), Some(true));
    assert_eq!(
        document.get_timestamp("joined").unwrap(),
        Some(timestamp("2021-03-04T05:06:07Z").unwrap())
    );
    assert_eq!(document.get_int("empty").unwrap(), None);
    assert_eq!(document.get_int("missing").unwrap(), None);
    assert_eq!(document.get_int_or("missing", 7).unwrap(), 7);
    assert_eq!(document.get_string_or("empty", "n/a").unwrap(), "n/a");
}

#[test]
fn test_typed_getter_rejects_incompatible_value() {
    let document = doc! { name: "Ada", tags: ["a"] };

    let err = document.get_int("name").unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidDataType);

    let err = document.get_document("tags").unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidDataType);
}

#[test]
fn test_equality_ignores_field_order() {
    let first = doc! { a: 1, b: { c: "x", d: [1, 2] } };
    let second = doc! { b: { d: [1, 2], c: "x" }, a: 1 };
    let third = doc! { a: 1, b: { c: "x", d: [2, 1] } };

    assert_eq!(first, second);
    assert_ne!(first, third);
}

#[test]
fn test_merge_overwrites_and_recurses() {
    let mut target = doc! { name: "Ada", address: { city: "London", zip: "NW1" } };
    let patch = doc! { age: 36, address: { city: "Cambridge" } };
    target.merge(&patch);

    assert_eq!(target.get_int("age").unwrap(), Some(36));
    assert_eq!(
        target.get_string("address.city").unwrap(),
        Some("Cambridge".to_string())
    );
    assert_eq!(
        target.get_string("address.zip").unwrap(),
        Some("NW1".to_string())
    );
}

#[test]
fn test_identifier_accessors() {
    let mut document = Document::new();
    assert!(!document.has_id());

    document.set_id("custom-1");
    assert!(document.has_id());
    assert_eq!(document.id(), Some("custom-1".to_string()));
    assert!(document.document_id().is_none());
}
