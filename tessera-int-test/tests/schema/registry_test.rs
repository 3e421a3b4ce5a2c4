use tessera::doc;
use tessera::errors::ErrorKind;
use tessera::schema::{unique_index, Schema, SchemaRegistry};
use tessera::Tessera;
use tessera_int_test::test_util::{posts_schema, users_schema};

#[test]
fn test_builder_registers_schemas() {
    let db = Tessera::builder()
        .schema(users_schema())
        .schema(posts_schema())
        .open()
        .unwrap();

    assert_eq!(db.registry().names(), vec!["posts", "users"]);
    let users = db.registry().get("users").unwrap();
    assert!(users.has_timestamps());
    assert_eq!(users.unique_fields(), vec!["email"]);
    assert_eq!(users.indexes().len(), 1);
    assert!(users.indexes()[0].options().is_unique());
    assert!(users.get_field("address.city").unwrap().is_required());
}

#[test]
fn test_shared_registry_across_instances() {
    let registry = SchemaRegistry::new();
    users_schema().register(&registry).unwrap();

    let first = Tessera::builder()
        .schema_registry(registry.clone())
        .open()
        .unwrap();
    let second = Tessera::builder()
        .schema_registry(registry.clone())
        .open()
        .unwrap();

    assert!(first.registry().contains("users"));
    assert!(second.registry().contains("users"));

    posts_schema().register(&registry).unwrap();
    assert!(first.registry().contains("posts"));
}

#[test]
fn test_schema_registered_after_open_applies_to_next_write() {
    let db = Tessera::builder().open().unwrap();

    let mut loose = doc! { text: "anything" };
    db.insert("notes", &mut loose).unwrap();

    Schema::collection("notes")
        .string("text")
        .required()
        .register(db.registry())
        .unwrap();

    let mut empty = doc! { other: 1 };
    let err = db.insert("notes", &mut empty).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::MissingRequiredField);
}

#[test]
fn test_last_registration_wins() {
    let db = Tessera::builder().open().unwrap();
    Schema::collection("notes")
        .string("text")
        .required()
        .register(db.registry())
        .unwrap();
    Schema::collection("notes")
        .string("text")
        .register(db.registry())
        .unwrap();

    let mut empty = doc! { other: 1 };
    assert!(db.insert("notes", &mut empty).is_ok());
}

#[test]
fn test_invalid_schema_fails_open() {
    let err = Tessera::builder()
        .schema(Schema::collection("broken").string("code").pattern("(unclosed"))
        .open()
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::SchemaError);

    let err = Tessera::builder()
        .schema(Schema::collection("broken").index(&[], unique_index()))
        .open()
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::SchemaError);
}

#[test]
fn test_embedded_schema_cannot_be_registered() {
    let registry = SchemaRegistry::new();
    let err = Schema::object()
        .string("city")
        .register(&registry)
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
    assert!(registry.is_empty());
}
