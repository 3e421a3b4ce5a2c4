use chrono::{DateTime, Utc};
use tessera::collection::Document;
use tessera::common::Value;
use tessera::doc;
use tessera::errors::ErrorKind;
use tessera_derive::Convertible;
use tessera_int_test::test_util::{
    cleanup, create_schema_context, create_test_context, run_test, timestamp,
};

#[derive(Convertible, Debug, Clone, PartialEq)]
pub enum Role {
    Admin,
    Member,
}

#[derive(Convertible, Debug, Clone, PartialEq)]
pub struct Address {
    city: String,
    country: Option<String>,
}

#[derive(Convertible, Debug, Clone, PartialEq)]
#[converter(ignored = "session")]
pub struct User {
    name: String,
    age: u32,
    role: Role,
    address: Address,
    tags: Vec<String>,
    joined: Option<DateTime<Utc>>,
    session: Option<String>,
}

fn ada() -> User {
    User {
        name: "Ada".to_string(),
        age: 36,
        role: Role::Admin,
        address: Address {
            city: "London".to_string(),
            country: None,
        },
        tags: vec!["math".to_string(), "engines".to_string()],
        joined: timestamp("1833-06-05T12:00:00Z").ok(),
        session: Some("secret".to_string()),
    }
}

#[test]
fn test_struct_to_document() {
    let document = Document::from_convertible(&ada()).unwrap();

    assert_eq!(document.get_string("name").unwrap(), Some("Ada".to_string()));
    assert_eq!(document.get_int("age").unwrap(), Some(36));
    assert_eq!(document.get("role"), Some(&Value::from("Admin")));
    assert_eq!(
        document.get_string("address.city").unwrap(),
        Some("London".to_string())
    );
    assert_eq!(document.get("address.country"), Some(&Value::Null));
    assert_eq!(
        document.get("tags.1"),
        Some(&Value::from("engines"))
    );
    assert!(document.get_timestamp("joined").unwrap().is_some());
    assert!(!document.has("session"));
}

#[test]
fn test_document_to_struct() {
    let document = doc! {
        name: "Grace",
        age: "45",
        role: "Member",
        address: { city: "Arlington", country: "US" },
        tags: ["navy"],
        session: "ignored",
    };

    let grace: User = document.map_to().unwrap();
    assert_eq!(grace.name, "Grace");
    assert_eq!(grace.age, 45);
    assert_eq!(grace.role, Role::Member);
    assert_eq!(grace.address.country, Some("US".to_string()));
    assert_eq!(grace.tags, vec!["navy".to_string()]);
    assert_eq!(grace.joined, None);
    assert_eq!(grace.session, None);
}

#[test]
fn test_mapping_errors() {
    let unknown_role = doc! {
        name: "Eve",
        age: 30,
        role: "Owner",
        address: { city: "Nowhere" },
    };
    let err = unknown_role.map_to::<User>().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ObjectMappingError);

    let bad_address = doc! { name: "Eve", age: 30, role: "Admin", address: "none" };
    let err = bad_address.map_to::<User>().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ObjectMappingError);

    let bad_age = doc! { name: "Eve", age: "old", role: "Admin", address: { city: "X" } };
    assert!(bad_age.map_to::<User>().is_err());
}

#[test]
fn test_typed_values_through_the_store() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let original = ada();
            let mut document = Document::from_convertible(&original)?;
            let id = db.insert("people", &mut document)?;

            let stored = db.find_by_id("people", &id)?.expect("stored user");
            let restored: User = stored.map_to()?;
            assert_eq!(
                restored,
                User {
                    session: None,
                    ..original
                }
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_typed_values_are_validated() {
    run_test(
        create_schema_context,
        |ctx| {
            let db = ctx.db();
            let mut user = ada();
            user.age = 200;
            let mut document = Document::from_convertible(&user)?;
            let err = db.insert("users", &mut document).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);
            Ok(())
        },
        cleanup,
    )
}
