use tessera::doc;
use tessera::errors::ErrorKind;
use tessera_int_test::test_util::{cleanup, create_schema_context, run_test};

#[test]
fn test_defaults_fill_missing_fields() {
    run_test(
        create_schema_context,
        |ctx| {
            let db = ctx.db();
            let mut ada = doc! {
                name: "Ada",
                email: "ada@example.com",
                address: { city: "London" },
            };
            let id = db.insert("users", &mut ada)?;

            assert_eq!(ada.get_string("role")?, Some("member".to_string()));
            assert_eq!(ada.get_string("address.country")?, Some("NL".to_string()));

            let stored = db.find_by_id("users", &id)?.expect("stored user");
            assert_eq!(stored.get_string("role")?, Some("member".to_string()));
            assert_eq!(
                stored.get_string("address.country")?,
                Some("NL".to_string())
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_explicit_values_beat_defaults() {
    run_test(
        create_schema_context,
        |ctx| {
            let db = ctx.db();
            let mut grace = doc! { name: "Grace", role: "admin" };
            db.insert("users", &mut grace)?;
            assert_eq!(grace.get_string("role")?, Some("admin".to_string()));

            let mut post = doc! { title: "Hello", views: 12 };
            db.insert("posts", &mut post)?;
            assert_eq!(post.get_int("views")?, Some(12));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_missing_required_field() {
    run_test(
        create_schema_context,
        |ctx| {
            let db = ctx.db();
            let mut nameless = doc! { email: "who@example.com" };
            let err = db.insert("users", &mut nameless).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::MissingRequiredField);
            assert!(err.message().contains("name"));
            assert!(!nameless.has_id());
            assert_eq!(db.count("users")?, 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_missing_nested_required_field_reports_path() {
    run_test(
        create_schema_context,
        |ctx| {
            let db = ctx.db();
            let mut homeless = doc! { name: "Ada", address: { country: "UK" } };
            let err = db.insert("users", &mut homeless).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::MissingRequiredField);
            assert!(err.message().contains("address.city"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_constraint_violations() {
    run_test(
        create_schema_context,
        |ctx| {
            let db = ctx.db();
            let invalid = vec![
                doc! { name: "Ada", age: 200 },
                doc! { name: "Ada", age: (-1) },
                doc! { name: "Ada", age: "old" },
                doc! { name: "", age: 20 },
                doc! { name: "Ada", email: "not-an-email" },
                doc! { name: "Ada", role: "guest" },
            ];

            for mut document in invalid {
                let err = db.insert("users", &mut document).unwrap_err();
                assert_eq!(err.kind(), &ErrorKind::ValidationError, "{:?}", document);
            }
            assert_eq!(db.count("users")?, 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_list_items_and_lengths() {
    run_test(
        create_schema_context,
        |ctx| {
            let db = ctx.db();
            let mut tagged = doc! { title: "Rust", tags: ["lang", "systems"] };
            db.insert("posts", &mut tagged)?;

            let mut mixed = doc! { title: "Mixed", tags: ["lang", 3] };
            let err = db.insert("posts", &mut mixed).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);

            let mut long = doc! { title: ("x".repeat(81)) };
            let err = db.insert("posts", &mut long).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);

            assert_eq!(db.count("posts")?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_undeclared_fields_pass_through() {
    run_test(
        create_schema_context,
        |ctx| {
            let db = ctx.db();
            let mut ada = doc! { name: "Ada", nickname: "Countess", score: 9.5 };
            let id = db.insert("users", &mut ada)?;
            let stored = db.find_by_id("users", &id)?.expect("stored user");
            assert_eq!(stored.get_string("nickname")?, Some("Countess".to_string()));
            assert_eq!(stored.get_float("score")?, Some(9.5));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_collections_without_schema_accept_anything() {
    run_test(
        create_schema_context,
        |ctx| {
            let db = ctx.db();
            let mut anything = doc! { age: "not a number" };
            db.insert("notes", &mut anything)?;
            assert!(!anything.has("createdAt"));
            assert_eq!(db.count("notes")?, 1);
            Ok(())
        },
        cleanup,
    )
}
