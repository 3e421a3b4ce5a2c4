use tessera::doc;
use tessera::errors::ErrorKind;
use tessera_int_test::test_util::{cleanup, create_schema_context, run_test};

#[test]
fn test_duplicate_unique_value_is_rejected() {
    run_test(
        create_schema_context,
        |ctx| {
            let db = ctx.db();
            let mut ada = doc! { name: "Ada", email: "ada@example.com" };
            db.insert("users", &mut ada)?;

            let mut impostor = doc! { name: "Not Ada", email: "ada@example.com" };
            let err = db.insert("users", &mut impostor).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::UniqueConstraintViolation);
            assert!(!impostor.has_id());
            assert_eq!(db.count("users")?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_resaving_the_same_document_is_allowed() {
    run_test(
        create_schema_context,
        |ctx| {
            let db = ctx.db();
            let mut ada = doc! { name: "Ada", email: "ada@example.com" };
            db.insert("users", &mut ada)?;

            ada.set("name", "Ada King");
            db.save("users", &mut ada)?;
            assert_eq!(db.count("users")?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_save_into_taken_value_is_rejected() {
    run_test(
        create_schema_context,
        |ctx| {
            let db = ctx.db();
            let mut ada = doc! { name: "Ada", email: "ada@example.com" };
            let mut grace = doc! { name: "Grace", email: "grace@example.com" };
            db.insert("users", &mut ada)?;
            let grace_id = db.insert("users", &mut grace)?;

            grace.set("email", "ada@example.com");
            let err = db.save("users", &mut grace).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::UniqueConstraintViolation);

            let stored = db.find_by_id("users", &grace_id)?.expect("stored user");
            assert_eq!(
                stored.get_string("email")?,
                Some("grace@example.com".to_string())
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_absent_unique_values_do_not_collide() {
    run_test(
        create_schema_context,
        |ctx| {
            let db = ctx.db();
            let mut first = doc! { name: "First" };
            let mut second = doc! { name: "Second" };
            db.insert("users", &mut first)?;
            db.insert("users", &mut second)?;
            assert_eq!(db.count("users")?, 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_duplicate_id_is_rejected() {
    run_test(
        create_schema_context,
        |ctx| {
            let db = ctx.db();
            let mut first = doc! { id: "n-1", text: "one" };
            let mut second = doc! { id: "n-1", text: "two" };
            db.insert("notes", &mut first)?;
            let err = db.insert("notes", &mut second).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::UniqueConstraintViolation);
            Ok(())
        },
        cleanup,
    )
}
