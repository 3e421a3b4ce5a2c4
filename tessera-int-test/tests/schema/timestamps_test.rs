use tessera::common::Value;
use tessera::doc;
use tessera_int_test::test_util::{cleanup, create_schema_context, next_millisecond, run_test};

#[test]
fn test_insert_stamps_both_fields() {
    run_test(
        create_schema_context,
        |ctx| {
            let db = ctx.db();
            let mut ada = doc! { name: "Ada" };
            let id = db.insert("users", &mut ada)?;

            let created = ada.get_timestamp("createdAt")?.expect("createdAt");
            let updated = ada.get_timestamp("updatedAt")?.expect("updatedAt");
            assert_eq!(created, updated);

            let stored = db.find_by_id("users", &id)?.expect("stored user");
            assert_eq!(stored.get_timestamp("createdAt")?, Some(created));
            assert_eq!(stored.get_timestamp("updatedAt")?, Some(updated));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_provided_created_at_is_kept() {
    run_test(
        create_schema_context,
        |ctx| {
            let db = ctx.db();
            let imported = tessera_int_test::test_util::timestamp("2001-01-01T00:00:00Z")?;
            let mut ada = doc! { name: "Ada", createdAt: imported };
            db.insert("users", &mut ada)?;

            assert_eq!(ada.get("createdAt"), Some(&Value::Timestamp(imported)));
            assert!(ada.get_timestamp("updatedAt")?.expect("updatedAt") > imported);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_advances_updated_at_only() {
    run_test(
        create_schema_context,
        |ctx| {
            let db = ctx.db();
            let mut ada = doc! { name: "Ada", age: 36 };
            let id = db.insert("users", &mut ada)?;
            let created = ada.get_timestamp("createdAt")?.expect("createdAt");

            next_millisecond();
            let updated = db
                .update("users")
                .where_eq("id", id.as_str())
                .inc("age", 1)
                .execute()?;
            assert!(updated);

            let stored = db.find_by_id("users", &id)?.expect("stored user");
            assert_eq!(stored.get_int("age")?, Some(37));
            assert_eq!(stored.get_timestamp("createdAt")?, Some(created));
            assert!(stored.get_timestamp("updatedAt")?.expect("updatedAt") > created);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_save_keeps_created_at() {
    run_test(
        create_schema_context,
        |ctx| {
            let db = ctx.db();
            let mut ada = doc! { name: "Ada" };
            let id = db.insert("users", &mut ada)?;
            let created = ada.get_timestamp("createdAt")?.expect("createdAt");

            next_millisecond();
            let mut replacement = doc! { id: (id.as_str()), name: "Ada Lovelace" };
            db.save("users", &mut replacement)?;

            assert_eq!(replacement.get_timestamp("createdAt")?, Some(created));
            assert!(replacement.get_timestamp("updatedAt")?.expect("updatedAt") > created);

            let stored = db.find_by_id("users", &id)?.expect("stored user");
            assert_eq!(
                stored.get_string("name")?,
                Some("Ada Lovelace".to_string())
            );
            assert_eq!(stored.get_timestamp("createdAt")?, Some(created));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_upsert_stamps_created_at() {
    run_test(
        create_schema_context,
        |ctx| {
            let db = ctx.db();
            let inserted = db
                .update("users")
                .where_eq("name", "Grace")
                .set("age", 45)
                .upsert()
                .execute()?;
            assert!(inserted);

            let grace = db
                .find("users")
                .where_eq("name", "Grace")
                .first()?
                .expect("upserted user");
            assert_eq!(grace.get_int("age")?, Some(45));
            assert!(grace.get_timestamp("createdAt")?.is_some());
            assert!(grace.get_timestamp("updatedAt")?.is_some());
            Ok(())
        },
        cleanup,
    )
}
