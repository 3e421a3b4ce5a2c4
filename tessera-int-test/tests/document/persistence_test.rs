use tessera::collection::DocumentId;
use tessera::common::Value;
use tessera::doc;
use tessera_int_test::test_util::{
    cleanup, create_test_context, create_test_docs, insert_test_documents, run_test, timestamp,
};

#[test]
fn test_values_survive_the_store() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let born = timestamp("1815-12-10T08:30:00.250Z")?;
            let mut document = doc! {
                name: "Ada",
                born: born,
                ratio: 2.0,
                big: 9_007_199_254_740_993_i64,
                nothing: (Value::Null),
                infinite: (f64::INFINITY),
                address: { city: "London", floors: [1, 2.5, "attic"] },
            };

            let id = db.insert("people", &mut document)?;
            let stored = db.find_by_id("people", &id)?.expect("stored document");

            assert_eq!(stored, document);
            assert_eq!(stored.get("born"), Some(&Value::Timestamp(born)));
            assert!(matches!(stored.get("ratio"), Some(Value::Float(f)) if *f == 2.0));
            assert_eq!(stored.get("big"), Some(&Value::Int(9_007_199_254_740_993)));
            assert_eq!(stored.get("nothing"), Some(&Value::Null));
            assert_eq!(stored.get_float("infinite")?, Some(f64::INFINITY));
            assert_eq!(
                stored.get("address.floors.2"),
                Some(&Value::from("attic"))
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_dollar_field_names_survive_the_store() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let mut document = doc! { name: "marker-like" };
            document.set("meta.$date", 5);
            document.set("price.$numberDouble", "NaN");

            let id = db.insert("things", &mut document)?;
            let stored = db.find_by_id("things", &id)?.expect("stored document");

            assert_eq!(stored, document);
            assert_eq!(stored.get("meta.$date"), Some(&Value::Int(5)));
            assert_eq!(stored.get("price.$numberDouble"), Some(&Value::from("NaN")));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_generated_ids_are_unique_and_well_formed() {
    run_test(
        create_test_context,
        |ctx| {
            let ids = insert_test_documents(&ctx.db(), "people")?;
            assert_eq!(ids.len(), 3);
            for id in &ids {
                assert!(DocumentId::parse(id).is_ok());
            }
            assert_ne!(ids[0], ids[1]);
            assert_ne!(ids[1], ids[2]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_writes_id_back() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            for mut document in create_test_docs()? {
                assert!(!document.has_id());
                let id = db.insert("people", &mut document)?;
                assert_eq!(document.id(), Some(id));
            }
            assert_eq!(db.count("people")?, 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_custom_ids_are_kept() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let mut document = doc! { id: "user-42", name: "Ada" };
            let id = db.insert("people", &mut document)?;
            assert_eq!(id, "user-42");

            let stored = db.find_by_id("people", "user-42")?.expect("stored document");
            assert_eq!(stored.get_string("name")?, Some("Ada".to_string()));
            Ok(())
        },
        cleanup,
    )
}
