use tessera::common::Value;
use tessera::doc;
use tessera::errors::ErrorKind;
use tessera_int_test::test_util::{cleanup, create_test_context, run_test};

fn tags(db: &tessera::Tessera) -> Vec<Value> {
    db.find_by_id("posts", "p")
        .unwrap()
        .and_then(|doc| doc.get_sequence("tags").unwrap())
        .unwrap_or_default()
}

#[test]
fn test_push_and_add_to_set() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let mut post = doc! { id: "p", tags: ["rust"] };
            db.insert("posts", &mut post)?;

            db.update("posts")
                .where_eq("id", "p")
                .push("tags", "db")
                .push_all("tags", vec!["odm", "rust"])
                .add_to_set("tags", "db")
                .add_to_set("tags", "new")
                .execute()?;

            let expected: Vec<Value> = ["rust", "db", "odm", "rust", "new"]
                .into_iter()
                .map(Value::from)
                .collect();
            assert_eq!(tags(&db), expected);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_push_creates_missing_array() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let mut post = doc! { id: "p" };
            db.insert("posts", &mut post)?;

            db.update("posts").where_eq("id", "p").push("tags", 1).execute()?;
            assert_eq!(tags(&db), vec![Value::from(1)]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_pop_and_pull() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let mut post = doc! { id: "p", tags: ["a", "b", "c", "b", "d", "e"] };
            db.insert("posts", &mut post)?;

            db.update("posts")
                .where_eq("id", "p")
                .pop_first("tags")
                .pop_last("tags")
                .pull("tags", "b")
                .execute()?;
            assert_eq!(tags(&db), vec![Value::from("c"), Value::from("d")]);

            db.update("posts")
                .where_eq("id", "p")
                .pull_all("tags", vec!["c", "z"])
                .execute()?;
            assert_eq!(tags(&db), vec![Value::from("d")]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_array_operator_on_scalar_fails() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let mut post = doc! { id: "p", tags: "rust" };
            db.insert("posts", &mut post)?;

            let err = db
                .update("posts")
                .where_eq("id", "p")
                .push("tags", "db")
                .execute()
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidDataType);

            let stored = db.find_by_id("posts", "p")?.expect("post");
            assert_eq!(stored.get_string("tags")?, Some("rust".to_string()));
            Ok(())
        },
        cleanup,
    )
}
