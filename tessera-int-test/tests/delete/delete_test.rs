use tessera::errors::ErrorKind;
use tessera_int_test::test_util::{
    cleanup, create_test_context, insert_test_documents, run_test,
};

#[test]
fn test_execute_removes_first_match() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let ids = insert_test_documents(&db, "people")?;

            let removed = db.delete("people").where_eq("last_name", "ln2").execute()?;
            assert!(removed);
            assert_eq!(db.count("people")?, 2);
            assert!(!db.exists("people", &ids[1])?);
            assert!(db.exists("people", &ids[2])?);

            let nothing = db.delete("people").where_eq("last_name", "ln9").execute()?;
            assert!(!nothing);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_execute_all_removes_every_match() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db, "people")?;

            let removed = db
                .delete("people")
                .where_eq("last_name", "ln2")
                .execute_all()?;
            assert_eq!(removed, 2);
            assert_eq!(db.count("people")?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_field_conditions() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db, "people")?;
            assert_eq!(db.delete("people").where_field("score").gt(25).execute_all()?, 1);
            assert_eq!(db.delete("people").where_field("score").lte(10).execute_all()?, 1);
            assert_eq!(db.count("people")?, 1);

            insert_test_documents(&db, "others")?;
            assert_eq!(
                db.delete("others")
                    .where_field("first_name")
                    .in_(vec!["fn1", "fn2"])
                    .execute_all()?,
                2
            );
            assert_eq!(
                db.delete("others")
                    .where_field("first_name")
                    .ne("fn3")
                    .execute_all()?,
                0
            );
            assert_eq!(db.delete("others").where_field("score").gte(20).execute_all()?, 1);
            assert_eq!(db.count("others")?, 0);

            insert_test_documents(&db, "thirds")?;
            assert_eq!(db.delete("thirds").where_field("score").lt(30).execute_all()?, 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_execute_requires_filter_or_all() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db, "people")?;

            let err = db.delete("people").execute().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
            assert_eq!(db.count("people")?, 3);

            assert!(db.delete("people").all().execute()?);
            assert_eq!(db.count("people")?, 0);
            assert!(db.delete("people").all().execute()?);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_execute_all_without_filter_clears_collection() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db, "people")?;
            insert_test_documents(&db, "others")?;

            assert_eq!(db.delete("people").execute_all()?, 3);
            assert_eq!(db.count("people")?, 0);
            assert_eq!(db.count("others")?, 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_delete_by_id() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let ids = insert_test_documents(&db, "people")?;

            assert!(db.delete_by_id("people", &ids[0])?);
            assert!(!db.delete_by_id("people", &ids[0])?);
            assert!(!db.delete_by_id("people", "")?);
            assert!(!db.delete_by_id("people", "   ")?);
            assert_eq!(db.count("people")?, 2);
            Ok(())
        },
        cleanup,
    )
}
