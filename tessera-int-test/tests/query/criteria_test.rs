use tessera::doc;
use tessera::errors::ErrorKind;
use tessera::query::Criteria;
use tessera_int_test::test_util::{
    cleanup, create_test_context, insert_test_documents, run_test, timestamp,
};

fn first_names(documents: &[tessera::collection::Document]) -> Vec<String> {
    documents
        .iter()
        .filter_map(|doc| doc.get_string("first_name").ok().flatten())
        .collect()
}

#[test]
fn test_equality_and_comparisons() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db, "people")?;

            let ln2 = db.find("people").where_eq("last_name", "ln2").to_list()?;
            assert_eq!(first_names(&ln2), vec!["fn2", "fn3"]);

            let high = db.find("people").where_field("score").gt(10).to_list()?;
            assert_eq!(high.len(), 2);
            let at_least = db.find("people").where_field("score").gte(10).count()?;
            assert_eq!(at_least, 3);
            let low = db.find("people").where_field("score").lt(20).to_list()?;
            assert_eq!(first_names(&low), vec!["fn2"]);
            let at_most = db.find("people").where_field("score").lte(20).count()?;
            assert_eq!(at_most, 2);

            let not_ln1 = db.find("people").where_field("last_name").ne("ln1").count()?;
            assert_eq!(not_ln1, 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_range_on_timestamps() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db, "people")?;

            let after_2011 = timestamp("2011-01-01T00:00:00Z")?;
            let born_after = db
                .find("people")
                .where_field("birth_day")
                .gt(after_2011)
                .to_list()?;
            assert_eq!(first_names(&born_after), vec!["fn1", "fn3"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_predicates_are_anded() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db, "people")?;

            let result = db
                .find("people")
                .where_eq("last_name", "ln2")
                .where_field("score")
                .gt(15)
                .to_list()?;
            assert_eq!(first_names(&result), vec!["fn3"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_membership() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db, "people")?;

            let in_list = db
                .find("people")
                .where_field("first_name")
                .in_(vec!["fn1", "fn3", "fn9"])
                .to_list()?;
            assert_eq!(first_names(&in_list), vec!["fn1", "fn3"]);

            let not_in = db
                .find("people")
                .where_field("score")
                .not_in(vec![10, 30])
                .to_list()?;
            assert_eq!(first_names(&not_in), vec!["fn3"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_arrays_and_strings() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db, "people")?;

            let tagged = db.find("people").where_eq("tags", "three").count()?;
            assert_eq!(tagged, 2);

            let contains = db
                .find("people")
                .where_field("arr")
                .contains(4)
                .to_list()?;
            assert_eq!(first_names(&contains), vec!["fn2", "fn3"]);

            let contains_all = db
                .find("people")
                .where_field("tags")
                .contains_all(vec!["one", "three"])
                .to_list()?;
            assert_eq!(first_names(&contains_all), vec!["fn1"]);

            let quick = db
                .find("people")
                .where_field("body")
                .regex("^(a )?quick")
                .to_list()?;
            assert_eq!(first_names(&quick), vec!["fn1", "fn2"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_invalid_regex_fails_on_execution() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db, "people")?;

            let err = db
                .find("people")
                .where_field("body")
                .regex("[unclosed")
                .to_list()
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::FilterError);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_presence_and_nulls() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db, "people")?;
            let mut blank = doc! { first_name: "fn4", tags: (tessera::common::Value::Null) };
            db.insert("people", &mut blank)?;

            let with_tags = db.find("people").where_field("tags").field_exists().count()?;
            assert_eq!(with_tags, 3);
            let without_tags = db
                .find("people")
                .where_field("tags")
                .field_not_exists()
                .to_list()?;
            assert_eq!(first_names(&without_tags), vec!["fn3"]);

            let null_tags = db.find("people").where_field("tags").is_null().to_list()?;
            assert_eq!(first_names(&null_tags), vec!["fn3", "fn4"]);
            let real_tags = db.find("people").where_field("tags").is_not_null().count()?;
            assert_eq!(real_tags, 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_or_groups() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db, "people")?;

            let either = db
                .find("people")
                .or(vec![
                    Criteria::new().where_eq("first_name", "fn1"),
                    Criteria::new()
                        .where_eq("last_name", "ln2")
                        .where_field("score")
                        .lt(15),
                ])
                .to_list()?;
            assert_eq!(first_names(&either), vec!["fn1", "fn2"]);

            let narrowed = db
                .find("people")
                .where_field("score")
                .gt(20)
                .or(vec![
                    Criteria::new().where_eq("first_name", "fn1"),
                    Criteria::new().where_eq("first_name", "fn2"),
                ])
                .to_list()?;
            assert_eq!(first_names(&narrowed), vec!["fn1"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_first_and_exists() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            assert!(db.find("people").first()?.is_none());
            assert!(!db.find("people").exists()?);

            insert_test_documents(&db, "people")?;
            let first = db.find("people").where_eq("last_name", "ln2").first()?;
            assert_eq!(
                first.and_then(|doc| doc.get_string("first_name").ok().flatten()),
                Some("fn2".to_string())
            );
            assert!(db.find("people").where_eq("score", 30).exists()?);
            assert!(!db.find("people").where_eq("score", 31).exists()?);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_numeric_equality_across_representations() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db, "people")?;
            assert_eq!(db.find("people").where_eq("score", 30.0).count()?, 1);
            Ok(())
        },
        cleanup,
    )
}
