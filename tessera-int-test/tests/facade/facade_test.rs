use tessera::doc;
use tessera::errors::ErrorKind;
use tessera::store::memory::{InMemoryStore, InMemoryStoreConfig};
use tessera::store::TesseraStore;
use tessera::Tessera;
use tessera_int_test::test_util::{
    cleanup, create_test_context, insert_test_documents, run_test, users_schema,
};

#[test]
fn test_operations_need_a_connection() {
    let db = Tessera::new();
    assert!(!db.is_connected());

    let err = db.find("people").to_list().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::StoreNotInitialized);

    let mut document = doc! { name: "Ada" };
    let err = db.insert("people", &mut document).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::StoreNotInitialized);
    assert!(!document.has_id());

    let err = db.count("people").unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::StoreNotInitialized);
}

#[test]
fn test_connect_and_disconnect() {
    let db = Tessera::new();
    db.connect(InMemoryStore::new(InMemoryStoreConfig::new()))
        .unwrap();
    assert!(db.is_connected());

    let mut document = doc! { name: "Ada" };
    db.insert("people", &mut document).unwrap();
    assert_eq!(db.count("people").unwrap(), 1);

    db.disconnect().unwrap();
    assert!(!db.is_connected());
    let err = db.count("people").unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::StoreNotInitialized);
}

#[test]
fn test_reconnect_closes_previous_store() {
    let first = TesseraStore::new(InMemoryStore::new(InMemoryStoreConfig::new()));
    let second = TesseraStore::new(InMemoryStore::new(InMemoryStoreConfig::new()));

    let db = Tessera::new();
    db.connect_store(first.clone()).unwrap();
    db.connect_store(first.clone()).unwrap();
    assert!(!first.is_closed());

    db.connect_store(second.clone()).unwrap();
    assert!(first.is_closed());
    assert!(!second.is_closed());

    let err = db.connect_store(first).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::StoreAlreadyClosed);
    assert!(db.is_connected());
}

#[test]
fn test_instances_share_a_store() {
    let store = TesseraStore::new(InMemoryStore::new(
        InMemoryStoreConfig::new().with_name("shared"),
    ));
    let writer = Tessera::builder()
        .store_handle(store.clone())
        .open()
        .unwrap();
    let reader = Tessera::builder()
        .store_handle(store.clone())
        .schema(users_schema())
        .open()
        .unwrap();

    let mut document = doc! { name: "Ada" };
    let id = writer.insert("users", &mut document).unwrap();
    assert!(reader.exists("users", &id).unwrap());
    assert!(!document.has("createdAt"));
    assert_eq!(store.name(), "shared");
}

#[test]
fn test_find_by_id() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let ids = insert_test_documents(&db, "people")?;

            let found = db.find_by_id("people", &ids[1])?.expect("fn2");
            assert_eq!(found.get_string("first_name")?, Some("fn2".to_string()));
            assert_eq!(found.id(), Some(ids[1].clone()));

            assert!(db.find_by_id("people", "")?.is_none());
            assert!(db.find_by_id("people", "not-an-id")?.is_none());
            assert!(db.find_by_id("nowhere", &ids[1])?.is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_save_inserts_then_replaces() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let mut ada = doc! { name: "Ada", age: 36 };
            let id = db.save("people", &mut ada)?;
            assert_eq!(ada.id(), Some(id.clone()));

            let mut replacement = doc! { id: (id.as_str()), name: "Ada King" };
            assert_eq!(db.save("people", &mut replacement)?, id);

            let stored = db.find_by_id("people", &id)?.expect("ada");
            assert_eq!(stored.get_string("name")?, Some("Ada King".to_string()));
            assert!(!stored.has("age"));
            assert_eq!(db.count("people")?, 1);

            let mut fresh = doc! { id: "chosen", name: "Grace" };
            db.save("people", &mut fresh)?;
            assert!(db.exists("people", "chosen")?);
            assert_eq!(db.count("people")?, 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_exists_and_count() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            assert_eq!(db.count("people")?, 0);
            let ids = insert_test_documents(&db, "people")?;
            assert_eq!(db.count("people")?, 3);
            assert!(db.exists("people", &ids[2])?);
            assert!(!db.exists("people", "missing")?);
            assert!(!db.exists("people", " ")?);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_collections_are_isolated() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let ids = insert_test_documents(&db, "people")?;
            assert_eq!(db.count("others")?, 0);
            assert!(db.find_by_id("others", &ids[0])?.is_none());
            assert!(db.find("others").to_list()?.is_empty());
            Ok(())
        },
        cleanup,
    )
}
