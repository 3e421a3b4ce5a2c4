use std::collections::HashSet;
use std::thread;
use tessera::doc;
use tessera_int_test::test_util::{cleanup, create_schema_context, create_test_context, run_test};

#[test]
fn test_concurrent_inserts() {
    run_test(
        create_test_context,
        |ctx| {
            let handles: Vec<_> = (0..8)
                .map(|worker| {
                    let db = ctx.db();
                    thread::spawn(move || {
                        let mut ids = Vec::new();
                        for n in 0..50 {
                            let mut document = doc! { worker: worker, n: n };
                            ids.push(db.insert("jobs", &mut document)?);
                        }
                        Ok::<_, tessera::errors::TesseraError>(ids)
                    })
                })
                .collect();

            let mut ids = HashSet::new();
            for handle in handles {
                let worker_ids = handle.join().expect("worker panicked")?;
                ids.extend(worker_ids);
            }
            assert_eq!(ids.len(), 400);
            assert_eq!(ctx.db().count("jobs")?, 400);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_concurrent_increments_are_not_lost() {
    run_test(
        create_schema_context,
        |ctx| {
            let db = ctx.db();
            let mut counter = doc! { id: "views", title: "Counter", views: 0 };
            db.insert("posts", &mut counter)?;

            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let db = ctx.db();
                    thread::spawn(move || {
                        for _ in 0..25 {
                            db.update("posts")
                                .where_eq("id", "views")
                                .inc("views", 1)
                                .execute()?;
                        }
                        Ok::<_, tessera::errors::TesseraError>(())
                    })
                })
                .collect();

            for handle in handles {
                handle.join().expect("worker panicked")?;
            }

            let stored = db.find_by_id("posts", "views")?.expect("counter");
            assert_eq!(stored.get_int("views")?, Some(100));
            Ok(())
        },
        cleanup,
    )
}
