use chrono::{DateTime, Utc};
use std::backtrace::Backtrace;
use std::time::{Duration, Instant};
use std::{panic, thread};
use tessera::collection::Document;
use tessera::common::parse_timestamp;
use tessera::doc;
use tessera::errors::TesseraResult;
use tessera::schema::{unique_index, FieldType, Schema};
use tessera::store::memory::InMemoryStoreConfig;
use tessera::Tessera;

/// Runs `test` between `before` and `after`. `after` also runs when the test
/// returns an error; a failure in any step panics with its error and a
/// backtrace.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> TesseraResult<()> + panic::UnwindSafe + panic::RefUnwindSafe,
    B: Fn() -> TesseraResult<TestContext> + panic::UnwindSafe + panic::RefUnwindSafe,
    A: Fn(TestContext) -> TesseraResult<()> + panic::UnwindSafe + panic::RefUnwindSafe,
{
    let start_time = Instant::now();
    let result = panic::catch_unwind(|| {
        let backtrace = Backtrace::capture();
        let ctx = match before() {
            Ok(ctx) => ctx,
            Err(e) => return Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
        };

        match test(ctx.clone()) {
            Ok(()) => match after(ctx) {
                Ok(()) => Ok(()),
                Err(e) => Err((format!("After run failed: {:?}", e), backtrace.to_string())),
            },
            Err(e) => {
                let _ = after(ctx);
                Err((format!("Test failed: {:?}", e), backtrace.to_string()))
            }
        }
    });

    match result {
        Ok(Ok(())) => {}
        Ok(Err((error, backtrace))) => {
            eprintln!(
                "\n========== Test Failed (took {:?}) ==========",
                start_time.elapsed()
            );
            eprintln!("Backtrace:\n{}", backtrace);
            panic!("{}", error);
        }
        Err(cause) => panic::resume_unwind(cause),
    }
}

#[derive(Clone)]
pub struct TestContext {
    db: Tessera,
}

impl TestContext {
    pub fn new(db: Tessera) -> Self {
        Self { db }
    }

    pub fn db(&self) -> Tessera {
        self.db.clone()
    }
}

/// A connected instance over a fresh in-memory store, no schemas.
pub fn create_test_context() -> TesseraResult<TestContext> {
    let db = Tessera::builder()
        .in_memory(InMemoryStoreConfig::new().with_name("int-test"))
        .open()?;
    Ok(TestContext::new(db))
}

/// Like [create_test_context] with the `users` and `posts` schemas
/// registered.
pub fn create_schema_context() -> TesseraResult<TestContext> {
    let db = Tessera::builder()
        .in_memory(InMemoryStoreConfig::new().with_name("int-test"))
        .schema(users_schema())
        .schema(posts_schema())
        .open()?;
    Ok(TestContext::new(db))
}

pub fn cleanup(ctx: TestContext) -> TesseraResult<()> {
    ctx.db().disconnect()
}

pub fn users_schema() -> tessera::schema::SchemaBuilder {
    Schema::collection("users")
        .id("id")
        .string("name")
        .required()
        .min_length(1)
        .string("email")
        .unique()
        .pattern("^[^@]+@[^@]+$")
        .integer("age")
        .min(0)
        .max(150)
        .string("role")
        .enum_values(vec!["admin", "member"])
        .default("member")
        .embedded(
            "address",
            Schema::object()
                .string("city")
                .required()
                .string("country")
                .default("NL"),
        )
        .index(&["email"], unique_index())
        .timestamps()
}

pub fn posts_schema() -> tessera::schema::SchemaBuilder {
    Schema::collection("posts")
        .string("title")
        .required()
        .max_length(80)
        .list_of("tags", FieldType::String)
        .integer("views")
        .default(0)
        .timestamps()
}

/// Three people with names, birthdays, scores and tag lists.
pub fn create_test_docs() -> TesseraResult<Vec<Document>> {
    let dt1 = parse_timestamp("2012-07-01T02:15:22+02:00")?;
    let dt2 = parse_timestamp("2010-06-12T12:05:35+05:30")?;
    let dt3 = parse_timestamp("2014-04-17T22:25:44-04:00")?;

    let doc1 = doc! {
        first_name: "fn1",
        last_name: "ln1",
        birth_day: dt1,
        score: 30,
        arr: [1, 2, 3],
        tags: ["one", "two", "three"],
        body: "a quick brown fox jump over the lazy dog",
    };

    let doc2 = doc! {
        first_name: "fn2",
        last_name: "ln2",
        birth_day: dt2,
        score: 10,
        arr: [3, 4, 3],
        tags: ["three", "four", "five"],
        body: "quick hello world from tessera",
    };

    let doc3 = doc! {
        first_name: "fn3",
        last_name: "ln2",
        birth_day: dt3,
        score: 20,
        arr: [9, 4, 8],
        body: "Lorem ipsum dolor sit amet, consectetur \
        adipiscing elit. Sed nunc mi, mattis ullamcorper \
        dignissim vitae, condimentum non lorem.",
    };

    Ok(vec![doc1, doc2, doc3])
}

/// Inserts [create_test_docs] into `collection` and returns their ids.
pub fn insert_test_documents(db: &Tessera, collection: &str) -> TesseraResult<Vec<String>> {
    let mut ids = Vec::new();
    for mut document in create_test_docs()? {
        ids.push(db.insert(collection, &mut document)?);
    }
    Ok(ids)
}

pub fn timestamp(text: &str) -> TesseraResult<DateTime<Utc>> {
    parse_timestamp(text)
}

/// Sleeps past the current millisecond so the next clock reading differs.
pub fn next_millisecond() {
    thread::sleep(Duration::from_millis(5));
}

pub fn is_sorted<T: Ord>(iterable: impl IntoIterator<Item = T>, ascending: bool) -> bool {
    let items: Vec<T> = iterable.into_iter().collect();
    items.windows(2).all(|pair| {
        if ascending {
            pair[0] <= pair[1]
        } else {
            pair[0] >= pair[1]
        }
    })
}
