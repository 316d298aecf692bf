//! End-to-end scenarios against a live Redis Stack.
//! Skipped unless `APP_TEST_REDIS_URL` (e.g. `redis://127.0.0.1:6379`) is set.
use vecdb_core::{EmbedInput, EmbeddingProvider, FieldValue, Metadata, PassThrough, Schema};
use vecdb_embed::FakeEmbedder;
use vecdb_redis::{VectorDb, DEFAULT_VECTOR_FIELD};

fn connect(provider: Box<dyn EmbeddingProvider>) -> Option<VectorDb> {
    let url = std::env::var("APP_TEST_REDIS_URL").ok()?;
    let client = redis::Client::open(url.as_str()).expect("redis url");
    let con = client.get_connection().expect("redis connection");
    Some(VectorDb::with_connection(con, provider))
}

fn reset(db: &mut VectorDb, index: &str) {
    let _: redis::RedisResult<()> = redis::cmd("FT.DROPINDEX").arg(format!("idx:{index}")).arg("DD").query(db.connection_mut());
}

fn meta(descr: &str, labels: Vec<&str>) -> Metadata {
    let mut m = Metadata::new();
    m.insert("descr".to_string(), FieldValue::from(descr));
    m.insert("labels".to_string(), FieldValue::from(labels));
    m
}

#[test]
fn interests_scenario() {
    let Some(mut db) = connect(Box::new(PassThrough::with_dim(3))) else {
        eprintln!("APP_TEST_REDIS_URL not set; skipping");
        return;
    };
    let index = "vecdb_test_interests";
    let item_type = "vecdbtestuser";
    reset(&mut db, index);
    db.create_index(None, index, &Schema::default(), item_type).expect("create index");

    let users = [
        ("samuel", "Samuel is into books and comics", vec!["books", "comics"], vec![0.9, 0.7, 0.2]),
        ("david", "David likes books and comics.", vec!["books", "comics"], vec![0.7, 0.9, 0.1]),
        ("pieter", "Pieter likes comics.", vec!["comics"], vec![0.3, 0.9, 0.2]),
        ("morti", "Morti is into comics and computers.", vec!["comics", "computers"], vec![0.1, 0.9, 0.7]),
    ];
    for (id, descr, labels, vector) in users {
        db.add(item_type, id, &meta(descr, labels), &EmbedInput::Numbers(vector), DEFAULT_VECTOR_FIELD).expect("add");
    }

    let mut readers: Vec<String> = db.search("@labels:{books}", index).expect("search").into_iter().map(|h| h.id).collect();
    readers.sort();
    assert_eq!(readers, ["david", "samuel"]);

    let hits = db.vector_search("*", &EmbedInput::Numbers(vec![0.9, 0.7, 0.2]), 2, index, DEFAULT_VECTOR_FIELD).expect("knn");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, "samuel");
    assert_eq!(hits[1].id, "david");
    assert_eq!(hits[0].item_type, item_type);
    let (s0, s1) = (hits[0].score.expect("score"), hits[1].score.expect("score"));
    assert!(s0.abs() < 1e-4, "exact match has ~zero distance, got {s0}");
    assert!(s0 <= s1);

    let record = db.get(item_type, "samuel").expect("get");
    assert_eq!(record["labels"], FieldValue::Text("books, comics".to_string()));
    assert_eq!(record["descr"].as_text(), Some("Samuel is into books and comics"));
    assert!(record["time"].as_number().is_some());
    assert_eq!(record["vec"].as_vector().expect("vector").len(), 3);

    assert!(db.delete(item_type, "samuel").expect("delete"));
    assert!(db.get(item_type, "samuel").expect("get").is_empty());
    assert!(!db.delete(item_type, "samuel").expect("second delete is a no-op"));

    reset(&mut db, index);
}

#[test]
fn text_scenario_with_fake_embeddings() {
    let Some(mut db) = connect(Box::new(FakeEmbedder::new(32))) else {
        eprintln!("APP_TEST_REDIS_URL not set; skipping");
        return;
    };
    let index = "vecdb_test_texts";
    let item_type = "vecdbtestarticle";
    reset(&mut db, index);
    db.create_index(None, index, &Schema::default(), item_type).expect("create index");

    db.add(item_type, "hello", &meta("A simple hello world example", vec!["example"]),
        &EmbedInput::from("Hello world is a common example to show something very simple."), DEFAULT_VECTOR_FIELD).expect("add");
    db.add(item_type, "fox", &meta("A very simple example", vec!["example"]),
        &EmbedInput::from("The quick brown fox jumps over the lazy dog."), DEFAULT_VECTOR_FIELD).expect("add");

    let hits = db.vector_search("@labels:{example}", &EmbedInput::from("The quick brown fox jumps over the lazy dog."), 1, index, DEFAULT_VECTOR_FIELD).expect("knn");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "fox");

    reset(&mut db, index);
}
