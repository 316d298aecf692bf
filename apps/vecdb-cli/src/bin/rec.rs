use vecdb_cli::{flush_all, init_logging, load_settings, meta, print_record};
use vecdb_core::{EmbedInput, Schema};
use vecdb_redis::{ReadinessPolicy, VectorDb, DEFAULT_VECTOR_FIELD};

fn main() -> anyhow::Result<()> {
    init_logging();
    let settings = load_settings()?;
    let index = "interests";
    let item_type = "user";

    println!("vecdb-rec\n=========");
    println!("Connecting to {}:{} ...", settings.db.host, settings.db.port);
    let mut db = VectorDb::connect(&settings.db)?.with_readiness(ReadinessPolicy::from(&settings.index));
    println!("Deleting all vectors ...");
    flush_all(&mut db)?;

    println!("Creating the index ...");
    db.create_index(Some(3), index, &Schema::default(), item_type)?;

    println!("Adding some vectors ...");
    db.add(item_type, "samuel", &meta("Samuel is into books and comics", &["books", "comics"]), &EmbedInput::Numbers(vec![0.9, 0.7, 0.2]), DEFAULT_VECTOR_FIELD)?;
    db.add(item_type, "david", &meta("David likes books and comics.", &["books", "comics"]), &EmbedInput::Numbers(vec![0.7, 0.9, 0.1]), DEFAULT_VECTOR_FIELD)?;
    db.add(item_type, "pieter", &meta("Pieter likes comics.", &["comics"]), &EmbedInput::Numbers(vec![0.3, 0.9, 0.2]), DEFAULT_VECTOR_FIELD)?;
    db.add(item_type, "morti", &meta("Morti is into comics and computers.", &["comics", "computers"]), &EmbedInput::Numbers(vec![0.1, 0.9, 0.7]), DEFAULT_VECTOR_FIELD)?;

    println!("\nThe following users like books:");
    for hit in db.search("@labels:{books}", index)? { println!("  {}:{}", hit.item_type, hit.id); }

    let search_vector = vec![0.9, 0.7, 0.2];
    println!("\nChecking for users with the same interest as {:?} ...", search_vector);
    for (i, hit) in db.vector_search("*", &EmbedInput::Numbers(search_vector), 2, index, DEFAULT_VECTOR_FIELD)?.into_iter().enumerate() {
        println!("\n  {}. score={:.4}  id={}", i + 1, hit.score.unwrap_or_default(), hit.id);
        print_record(&mut db, &hit.item_type, &hit.id)?;
    }
    Ok(())
}
