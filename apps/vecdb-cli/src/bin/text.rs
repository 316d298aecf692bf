use std::env;

use vecdb_cli::{flush_all, init_logging, load_settings, meta, print_record, text_schema};
use vecdb_core::EmbedInput;
use vecdb_embed::default_text_provider;
use vecdb_redis::{ReadinessPolicy, VectorDb};

fn main() -> anyhow::Result<()> {
    init_logging();
    let settings = load_settings()?;
    let args: Vec<String> = env::args().collect();
    let query = args.get(1).cloned().unwrap_or_else(|| "The quick brown dog jumps over the lazy mouse.".to_string());
    let index = settings.index.name.as_str();
    let item_type = settings.index.item_type.as_str();
    let field = settings.index.vector_field.as_str();

    println!("vecdb-text\n==========");
    println!("Loading embedding model from {} ...", settings.embedding.model_dir.display());
    let provider = default_text_provider(&settings.embedding)?;
    println!("Connecting to {}:{} ...", settings.db.host, settings.db.port);
    let mut db = VectorDb::connect_with(&settings.db, provider)?.with_readiness(ReadinessPolicy::from(&settings.index));
    println!("Deleting all vectors ...");
    flush_all(&mut db)?;

    println!("Creating the index ...");
    db.create_index(None, index, &text_schema(field), item_type)?;

    println!("Adding some texts ...");
    db.add(item_type, "hello", &meta("A simple hello world example", &["example"]),
        &EmbedInput::from("Hello world is a common example to show something very simple."), field)?;
    db.add(item_type, "fox", &meta("A very simple example", &["example"]),
        &EmbedInput::from("The quick brown fox jumps over the lazy dog."), field)?;

    println!("\nQuery: {}", query);
    for hit in db.vector_search("*", &EmbedInput::from(query.as_str()), 1, index, field)? {
        println!("\n  score={:.4}  id={}", hit.score.unwrap_or_default(), hit.id);
        print_record(&mut db, &hit.item_type, &hit.id)?;
    }
    Ok(())
}
