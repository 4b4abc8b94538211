//! Parses a database object from a JSON file and reports what it finds.
//!
//! ```text
//! cargo run --example validate_database -- database.json
//! RUST_LOG=notion_schema=trace cargo run --example validate_database -- database.json
//! ```

use std::fs;

use chrono::Utc;
use notion_schema::{
    parse_database, validate_database, validate_file_expiry, PropertyConfig, SchemaContext,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "database.json".to_string());

    println!("Reading: {}", path);

    let data = fs::read_to_string(&path).expect("Failed to read file");
    let raw: serde_json::Value = serde_json::from_str(&data).expect("Failed to parse JSON");

    let database = match parse_database(&raw) {
        Ok(database) => database,
        Err(errors) => {
            println!("\n=== Rejected ({} errors) ===", errors.len());
            for error in &errors {
                println!("  [{}] {}", error.code(), error);
            }
            std::process::exit(1);
        }
    };

    println!("\n=== Database ===");
    println!("ID: {}", database.id);
    println!("Title: {}", database.title.plain_text());
    if !database.description.is_empty() {
        println!("Description: {}", database.description.plain_text());
    }
    println!("Parent: {:?}", database.parent);
    println!("Created: {} by {}", database.created_time.as_str(), database.created_by.id);
    println!("Schema fingerprint: {}", database.properties.fingerprint());

    println!("\n=== Properties ({}) ===", database.properties.len());
    for (key, property) in database.properties.iter() {
        let detail = match &property.config {
            PropertyConfig::Number { format } => format!(" format={}", format),
            PropertyConfig::Select(s) | PropertyConfig::MultiSelect(s) => {
                let names: Vec<&str> = s.options.iter().map(|o| o.name.as_str()).collect();
                format!(" options=[{}]", names.join(", "))
            }
            PropertyConfig::Formula(f) => format!(" expression={:?}", f.expression),
            PropertyConfig::Rollup(r) => format!(
                " {}({}.{})",
                r.function, r.relation_property_name, r.rollup_property_name
            ),
            _ => String::new(),
        };
        println!("  {:<24} {:<16} id={}{}", key, property.kind(), property.id, detail);
    }

    let mut context = SchemaContext::new();
    context.add_database(&database);
    match validate_database(&database, &context) {
        Ok(()) => println!("\nRollup references: ok"),
        Err(errors) => {
            println!("\nRollup references: {} problem(s)", errors.len());
            for error in errors {
                println!("  {}", error);
            }
        }
    }

    if let Some(cover) = &database.cover {
        match validate_file_expiry(cover, Utc::now()) {
            Ok(()) => println!("Cover: {} ({})", cover.url(), cover.kind()),
            Err(e) => println!("Cover: {}", e),
        }
    }
}
