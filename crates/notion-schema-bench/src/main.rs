//! Benchmark for database parsing and serialization.
//!
//! Reads database objects from a JSON file (a single object, an array, or
//! a list response with `results`), or generates a synthetic corpus when
//! no file is given, then times each codec stage.

use std::fs;
use std::time::{Duration, Instant};

use notion_schema::{
    parse_database, serialize_database, Color, Database, Mention, NumberFormat, RichTextBuilder,
    RollupFunction, SchemaBuilder, ValidationErrors,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

const DEFAULT_COUNT: usize = 2_000;

// =============================================================================
// INPUT
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Input {
    List { results: Vec<Value> },
    Many(Vec<Value>),
    One(Value),
}

impl Input {
    fn into_values(self) -> Vec<Value> {
        match self {
            Input::List { results } => results,
            Input::Many(values) => values,
            Input::One(value) => vec![value],
        }
    }
}

// =============================================================================
// SYNTHETIC CORPUS
// =============================================================================

fn timestamp(i: usize) -> String {
    format!("2023-{:02}-{:02}T{:02}:15:00.000Z", i % 12 + 1, i % 28 + 1, i % 24)
}

fn user(id: &uuid::Uuid) -> Value {
    json!({"object": "user", "id": id.to_string()})
}

/// Builds one database object through the typed API and serializes it.
fn synthetic_database(i: usize, owner: &uuid::Uuid) -> Value {
    let id = uuid::Uuid::new_v4();
    let title = RichTextBuilder::new()
        .text_with(format!("Inventory {i}"), |s| s.bold())
        .text(" tracked by ")
        .mention(Mention::user(owner.to_string()))
        .build();
    let description = RichTextBuilder::new()
        .text("Stock levels, see ")
        .text_with("the handbook", |s| s.link("https://example.com/handbook").color(Color::Blue))
        .equation("q_{min} = 12")
        .build();

    let properties = SchemaBuilder::new()
        .title("title", "Name")
        .number("prc", "Price", NumberFormat::Dollar)
        .number("qty", "Quantity", NumberFormat::NumberWithCommas)
        .select("cat", "Category", [("c1", "Produce", Color::Green), ("c2", "Dairy", Color::Yellow)])
        .multi_select(
            "str",
            "Stores",
            [("s1", "North", Color::Gray), ("s2", "South", Color::Brown), ("s3", "East", Color::Pink)],
        )
        .formula("val", "Value", "prop(\"Price\") * prop(\"Quantity\")")
        .relation("sup", "Suppliers")
        .rollup("cnt", "Supplier count", |r| {
            r.relation("sup", "Suppliers").target("title", "Name").function(RollupFunction::CountValues)
        })
        .build();

    json!({
        "object": "database",
        "id": id.to_string(),
        "created_time": timestamp(i),
        "created_by": user(owner),
        "last_edited_time": timestamp(i + 1),
        "last_edited_by": user(owner),
        "title": notion_schema::serialize_rich_text(&title),
        "description": notion_schema::serialize_rich_text(&description),
        "icon": {"type": "emoji", "emoji": "📦"},
        "cover": {"type": "external", "external": {"url": format!("https://example.com/covers/{i}.png")}},
        "properties": notion_schema::serialize_schema(&properties),
        "parent": {"type": "workspace", "workspace": true},
        "url": format!("https://www.notion.so/{}", id.simple()),
        "archived": false,
        "is_inline": i % 3 == 0
    })
}

fn synthetic_corpus(count: usize) -> Vec<Value> {
    let owner = uuid::Uuid::new_v4();
    (0..count).map(|i| synthetic_database(i, &owner)).collect()
}

// =============================================================================
// BENCHMARK
// =============================================================================

/// Drops `null` object members, which serialization omits.
fn without_nulls(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), without_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(without_nulls).collect()),
        other => other.clone(),
    }
}

fn throughput(bytes: usize, elapsed: Duration) -> f64 {
    (bytes as f64 / 1_000_000.0) / elapsed.as_secs_f64()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let values = match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading databases from: {}", path);
            let json_data = fs::read_to_string(&path).expect("Failed to read input file");
            let input: Input = serde_json::from_str(&json_data).expect("Failed to parse JSON");
            input.into_values()
        }
        None => {
            let start = Instant::now();
            let values = synthetic_corpus(DEFAULT_COUNT);
            println!("Generated {} synthetic databases in {:?}", values.len(), start.elapsed());
            values
        }
    };

    let input_bytes: usize = values.iter().map(|v| v.to_string().len()).sum();
    println!("Input: {} databases, {} bytes of JSON", values.len(), input_bytes);

    // Parse
    let parse_start = Instant::now();
    let results: Vec<Result<Database, ValidationErrors>> = values.iter().map(parse_database).collect();
    let parse_time = parse_start.elapsed();

    let mut databases = Vec::with_capacity(results.len());
    let mut accepted = Vec::with_capacity(results.len());
    let mut rejected = 0;
    for (i, result) in results.into_iter().enumerate() {
        match result {
            Ok(database) => {
                databases.push(database);
                accepted.push(i);
            }
            Err(errors) => {
                rejected += 1;
                if rejected <= 5 {
                    println!("  database [{}] rejected with {} error(s):", i, errors.len());
                    for error in errors.iter().take(3) {
                        println!("    {}", error);
                    }
                }
            }
        }
    }

    println!("\nParse: {} ok, {} rejected in {:?}", databases.len(), rejected, parse_time);
    println!("  Throughput: {:.2} MB/s", throughput(input_bytes, parse_time));

    let property_count: usize = databases.iter().map(|d| d.properties.len()).sum();
    let span_count: usize = databases.iter().map(|d| d.title.len() + d.description.len()).sum();
    println!("  - {} properties, {} rich text spans", property_count, span_count);

    // Serialize
    let serialize_start = Instant::now();
    let serialized: Vec<Value> = databases.iter().map(serialize_database).collect();
    let serialize_time = serialize_start.elapsed();
    let output_bytes: usize = serialized.iter().map(|v| v.to_string().len()).sum();

    println!("\nSerialize: {} databases, {} bytes in {:?}", serialized.len(), output_bytes, serialize_time);
    println!("  Throughput: {:.2} MB/s", throughput(output_bytes, serialize_time));

    // Round trip
    let mismatches = accepted
        .iter()
        .zip(&serialized)
        .filter(|&(&i, output)| without_nulls(&values[i]) != *output)
        .count();
    println!("\nRound trip: {} of {} differ from input (ignoring null members)", mismatches, serialized.len());

    // Fingerprints
    let fingerprint_start = Instant::now();
    let mut fingerprints: Vec<String> = databases.iter().map(|d| d.properties.fingerprint().to_string()).collect();
    let fingerprint_time = fingerprint_start.elapsed();
    fingerprints.sort();
    fingerprints.dedup();
    println!(
        "\nFingerprint: {} schemas, {} distinct in {:?}",
        databases.len(),
        fingerprints.len(),
        fingerprint_time
    );
}
