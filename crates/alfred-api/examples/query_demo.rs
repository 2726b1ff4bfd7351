/// List Query Demo
///
/// Parses one query string, runs it over an in-memory collection and prints
/// the equivalent SQL. Run with `RUST_LOG=alfred_core=trace` to see every
/// rejected record.
use alfred::logging::LogConfig;
use alfred::{impl_record, Alfred};

#[derive(Debug)]
struct Hero {
    name: String,
    age: i64,
    alive: bool,
    powers: Vec<String>,
    planet: String,
}

impl_record!(Hero {
    name,
    age,
    alive,
    powers,
    planet as "origin",
});

fn hero(name: &str, age: i64, alive: bool, powers: &[&str], planet: &str) -> Hero {
    Hero {
        name: name.to_string(),
        age,
        alive,
        powers: powers.iter().map(|p| p.to_string()).collect(),
        planet: planet.to_string(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = LogConfig::debug().init()?;

    println!("=== Alfred List Query Demo ===\n");

    let heroes = vec![
        hero("Bruce", 39, true, &["money", "intellect"], "Earth"),
        hero("Clark", 35, true, &["flight", "strength"], "Krypton"),
        hero("Diana", 5000, true, &["strength", "lasso"], "Themyscira"),
        hero("Barry", 28, false, &["speed"], "Earth"),
        hero("Hal", 42, true, &["ring"], "Earth"),
    ];

    let alfred = Alfred::new();
    let query = "filter[origin][eq]=Earth&filter[alive][eq]=true&sortBy=age&orderBy=desc&limit=1";
    println!("Query: {}\n", query);

    let option = alfred.parse(query);
    println!("Parsed option:");
    println!("  limit:   {}", option.limit);
    println!("  offset:  {}", option.offset);
    println!("  sort by: {} {}", option.sort_by, option.order);
    for filter in &option.filters {
        println!("  filter:  {}", filter);
    }

    println!("\n1. In memory");
    let page = alfred.apply(heroes, &option)?;
    println!(
        "   {} matching, {} rejected, showing {}",
        page.total,
        page.rejected,
        page.items.len()
    );
    for hero in &page.items {
        println!("   - {} ({}), powers: {}", hero.name, hero.age, hero.powers.join(", "));
    }

    println!("\n2. Pushed down to SQL");
    println!("   {}", alfred.sql("SELECT * FROM heroes", &option));

    println!("\n3. Bad input is reported per record");
    let page = alfred.list(
        vec![hero("Alfred", 82, true, &["butler"], "Earth")],
        "filter[age][gt]=old",
    )?;
    for failure in &page.errors {
        println!("   record {}: {}", failure.index, failure.error);
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
