use preparable::logging::LogConfig;
use preparable::{AggregateFunction, Analyzer, Literal, Relation, SortDirection};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (debug level so verdicts show up)
    let _guard = LogConfig::debug().init();

    println!("=== Preparable Demo ===\n");

    let analyzer = Analyzer::new();

    println!("1. Equality filter (prepares)...");
    let clean = Relation::table("posts")
        .filter_eq("title", Literal::String("Hello world".into()))
        .order_by("views", SortDirection::Desc);
    let verdict = analyzer.analyze(&clean);
    println!("   preparable={} sql={}", verdict.preparable, verdict.sql);

    println!("\n2. Raw string filter (falls back to literal SQL)...");
    let raw = Relation::table("posts").filter_raw("title = 'Hello world'")?;
    let verdict = analyzer.analyze(&raw);
    println!("   preparable={} sql={}", verdict.preparable, verdict.sql);

    println!("\n3. Inline IN-list (falls back to literal SQL)...");
    let in_list = Relation::table("posts").filter_in(
        "id",
        vec![Literal::Integer(1), Literal::Integer(2), Literal::Integer(3)],
    )?;
    let verdict = analyzer.analyze(&in_list);
    println!("   preparable={} sql={}", verdict.preparable, verdict.sql);

    println!("\n4. Aggregate over a joined relation (prepares)...");
    let counted = Relation::table("posts")
        .aggregate(AggregateFunction::Count, None)
        .join("comments");
    let verdict = analyzer.analyze(&counted);
    println!("   preparable={} sql={}", verdict.preparable, verdict.sql);

    println!("\n5. Clean outer query poisoned by its subquery...");
    let inner = Relation::table("comments").filter_raw("spam = FALSE")?;
    let poisoned = Relation::table("posts")
        .filter_eq("published", Literal::Boolean(true))
        .filter_subquery("id", inner);
    let verdict = analyzer.analyze(&poisoned);
    println!("   preparable={} sql={}", verdict.preparable, verdict.sql);
    for blocker in &verdict.blockers {
        println!("   blocked by {}: {}", blocker.kind, blocker.text);
    }

    println!("\n=== Demo Complete ===");

    Ok(())
}
