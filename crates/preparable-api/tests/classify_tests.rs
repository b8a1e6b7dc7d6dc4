use preparable::{
    Analyzer, ColumnRef, Fragment, FragmentKind, Literal, Relation, SortDirection, SortKey,
};

#[test]
fn test_tree_without_literal_fragments_is_preparable() {
    let analyzer = Analyzer::new();
    let inner = Relation::table("comments").filter_eq("spam", Literal::Boolean(false));
    let relation = Relation::table("posts")
        .select(&["id", "title"])
        .unwrap()
        .filter_eq("published", Literal::Boolean(true))
        .filter_subquery("id", inner)
        .join("comments")
        .order_by("views", SortDirection::Asc);

    let verdict = analyzer.analyze(&relation);
    assert!(verdict.preparable);
    assert!(verdict.blockers.is_empty());
}

#[test]
fn test_raw_filter_poisons_regardless_of_position() {
    let analyzer = Analyzer::new();

    // At the top level.
    let top = Relation::table("posts")
        .filter_eq("published", Literal::Boolean(true))
        .filter_raw("views > 100")
        .unwrap();
    assert!(!analyzer.analyze(&top).preparable);

    // Inside a subquery.
    let inner = Relation::table("comments").filter_raw("spam = FALSE").unwrap();
    let nested = Relation::table("posts")
        .filter_eq("published", Literal::Boolean(true))
        .filter_subquery("id", inner);
    assert!(!analyzer.analyze(&nested).preparable);

    // Merged beneath a join.
    let merged = Relation::table("posts").join_merging(
        "comments",
        Relation::table("comments").filter_raw("spam = FALSE").unwrap(),
    );
    assert!(!analyzer.analyze(&merged).preparable);
}

#[test]
fn test_in_list_poisons_regardless_of_position() {
    let analyzer = Analyzer::new();

    let inner = Relation::table("comments")
        .filter_in("id", vec![Literal::Integer(1), Literal::Integer(2)])
        .unwrap();
    let relation = Relation::table("posts")
        .filter_eq("published", Literal::Boolean(true))
        .filter_subquery("id", inner);

    let verdict = analyzer.analyze(&relation);
    assert!(!verdict.preparable);
    assert_eq!(verdict.blockers.len(), 1);
    assert_eq!(verdict.blockers[0].kind, FragmentKind::InListFilter);
}

#[test]
fn test_equality_filter_example() {
    let analyzer = Analyzer::new();
    let fragment = Fragment::EqualityFilter {
        column: ColumnRef::qualified("posts", "title"),
        value: Literal::String("Hello world".to_string()),
    };
    let verdict = analyzer.analyze_fragment(&fragment);
    assert!(verdict.preparable);
    assert_eq!(verdict.sql, "WHERE \"posts\".\"title\" = $1");
}

#[test]
fn test_raw_filter_example() {
    let analyzer = Analyzer::new();
    let fragment = Fragment::RawFilter {
        sql: "title = 'Hello world'".to_string(),
    };
    let verdict = analyzer.analyze_fragment(&fragment);
    assert!(!verdict.preparable);
    assert_eq!(verdict.sql, "WHERE (title = 'Hello world')");
}

#[test]
fn test_ordering_by_symbol_vs_raw_string() {
    let analyzer = Analyzer::new();

    let by_column = Fragment::Ordering {
        key: SortKey::Column(ColumnRef::qualified("posts", "views")),
        direction: SortDirection::Asc,
    };
    assert!(analyzer.analyze_fragment(&by_column).preparable);

    let by_raw = Fragment::Ordering {
        key: SortKey::Raw("views".to_string()),
        direction: SortDirection::Asc,
    };
    let verdict = analyzer.analyze_fragment(&by_raw);
    assert!(!verdict.preparable);
    assert_eq!(verdict.blockers[0].kind, FragmentKind::Ordering);
}

#[test]
fn test_blockers_empty_iff_preparable() {
    let analyzer = Analyzer::new();

    let clean = Relation::table("posts").filter_eq("id", Literal::Integer(1));
    let verdict = analyzer.analyze(&clean);
    assert_eq!(verdict.preparable, verdict.blockers.is_empty());

    let tainted = Relation::table("posts")
        .filter_raw("id = 1")
        .unwrap()
        .order_by_raw("views", SortDirection::Desc)
        .unwrap();
    let verdict = analyzer.analyze(&tainted);
    assert_eq!(verdict.preparable, verdict.blockers.is_empty());
    assert_eq!(verdict.blockers.len(), 2);
}

#[test]
fn test_verdict_sql_matches_renderer_output() {
    let analyzer = Analyzer::new();
    let relation = Relation::table("posts")
        .filter_eq("title", Literal::String("Hello".to_string()))
        .filter_in("id", vec![Literal::Integer(1), Literal::Integer(2)])
        .unwrap();
    let verdict = analyzer.analyze(&relation);
    assert!(!verdict.preparable);
    assert_eq!(
        verdict.sql,
        "SELECT \"posts\".* FROM \"posts\" \
         WHERE \"posts\".\"title\" = $1 AND \"posts\".\"id\" IN (1, 2)"
    );
}
