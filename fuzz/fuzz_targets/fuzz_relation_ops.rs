#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use preparable::{AggregateFunction, Classifier, Literal, Relation, SortDirection};

#[derive(Arbitrary, Debug)]
enum RelationOp {
    FilterEq { column: String, value: i64 },
    FilterRaw { sql: String },
    FilterIn { values: Vec<i64> },
    Select,
    OrderBy,
    OrderByRaw { sql: String },
    Join,
    Aggregate,
    WrapInSubquery,
    JoinMerging,
}

fuzz_target!(|ops: Vec<RelationOp>| {
    let mut relation = Relation::table("posts");
    let mut inserted_literal = false;

    for op in ops.iter().take(64) {
        // Limit operations to keep trees small
        relation = match op {
            RelationOp::FilterEq { column, value } => {
                if column.len() > 1024 {
                    continue;
                }
                relation.filter_eq(column, Literal::Integer(*value))
            }
            RelationOp::FilterRaw { sql } => {
                // Empty raw strings are rejected at build time
                if sql.trim().is_empty() || sql.len() > 1024 {
                    continue;
                }
                inserted_literal = true;
                relation.filter_raw(sql).unwrap()
            }
            RelationOp::FilterIn { values } => {
                if values.is_empty() {
                    continue;
                }
                inserted_literal = true;
                let values = values.iter().take(16).map(|v| Literal::Integer(*v)).collect();
                relation.filter_in("id", values).unwrap()
            }
            RelationOp::Select => relation.select(&["id", "title"]).unwrap(),
            RelationOp::OrderBy => relation.order_by("views", SortDirection::Asc),
            RelationOp::OrderByRaw { sql } => {
                if sql.trim().is_empty() || sql.len() > 1024 {
                    continue;
                }
                inserted_literal = true;
                relation.order_by_raw(sql, SortDirection::Desc).unwrap()
            }
            RelationOp::Join => relation.join("comments"),
            RelationOp::Aggregate => relation.aggregate(AggregateFunction::Count, None),
            RelationOp::WrapInSubquery => {
                // Nest everything built so far one level down
                Relation::table("posts").filter_subquery("id", relation)
            }
            RelationOp::JoinMerging => {
                let inner = Relation::table("comments").filter_eq("spam", Literal::Boolean(false));
                relation.join_merging("comments", inner)
            }
        };
    }

    let verdict = Classifier::new().classify(&relation);
    assert_eq!(verdict.preparable, !inserted_literal);
    assert_eq!(verdict.preparable, verdict.blockers.is_empty());
    assert!(!verdict.sql.is_empty());
});
