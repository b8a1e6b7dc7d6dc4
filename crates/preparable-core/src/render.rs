/// SQL text generation for classified statements
///
/// Renders a relation's fragment tree into the statement text the ORM would
/// issue. Preparable bind sites become numbered placeholders (`$1`, `$2`,
/// ...), assigned left to right across the whole statement and continuing
/// through subqueries; literal SQL fragments have their text inlined
/// verbatim, with IN-list values expanded in place.
use crate::fragment::{Fragment, JoinSource};
use crate::relation::Relation;

/// Renders relations and lone fragments into SQL text.
pub struct SqlRenderer {
    next_placeholder: usize,
}

/// Clause buckets a statement is assembled from.
#[derive(Default)]
struct Clauses {
    select: Vec<String>,
    joins: Vec<String>,
    predicates: Vec<String>,
    orderings: Vec<String>,
}

impl SqlRenderer {
    /// Create a renderer with placeholder numbering starting at `$1`.
    pub fn new() -> Self {
        Self {
            next_placeholder: 1,
        }
    }

    /// Render the full statement for a relation.
    pub fn render_statement(&mut self, relation: &Relation) -> String {
        let mut clauses = Clauses::default();
        self.collect(relation.table_name(), relation.fragments(), &mut clauses);

        let mut sql = String::from("SELECT ");
        if clauses.select.is_empty() {
            sql.push_str(&format!("\"{}\".*", relation.table_name()));
        } else {
            sql.push_str(&clauses.select.join(", "));
        }
        sql.push_str(&format!(" FROM \"{}\"", relation.table_name()));
        for join in &clauses.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        if !clauses.predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.predicates.join(" AND "));
        }
        if !clauses.orderings.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&clauses.orderings.join(", "));
        }
        sql
    }

    /// Render a fragment in isolation as the clause it would contribute.
    pub fn render_fragment(&mut self, fragment: &Fragment) -> String {
        match fragment {
            Fragment::EqualityFilter { .. }
            | Fragment::RawFilter { .. }
            | Fragment::InListFilter { .. }
            | Fragment::Subquery { .. } => {
                format!("WHERE {}", self.predicate(fragment))
            }
            Fragment::Projection { items } => {
                let rendered: Vec<String> = items.iter().map(|i| i.to_string()).collect();
                format!("SELECT {}", rendered.join(", "))
            }
            Fragment::Aggregate { .. } => format!("SELECT {}", fragment),
            Fragment::Ordering { key, direction } => {
                format!("ORDER BY {} {}", key, direction)
            }
            Fragment::Join { source, .. } => source.to_string(),
        }
    }

    fn collect(&mut self, base_table: &str, fragments: &[Fragment], clauses: &mut Clauses) {
        for fragment in fragments {
            match fragment {
                Fragment::EqualityFilter { .. }
                | Fragment::RawFilter { .. }
                | Fragment::InListFilter { .. }
                | Fragment::Subquery { .. } => {
                    let predicate = self.predicate(fragment);
                    clauses.predicates.push(predicate);
                }
                Fragment::Projection { items } => {
                    for item in items {
                        clauses.select.push(item.to_string());
                    }
                }
                Fragment::Aggregate { .. } => {
                    clauses.select.push(fragment.to_string());
                }
                Fragment::Ordering { key, direction } => {
                    clauses.orderings.push(format!("{} {}", key, direction));
                }
                Fragment::Join { source, children } => {
                    clauses.joins.push(self.join_clause(base_table, source));
                    // Merged fragments from the joined relation land in the
                    // same statement's clauses.
                    self.collect(base_table, children, clauses);
                }
            }
        }
    }

    fn predicate(&mut self, fragment: &Fragment) -> String {
        match fragment {
            Fragment::EqualityFilter { column, .. } => {
                format!("{} = ${}", column, self.take_placeholder())
            }
            Fragment::RawFilter { sql } => format!("({})", sql),
            Fragment::InListFilter { column, values } => {
                let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                format!("{} IN ({})", column, rendered.join(", "))
            }
            Fragment::Subquery { column, relation } => {
                let inner = self.render_statement(relation);
                format!("{} IN ({})", column, inner)
            }
            _ => unreachable!("not a predicate fragment"),
        }
    }

    fn join_clause(&self, base_table: &str, source: &JoinSource) -> String {
        match source {
            JoinSource::Association { table } => format!(
                "INNER JOIN \"{}\" ON \"{}\".\"{}_id\" = \"{}\".\"id\"",
                table,
                table,
                singularize(base_table),
                base_table
            ),
            JoinSource::Raw(sql) => sql.clone(),
        }
    }

    fn take_placeholder(&mut self) -> usize {
        let n = self.next_placeholder;
        self.next_placeholder += 1;
        n
    }
}

impl Default for SqlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Naive singular form of a table name, for conventional foreign keys
/// (`posts` -> `post_id`, `categories` -> `category_id`).
fn singularize(table: &str) -> String {
    if let Some(stem) = table.strip_suffix("ies") {
        format!("{}y", stem)
    } else if let Some(stem) = table.strip_suffix('s') {
        stem.to_string()
    } else {
        table.to_string()
    }
}
