/// Preparability classifier
///
/// Decides whether a composed query yields a preparable SQL statement. The
/// rule is the one observed in the upstream ORM: a statement is preparable
/// unless a literal SQL fragment (raw string filter, inline IN-list, raw
/// ordering/projection/join) appears anywhere in its fragment tree. One
/// offending fragment anywhere forces the whole statement to be issued as
/// literal SQL; there is no partial preparation.
use crate::fragment::{Fragment, FragmentKind};
use crate::relation::Relation;
use crate::render::SqlRenderer;
use serde::{Deserialize, Serialize};

/// Classification result: the preparability verdict, the SQL text the ORM
/// would issue, and the fragments (if any) that blocked preparation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the statement is eligible to be issued as a prepared statement
    pub preparable: bool,
    /// The statement text, with `$n` placeholders at preparable bind sites
    pub sql: String,
    /// Offending fragments, empty iff `preparable` is true
    pub blockers: Vec<Blocker>,
}

/// A fragment that forced the statement to be unprepared.
///
/// Records which fragment blocked, never why the upstream ORM refuses to
/// prepare that form; the source behavior is observed, not explained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blocker {
    /// The offending fragment's kind
    pub kind: FragmentKind,
    /// The offending fragment's display text
    pub text: String,
}

/// The preparability classifier. Pure and total over well-formed fragment
/// trees; it cannot fail.
#[derive(Debug, Default)]
pub struct Classifier;

impl Classifier {
    /// Create a classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classify a whole relation, rendering the full statement.
    pub fn classify(&self, relation: &Relation) -> Verdict {
        let mut blockers = Vec::new();
        collect_blockers(relation.fragments(), &mut blockers);
        let sql = SqlRenderer::new().render_statement(relation);
        Verdict {
            preparable: blockers.is_empty(),
            sql,
            blockers,
        }
    }

    /// Classify a single fragment in isolation, rendering just the clause
    /// it would contribute.
    pub fn classify_fragment(&self, fragment: &Fragment) -> Verdict {
        let mut blockers = Vec::new();
        collect_blockers(std::slice::from_ref(fragment), &mut blockers);
        let sql = SqlRenderer::new().render_fragment(fragment);
        Verdict {
            preparable: blockers.is_empty(),
            sql,
            blockers,
        }
    }
}

/// Recursive visit: a fragment blocks if it is itself literal SQL; its
/// descendants are visited regardless, so every offender is reported.
fn collect_blockers(fragments: &[Fragment], blockers: &mut Vec<Blocker>) {
    for fragment in fragments {
        if fragment.is_literal_sql() {
            blockers.push(Blocker {
                kind: fragment.kind(),
                text: fragment.to_string(),
            });
        }
        collect_blockers(fragment.children(), blockers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{ColumnRef, Literal, SortDirection, SortKey};

    #[test]
    fn test_equality_filter_is_preparable() {
        let fragment = Fragment::EqualityFilter {
            column: ColumnRef::qualified("posts", "title"),
            value: Literal::String("Hello world".to_string()),
        };
        let verdict = Classifier::new().classify_fragment(&fragment);
        assert!(verdict.preparable);
        assert!(verdict.blockers.is_empty());
        assert_eq!(verdict.sql, "WHERE \"posts\".\"title\" = $1");
    }

    #[test]
    fn test_raw_filter_is_unpreparable() {
        let fragment = Fragment::RawFilter {
            sql: "title = 'Hello world'".to_string(),
        };
        let verdict = Classifier::new().classify_fragment(&fragment);
        assert!(!verdict.preparable);
        assert_eq!(verdict.sql, "WHERE (title = 'Hello world')");
        assert_eq!(verdict.blockers.len(), 1);
        assert_eq!(verdict.blockers[0].kind, FragmentKind::RawFilter);
    }

    #[test]
    fn test_ordering_by_column_vs_raw() {
        let classifier = Classifier::new();

        let by_column = Fragment::Ordering {
            key: SortKey::Column(ColumnRef::qualified("posts", "views")),
            direction: SortDirection::Asc,
        };
        assert!(classifier.classify_fragment(&by_column).preparable);

        let by_raw = Fragment::Ordering {
            key: SortKey::Raw("views".to_string()),
            direction: SortDirection::Asc,
        };
        assert!(!classifier.classify_fragment(&by_raw).preparable);
    }

    #[test]
    fn test_clean_relation_is_preparable() {
        let relation = Relation::table("posts")
            .filter_eq("title", Literal::String("Hello".to_string()))
            .order_by("views", SortDirection::Asc)
            .join("comments");
        let verdict = Classifier::new().classify(&relation);
        assert!(verdict.preparable);
        assert!(verdict.blockers.is_empty());
    }

    #[test]
    fn test_unpreparable_descendant_dominates() {
        // An IN-list buried inside a subquery poisons the outer statement.
        let inner = Relation::table("comments")
            .filter_in("id", vec![Literal::Integer(1), Literal::Integer(2)])
            .unwrap();
        let relation = Relation::table("posts")
            .filter_eq("published", Literal::Boolean(true))
            .filter_subquery("id", inner);
        let verdict = Classifier::new().classify(&relation);
        assert!(!verdict.preparable);
        assert_eq!(verdict.blockers.len(), 1);
        assert_eq!(verdict.blockers[0].kind, FragmentKind::InListFilter);
    }

    #[test]
    fn test_every_offender_is_reported() {
        let relation = Relation::table("posts")
            .filter_raw("views > 100")
            .unwrap()
            .filter_in("id", vec![Literal::Integer(1)])
            .unwrap();
        let verdict = Classifier::new().classify(&relation);
        assert!(!verdict.preparable);
        assert_eq!(verdict.blockers.len(), 2);
    }
}
