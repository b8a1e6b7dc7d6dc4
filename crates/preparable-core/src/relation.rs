/// Relation builder for composed queries
///
/// Mirrors the chained query-construction surface of an ORM: a relation
/// names a base table and accumulates fragments one call at a time. This is
/// the only way fragment trees come to exist, so structural validation
/// (empty IN lists, empty projections, empty raw strings) happens here and
/// classification itself stays total.
use crate::error::{Error, Result};
use crate::fragment::{
    AggregateFunction, ColumnRef, Fragment, JoinSource, Literal, SelectItem, SortDirection,
    SortKey,
};
use serde::{Deserialize, Serialize};

/// A query under construction over a base table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    table: String,
    fragments: Vec<Fragment>,
}

impl Relation {
    /// Start a relation over the named table.
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table: name.into(),
            fragments: Vec::new(),
        }
    }

    /// The base table name.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// The fragments accumulated so far.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Add a hash-style equality predicate. Bare column names are qualified
    /// with the base table; `"comments.body"` stays qualified as written.
    pub fn filter_eq(mut self, column: &str, value: Literal) -> Self {
        self.fragments.push(Fragment::EqualityFilter {
            column: ColumnRef::parse(column, &self.table),
            value,
        });
        self
    }

    /// Add a predicate given as a literal SQL string.
    pub fn filter_raw(mut self, sql: &str) -> Result<Self> {
        if sql.trim().is_empty() {
            return Err(Error::InvalidFragment("empty raw filter".to_string()));
        }
        self.fragments.push(Fragment::RawFilter {
            sql: sql.to_string(),
        });
        Ok(self)
    }

    /// Add a multi-value membership predicate. The values are expanded
    /// inline into the statement text, in the order given.
    pub fn filter_in(mut self, column: &str, values: Vec<Literal>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::InvalidFragment("empty IN list".to_string()));
        }
        self.fragments.push(Fragment::InListFilter {
            column: ColumnRef::parse(column, &self.table),
            values,
        });
        Ok(self)
    }

    /// Add a membership predicate against a nested relation:
    /// `column IN (SELECT ...)`.
    pub fn filter_subquery(mut self, column: &str, relation: Relation) -> Self {
        self.fragments.push(Fragment::Subquery {
            column: ColumnRef::parse(column, &self.table),
            relation: Box::new(relation),
        });
        self
    }

    /// Add the named columns to the SELECT list. Repeated calls append;
    /// the renderer concatenates all projection fragments in order.
    pub fn select(mut self, columns: &[&str]) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::InvalidFragment("empty projection".to_string()));
        }
        let items = columns
            .iter()
            .map(|c| SelectItem::Column(ColumnRef::parse(c, &self.table)))
            .collect();
        self.fragments.push(Fragment::Projection { items });
        Ok(self)
    }

    /// Add a raw SQL snippet to the SELECT list.
    pub fn select_raw(mut self, sql: &str) -> Result<Self> {
        if sql.trim().is_empty() {
            return Err(Error::InvalidFragment("empty raw projection".to_string()));
        }
        self.fragments.push(Fragment::Projection {
            items: vec![SelectItem::Raw(sql.to_string())],
        });
        Ok(self)
    }

    /// Add an aggregate projection; `None` aggregates over `*`.
    pub fn aggregate(mut self, function: AggregateFunction, column: Option<&str>) -> Self {
        self.fragments.push(Fragment::Aggregate {
            function,
            column: column.map(|c| ColumnRef::parse(c, &self.table)),
        });
        self
    }

    /// Add a symbol/column ordering.
    pub fn order_by(mut self, column: &str, direction: SortDirection) -> Self {
        self.fragments.push(Fragment::Ordering {
            key: SortKey::Column(ColumnRef::parse(column, &self.table)),
            direction,
        });
        self
    }

    /// Add a raw SQL ordering.
    pub fn order_by_raw(mut self, sql: &str, direction: SortDirection) -> Result<Self> {
        if sql.trim().is_empty() {
            return Err(Error::InvalidFragment("empty raw ordering".to_string()));
        }
        self.fragments.push(Fragment::Ordering {
            key: SortKey::Raw(sql.to_string()),
            direction,
        });
        Ok(self)
    }

    /// Add an association-based join to the named table.
    pub fn join(mut self, association: &str) -> Self {
        self.fragments.push(Fragment::Join {
            source: JoinSource::Association {
                table: association.to_string(),
            },
            children: Vec::new(),
        });
        self
    }

    /// Add an association-based join and merge the joined relation's
    /// fragments beneath it.
    pub fn join_merging(mut self, association: &str, other: Relation) -> Self {
        self.fragments.push(Fragment::Join {
            source: JoinSource::Association {
                table: association.to_string(),
            },
            children: other.fragments,
        });
        self
    }

    /// Add a join given as a raw SQL clause.
    pub fn join_raw(mut self, sql: &str) -> Result<Self> {
        if sql.trim().is_empty() {
            return Err(Error::InvalidFragment("empty raw join".to_string()));
        }
        self.fragments.push(Fragment::Join {
            source: JoinSource::Raw(sql.to_string()),
            children: Vec::new(),
        });
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_columns_are_qualified_with_base_table() {
        let relation = Relation::table("posts").filter_eq("title", Literal::String("x".into()));
        match &relation.fragments()[0] {
            Fragment::EqualityFilter { column, .. } => {
                assert_eq!(column, &ColumnRef::qualified("posts", "title"));
            }
            other => panic!("Expected EqualityFilter, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_in_list_is_rejected() {
        let result = Relation::table("posts").filter_in("id", Vec::new());
        assert!(matches!(result, Err(Error::InvalidFragment(_))));
    }

    #[test]
    fn test_empty_projection_is_rejected() {
        let result = Relation::table("posts").select(&[]);
        assert!(matches!(result, Err(Error::InvalidFragment(_))));
    }

    #[test]
    fn test_empty_raw_strings_are_rejected() {
        assert!(Relation::table("posts").filter_raw("  ").is_err());
        assert!(Relation::table("posts")
            .order_by_raw("", SortDirection::Asc)
            .is_err());
        assert!(Relation::table("posts").join_raw("").is_err());
        assert!(Relation::table("posts").select_raw(" ").is_err());
    }

    #[test]
    fn test_join_merging_nests_fragments() {
        let inner = Relation::table("comments").filter_eq("spam", Literal::Boolean(false));
        let relation = Relation::table("posts").join_merging("comments", inner);
        let children = relation.fragments()[0].children();
        assert_eq!(children.len(), 1);
    }
}
