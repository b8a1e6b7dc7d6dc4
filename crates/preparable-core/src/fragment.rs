/// Query fragment types for ORM-built SQL statements
///
/// Defines the structure of composed queries including equality filters, raw
/// string filters, inline IN-list filters, projections, orderings, joins,
/// subqueries, and aggregates. Each fragment knows whether it is a literal
/// SQL fragment, which is what decides preparability.
use crate::relation::Relation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One syntactic piece of a composed query.
///
/// A composed statement is a list of fragments over a base table; joins and
/// subqueries nest further fragments beneath them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Fragment {
    /// Hash-style equality predicate: `column = <bound value>`
    EqualityFilter { column: ColumnRef, value: Literal },
    /// Predicate handed over as a literal SQL string
    RawFilter { sql: String },
    /// Multi-value membership predicate with the values expanded inline
    InListFilter {
        column: ColumnRef,
        values: Vec<Literal>,
    },
    /// SELECT list of columns or raw snippets
    Projection { items: Vec<SelectItem> },
    /// ORDER BY key and direction
    Ordering {
        key: SortKey,
        direction: SortDirection,
    },
    /// JOIN to another table, either by association or by raw clause
    Join {
        source: JoinSource,
        /// Fragments merged in from the joined relation
        children: Vec<Fragment>,
    },
    /// Membership predicate against a nested relation: `column IN (SELECT ...)`
    Subquery {
        column: ColumnRef,
        relation: Box<Relation>,
    },
    /// Aggregate projection: COUNT(*), SUM(column), etc.
    Aggregate {
        function: AggregateFunction,
        column: Option<ColumnRef>,
    },
}

/// Fragment kinds, used in verdict reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FragmentKind {
    EqualityFilter,
    RawFilter,
    InListFilter,
    Projection,
    Ordering,
    Join,
    Subquery,
    Aggregate,
}

impl Fragment {
    /// The kind tag for this fragment
    pub fn kind(&self) -> FragmentKind {
        match self {
            Fragment::EqualityFilter { .. } => FragmentKind::EqualityFilter,
            Fragment::RawFilter { .. } => FragmentKind::RawFilter,
            Fragment::InListFilter { .. } => FragmentKind::InListFilter,
            Fragment::Projection { .. } => FragmentKind::Projection,
            Fragment::Ordering { .. } => FragmentKind::Ordering,
            Fragment::Join { .. } => FragmentKind::Join,
            Fragment::Subquery { .. } => FragmentKind::Subquery,
            Fragment::Aggregate { .. } => FragmentKind::Aggregate,
        }
    }

    /// Whether this fragment, on its own, injects literal SQL text into the
    /// statement instead of a bind site.
    ///
    /// Raw filters and inline IN-lists always do; projections, orderings,
    /// and joins do only in their raw string-typed forms. Descendants are
    /// not consulted here; tree-wide dominance lives in the classifier.
    pub fn is_literal_sql(&self) -> bool {
        match self {
            Fragment::RawFilter { .. } | Fragment::InListFilter { .. } => true,
            Fragment::Ordering { key, .. } => matches!(key, SortKey::Raw(_)),
            Fragment::Projection { items } => {
                items.iter().any(|item| matches!(item, SelectItem::Raw(_)))
            }
            Fragment::Join { source, .. } => matches!(source, JoinSource::Raw(_)),
            Fragment::EqualityFilter { .. }
            | Fragment::Subquery { .. }
            | Fragment::Aggregate { .. } => false,
        }
    }

    /// Nested fragments, if any (joined-relation fragments for joins,
    /// the inner relation's fragments for subqueries).
    pub fn children(&self) -> &[Fragment] {
        match self {
            Fragment::Join { children, .. } => children,
            Fragment::Subquery { relation, .. } => relation.fragments(),
            _ => &[],
        }
    }
}

/// An optionally table-qualified column reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: Option<String>,
    pub column: String,
}

impl ColumnRef {
    /// Create an unqualified column reference
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            table: None,
            column: column.into(),
        }
    }

    /// Create a table-qualified column reference
    pub fn qualified(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            column: column.into(),
        }
    }

    /// Parse `"title"` or `"posts.title"`, qualifying bare columns with the
    /// given default table.
    pub fn parse(input: &str, default_table: &str) -> Self {
        match input.split_once('.') {
            Some((table, column)) => Self::qualified(table, column),
            None => Self::qualified(default_table, input),
        }
    }
}

/// Literal values carried by filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
}

/// Sort key for an ordering fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SortKey {
    /// Symbol/column ordering
    Column(ColumnRef),
    /// Raw SQL ordering string
    Raw(String),
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// An entry in the SELECT list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectItem {
    /// Column or qualified-column projection
    Column(ColumnRef),
    /// Raw SQL projection snippet
    Raw(String),
}

/// Where a join comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JoinSource {
    /// Association-based join to the named table
    Association { table: String },
    /// Raw SQL join clause
    Raw(String),
}

/// Aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

// Display implementations for verdict reports and error messages

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::EqualityFilter { column, value: _ } => {
                write!(f, "{} = ?", column)
            }
            Fragment::RawFilter { sql } => write!(f, "({})", sql),
            Fragment::InListFilter { column, values } => {
                write!(f, "{} IN (", column)?;
                for (i, val) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", val)?;
                }
                write!(f, ")")
            }
            Fragment::Projection { items } => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Fragment::Ordering { key, direction } => write!(f, "{} {}", key, direction),
            Fragment::Join { source, .. } => write!(f, "{}", source),
            Fragment::Subquery { column, relation } => {
                write!(f, "{} IN (SELECT ... FROM \"{}\")", column, relation.table_name())
            }
            Fragment::Aggregate { function, column } => match column {
                Some(column) => write!(f, "{}({})", function, column),
                None => write!(f, "{}(*)", function),
            },
        }
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentKind::EqualityFilter => write!(f, "equality filter"),
            FragmentKind::RawFilter => write!(f, "raw SQL filter"),
            FragmentKind::InListFilter => write!(f, "inline IN-list filter"),
            FragmentKind::Projection => write!(f, "projection"),
            FragmentKind::Ordering => write!(f, "ordering"),
            FragmentKind::Join => write!(f, "join"),
            FragmentKind::Subquery => write!(f, "subquery"),
            FragmentKind::Aggregate => write!(f, "aggregate"),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "\"{}\".\"{}\"", table, self.column),
            None => write!(f, "\"{}\"", self.column),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Float(fl) => write!(f, "{}", fl),
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Literal::Null => write!(f, "NULL"),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Column(column) => write!(f, "{}", column),
            SortKey::Raw(sql) => write!(f, "{}", sql),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

impl fmt::Display for SelectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectItem::Column(column) => write!(f, "{}", column),
            SelectItem::Raw(sql) => write!(f, "{}", sql),
        }
    }
}

impl fmt::Display for JoinSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinSource::Association { table } => write!(f, "INNER JOIN \"{}\"", table),
            JoinSource::Raw(sql) => write!(f, "{}", sql),
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateFunction::Count => write!(f, "COUNT"),
            AggregateFunction::Sum => write!(f, "SUM"),
            AggregateFunction::Avg => write!(f, "AVG"),
            AggregateFunction::Min => write!(f, "MIN"),
            AggregateFunction::Max => write!(f, "MAX"),
        }
    }
}
