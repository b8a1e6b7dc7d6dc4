//! # Preparable
//!
//! Classifies ORM-built SQL statements as preparable or literal SQL.
//!
//! An ORM that constructs SQL from chained calls only issues a *prepared
//! statement* (a parameterized statement whose plan the server can cache
//! and reuse) for some construction patterns. Hash-style equality filters,
//! symbol orderings, association joins, column projections, and subquery
//! predicates prepare; a raw string filter or an inline-expanded IN list
//! anywhere in the composed query forces the whole statement out to
//! literal SQL. This crate models the composed query as a fragment tree
//! and applies that observed rule.
//!
//! ## Quick Start
//!
//! ```rust
//! use preparable::{Analyzer, Literal, Relation, SortDirection};
//!
//! fn main() -> Result<(), preparable::Error> {
//!     let analyzer = Analyzer::new();
//!
//!     // Equality filters prepare.
//!     let clean = Relation::table("posts")
//!         .filter_eq("title", Literal::String("Hello world".into()))
//!         .order_by("views", SortDirection::Desc);
//!     assert!(analyzer.analyze(&clean).preparable);
//!
//!     // One raw string filter poisons the whole statement.
//!     let tainted = Relation::table("posts")
//!         .filter_raw("title = 'Hello world'")?;
//!     let verdict = analyzer.analyze(&tainted);
//!     assert!(!verdict.preparable);
//!     assert_eq!(verdict.blockers.len(), 1);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod logging;

use tracing::{debug, trace};

// Re-export core types
pub use preparable_core::{
    AggregateFunction, Blocker, Classifier, ColumnRef, Error, Fragment, FragmentKind, JoinSource,
    Literal, Relation, Result, SelectItem, SortDirection, SortKey, SqlRenderer, Verdict,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The main analyzer handle.
///
/// Wraps the preparability classifier and logs each verdict through
/// `tracing`. The analyzer is stateless and cheap to construct.
#[derive(Debug, Default)]
pub struct Analyzer {
    classifier: Classifier,
}

impl Analyzer {
    /// Creates a new analyzer.
    pub fn new() -> Self {
        Self {
            classifier: Classifier::new(),
        }
    }

    /// Classifies a relation's composed statement.
    pub fn analyze(&self, relation: &Relation) -> Verdict {
        let verdict = self.classifier.classify(relation);
        debug!(
            table = relation.table_name(),
            preparable = verdict.preparable,
            sql = %verdict.sql,
            "classified statement"
        );
        for blocker in &verdict.blockers {
            trace!(kind = %blocker.kind, text = %blocker.text, "blocking fragment");
        }
        verdict
    }

    /// Classifies a single fragment in isolation.
    pub fn analyze_fragment(&self, fragment: &Fragment) -> Verdict {
        let verdict = self.classifier.classify_fragment(fragment);
        debug!(
            kind = %fragment.kind(),
            preparable = verdict.preparable,
            sql = %verdict.sql,
            "classified fragment"
        );
        verdict
    }
}
