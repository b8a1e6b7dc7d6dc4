//! # Preparable Core
//!
//! Fragment model, relation builder, SQL renderer, and preparability
//! classifier for ORM-built SQL statements.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
pub mod error;
/// Query fragment types
#[allow(missing_docs)]
pub mod fragment;
pub mod relation;
pub mod render;

pub use classify::{Blocker, Classifier, Verdict};
pub use error::{Error, Result};
pub use fragment::{
    AggregateFunction, ColumnRef, Fragment, FragmentKind, JoinSource, Literal, SelectItem,
    SortDirection, SortKey,
};
pub use relation::Relation;
pub use render::SqlRenderer;
