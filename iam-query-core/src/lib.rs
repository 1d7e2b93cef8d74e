//! Query model over AWS IAM service reference data.
//!
//! For a given service this crate answers which actions exist, their access
//! level, which resource ARN types and condition keys apply to each action, and
//! which actions are restricted along those dimensions:
//! - [`Dataset`]: the immutable, indexed reference corpus
//! - [`normalize`]: user access-level tokens to canonical levels
//! - [`Query`]: validated request shapes, built from a flat [`QueryRequest`]
//! - [`QueryEngine`]: the lookup and filter operations
//!

pub mod access_level;
pub mod dataset;
mod embedded_data;
pub mod engine;
pub mod errors;
mod providers;
pub mod request;

// Re-exports for a small, focused public API
pub use access_level::{normalize, AccessLevel};
pub use dataset::{
    Action, ArnType, ConditionKey, Dataset, DatasetSource, ResourceTypeRef, ServiceReference,
    ServiceScope,
};
pub use engine::{QueryEngine, QueryOutput};
pub use errors::{EntityKind, QueryError, Result};
pub use providers::JsonProvider;
pub use request::{ActionQuery, ArnQuery, ConditionQuery, Query, QueryKind, QueryRequest, Table};
