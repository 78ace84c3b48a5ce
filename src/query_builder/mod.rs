//! # Query Builder
//!
//! Structured predicate, ordering, and pagination types with SQL generation.
//!
//! ## Key Components
//!
//! - [`conditions`] - WHERE clause fragments with And/Or grouping
//! - [`dispatch`] - operator-code dispatch to predicate fragments
//! - [`dates`] - date detection and date predicate construction
//! - [`order`] - ORDER BY clauses, including relation-qualified sort keys
//! - [`joins`] - JOIN clause rendering for the store adapter
//! - [`pagination`] - LIMIT/OFFSET plus the paging metadata envelope
//! - [`builder`] - SELECT/COUNT assembly and execution against PostgreSQL

pub mod builder;
pub mod conditions;
pub mod dates;
pub mod dispatch;
pub mod joins;
pub mod order;
pub mod pagination;

pub use builder::QueryBuilder;
pub use conditions::{Condition, LogicalOperator, WhereClause};
pub use joins::{Join, JoinType};
pub use order::{OrderClause, OrderExpr, OrderKey, OrderSpec};
pub use pagination::{PageEnvelope, Pagination};
