//! The boundary between the engine and the backing store (§6).

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::query_builder::{OrderClause, Pagination, WhereClause};
use crate::relations::{Projection, RelationNode};

/// A fetched row: one flat JSON object.
pub type Row = Map<String, Value>;

/// Everything the store needs to run the combined count-and-fetch.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub pagination: Pagination,
    pub where_clause: WhereClause,
    pub order: Vec<OrderClause>,
    /// Plain column selection; empty means "all columns".
    pub attributes: Vec<String>,
    /// Relation-derived aliased projections.
    pub projections: Vec<Projection>,
    /// The annotated inclusion tree, carrying any attached relation
    /// predicates.
    pub include: Vec<RelationNode>,
}

/// Count plus rows returned from one store round trip.
#[derive(Debug, Clone, Default)]
pub struct FetchResult {
    pub count: i64,
    pub rows: Vec<Row>,
}

/// Abstraction over a backing-store table/collection.
///
/// The single `find_and_count` round trip is the engine's only suspension
/// point; cancellation and timeouts belong to the implementing client, and
/// store failures propagate to the orchestrator's caller unchanged.
#[async_trait]
pub trait QueryableEntity: Send + Sync {
    /// Entity (model) name, used for header lookups and naming fallbacks.
    fn entity_name(&self) -> &str;

    /// Whether the column's declared type carries no time component.
    fn is_date_only(&self, column: &str) -> bool;

    /// Runs the combined count-and-fetch for the compiled plan.
    async fn find_and_count(&self, options: &QueryOptions) -> Result<FetchResult>;
}
