#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # DynaQuery
//!
//! Declarative query composition and pagination over PostgreSQL.
//!
//! ## Overview
//!
//! DynaQuery turns a caller-supplied description — named filters with numeric
//! operator codes, an ordering spec, a relation inclusion tree, and page
//! parameters — into one counted, paginated SQL query, then shapes the fetched
//! rows into a flat page with a paging envelope.
//!
//! ## Module Organization
//!
//! - [`filter`] - Filter boundary types, operator codes, and the two-source compiler
//! - [`query_builder`] - Predicate fragments, operator dispatch, dates, ordering, pagination
//! - [`relations`] - Inclusion tree, relation-scoped predicates, attribute projection
//! - [`entity`] - The store boundary trait
//! - [`postgres`] - sqlx-backed store adapter
//! - [`paginate`] - The orchestrating engine
//! - [`shape`] - Post-fetch row shaping
//! - [`export`] - Tabular export projection
//! - [`config`] - Engine defaults
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dynaquery::config::EngineConfig;
//! use dynaquery::paginate::{PaginationParams, QueryEngine};
//! use dynaquery::postgres::PgEntity;
//! use dynaquery::shape::ShapeOptions;
//! use sqlx::PgPool;
//!
//! # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
//! let engine = QueryEngine::new(EngineConfig::default());
//! let books = PgEntity::new(pool, "Book", "books");
//!
//! let result = engine
//!     .paginate_and_filter(
//!         &books,
//!         PaginationParams { page: Some(1), page_size: Some(10) },
//!         &Default::default(),
//!         Vec::new(),
//!         Vec::new(),
//!         &ShapeOptions::default(),
//!     )
//!     .await?;
//! println!("{} rows of {}", result.list.len(), result.paged.max_count);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod export;
pub mod filter;
pub mod logging;
pub mod naming;
pub mod paginate;
pub mod postgres;
pub mod query_builder;
pub mod relations;
pub mod shape;

pub use config::EngineConfig;
pub use entity::{FetchResult, QueryOptions, QueryableEntity, Row};
pub use error::{QueryError, Result};
pub use export::{build_tabular_export, HeaderMap, TabularExport};
pub use filter::{compile_filters, Filter, FilterOperator, FilterSet, FilterValues};
pub use paginate::{PaginationParams, QueryEngine, QueryResult};
pub use postgres::PgEntity;
pub use query_builder::{PageEnvelope, Pagination};
pub use relations::{Projection, RelationAttribute, RelationNode};
pub use shape::{shape_rows, ShapeOptions};
