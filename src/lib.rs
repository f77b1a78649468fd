//! # Elastic Query
//!
//! A compiler from a relational-style query expression tree to the
//! Elasticsearch JSON query grammar, with byte-stable output.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Caller                               │
//! │  • Builds an Expression tree + SearchQuery parameters       │
//! │  • Owns paging, projection, sort and both query branches    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   DocQueryCompiler                          │
//! │  • Emits paging, _source, sort, then the query clause       │
//! │  • Folds filter into full-text when both are present        │
//! │  • Nested bool groups via a four-step open/close protocol   │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                      │
//!                    ▼                      ▼
//! ┌──────────────────────────┐  ┌───────────────────────────────┐
//! │     PropertyResolver     │  │         JsonWriter            │
//! │  • raw-field substitution│  │  • token stream, compact JSON │
//! │  • to-many path detection│  │  • scalar/date encodings      │
//! └──────────────────────────┘  └───────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use elastic_query::{
//!     compile, Expression, MappedResolver, QueryEngineConfig, SearchQuery,
//! };
//!
//! let resolver = MappedResolver::new().raw("customer.name", "customer.name.raw");
//! let config = QueryEngineConfig::default();
//!
//! let mut query = SearchQuery::new()
//!     .select("status, customer.name")
//!     .filter(Expression::eq("customer.name", "Rob"));
//!
//! let json = compile(&resolver, &config, &mut query).unwrap();
//! assert_eq!(
//!     json,
//!     "{\"_source\":{\"includes\":[\"status\",\"customer.name\"]},\
//!      \"query\":{\"bool\":{\"filter\":{\"term\":{\"customer.name.raw\":\"Rob\"}}}}}"
//! );
//!
//! // The compiled text is also retained on the query for inspection
//! assert_eq!(query.generated_json(), Some(json.as_str()));
//! ```
//!
//! ## Guarantees
//!
//! - **Deterministic output**: a given query and resolver state always
//!   produce the same bytes; callers compare documents byte-for-byte.
//! - **Order preservation**: junction children and sort clauses render
//!   in original order.
//! - **No partial output**: compilation returns the whole document or a
//!   typed [`QueryError`]; malformed input is never coerced.
//! - **Concurrency**: compilations are independent; a resolver shared
//!   read-only across threads is safe.
//!
//! ## Modules
//!
//! - [`query`]: the [`Expression`] algebra, [`SearchQuery`] parameters
//!   and the [`DocQueryCompiler`]
//! - [`writer`]: JSON token stream and [`Scalar`] encodings
//! - [`resolver`]: property-path to storage-field mapping
//! - [`update`]: queue-entry grouping for the ingestion dispatcher
//! - [`config`]: engine configuration

pub mod config;
pub mod error;
pub mod query;
pub mod resolver;
pub mod update;
pub mod writer;

pub use config::{DocMappingConfig, QueryEngineConfig};
pub use error::QueryError;
pub use query::{
    compile, CommonTermsOptions, ComparisonOp, DocQueryCompiler, Expression, FetchDetail,
    FetchProperties, JunctionKind, LikeType, MatchOptions, MultiMatchOptions, MultiMatchType,
    QueryStringOptions, SearchQuery, SortProperty, TextSimpleOptions,
};
pub use resolver::{MappedResolver, PropertyResolver};
pub use update::{group_by_queue_id, QueueAction, QueueEntry, UpdateGroup};
pub use writer::{JsonWriter, Scalar};
