//! Configuration for the query engine.
//!
//! # Example
//!
//! ```
//! use elastic_query::QueryEngineConfig;
//!
//! // Minimal config (uses defaults)
//! let config = QueryEngineConfig::default();
//! assert!(!config.track_total_hits);
//!
//! // Loaded from JSON the same way the rest of the stack is
//! let config: QueryEngineConfig = serde_json::from_str(r#"{
//!     "track_total_hits": true,
//!     "mapping": {
//!         "raw_fields": {"customer.name": "customer.name.raw"},
//!         "many_paths": ["details"]
//!     }
//! }"#).unwrap();
//! assert!(config.track_total_hits);
//! ```

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

/// Configuration for query compilation.
///
/// All fields have defaults; a default config reproduces the engine's
/// plain query documents with no extra keys.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryEngineConfig {
    /// Emit `"track_total_hits":true` as the leading document key.
    /// Off by default; engines capping hit counting need it on.
    #[serde(default)]
    pub track_total_hits: bool,

    /// Document mapping used to build the property resolver.
    #[serde(default)]
    pub mapping: DocMappingConfig,
}

/// Storage mapping for the indexed document type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocMappingConfig {
    /// Logical property path -> unanalyzed ("raw") field used for exact
    /// matching. Unmapped properties resolve to themselves.
    #[serde(default)]
    pub raw_fields: HashMap<String, String>,

    /// Property paths traversing a one-to-many association.
    #[serde(default)]
    pub many_paths: HashSet<String>,
}
