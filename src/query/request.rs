// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Root query parameters.
//!
//! A [`SearchQuery`] carries everything the compiler needs for one
//! document: optional root id filter, filter branch, full-text branch,
//! paging window, ordered sort, and the projection detail. The caller
//! owns it; compilation only reads it and records the generated text
//! back for inspection.
//!
//! # Example
//!
//! ```rust
//! use elastic_query::{Expression, SearchQuery};
//!
//! let query = SearchQuery::new()
//!     .select("status, customer.name")
//!     .first_row(3)
//!     .max_rows(100)
//!     .filter(Expression::eq("customer.name", "Rob"))
//!     .sort_desc("customer.name");
//! ```

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::query::Expression;
use crate::writer::Scalar;

/// One sort clause entry: property plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortProperty {
    pub property: String,
    pub ascending: bool,
}

/// Properties selected on one path. `all_properties` trumps the
/// explicit set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchProperties {
    #[serde(default)]
    pub all_properties: bool,
    #[serde(default)]
    pub included: IndexSet<String>,
}

impl FetchProperties {
    fn parse(properties: &str) -> Self {
        let mut included = IndexSet::new();
        for prop in properties.split(',') {
            let prop = prop.trim();
            if !prop.is_empty() {
                included.insert(prop.to_string());
            }
        }
        Self {
            all_properties: false,
            included,
        }
    }
}

/// Partial-fetch detail: the root selection plus per-path chunks, in
/// first-seen path order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchDetail {
    #[serde(default)]
    pub root: FetchProperties,
    #[serde(default)]
    pub paths: IndexMap<String, FetchProperties>,
}

impl FetchDetail {
    pub fn is_empty(&self) -> bool {
        !self.root.all_properties && self.root.included.is_empty() && self.paths.is_empty()
    }

    /// Add a select-clause property, routing dotted properties into the
    /// chunk for their parent path (split at the last dot).
    fn add_property(&mut self, property: &str) {
        match property.rsplit_once('.') {
            Some((path, name)) => {
                self.paths
                    .entry(path.to_string())
                    .or_default()
                    .included
                    .insert(name.to_string());
            }
            None => {
                self.root.included.insert(property.to_string());
            }
        }
    }
}

/// Root query parameters for one compilation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Root-level id filter.
    pub id: Option<Scalar>,
    /// Non-scoring constraint branch.
    pub filter: Option<Expression>,
    /// Relevance-scoring full-text branch.
    pub text: Option<Expression>,
    /// Paging offset; 0 means engine default.
    pub first_row: u64,
    /// Paging window size; 0 means engine default.
    pub max_rows: u64,
    /// Sort clauses in order.
    pub order_by: Vec<SortProperty>,
    /// Partial-fetch projection.
    pub detail: FetchDetail,
    /// Text of the last compilation, retained for inspection.
    #[serde(skip)]
    generated_json: Option<String>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select clause, comma separated. Dotted properties become per-path
    /// chunks: `"status, customer.name"` selects `status` at the root
    /// and `name` on the `customer` path.
    pub fn select(mut self, properties: &str) -> Self {
        for prop in properties.split(',') {
            let prop = prop.trim();
            if !prop.is_empty() {
                self.detail.add_property(prop);
            }
        }
        self
    }

    /// Fetch the listed properties on a nested path.
    pub fn fetch(mut self, path: impl Into<String>, properties: &str) -> Self {
        self.detail
            .paths
            .insert(path.into(), FetchProperties::parse(properties));
        self
    }

    /// Fetch every property on a nested path.
    pub fn fetch_all(mut self, path: impl Into<String>) -> Self {
        self.detail.paths.insert(
            path.into(),
            FetchProperties {
                all_properties: true,
                included: IndexSet::new(),
            },
        );
        self
    }

    pub fn id(mut self, id: impl Into<Scalar>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn filter(mut self, expression: Expression) -> Self {
        self.filter = Some(expression);
        self
    }

    pub fn text(mut self, expression: Expression) -> Self {
        self.text = Some(expression);
        self
    }

    pub fn first_row(mut self, first_row: u64) -> Self {
        self.first_row = first_row;
        self
    }

    pub fn max_rows(mut self, max_rows: u64) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn sort_asc(mut self, property: impl Into<String>) -> Self {
        self.order_by.push(SortProperty {
            property: property.into(),
            ascending: true,
        });
        self
    }

    pub fn sort_desc(mut self, property: impl Into<String>) -> Self {
        self.order_by.push(SortProperty {
            property: property.into(),
            ascending: false,
        });
        self
    }

    /// The document text produced by the last successful compilation of
    /// this query, if any.
    pub fn generated_json(&self) -> Option<&str> {
        self.generated_json.as_deref()
    }

    pub(crate) fn set_generated_json(&mut self, text: String) {
        self.generated_json = Some(text);
    }
}
