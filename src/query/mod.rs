// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query algebra and compilation.
//!
//! # Architecture
//!
//! ```text
//! Expression (AST) + SearchQuery (paging/projection/sort)
//!     ↓
//! DocQueryCompiler ──→ engine JSON query document
//!     │
//!     ├─ PropertyResolver  (raw-field substitution, to-many detection)
//!     └─ JsonWriter        (token stream, compact output)
//! ```
//!
//! # Query grammar emitted
//!
//! ```text
//! {"term":{field:value}}            - Exact match (raw field)
//! {"range":{field:{"gte":v}}}       - Range, one or two bounds
//! {"terms":{field:[v1,v2]}}         - Set membership
//! {"ids":{"values":[...]}}          - Id lookup
//! {"prefix":{field:v}}              - Prefix match (raw field)
//! {"wildcard":{field:"*v*"}}        - Suffix/substring/LIKE
//! {"exists":{"field":f}}            - Existence check
//! {"match":{field:{...}}}           - Full-text match
//! {"bool":{"must":[...]}}           - AND  (should = OR, must_not = NOT)
//! {"match_all":{}}                  - No constraint
//! ```

mod compiler;
mod expression;
mod request;
mod text;

pub use compiler::{compile, DocQueryCompiler};
pub use expression::{ComparisonOp, Expression, JunctionKind, LikeType};
pub use request::{FetchDetail, FetchProperties, SearchQuery, SortProperty};
pub use text::{
    CommonTermsOptions, MatchOptions, MultiMatchOptions, MultiMatchType, QueryStringOptions,
    TextSimpleOptions,
};
