// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Error taxonomy for query compilation.
//!
//! Two kinds of failure per the compilation contract: malformed input
//! (caller bugs, never coerced) and serialization failures from the
//! underlying output sink. Compilation either returns a complete document
//! or fails outright with no partial output.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    /// A value outside the supported scalar set reached the writer.
    /// Indicates a caller bug, never retried.
    #[error("Unsupported scalar value: {0}")]
    UnsupportedScalar(String),

    /// An operator variant reached a render path that forbids it
    /// (e.g. a raw BETWEEN that should have been normalized into a
    /// two-bound range before compilation).
    #[error("Operator {operator} not supported for property '{property}'")]
    UnsupportedOperator { operator: String, property: String },

    /// The output sink failed while the document was being written.
    #[error("Query serialization failed: {0}")]
    Serialization(#[from] std::io::Error),
}
