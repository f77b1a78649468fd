// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query expression AST.
//!
//! Provides a type-safe way to build query expressions that the compiler
//! renders into the engine's JSON grammar. The tree is immutable once
//! handed to the compiler; combinators build new nodes.
//!
//! # Example
//!
//! ```rust
//! use elastic_query::Expression;
//!
//! // Simple comparison
//! let expr = Expression::eq("customer.name", "Rob");
//!
//! // Boolean combinations
//! let expr = Expression::eq("status", "ACTIVE")
//!     .or(Expression::eq("status", "PENDING"));
//!
//! // Negation wraps in a NOT junction
//! let expr = Expression::eq("deleted", true).negate();
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::query::text::{
    CommonTermsOptions, MatchOptions, MultiMatchOptions, QueryStringOptions, TextSimpleOptions,
};
use crate::writer::Scalar;

/// Comparison operator for simple property expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOp {
    Eq,
    NotEq,
    Gt,
    GtEq,
    Lt,
    LtEq,
    Exists,
    NotExists,
    /// Only valid after normalization into a two-bound range. Reaching
    /// the compiler in simple position is a caller bug.
    Between,
}

impl ComparisonOp {
    /// Range comparator key in the engine grammar, for the four
    /// single-bound operators.
    pub(crate) fn doc_exp(self) -> Option<&'static str> {
        match self {
            ComparisonOp::Gt => Some("gt"),
            ComparisonOp::GtEq => Some("gte"),
            ComparisonOp::Lt => Some("lt"),
            ComparisonOp::LtEq => Some("lte"),
            _ => None,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "eq",
            ComparisonOp::NotEq => "not_eq",
            ComparisonOp::Gt => "gt",
            ComparisonOp::GtEq => "gte",
            ComparisonOp::Lt => "lt",
            ComparisonOp::LtEq => "lte",
            ComparisonOp::Exists => "exists",
            ComparisonOp::NotExists => "not_exists",
            ComparisonOp::Between => "between",
        }
    }
}

/// SQL-ish LIKE family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeType {
    /// Pattern with SQL wildcards (`_`, `%`).
    Raw,
    StartsWith,
    EndsWith,
    Contains,
    EqualTo,
}

/// Boolean combinator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JunctionKind {
    And,
    Or,
    Not,
}

impl JunctionKind {
    /// The bool-clause key this junction renders under.
    pub(crate) fn literal(self) -> &'static str {
        match self {
            JunctionKind::And => "must",
            JunctionKind::Or => "should",
            JunctionKind::Not => "must_not",
        }
    }
}

/// A node in the query expression algebra.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Single-operator comparison: equality, inequality, single-bound
    /// range, existence.
    Simple {
        property: String,
        op: ComparisonOp,
        value: Scalar,
    },
    /// Two-bound range (a normalized BETWEEN).
    Range {
        property: String,
        low_op: ComparisonOp,
        low: Scalar,
        high_op: ComparisonOp,
        high: Scalar,
    },
    /// Set membership, optionally negated.
    In {
        property: String,
        values: Vec<Scalar>,
        not: bool,
    },
    /// Existence check. `not_null: true` requires the field to be
    /// present.
    Exists { property: String, not_null: bool },
    /// Equality on every property at once. A missing value requires the
    /// property to be absent instead.
    AllEq {
        properties: IndexMap<String, Option<Scalar>>,
    },
    /// Root document id equality.
    IdEq { value: Scalar },
    /// Root document id membership.
    IdIn { values: Vec<Scalar> },
    /// LIKE family over analyzed text.
    Like {
        property: String,
        value: String,
        like_type: LikeType,
        case_insensitive: bool,
    },
    /// Full-text match on one property.
    Match {
        property: String,
        search: String,
        options: MatchOptions,
    },
    /// Full-text match across several fields.
    MultiMatch {
        search: String,
        options: MultiMatchOptions,
    },
    /// Simple query string syntax.
    TextSimple {
        search: String,
        options: TextSimpleOptions,
    },
    /// Common-terms query.
    CommonTerms {
        search: String,
        options: CommonTermsOptions,
    },
    /// Lucene query string syntax.
    QueryString {
        search: String,
        options: QueryStringOptions,
    },
    /// Boolean combinator over child expressions, in order.
    Junction {
        kind: JunctionKind,
        children: Vec<Expression>,
    },
}

impl Expression {
    pub fn eq(property: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::simple(property, ComparisonOp::Eq, value)
    }

    pub fn ne(property: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::simple(property, ComparisonOp::NotEq, value)
    }

    pub fn gt(property: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::simple(property, ComparisonOp::Gt, value)
    }

    pub fn ge(property: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::simple(property, ComparisonOp::GtEq, value)
    }

    pub fn lt(property: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::simple(property, ComparisonOp::Lt, value)
    }

    pub fn le(property: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::simple(property, ComparisonOp::LtEq, value)
    }

    fn simple(property: impl Into<String>, op: ComparisonOp, value: impl Into<Scalar>) -> Self {
        Expression::Simple {
            property: property.into(),
            op,
            value: value.into(),
        }
    }

    /// Inclusive two-bound range.
    pub fn between(
        property: impl Into<String>,
        low: impl Into<Scalar>,
        high: impl Into<Scalar>,
    ) -> Self {
        Expression::Range {
            property: property.into(),
            low_op: ComparisonOp::GtEq,
            low: low.into(),
            high_op: ComparisonOp::LtEq,
            high: high.into(),
        }
    }

    /// Two-bound range with explicit comparators.
    pub fn range(
        property: impl Into<String>,
        low_op: ComparisonOp,
        low: impl Into<Scalar>,
        high_op: ComparisonOp,
        high: impl Into<Scalar>,
    ) -> Self {
        Expression::Range {
            property: property.into(),
            low_op,
            low: low.into(),
            high_op,
            high: high.into(),
        }
    }

    pub fn is_in(property: impl Into<String>, values: Vec<Scalar>) -> Self {
        Expression::In {
            property: property.into(),
            values,
            not: false,
        }
    }

    pub fn not_in(property: impl Into<String>, values: Vec<Scalar>) -> Self {
        Expression::In {
            property: property.into(),
            values,
            not: true,
        }
    }

    pub fn exists(property: impl Into<String>) -> Self {
        Expression::Exists {
            property: property.into(),
            not_null: true,
        }
    }

    pub fn not_exists(property: impl Into<String>) -> Self {
        Expression::Exists {
            property: property.into(),
            not_null: false,
        }
    }

    /// Equality on several properties at once; a `None` value requires
    /// the property to be absent.
    pub fn all_eq<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<Scalar>)>,
        S: Into<String>,
    {
        Expression::AllEq {
            properties: pairs
                .into_iter()
                .map(|(property, value)| (property.into(), value))
                .collect(),
        }
    }

    pub fn id_eq(value: impl Into<Scalar>) -> Self {
        Expression::IdEq {
            value: value.into(),
        }
    }

    pub fn id_in(values: Vec<Scalar>) -> Self {
        Expression::IdIn { values }
    }

    pub fn starts_with(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self::like_of(property, value, LikeType::StartsWith)
    }

    pub fn ends_with(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self::like_of(property, value, LikeType::EndsWith)
    }

    pub fn contains(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self::like_of(property, value, LikeType::Contains)
    }

    /// SQL-style LIKE pattern (`_` and `%` wildcards).
    pub fn like(property: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::like_of(property, pattern, LikeType::Raw)
    }

    /// Case-insensitive equality over analyzed text.
    pub fn ieq(property: impl Into<String>, value: impl Into<String>) -> Self {
        Expression::Like {
            property: property.into(),
            value: value.into(),
            like_type: LikeType::EqualTo,
            case_insensitive: true,
        }
    }

    fn like_of(
        property: impl Into<String>,
        value: impl Into<String>,
        like_type: LikeType,
    ) -> Self {
        Expression::Like {
            property: property.into(),
            value: value.into(),
            like_type,
            case_insensitive: false,
        }
    }

    pub fn text_match(
        property: impl Into<String>,
        search: impl Into<String>,
        options: MatchOptions,
    ) -> Self {
        Expression::Match {
            property: property.into(),
            search: search.into(),
            options,
        }
    }

    pub fn multi_match(search: impl Into<String>, options: MultiMatchOptions) -> Self {
        Expression::MultiMatch {
            search: search.into(),
            options,
        }
    }

    pub fn text_simple(search: impl Into<String>, options: TextSimpleOptions) -> Self {
        Expression::TextSimple {
            search: search.into(),
            options,
        }
    }

    pub fn common_terms(search: impl Into<String>, options: CommonTermsOptions) -> Self {
        Expression::CommonTerms {
            search: search.into(),
            options,
        }
    }

    pub fn query_string(search: impl Into<String>, options: QueryStringOptions) -> Self {
        Expression::QueryString {
            search: search.into(),
            options,
        }
    }

    /// AND of all children, in order.
    pub fn all_of(children: Vec<Expression>) -> Self {
        Expression::Junction {
            kind: JunctionKind::And,
            children,
        }
    }

    /// OR of all children, in order.
    pub fn any_of(children: Vec<Expression>) -> Self {
        Expression::Junction {
            kind: JunctionKind::Or,
            children,
        }
    }

    /// Combine with AND.
    pub fn and(self, other: Expression) -> Self {
        Expression::Junction {
            kind: JunctionKind::And,
            children: vec![self, other],
        }
    }

    /// Combine with OR.
    pub fn or(self, other: Expression) -> Self {
        Expression::Junction {
            kind: JunctionKind::Or,
            children: vec![self, other],
        }
    }

    /// Wrap in a NOT junction.
    pub fn negate(self) -> Self {
        Expression::Junction {
            kind: JunctionKind::Not,
            children: vec![self],
        }
    }

    /// An empty junction carries no constraint.
    pub(crate) fn is_empty_junction(&self) -> bool {
        matches!(self, Expression::Junction { children, .. } if children.is_empty())
    }

    /// Collapse single-child AND/OR junction layers. NOT junctions are
    /// never collapsed (negation is semantic, not structural).
    pub(crate) fn simplified(self) -> Expression {
        match self {
            Expression::Junction { kind, mut children }
                if kind != JunctionKind::Not && children.len() == 1 =>
            {
                match children.pop() {
                    Some(child) => child.simplified(),
                    None => Expression::Junction { kind, children },
                }
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_comparison() {
        let expr = Expression::eq("customer.name", "Rob");
        assert_eq!(
            expr,
            Expression::Simple {
                property: "customer.name".to_string(),
                op: ComparisonOp::Eq,
                value: Scalar::Str("Rob".to_string()),
            }
        );
    }

    #[test]
    fn test_and_combinator() {
        let expr = Expression::eq("status", "NEW").and(Expression::gt("amount", 10_i64));
        match expr {
            Expression::Junction { kind, children } => {
                assert_eq!(kind, JunctionKind::And);
                assert_eq!(children.len(), 2);
            }
            _ => panic!("Expected AND junction"),
        }
    }

    #[test]
    fn test_or_combinator() {
        let expr =
            Expression::eq("status", "ACTIVE").or(Expression::eq("status", "PENDING"));
        match expr {
            Expression::Junction { kind, children } => {
                assert_eq!(kind, JunctionKind::Or);
                assert_eq!(children.len(), 2);
            }
            _ => panic!("Expected OR junction"),
        }
    }

    #[test]
    fn test_negate_wraps_not() {
        let expr = Expression::eq("deleted", true).negate();
        match expr {
            Expression::Junction { kind, children } => {
                assert_eq!(kind, JunctionKind::Not);
                assert_eq!(children.len(), 1);
            }
            _ => panic!("Expected NOT junction"),
        }
    }

    #[test]
    fn test_between_normalizes_to_bounds() {
        let expr = Expression::between("amount", 10_i64, 20_i64);
        match expr {
            Expression::Range {
                low_op, high_op, ..
            } => {
                assert_eq!(low_op, ComparisonOp::GtEq);
                assert_eq!(high_op, ComparisonOp::LtEq);
            }
            _ => panic!("Expected range"),
        }
    }

    #[test]
    fn test_simplified_collapses_single_child_layers() {
        let inner = Expression::eq("status", "NEW");
        let wrapped = Expression::all_of(vec![Expression::any_of(vec![inner.clone()])]);
        assert_eq!(wrapped.simplified(), inner);
    }

    #[test]
    fn test_simplified_keeps_not() {
        let not = Expression::eq("status", "NEW").negate();
        assert_eq!(not.clone().simplified(), not);
    }

    #[test]
    fn test_all_eq_keeps_pair_order() {
        let expr = Expression::all_eq(vec![
            ("status", Some(Scalar::from("NEW"))),
            ("archived_at", None),
        ]);
        match expr {
            Expression::AllEq { properties } => {
                let keys: Vec<&String> = properties.keys().collect();
                assert_eq!(keys, ["status", "archived_at"]);
                assert_eq!(properties["archived_at"], None);
            }
            _ => panic!("Expected all-eq"),
        }
    }

    #[test]
    fn test_empty_junction_is_empty() {
        assert!(Expression::all_of(vec![]).is_empty_junction());
        assert!(!Expression::eq("a", 1_i64).is_empty_junction());
    }

    #[test]
    fn test_serde_round_trip() {
        let expr = Expression::eq("status", "NEW")
            .and(Expression::between("amount", 1_i64, 5_i64))
            .negate();
        let json = serde_json::to_string(&expr).unwrap();
        let back: Expression = serde_json::from_str(&json).unwrap();
        assert_eq!(back, expr);
    }
}
