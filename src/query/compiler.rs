// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Expression-to-query compiler.
//!
//! Walks a [`SearchQuery`] and emits the engine's JSON query grammar:
//! paging, projection, sort, then the root query clause. Boolean
//! junctions nest through a four-step open/close protocol (`bool` object,
//! clause array, children, close both) that holds to arbitrary depth.
//! Output keys appear in a fixed order and the document is byte-stable
//! for a given query and resolver state.
//!
//! Full-text and filter branches cannot coexist as sibling top-level
//! keys; when both are present the filter folds into the full-text
//! expression as an additional AND-ed clause.

use std::io;

use tracing::debug;

use crate::config::QueryEngineConfig;
use crate::error::QueryError;
use crate::query::expression::{ComparisonOp, Expression, JunctionKind, LikeType};
use crate::query::request::{FetchDetail, SearchQuery, SortProperty};
use crate::query::text::MatchOptions;
use crate::resolver::PropertyResolver;
use crate::writer::{JsonWriter, Scalar};

const BOOL: &str = "bool";
const TERM: &str = "term";
const TERMS: &str = "terms";
const RANGE: &str = "range";
const IDS: &str = "ids";
const VALUES: &str = "values";
const PREFIX: &str = "prefix";
const WILDCARD: &str = "wildcard";
const EXISTS: &str = "exists";
const FIELD: &str = "field";
const MATCH_ALL: &str = "match_all";

/// Compile one query into its engine document and record the text back
/// onto the query for inspection.
pub fn compile<R: PropertyResolver>(
    resolver: &R,
    config: &QueryEngineConfig,
    query: &mut SearchQuery,
) -> Result<String, QueryError> {
    DocQueryCompiler::new(resolver, config).compile(query)
}

/// Per-compilation render state: the output token stream plus the
/// resolver and config it consults. Created per call, never shared.
pub struct DocQueryCompiler<'a, R: PropertyResolver> {
    resolver: &'a R,
    config: &'a QueryEngineConfig,
    json: JsonWriter<Vec<u8>>,
}

impl<'a, R: PropertyResolver> DocQueryCompiler<'a, R> {
    pub fn new(resolver: &'a R, config: &'a QueryEngineConfig) -> Self {
        Self {
            resolver,
            config,
            json: JsonWriter::new(Vec::with_capacity(200)),
        }
    }

    /// Render the full query document. On success the text is also
    /// retained on the query (`generated_json`).
    pub fn compile(mut self, query: &mut SearchQuery) -> Result<String, QueryError> {
        self.write_query(query)?;
        let text = self.json.into_string()?;
        debug!(bytes = text.len(), "query document compiled");
        query.set_generated_json(text.clone());
        Ok(text)
    }

    fn write_query(&mut self, query: &SearchQuery) -> Result<(), QueryError> {
        self.json.start_object()?;
        if self.config.track_total_hits {
            self.json.bool_field("track_total_hits", true)?;
        }
        self.write_paging(query)?;
        self.write_fetch_partial(&query.detail)?;
        self.write_order_by(&query.order_by)?;
        self.json.field_name("query")?;
        if !self.write_full_text(query)? {
            self.write_filter(query)?;
        }
        self.json.end_object()?;
        Ok(())
    }

    /// Paging fields only when set; absence means engine default, never
    /// an explicit zero.
    fn write_paging(&mut self, query: &SearchQuery) -> Result<(), QueryError> {
        if query.first_row > 0 {
            self.json.u64_field("from", query.first_row)?;
        }
        if query.max_rows > 0 {
            self.json.u64_field("size", query.max_rows)?;
        }
        Ok(())
    }

    /// `_source.includes` for partial fetching. Root selection first,
    /// then each path chunk as `path.*` or `path.prop`, deduplicated in
    /// insertion order. Omitted entirely when nothing is selected.
    fn write_fetch_partial(&mut self, detail: &FetchDetail) -> Result<(), QueryError> {
        let mut includes: indexmap::IndexSet<String> = indexmap::IndexSet::new();

        for prop in &detail.root.included {
            includes.insert(prop.clone());
        }
        for (path, props) in &detail.paths {
            if props.all_properties {
                includes.insert(format!("{}.*", path));
            } else {
                for prop in &props.included {
                    includes.insert(format!("{}.{}", path, prop));
                }
            }
        }

        if !includes.is_empty() {
            self.json.object_field_start("_source")?;
            self.json.array_field_start("includes")?;
            for prop in &includes {
                self.json.write_string(prop)?;
            }
            self.json.end_array()?;
            self.json.end_object()?;
        }
        Ok(())
    }

    fn write_order_by(&mut self, order_by: &[SortProperty]) -> Result<(), QueryError> {
        if order_by.is_empty() {
            return Ok(());
        }
        self.json.array_field_start("sort")?;
        for sort in order_by {
            self.json.start_object()?;
            self.json
                .object_field_start(self.resolver.raw_field(&sort.property))?;
            self.json
                .string_field("order", if sort.ascending { "asc" } else { "desc" })?;
            self.json.end_object()?;
            self.json.end_object()?;
        }
        self.json.end_array()?;
        Ok(())
    }

    /// Render the full-text branch as the query clause, folding a
    /// present filter branch in as an additional AND-ed clause. Returns
    /// false when there is no non-empty full-text branch.
    fn write_full_text(&mut self, query: &SearchQuery) -> Result<bool, QueryError> {
        let text = match &query.text {
            Some(text) if !text.is_empty_junction() => text.clone().simplified(),
            _ => return Ok(false),
        };

        let combined = match &query.filter {
            Some(filter) if !filter.is_empty_junction() => fold_into(text, filter.clone()),
            _ => text,
        };
        self.write_expression(&combined)?;
        Ok(true)
    }

    /// `bool.filter` wrapper around the id-equality and/or filter
    /// expression; `match_all` when the query carries no constraint.
    fn write_filter(&mut self, query: &SearchQuery) -> Result<(), QueryError> {
        let id_equals = query
            .id
            .clone()
            .map(|value| Expression::IdEq { value });
        let filter = query
            .filter
            .clone()
            .filter(|f| !f.is_empty_junction());

        // Filter primary, id-equality folded in as an additional leaf.
        let clause = match (filter, id_equals) {
            (Some(filter), Some(id_equals)) => Some(fold_into(filter, id_equals)),
            (Some(filter), None) => Some(filter),
            (None, Some(id_equals)) => Some(id_equals),
            (None, None) => None,
        };

        match clause {
            Some(expression) => {
                self.json.start_object()?;
                self.json.object_field_start(BOOL)?;
                self.json.field_name("filter")?;
                self.write_expression(&expression)?;
                self.json.end_object()?;
                self.json.end_object()?;
            }
            None => self.write_match_all()?,
        }
        Ok(())
    }

    fn write_match_all(&mut self) -> Result<(), QueryError> {
        self.json.start_object()?;
        self.json.object_field_start(MATCH_ALL)?;
        self.json.end_object()?;
        self.json.end_object()?;
        Ok(())
    }

    fn write_expression(&mut self, expression: &Expression) -> Result<(), QueryError> {
        match expression {
            Expression::Simple {
                property,
                op,
                value,
            } => self.write_simple(*op, property, value),
            Expression::Range {
                property,
                low_op,
                low,
                high_op,
                high,
            } => self.write_range_pair(property, *low_op, low, *high_op, high),
            Expression::In {
                property,
                values,
                not,
            } => self.write_in(property, values, *not),
            Expression::Exists { property, not_null } => self.write_exists(*not_null, property),
            Expression::AllEq { properties } => self.write_all_equals(properties),
            Expression::IdEq { value } => self.write_ids(std::slice::from_ref(value)),
            Expression::IdIn { values } => self.write_ids(values),
            Expression::Like {
                property,
                value,
                like_type,
                case_insensitive,
            } => self.write_like(property, value, *like_type, *case_insensitive),
            Expression::Match {
                property,
                search,
                options,
            } => {
                options.write_to(&mut self.json, property, search)?;
                Ok(())
            }
            Expression::MultiMatch { search, options } => {
                options.write_to(&mut self.json, search)?;
                Ok(())
            }
            Expression::TextSimple { search, options } => {
                options.write_to(&mut self.json, search)?;
                Ok(())
            }
            Expression::CommonTerms { search, options } => {
                options.write_to(&mut self.json, search)?;
                Ok(())
            }
            Expression::QueryString { search, options } => {
                options.write_to(&mut self.json, search)?;
                Ok(())
            }
            Expression::Junction { kind, children } => self.write_junction(*kind, children),
        }
    }

    /// Children render in original order; engines can short-circuit
    /// clause arrays and byte-comparing callers rely on it.
    fn write_junction(
        &mut self,
        kind: JunctionKind,
        children: &[Expression],
    ) -> Result<(), QueryError> {
        if children.is_empty() {
            // No constraint: match everything
            return self.write_match_all();
        }
        self.start_bool(kind)?;
        for child in children {
            self.write_expression(child)?;
        }
        self.end_bool()?;
        Ok(())
    }

    fn write_simple(
        &mut self,
        op: ComparisonOp,
        property: &str,
        value: &Scalar,
    ) -> Result<(), QueryError> {
        match op {
            ComparisonOp::Eq => self.write_equal_to(property, value),
            ComparisonOp::NotEq => {
                self.start_bool(JunctionKind::Not)?;
                self.write_equal_to(property, value)?;
                self.end_bool()?;
                Ok(())
            }
            ComparisonOp::Exists => self.write_exists(true, property),
            ComparisonOp::NotExists => self.write_exists(false, property),
            other => match other.doc_exp() {
                Some(comparator) => self.write_range_single(property, comparator, value),
                // BETWEEN must be normalized into a two-bound range
                // before compilation; anything else is unknown.
                None => Err(QueryError::UnsupportedOperator {
                    operator: other.as_str().to_string(),
                    property: property.to_string(),
                }),
            },
        }
    }

    /// One term per property, AND-joined; a missing value becomes a
    /// must_not exists.
    fn write_all_equals(
        &mut self,
        properties: &indexmap::IndexMap<String, Option<Scalar>>,
    ) -> Result<(), QueryError> {
        self.start_bool(JunctionKind::And)?;
        for (property, value) in properties {
            match value {
                Some(value) => self.write_equal_to(property, value)?,
                None => self.write_exists(false, property)?,
            }
        }
        self.end_bool()?;
        Ok(())
    }

    fn write_equal_to(&mut self, property: &str, value: &Scalar) -> Result<(), QueryError> {
        self.note_to_many(property);
        self.json.start_object()?;
        self.json.object_field_start(TERM)?;
        self.json.field_name(self.resolver.raw_field(property))?;
        value.write_to(&mut self.json)?;
        self.json.end_object()?;
        self.json.end_object()?;
        Ok(())
    }

    fn write_range_single(
        &mut self,
        property: &str,
        comparator: &str,
        value: &Scalar,
    ) -> Result<(), QueryError> {
        self.note_to_many(property);
        self.json.start_object()?;
        self.json.object_field_start(RANGE)?;
        self.json
            .object_field_start(self.resolver.raw_field(property))?;
        self.json.field_name(comparator)?;
        value.write_to(&mut self.json)?;
        self.json.end_object()?;
        self.json.end_object()?;
        self.json.end_object()?;
        Ok(())
    }

    fn write_range_pair(
        &mut self,
        property: &str,
        low_op: ComparisonOp,
        low: &Scalar,
        high_op: ComparisonOp,
        high: &Scalar,
    ) -> Result<(), QueryError> {
        let low_cmp = self.range_comparator(low_op, property)?;
        let high_cmp = self.range_comparator(high_op, property)?;
        self.note_to_many(property);
        self.json.start_object()?;
        self.json.object_field_start(RANGE)?;
        self.json
            .object_field_start(self.resolver.raw_field(property))?;
        self.json.field_name(low_cmp)?;
        low.write_to(&mut self.json)?;
        self.json.field_name(high_cmp)?;
        high.write_to(&mut self.json)?;
        self.json.end_object()?;
        self.json.end_object()?;
        self.json.end_object()?;
        Ok(())
    }

    fn range_comparator(
        &self,
        op: ComparisonOp,
        property: &str,
    ) -> Result<&'static str, QueryError> {
        op.doc_exp().ok_or_else(|| QueryError::UnsupportedOperator {
            operator: op.as_str().to_string(),
            property: property.to_string(),
        })
    }

    fn write_in(
        &mut self,
        property: &str,
        values: &[Scalar],
        not: bool,
    ) -> Result<(), QueryError> {
        if not {
            self.start_bool(JunctionKind::Not)?;
        }
        self.note_to_many(property);
        self.json.start_object()?;
        self.json.object_field_start(TERMS)?;
        self.json
            .array_field_start(self.resolver.raw_field(property))?;
        for value in values {
            value.write_to(&mut self.json)?;
        }
        self.json.end_array()?;
        self.json.end_object()?;
        self.json.end_object()?;
        if not {
            self.end_bool()?;
        }
        Ok(())
    }

    fn write_ids(&mut self, values: &[Scalar]) -> Result<(), QueryError> {
        self.json.start_object()?;
        self.json.object_field_start(IDS)?;
        self.json.array_field_start(VALUES)?;
        for value in values {
            value.write_to(&mut self.json)?;
        }
        self.json.end_array()?;
        self.json.end_object()?;
        self.json.end_object()?;
        Ok(())
    }

    fn write_exists(&mut self, not_null: bool, property: &str) -> Result<(), QueryError> {
        if !not_null {
            self.start_bool(JunctionKind::Not)?;
        }
        self.json.start_object()?;
        self.json.object_field_start(EXISTS)?;
        self.json.string_field(FIELD, property)?;
        self.json.end_object()?;
        self.json.end_object()?;
        if !not_null {
            self.end_bool()?;
        }
        Ok(())
    }

    fn write_like(
        &mut self,
        property: &str,
        value: &str,
        like_type: LikeType,
        case_insensitive: bool,
    ) -> Result<(), QueryError> {
        match like_type {
            LikeType::Raw => {
                // SQL wildcards become engine wildcards
                let pattern = value.to_lowercase().replace('_', "?").replace('%', "*");
                self.write_wildcard(property, &pattern)
            }
            LikeType::StartsWith => {
                let prefix = value.to_lowercase();
                self.note_to_many(property);
                self.json.start_object()?;
                self.json.object_field_start(PREFIX)?;
                self.json
                    .string_field(self.resolver.raw_field(property), &prefix)?;
                self.json.end_object()?;
                self.json.end_object()?;
                Ok(())
            }
            LikeType::EndsWith => {
                // full wildcard scan, slow on big indexes
                self.write_wildcard(property, &format!("*{}", value.to_lowercase()))
            }
            LikeType::Contains => {
                self.write_wildcard(property, &format!("*{}*", value.to_lowercase()))
            }
            LikeType::EqualTo => {
                if case_insensitive {
                    self.write_ieq(property, value)
                } else {
                    self.write_equal_to(property, &Scalar::Str(value.to_string()))
                }
            }
        }
    }

    /// Wildcard queries run on the analyzed field, not the raw variant.
    fn write_wildcard(&mut self, property: &str, pattern: &str) -> Result<(), QueryError> {
        self.json.start_object()?;
        self.json.object_field_start(WILDCARD)?;
        self.json.string_field(property, pattern)?;
        self.json.end_object()?;
        self.json.end_object()?;
        Ok(())
    }

    /// Case-insensitive equality: one `match` per whitespace-split token,
    /// AND-joined when there is more than one. A single token keeps the
    /// caller's casing; the analyzer folds case.
    fn write_ieq(&mut self, property: &str, value: &str) -> Result<(), QueryError> {
        let lowered = value.to_lowercase();
        let tokens: Vec<&str> = lowered.split_whitespace().collect();
        if tokens.len() <= 1 {
            MatchOptions::default().write_to(&mut self.json, property, value)?;
        } else {
            self.start_bool(JunctionKind::And)?;
            for token in tokens {
                MatchOptions::default().write_to(&mut self.json, property, token)?;
            }
            self.end_bool()?;
        }
        Ok(())
    }

    // The four-step bool protocol. Groups nest: a bool context can open
    // while already inside another bool context.

    fn start_bool(&mut self, kind: JunctionKind) -> io::Result<()> {
        self.start_bool_group()?;
        self.start_bool_group_list(kind)
    }

    fn end_bool(&mut self) -> io::Result<()> {
        self.end_bool_group_list()?;
        self.end_bool_group()
    }

    fn start_bool_group(&mut self) -> io::Result<()> {
        self.json.start_object()?;
        self.json.object_field_start(BOOL)
    }

    fn start_bool_group_list(&mut self, kind: JunctionKind) -> io::Result<()> {
        self.json.array_field_start(kind.literal())
    }

    fn end_bool_group_list(&mut self) -> io::Result<()> {
        self.json.end_array()
    }

    fn end_bool_group(&mut self) -> io::Result<()> {
        self.json.end_object()?;
        self.json.end_object()
    }

    /// Filters on to-many paths compile without `nested` wrapping; leave
    /// a trace for diagnosing engine-side scoping surprises.
    fn note_to_many(&self, property: &str) {
        if let Some((path, _)) = property.rsplit_once('.') {
            if self.resolver.is_to_many_path(path) {
                debug!(
                    property,
                    path, "filter on to-many path compiled without nested wrapping"
                );
            }
        }
    }
}

/// Fold an extra clause into an expression as an additional AND-ed
/// member: appended when the target is already an AND junction, else
/// both are wrapped in a new one.
fn fold_into(target: Expression, extra: Expression) -> Expression {
    match target {
        Expression::Junction {
            kind: JunctionKind::And,
            mut children,
        } => {
            children.push(extra);
            Expression::Junction {
                kind: JunctionKind::And,
                children,
            }
        }
        other => Expression::Junction {
            kind: JunctionKind::And,
            children: vec![other, extra],
        },
    }
}
