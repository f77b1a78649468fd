// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Full-text operator option bags and their engine encodings.
//!
//! One plain options struct per full-text operator, built with chained
//! setters. Every option present in a bag is emitted; absent options are
//! omitted entirely (the engine's defaults apply, nothing is written for
//! them). The OR operator is the engine default, so only `"and"` is ever
//! emitted.
//!
//! # Example
//!
//! ```rust
//! use elastic_query::MatchOptions;
//!
//! let options = MatchOptions::new()
//!     .op_and()
//!     .analyzer("whitespace")
//!     .boost(2.0)
//!     .phrase_prefix()
//!     .max_expansions(3);
//! ```

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::writer::JsonWriter;

/// Options for a single-property `match` query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    #[serde(default)]
    pub operator_and: bool,
    #[serde(default)]
    pub phrase: bool,
    #[serde(default)]
    pub phrase_prefix: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff_frequency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero_terms_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    /// Phrase-prefix expansion limit; only emitted for phrase-prefix
    /// queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_expansions: Option<u32>,
}

impl MatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn op_and(mut self) -> Self {
        self.operator_and = true;
        self
    }

    pub fn op_or(mut self) -> Self {
        self.operator_and = false;
        self
    }

    pub fn phrase(mut self) -> Self {
        self.phrase = true;
        self.phrase_prefix = false;
        self
    }

    pub fn phrase_prefix(mut self) -> Self {
        self.phrase_prefix = true;
        self.phrase = false;
        self
    }

    pub fn boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }

    pub fn cutoff_frequency(mut self, cutoff: f64) -> Self {
        self.cutoff_frequency = Some(cutoff);
        self
    }

    pub fn min_should_match(mut self, value: impl Into<String>) -> Self {
        self.minimum_should_match = Some(value.into());
        self
    }

    pub fn zero_terms(mut self, value: impl Into<String>) -> Self {
        self.zero_terms_query = Some(value.into());
        self
    }

    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    pub fn max_expansions(mut self, max: u32) -> Self {
        self.max_expansions = Some(max);
        self
    }

    pub(crate) fn write_to<W: Write>(
        &self,
        json: &mut JsonWriter<W>,
        property: &str,
        search: &str,
    ) -> io::Result<()> {
        json.start_object()?;
        json.object_field_start("match")?;
        json.object_field_start(property)?;
        json.string_field("query", search)?;
        if self.operator_and {
            json.string_field("operator", "and")?;
        }
        write_common_tail(
            json,
            self.boost,
            self.cutoff_frequency,
            self.minimum_should_match.as_deref(),
            self.zero_terms_query.as_deref(),
            self.analyzer.as_deref(),
        )?;
        if self.phrase {
            json.string_field("type", "phrase")?;
        } else if self.phrase_prefix {
            json.string_field("type", "phrase_prefix")?;
            if let Some(max) = self.max_expansions {
                json.field_name("max_expansions")?;
                json.write_u64(max as u64)?;
            }
        }
        json.end_object()?;
        json.end_object()?;
        json.end_object()
    }
}

/// Shared option tail: boost, cutoff_frequency, minimum_should_match,
/// zero_terms_query, analyzer, always in this order.
fn write_common_tail<W: Write>(
    json: &mut JsonWriter<W>,
    boost: Option<f64>,
    cutoff_frequency: Option<f64>,
    minimum_should_match: Option<&str>,
    zero_terms_query: Option<&str>,
    analyzer: Option<&str>,
) -> io::Result<()> {
    if let Some(boost) = boost {
        json.field_name("boost")?;
        json.write_f64(boost)?;
    }
    if let Some(cutoff) = cutoff_frequency {
        json.field_name("cutoff_frequency")?;
        json.write_f64(cutoff)?;
    }
    if let Some(msm) = minimum_should_match {
        json.string_field("minimum_should_match", msm)?;
    }
    if let Some(zero) = zero_terms_query {
        json.string_field("zero_terms_query", zero)?;
    }
    if let Some(analyzer) = analyzer {
        json.string_field("analyzer", analyzer)?;
    }
    Ok(())
}

/// Match type for multi-field queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiMatchType {
    BestFields,
    MostFields,
    CrossFields,
    Phrase,
    PhrasePrefix,
}

impl MultiMatchType {
    fn as_str(self) -> &'static str {
        match self {
            MultiMatchType::BestFields => "best_fields",
            MultiMatchType::MostFields => "most_fields",
            MultiMatchType::CrossFields => "cross_fields",
            MultiMatchType::Phrase => "phrase",
            MultiMatchType::PhrasePrefix => "phrase_prefix",
        }
    }
}

/// Options for a `multi_match` query across several fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiMatchOptions {
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MultiMatchType>,
    #[serde(default)]
    pub operator_and: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff_frequency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero_terms_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tie_breaker: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_expansions: Option<u32>,
}

impl MultiMatchOptions {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn match_type(mut self, match_type: MultiMatchType) -> Self {
        self.match_type = Some(match_type);
        self
    }

    pub fn op_and(mut self) -> Self {
        self.operator_and = true;
        self
    }

    pub fn boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }

    pub fn cutoff_frequency(mut self, cutoff: f64) -> Self {
        self.cutoff_frequency = Some(cutoff);
        self
    }

    pub fn min_should_match(mut self, value: impl Into<String>) -> Self {
        self.minimum_should_match = Some(value.into());
        self
    }

    pub fn zero_terms(mut self, value: impl Into<String>) -> Self {
        self.zero_terms_query = Some(value.into());
        self
    }

    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    pub fn tie_breaker(mut self, tie_breaker: f64) -> Self {
        self.tie_breaker = Some(tie_breaker);
        self
    }

    pub fn max_expansions(mut self, max: u32) -> Self {
        self.max_expansions = Some(max);
        self
    }

    pub(crate) fn write_to<W: Write>(
        &self,
        json: &mut JsonWriter<W>,
        search: &str,
    ) -> io::Result<()> {
        json.start_object()?;
        json.object_field_start("multi_match")?;
        json.string_field("query", search)?;
        json.array_field_start("fields")?;
        for field in &self.fields {
            json.write_string(field)?;
        }
        json.end_array()?;
        if let Some(match_type) = self.match_type {
            json.string_field("type", match_type.as_str())?;
        }
        if self.operator_and {
            json.string_field("operator", "and")?;
        }
        write_common_tail(
            json,
            self.boost,
            self.cutoff_frequency,
            self.minimum_should_match.as_deref(),
            self.zero_terms_query.as_deref(),
            self.analyzer.as_deref(),
        )?;
        if let Some(tie_breaker) = self.tie_breaker {
            json.field_name("tie_breaker")?;
            json.write_f64(tie_breaker)?;
        }
        if self.match_type == Some(MultiMatchType::PhrasePrefix) {
            if let Some(max) = self.max_expansions {
                json.field_name("max_expansions")?;
                json.write_u64(max as u64)?;
            }
        }
        json.end_object()?;
        json.end_object()
    }
}

/// Options for a `simple_query_string` query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextSimpleOptions {
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub operator_and: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyze_wildcard: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lenient: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<String>,
}

impl TextSimpleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn op_and(mut self) -> Self {
        self.operator_and = true;
        self
    }

    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    pub fn flags(mut self, flags: impl Into<String>) -> Self {
        self.flags = Some(flags.into());
        self
    }

    pub fn analyze_wildcard(mut self, enabled: bool) -> Self {
        self.analyze_wildcard = Some(enabled);
        self
    }

    pub fn lenient(mut self, enabled: bool) -> Self {
        self.lenient = Some(enabled);
        self
    }

    pub fn min_should_match(mut self, value: impl Into<String>) -> Self {
        self.minimum_should_match = Some(value.into());
        self
    }

    pub(crate) fn write_to<W: Write>(
        &self,
        json: &mut JsonWriter<W>,
        search: &str,
    ) -> io::Result<()> {
        json.start_object()?;
        json.object_field_start("simple_query_string")?;
        json.string_field("query", search)?;
        if !self.fields.is_empty() {
            json.array_field_start("fields")?;
            for field in &self.fields {
                json.write_string(field)?;
            }
            json.end_array()?;
        }
        if let Some(analyzer) = &self.analyzer {
            json.string_field("analyzer", analyzer)?;
        }
        if let Some(flags) = &self.flags {
            json.string_field("flags", flags)?;
        }
        if self.operator_and {
            json.string_field("default_operator", "and")?;
        }
        if let Some(analyze_wildcard) = self.analyze_wildcard {
            json.bool_field("analyze_wildcard", analyze_wildcard)?;
        }
        if let Some(lenient) = self.lenient {
            json.bool_field("lenient", lenient)?;
        }
        if let Some(msm) = &self.minimum_should_match {
            json.string_field("minimum_should_match", msm)?;
        }
        json.end_object()?;
        json.end_object()
    }
}

/// Options for a common-terms query. Compiles against the engine's
/// catch-all field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonTermsOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff_frequency: Option<f64>,
    #[serde(default)]
    pub low_freq_operator_and: bool,
    #[serde(default)]
    pub high_freq_operator_and: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_should_match_low_freq: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_should_match_high_freq: Option<u32>,
}

impl CommonTermsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cutoff_frequency(mut self, cutoff: f64) -> Self {
        self.cutoff_frequency = Some(cutoff);
        self
    }

    pub fn low_freq_op_and(mut self) -> Self {
        self.low_freq_operator_and = true;
        self
    }

    pub fn high_freq_op_and(mut self) -> Self {
        self.high_freq_operator_and = true;
        self
    }

    pub fn min_should_match(mut self, value: impl Into<String>) -> Self {
        self.minimum_should_match = Some(value.into());
        self
    }

    pub fn min_should_match_low_high(mut self, low_freq: u32, high_freq: u32) -> Self {
        self.min_should_match_low_freq = Some(low_freq);
        self.min_should_match_high_freq = Some(high_freq);
        self
    }

    pub(crate) fn write_to<W: Write>(
        &self,
        json: &mut JsonWriter<W>,
        search: &str,
    ) -> io::Result<()> {
        json.start_object()?;
        json.object_field_start("common")?;
        json.object_field_start("_all")?;
        json.string_field("query", search)?;
        if let Some(cutoff) = self.cutoff_frequency {
            json.field_name("cutoff_frequency")?;
            json.write_f64(cutoff)?;
        }
        if self.low_freq_operator_and {
            json.string_field("low_freq_operator", "and")?;
        }
        if self.high_freq_operator_and {
            json.string_field("high_freq_operator", "and")?;
        }
        match (self.min_should_match_low_freq, self.min_should_match_high_freq) {
            (Some(low), Some(high)) => {
                json.object_field_start("minimum_should_match")?;
                json.field_name("low_freq")?;
                json.write_u64(low as u64)?;
                json.field_name("high_freq")?;
                json.write_u64(high as u64)?;
                json.end_object()?;
            }
            _ => {
                if let Some(msm) = &self.minimum_should_match {
                    json.string_field("minimum_should_match", msm)?;
                }
            }
        }
        json.end_object()?;
        json.end_object()?;
        json.end_object()
    }
}

/// Options for a Lucene `query_string` query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryStringOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_field: Option<String>,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub operator_and: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_leading_wildcard: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phrase_slop: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_dis_max: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tie_breaker: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lenient: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<String>,
}

impl QueryStringOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_field(mut self, field: impl Into<String>) -> Self {
        self.default_field = Some(field.into());
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn op_and(mut self) -> Self {
        self.operator_and = true;
        self
    }

    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    pub fn allow_leading_wildcard(mut self, enabled: bool) -> Self {
        self.allow_leading_wildcard = Some(enabled);
        self
    }

    pub fn phrase_slop(mut self, slop: u32) -> Self {
        self.phrase_slop = Some(slop);
        self
    }

    pub fn boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }

    pub fn use_dis_max(mut self, enabled: bool) -> Self {
        self.use_dis_max = Some(enabled);
        self
    }

    pub fn tie_breaker(mut self, tie_breaker: f64) -> Self {
        self.tie_breaker = Some(tie_breaker);
        self
    }

    pub fn lenient(mut self, enabled: bool) -> Self {
        self.lenient = Some(enabled);
        self
    }

    pub fn min_should_match(mut self, value: impl Into<String>) -> Self {
        self.minimum_should_match = Some(value.into());
        self
    }

    pub(crate) fn write_to<W: Write>(
        &self,
        json: &mut JsonWriter<W>,
        search: &str,
    ) -> io::Result<()> {
        json.start_object()?;
        json.object_field_start("query_string")?;
        json.string_field("query", search)?;
        if let Some(default_field) = &self.default_field {
            json.string_field("default_field", default_field)?;
        }
        if !self.fields.is_empty() {
            json.array_field_start("fields")?;
            for field in &self.fields {
                json.write_string(field)?;
            }
            json.end_array()?;
        }
        if self.operator_and {
            json.string_field("default_operator", "and")?;
        }
        if let Some(analyzer) = &self.analyzer {
            json.string_field("analyzer", analyzer)?;
        }
        if let Some(allow) = self.allow_leading_wildcard {
            json.bool_field("allow_leading_wildcard", allow)?;
        }
        if let Some(slop) = self.phrase_slop {
            json.field_name("phrase_slop")?;
            json.write_u64(slop as u64)?;
        }
        if let Some(boost) = self.boost {
            json.field_name("boost")?;
            json.write_f64(boost)?;
        }
        if let Some(use_dis_max) = self.use_dis_max {
            json.bool_field("use_dis_max", use_dis_max)?;
        }
        if let Some(tie_breaker) = self.tie_breaker {
            json.field_name("tie_breaker")?;
            json.write_f64(tie_breaker)?;
        }
        if let Some(lenient) = self.lenient {
            json.bool_field("lenient", lenient)?;
        }
        if let Some(msm) = &self.minimum_should_match {
            json.string_field("minimum_should_match", msm)?;
        }
        json.end_object()?;
        json.end_object()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F>(write: F) -> String
    where
        F: FnOnce(&mut JsonWriter<Vec<u8>>) -> io::Result<()>,
    {
        let mut json = JsonWriter::new(Vec::new());
        write(&mut json).unwrap();
        json.into_string().unwrap()
    }

    #[test]
    fn test_match_defaults_emit_query_only() {
        let out = render(|json| MatchOptions::new().write_to(json, "name", "Cust NoAddress"));
        assert_eq!(out, r#"{"match":{"name":{"query":"Cust NoAddress"}}}"#);
    }

    #[test]
    fn test_match_operator_and() {
        let out = render(|json| {
            MatchOptions::new()
                .op_and()
                .write_to(json, "name", "Cust NoAddress")
        });
        assert_eq!(
            out,
            r#"{"match":{"name":{"query":"Cust NoAddress","operator":"and"}}}"#
        );
    }

    #[test]
    fn test_match_all_phrase_options() {
        let options = MatchOptions::new()
            .op_and()
            .analyzer("whitespace")
            .boost(2.0)
            .cutoff_frequency(1.0)
            .min_should_match("50%")
            .zero_terms("all")
            .max_expansions(3)
            .phrase();
        let out = render(|json| options.write_to(json, "name", "Cust DoesNotExist"));
        assert_eq!(
            out,
            r#"{"match":{"name":{"query":"Cust DoesNotExist","operator":"and","boost":2.0,"cutoff_frequency":1.0,"minimum_should_match":"50%","zero_terms_query":"all","analyzer":"whitespace","type":"phrase"}}}"#
        );
    }

    #[test]
    fn test_match_phrase_prefix_emits_max_expansions() {
        let options = MatchOptions::new()
            .op_and()
            .analyzer("whitespace")
            .boost(2.0)
            .cutoff_frequency(1.0)
            .min_should_match("50%")
            .max_expansions(3)
            .phrase_prefix();
        let out = render(|json| options.write_to(json, "name", "Cust NoAdd"));
        assert_eq!(
            out,
            r#"{"match":{"name":{"query":"Cust NoAdd","operator":"and","boost":2.0,"cutoff_frequency":1.0,"minimum_should_match":"50%","analyzer":"whitespace","type":"phrase_prefix","max_expansions":3}}}"#
        );
    }

    #[test]
    fn test_match_phrase_suppresses_max_expansions() {
        // max_expansions only applies to phrase_prefix
        let options = MatchOptions::new().max_expansions(3).phrase();
        let out = render(|json| options.write_to(json, "name", "x"));
        assert_eq!(out, r#"{"match":{"name":{"query":"x","type":"phrase"}}}"#);
    }

    #[test]
    fn test_multi_match() {
        let options = MultiMatchOptions::new(["name", "notes"])
            .match_type(MultiMatchType::CrossFields)
            .op_and()
            .boost(1.5);
        let out = render(|json| options.write_to(json, "find me"));
        assert_eq!(
            out,
            r#"{"multi_match":{"query":"find me","fields":["name","notes"],"type":"cross_fields","operator":"and","boost":1.5}}"#
        );
    }

    #[test]
    fn test_text_simple() {
        let options = TextSimpleOptions::new()
            .fields(["name"])
            .op_and()
            .lenient(true);
        let out = render(|json| options.write_to(json, "quick brown"));
        assert_eq!(
            out,
            r#"{"simple_query_string":{"query":"quick brown","fields":["name"],"default_operator":"and","lenient":true}}"#
        );
    }

    #[test]
    fn test_common_terms_low_high() {
        let options = CommonTermsOptions::new()
            .cutoff_frequency(0.001)
            .low_freq_op_and()
            .min_should_match_low_high(2, 3);
        let out = render(|json| options.write_to(json, "the brown fox"));
        assert_eq!(
            out,
            r#"{"common":{"_all":{"query":"the brown fox","cutoff_frequency":0.001,"low_freq_operator":"and","minimum_should_match":{"low_freq":2,"high_freq":3}}}}"#
        );
    }

    #[test]
    fn test_query_string() {
        let options = QueryStringOptions::new()
            .default_field("name")
            .op_and()
            .phrase_slop(2)
            .boost(1.2);
        let out = render(|json| options.write_to(json, "rob OR jim"));
        assert_eq!(
            out,
            r#"{"query_string":{"query":"rob OR jim","default_field":"name","default_operator":"and","phrase_slop":2,"boost":1.2}}"#
        );
    }
}
