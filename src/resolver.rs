// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Property path resolution.
//!
//! The compiler never knows the physical index layout. It asks a
//! [`PropertyResolver`] for two facts: the unanalyzed ("raw") field to
//! use for exact-match operators, and whether a path traverses a
//! one-to-many association. Resolvers are read-only during compilation
//! and safe to share across concurrent compilations.

use std::collections::{HashMap, HashSet};

use crate::config::DocMappingConfig;

/// Maps logical property paths onto the physical index.
pub trait PropertyResolver: Send + Sync {
    /// The unanalyzed field for exact matching, or the property path
    /// unchanged when no raw variant is mapped.
    fn raw_field<'a>(&'a self, property: &'a str) -> &'a str;

    /// True if the path traverses a one-to-many association.
    fn is_to_many_path(&self, path: &str) -> bool;
}

/// Resolver backed by explicit mappings.
///
/// # Example
///
/// ```
/// use elastic_query::{MappedResolver, PropertyResolver};
///
/// let resolver = MappedResolver::new()
///     .raw("customer.name", "customer.name.raw")
///     .many("details");
///
/// assert_eq!(resolver.raw_field("customer.name"), "customer.name.raw");
/// assert_eq!(resolver.raw_field("customer.id"), "customer.id");
/// assert!(resolver.is_to_many_path("details"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MappedResolver {
    raw_fields: HashMap<String, String>,
    many_paths: HashSet<String>,
}

impl MappedResolver {
    /// Empty resolver: every property resolves to itself.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(mapping: &DocMappingConfig) -> Self {
        Self {
            raw_fields: mapping.raw_fields.clone(),
            many_paths: mapping.many_paths.clone(),
        }
    }

    /// Map a property to its raw (unanalyzed) field.
    pub fn raw(mut self, property: impl Into<String>, raw_field: impl Into<String>) -> Self {
        self.raw_fields.insert(property.into(), raw_field.into());
        self
    }

    /// Mark a path as traversing a one-to-many association.
    pub fn many(mut self, path: impl Into<String>) -> Self {
        self.many_paths.insert(path.into());
        self
    }
}

impl PropertyResolver for MappedResolver {
    fn raw_field<'a>(&'a self, property: &'a str) -> &'a str {
        match self.raw_fields.get(property) {
            Some(raw) => raw.as_str(),
            None => property,
        }
    }

    fn is_to_many_path(&self, path: &str) -> bool {
        self.many_paths.contains(path)
    }
}
