// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Grouping of pending document-store updates by queue.
//!
//! A single pass over the incoming entries: the first appearance of a
//! queue id fixes that group's position in the output, and entries keep
//! their arrival order within the group. No sorting, no deduplication.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What kind of index update an entry requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueAction {
    /// Index (insert or replace) the whole document.
    Index,
    /// Remove the document.
    Delete,
    /// Update an embedded path inside documents referencing the bean.
    Nested,
}

/// A pending change record for the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Routing key naming the target queue/index.
    pub queue_id: String,
    pub action: QueueAction,
    /// Embedded path for nested updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Document id of the changed bean.
    pub bean_id: serde_json::Value,
}

impl QueueEntry {
    pub fn index(queue_id: impl Into<String>, bean_id: serde_json::Value) -> Self {
        Self {
            queue_id: queue_id.into(),
            action: QueueAction::Index,
            path: None,
            bean_id,
        }
    }

    pub fn delete(queue_id: impl Into<String>, bean_id: serde_json::Value) -> Self {
        Self {
            queue_id: queue_id.into(),
            action: QueueAction::Delete,
            path: None,
            bean_id,
        }
    }

    pub fn nested(
        queue_id: impl Into<String>,
        path: impl Into<String>,
        bean_id: serde_json::Value,
    ) -> Self {
        Self {
            queue_id: queue_id.into(),
            action: QueueAction::Nested,
            path: Some(path.into()),
            bean_id,
        }
    }
}

/// Entries sharing one routing key, in arrival order. Immutable once
/// built; the dispatcher consumes groups one at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateGroup {
    queue_id: String,
    entries: Vec<QueueEntry>,
}

impl UpdateGroup {
    pub fn queue_id(&self) -> &str {
        &self.queue_id
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<QueueEntry> {
        self.entries
    }
}

/// Bucket entries by queue id, preserving first-seen key order and
/// intra-group arrival order.
pub fn group_by_queue_id(entries: Vec<QueueEntry>) -> Vec<UpdateGroup> {
    let mut by_queue: IndexMap<String, Vec<QueueEntry>> = IndexMap::new();
    for entry in entries {
        by_queue
            .entry(entry.queue_id.clone())
            .or_default()
            .push(entry);
    }
    let groups: Vec<UpdateGroup> = by_queue
        .into_iter()
        .map(|(queue_id, entries)| UpdateGroup { queue_id, entries })
        .collect();
    debug!(groups = groups.len(), "queue entries grouped");
    groups
}
