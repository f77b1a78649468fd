// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Ingestion-side update plumbing.
//!
//! Pending index updates arrive as a flat sequence of queue entries;
//! [`group_by_queue_id`] buckets them by routing key for the dispatcher,
//! which flushes one group at a time.

mod groups;

pub use groups::{group_by_queue_id, QueueAction, QueueEntry, UpdateGroup};
