//! Property-based tests (fuzzing) for the query compiler.
//!
//! Uses proptest to generate random expression trees and queue-entry
//! sequences and verify the compiler never panics, only returns clean
//! results: every compiled document is valid JSON, compilation is
//! deterministic, and grouping preserves order for all permutations.
//!
//! Run with: `cargo test --test proptest_fuzz`

use proptest::prelude::*;
use serde_json::json;

use elastic_query::{
    compile, group_by_queue_id, Expression, MappedResolver, QueryEngineConfig, QueueEntry, Scalar,
    SearchQuery,
};

// =============================================================================
// Strategies for generating test data
// =============================================================================

/// Generate a scalar value from the supported set
fn scalar_strategy() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        any::<bool>().prop_map(Scalar::Bool),
        any::<i64>().prop_map(Scalar::Int),
        any::<u64>().prop_map(Scalar::UInt),
        // Finite floats only; non-finite is a defined error, not a panic
        prop::num::f64::NORMAL.prop_map(Scalar::Float),
        "[a-zA-Z0-9 ._%-]{0,24}".prop_map(Scalar::Str),
    ]
}

fn property_strategy() -> impl Strategy<Value = String> {
    // property paths like "customer.name"
    "[a-z]{1,8}(\\.[a-z]{1,8}){0,2}"
}

/// Generate a leaf expression covering every non-junction render rule
fn leaf_strategy() -> impl Strategy<Value = Expression> {
    prop_oneof![
        // eq / ne / gt / le comparisons
        (property_strategy(), scalar_strategy(), 0usize..4).prop_map(|(p, v, op)| match op {
            0 => Expression::eq(p, v),
            1 => Expression::ne(p, v),
            2 => Expression::gt(p, v),
            _ => Expression::le(p, v),
        }),
        (property_strategy(), any::<i64>(), any::<i64>())
            .prop_map(|(p, lo, hi)| Expression::between(p, lo, hi)),
        (
            property_strategy(),
            prop::collection::vec(scalar_strategy(), 0..5),
            any::<bool>()
        )
            .prop_map(|(p, values, not)| if not {
                Expression::not_in(p, values)
            } else {
                Expression::is_in(p, values)
            }),
        (property_strategy(), any::<bool>()).prop_map(|(p, required)| if required {
            Expression::exists(p)
        } else {
            Expression::not_exists(p)
        }),
        prop::collection::vec(
            (property_strategy(), prop::option::of(scalar_strategy())),
            0..4
        )
        .prop_map(|pairs| Expression::all_eq(pairs)),
        any::<u64>().prop_map(|id| Expression::id_eq(id)),
        (property_strategy(), "[a-zA-Z0-9 _%]{0,16}")
            .prop_map(|(p, v)| Expression::starts_with(p, v)),
        (property_strategy(), "[a-zA-Z0-9 _%]{0,16}")
            .prop_map(|(p, v)| Expression::contains(p, v)),
        (property_strategy(), "[a-zA-Z0-9 _%]{0,16}").prop_map(|(p, v)| Expression::like(p, v)),
        (property_strategy(), "[a-zA-Z0-9 ]{0,16}").prop_map(|(p, v)| Expression::ieq(p, v)),
    ]
}

/// Generate arbitrarily nested expression trees (junctions over leaves)
fn expression_strategy() -> impl Strategy<Value = Expression> {
    leaf_strategy().prop_recursive(4, 32, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Expression::all_of),
            prop::collection::vec(inner.clone(), 0..5).prop_map(Expression::any_of),
            inner.prop_map(|e| e.negate()),
        ]
    })
}

fn queue_entry_strategy() -> impl Strategy<Value = QueueEntry> {
    (
        "[a-c]", // few distinct keys so collisions are common
        any::<u32>(),
        any::<bool>(),
    )
        .prop_map(|(queue, id, delete)| {
            if delete {
                QueueEntry::delete(queue, json!(id))
            } else {
                QueueEntry::index(queue, json!(id))
            }
        })
}

fn resolver() -> MappedResolver {
    MappedResolver::new()
        .raw("customer.name", "customer.name.raw")
        .many("details")
}

// =============================================================================
// Compiler Fuzz Tests
// =============================================================================

proptest! {
    /// Every compiled document is parseable JSON with a `query` key
    #[test]
    fn fuzz_compiled_document_is_valid_json(expr in expression_strategy()) {
        let mut query = SearchQuery::new().filter(expr);
        let out = compile(&resolver(), &QueryEngineConfig::default(), &mut query).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        prop_assert!(parsed.get("query").is_some());
    }

    /// Compilation is a pure function of its inputs
    #[test]
    fn fuzz_compilation_is_deterministic(
        expr in expression_strategy(),
        first_row in 0u64..1000,
        max_rows in 0u64..1000,
    ) {
        let build = || {
            SearchQuery::new()
                .first_row(first_row)
                .max_rows(max_rows)
                .filter(expr.clone())
        };
        let a = compile(&resolver(), &QueryEngineConfig::default(), &mut build()).unwrap();
        let b = compile(&resolver(), &QueryEngineConfig::default(), &mut build()).unwrap();
        prop_assert_eq!(a, b);
    }

    /// The same expression in the text branch never panics either; it
    /// must produce valid JSON or a clean error
    #[test]
    fn fuzz_text_branch_never_panics(expr in expression_strategy()) {
        let mut query = SearchQuery::new().text(expr);
        if let Ok(out) = compile(&resolver(), &QueryEngineConfig::default(), &mut query) {
            let _: serde_json::Value = serde_json::from_str(&out).unwrap();
        }
    }

    /// Expression deserialization handles arbitrary JSON gracefully
    #[test]
    fn fuzz_expression_from_arbitrary_bytes(bytes in prop::collection::vec(any::<u8>(), 0..2000)) {
        // Should never panic, only return Err
        let result: Result<Expression, _> = serde_json::from_slice(&bytes);
        let _ = result;
    }

    /// Serde round-trips preserve the tree exactly
    #[test]
    fn fuzz_expression_serde_round_trip(expr in expression_strategy()) {
        let text = serde_json::to_string(&expr).unwrap();
        let back: Expression = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(back, expr);
    }
}

// =============================================================================
// Grouping Property Tests
// =============================================================================

proptest! {
    /// Concatenating the groups in order yields the input sequence
    /// partitioned stably by key
    #[test]
    fn fuzz_grouping_preserves_intra_group_order(
        entries in prop::collection::vec(queue_entry_strategy(), 0..50)
    ) {
        let groups = group_by_queue_id(entries.clone());

        for group in &groups {
            let expected: Vec<&QueueEntry> = entries
                .iter()
                .filter(|e| e.queue_id == group.queue_id())
                .collect();
            let actual: Vec<&QueueEntry> = group.entries().iter().collect();
            prop_assert_eq!(actual, expected);
        }
    }

    /// Group keys appear in first-seen order and cover the input exactly
    #[test]
    fn fuzz_grouping_first_seen_key_order(
        entries in prop::collection::vec(queue_entry_strategy(), 0..50)
    ) {
        let groups = group_by_queue_id(entries.clone());

        let mut seen: Vec<&str> = Vec::new();
        for entry in &entries {
            if !seen.contains(&entry.queue_id.as_str()) {
                seen.push(&entry.queue_id);
            }
        }
        let keys: Vec<&str> = groups.iter().map(|g| g.queue_id()).collect();
        prop_assert_eq!(keys, seen);

        let total: usize = groups.iter().map(|g| g.len()).sum();
        prop_assert_eq!(total, entries.len());
    }
}
