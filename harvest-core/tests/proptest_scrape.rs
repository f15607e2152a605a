//! Property-Based Tests for Harvest Core
//!
//! Uses `proptest` to check finder ordinals against the regex engine,
//! extraction bounds, and retrieval-list invariants under random input.

use std::collections::HashSet;

use proptest::prelude::*;
use regex::Regex;

use harvest_core::config::ListConfig;
use harvest_core::finder;
use harvest_core::fragment::{self, ExtractOptions};
use harvest_core::{HarvestError, Pattern, RetrievalList, RetrievalOrder};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_text() -> impl Strategy<Value = String> {
    "[ab<>/ x]{0,60}"
}

fn arb_expression() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("a"), Just("ab"), Just("a+"), Just("<[^>]*>"), Just("b*"), Just("x|/")]
}

// ---------------------------------------------------------------------------
// Property: iteration 0 returns every match, in order
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn find_all_equals_find_iter(text in arb_text(), expr in arb_expression()) {
        let expected: Vec<&str> = Regex::new(expr).expect("valid").find_iter(&text).map(|m| m.as_str()).collect();
        let found = finder::find(&text, &Pattern::new(expr), 0).expect("valid");
        let got: Vec<&str> = found.iter().collect();
        prop_assert_eq!(got, expected);
    }
}

// ---------------------------------------------------------------------------
// Property: iteration N returns exactly the N-th match, or nothing
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn nth_find_is_nth_of_all(text in arb_text(), expr in arb_expression(), n in 1usize..12) {
        let found_all = finder::find(&text, &Pattern::new(expr), 0).expect("valid");
        let all: Vec<&str> = found_all.iter().collect();
        let found_nth = finder::find(&text, &Pattern::new(expr), n).expect("valid");
        let nth: Vec<&str> = found_nth.iter().collect();

        if n <= all.len() {
            prop_assert_eq!(nth, vec![all[n - 1]]);
        } else {
            prop_assert!(nth.is_empty());
        }
    }
}

// ---------------------------------------------------------------------------
// Property: fragments are bounded by their patterns and respect the cap
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn fragments_start_and_end_on_boundaries(
        text in arb_text(),
        cap in 0usize..5,
        window in 0usize..20,
        end_iteration in 0usize..3,
    ) {
        let options = ExtractOptions::all()
            .with_maximum_matches(cap)
            .with_max_window(window)
            .with_end_iteration(end_iteration);
        let fragments: Vec<_> = fragment::extract(&text, &Pattern::new("<"), &Pattern::new(">"), options)
            .expect("valid")
            .collect();

        if cap > 0 {
            prop_assert!(fragments.len() <= cap);
        }
        for f in &fragments {
            prop_assert!(f.as_str().starts_with('<'));
            prop_assert!(f.as_str().ends_with('>'));
            prop_assert_eq!(&text[f.span().range()], f.as_str());
            if window > 0 {
                // A windowed search never reaches further than the window,
                // unless the window ran past the end of the text.
                let chars = f.as_str().chars().count();
                let rest = text[f.span().start..].chars().count();
                prop_assert!(chars <= window || rest < window + 1);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property: N unique inserts → exactly N takes, then EmptyOrExhausted
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn list_exhausts_after_each_value_once(
        values in prop::collection::vec("[a-z]{1,6}", 0..40),
        order in prop_oneof![Just(RetrievalOrder::Random), Just(RetrievalOrder::Fifo), Just(RetrievalOrder::Lifo)],
    ) {
        let list = RetrievalList::text(&ListConfig::default().with_order(order));
        for v in &values {
            list.insert(v.clone());
        }
        let unique: HashSet<String> = values.iter().cloned().collect();
        prop_assert_eq!(list.count_all(), unique.len());

        let mut taken = HashSet::new();
        for _ in 0..unique.len() {
            let v = list.take().expect("unconsumed item available");
            prop_assert!(taken.insert(v));
        }
        prop_assert_eq!(&taken, &unique);
        let exhausted = matches!(list.take(), Err(HarvestError::EmptyOrExhausted { .. }));
        prop_assert!(exhausted);
        prop_assert!(!list.has_unconsumed());
        prop_assert_eq!(list.count_consumed(), unique.len());
    }
}

// ---------------------------------------------------------------------------
// Property: FIFO returns insertion order, LIFO its reverse
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn fifo_and_lifo_follow_insertion(values in prop::collection::hash_set(0u32..10_000, 0..50)) {
        let values: Vec<u32> = values.into_iter().collect();

        let fifo = RetrievalList::new(&ListConfig::default().with_order(RetrievalOrder::Fifo));
        let lifo = RetrievalList::new(&ListConfig::default().with_order(RetrievalOrder::Lifo));
        fifo.extend(values.iter().copied());
        lifo.extend(values.iter().copied());

        let from_fifo: Vec<u32> = (0..values.len()).map(|_| fifo.take().expect("item")).collect();
        let mut from_lifo: Vec<u32> = (0..values.len()).map(|_| lifo.take().expect("item")).collect();
        from_lifo.reverse();

        prop_assert_eq!(&from_fifo, &values);
        prop_assert_eq!(&from_lifo, &values);
    }
}

// ---------------------------------------------------------------------------
// Property: with uniqueness, no two stored items are equal — ever
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn uniqueness_survives_consumption(ops in prop::collection::vec((any::<bool>(), "[aA][bB]"), 0..60)) {
        let list = RetrievalList::text(&ListConfig::default().with_ignore_case(true));
        for (take, value) in ops {
            if take {
                let _ = list.take();
            } else {
                list.insert(value);
            }
        }
        let lowered: Vec<String> = list.items().iter().map(|i| i.value().to_lowercase()).collect();
        let distinct: HashSet<&String> = lowered.iter().collect();
        prop_assert_eq!(distinct.len(), lowered.len());
        prop_assert!(list.count_all() <= 1);
    }
}
