use std::sync::Arc;

use proptest::prelude::*;
use zipplan::{
    DeltaFriendlyOldBlobSizeLimiter, MinimalZipEntry, PreDiffPlanEntry, PreDiffPlanEntryModifier,
    TotalRecompressionLimiter, TypedRange, UncompressionOptionExplanation,
    ZipEntryUncompressionOption,
};

fn option_strategy() -> impl Strategy<Value = ZipEntryUncompressionOption> {
    prop_oneof![
        Just(ZipEntryUncompressionOption::UncompressNeither),
        Just(ZipEntryUncompressionOption::UncompressOld),
        Just(ZipEntryUncompressionOption::UncompressNew),
        Just(ZipEntryUncompressionOption::UncompressBoth),
    ]
}

fn plan_entry_strategy() -> impl Strategy<Value = PreDiffPlanEntry> {
    let sizes = (0u64..100_000, 0u64..400_000, 0u64..400_000);
    (sizes, option_strategy(), 0u32..1000).prop_map(|(sizes, option, id)| {
        let (old_size, extra, new_size) = sizes;
        let name = format!("/entry/{id}").into_bytes();
        let old = MinimalZipEntry::new(8, id, old_size, old_size + extra, name.clone(), true, 0);
        let new = MinimalZipEntry::new(8, id, new_size / 2, new_size, name, true, 0);
        PreDiffPlanEntry::new(
            Arc::new(old),
            Arc::new(new),
            option,
            UncompressionOptionExplanation::CompressedBytesChanged,
        )
    })
}

fn old_side_cost(entry: &PreDiffPlanEntry) -> i64 {
    (entry.old_entry().uncompressed_size() - entry.old_entry().compressed_size()) as i64
}

proptest! {
    #[test]
    fn prop_old_limiter_preserves_length_order_and_bystanders(
        entries in proptest::collection::vec(plan_entry_strategy(), 0..24),
        budget in 0i64..2_000_000,
    ) {
        let limiter = DeltaFriendlyOldBlobSizeLimiter::new(budget).unwrap();
        let out = limiter.modify(&entries);
        prop_assert_eq!(out.len(), entries.len());

        let mut admitted_cost = 0i64;
        for (before, after) in entries.iter().zip(&out) {
            prop_assert!(Arc::ptr_eq(before.old_entry(), after.old_entry()));
            prop_assert!(Arc::ptr_eq(before.new_entry(), after.new_entry()));
            if !before.uncompression_option().uncompresses_old() {
                prop_assert_eq!(before, after);
            } else if after == before {
                admitted_cost += old_side_cost(before);
            } else {
                prop_assert_eq!(
                    after.uncompression_option(),
                    ZipEntryUncompressionOption::UncompressNeither
                );
                prop_assert_eq!(
                    after.explanation(),
                    UncompressionOptionExplanation::ResourceConstrained
                );
            }
        }
        prop_assert!(admitted_cost <= budget);
    }

    #[test]
    fn prop_old_limiter_is_deterministic(
        entries in proptest::collection::vec(plan_entry_strategy(), 0..24),
        budget in 0i64..2_000_000,
    ) {
        let limiter = DeltaFriendlyOldBlobSizeLimiter::new(budget).unwrap();
        prop_assert_eq!(limiter.modify(&entries), limiter.modify(&entries));
    }

    #[test]
    fn prop_budget_covering_all_costs_changes_nothing(
        entries in proptest::collection::vec(plan_entry_strategy(), 0..24),
    ) {
        let total: i64 = entries
            .iter()
            .filter(|e| e.uncompression_option().uncompresses_old())
            .map(old_side_cost)
            .sum();
        let limiter = DeltaFriendlyOldBlobSizeLimiter::new(total).unwrap();
        prop_assert_eq!(limiter.modify(&entries), entries);
    }

    #[test]
    fn prop_zero_budget_demotes_every_candidate(
        entries in proptest::collection::vec(plan_entry_strategy(), 0..24),
    ) {
        let out = DeltaFriendlyOldBlobSizeLimiter::new(0).unwrap().modify(&entries);
        for (before, after) in entries.iter().zip(&out) {
            let candidate = before.uncompression_option().uncompresses_old();
            if candidate && old_side_cost(before) > 0 {
                prop_assert_eq!(
                    after.uncompression_option(),
                    ZipEntryUncompressionOption::UncompressNeither
                );
            } else {
                prop_assert_eq!(before, after);
            }
        }
    }

    #[test]
    fn prop_recompression_limiter_only_touches_new_side_candidates(
        entries in proptest::collection::vec(plan_entry_strategy(), 0..24),
        budget in 0i64..2_000_000,
    ) {
        let out = TotalRecompressionLimiter::new(budget).unwrap().modify(&entries);
        prop_assert_eq!(out.len(), entries.len());
        let mut admitted = 0i64;
        for (before, after) in entries.iter().zip(&out) {
            if !before.uncompression_option().uncompresses_new() {
                prop_assert_eq!(before, after);
            } else if before == after {
                admitted += before.new_entry().uncompressed_size() as i64;
            }
        }
        prop_assert!(admitted <= budget);
    }

    #[test]
    fn prop_ranges_order_by_offset(
        a in (0u64..1_000_000, 0u64..1000),
        b in (0u64..1_000_000, 0u64..1000),
    ) {
        let ra = TypedRange::<u8>::new(a.0, a.1, None);
        let rb = TypedRange::<u8>::new(b.0, b.1, None);
        if a.0 != b.0 {
            prop_assert_eq!(ra < rb, a.0 < b.0);
        }
        prop_assert_eq!(ra == rb, a == b);
    }
}

#[test]
fn negative_budgets_never_construct() {
    assert!(DeltaFriendlyOldBlobSizeLimiter::new(-1).is_err());
    assert!(TotalRecompressionLimiter::new(-1).is_err());
    assert!(DeltaFriendlyOldBlobSizeLimiter::new(0).is_ok());
    let unlimited = DeltaFriendlyOldBlobSizeLimiter::new(i64::MAX).unwrap();
    assert_eq!(unlimited.max_size_bytes(), i64::MAX);
}
