#![no_main]

use libfuzzer_sys::fuzz_target;

use adaptive_mergesort::MergeSorter;
use adaptive_mergesort_fuzz::{is_sorted, tagged};

fuzz_target!(|data: &[u8]| {
    // Few distinct keys, so stability is exercised on most inputs.
    let mut v: Vec<(u8, usize)> = tagged(data)
        .into_iter()
        .map(|(key, idx)| (key % 8, idx))
        .collect();

    let mut sorter = MergeSorter::new();
    let stats = sorter.sort_by(&mut v, |a, b| a.0.cmp(&b.0));

    // Sorted by key and, within equal keys, by original position.
    assert!(is_sorted(&v));
    assert_eq!(stats.merges + stats.rebalances, stats.runs.saturating_sub(1));
});
