use std::cell::Cell;
use std::cmp::Ordering;

use adaptive_mergesort::{MergeSorter, SortStats, MIN_RUN};
use sort_test_tools::{instantiate_sort_tests, patterns, Sort};

struct SortImpl {}

impl Sort for SortImpl {
    fn name() -> String {
        "rust_adaptive_mergesort_stable".into()
    }

    fn sort<T>(arr: &mut [T])
    where
        T: Ord,
    {
        adaptive_mergesort::sort(arr);
    }

    fn sort_by<T, F>(arr: &mut [T], compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        adaptive_mergesort::sort_by(arr, compare);
    }
}

instantiate_sort_tests!(SortImpl);

// --- Crate specific ---

fn is_sorted_by_key<T, K: Ord>(v: &[T], key: impl Fn(&T) -> K) -> bool {
    v.windows(2).all(|w| key(&w[0]) <= key(&w[1]))
}

fn tagged(vals: &[i32]) -> Vec<(i32, usize)> {
    vals.iter().copied().zip(0..).collect()
}

fn sort_tagged_counting(v: &mut [(i32, usize)]) -> (SortStats, u64) {
    let comps = Cell::new(0u64);
    let stats = MergeSorter::new().sort_by(v, |a, b| {
        comps.set(comps.get() + 1);
        a.0.cmp(&b.0)
    });

    (stats, comps.get())
}

fn comp_ceiling(len: usize) -> u64 {
    let len = len as u64;
    let log2 = 64 - (len.max(2) - 1).leading_zeros() as u64;
    len * log2 + len
}

#[test]
fn five_elements() {
    let mut v = [5, 3, 1, 2, 4];
    adaptive_mergesort::sort(&mut v);
    assert_eq!(v, [1, 2, 3, 4, 5]);
}

#[test]
fn ascending_single_run() {
    let mut v = tagged(&patterns::ascending(1000));
    let expected = v.clone();

    let (stats, comps) = sort_tagged_counting(&mut v);

    assert_eq!(v, expected);
    assert_eq!(stats.runs, 1);
    assert_eq!(stats.merges, 0);
    assert_eq!(stats.rebalances, 0);
    assert_eq!(comps, 999);
}

#[test]
fn ascending_no_scratch() {
    let mut sorter = MergeSorter::new();
    let mut v = patterns::ascending(10_000);
    sorter.sort(&mut v);

    assert_eq!(sorter.capacity(), 0);
}

#[test]
fn descending_tagged() {
    let mut v = tagged(&patterns::descending(1000));
    let (stats, _) = sort_tagged_counting(&mut v);

    assert_eq!(v, tagged(&patterns::descending(1000)).into_iter().rev().collect::<Vec<_>>());
    assert_eq!(stats.merges + stats.rebalances, stats.runs - 1);
    assert!(stats.reversed_merges > 0);
}

#[test]
fn random_swaps_duplicates_stable() {
    for reversed in [false, true] {
        let vals: Vec<i32> = patterns::random_swaps(5_000, 50, reversed)
            .into_iter()
            .map(|val| val / 16)
            .collect();
        let mut v = tagged(&vals);

        sort_tagged_counting(&mut v);

        assert!(v.windows(2).all(|w| w[0] <= w[1]));

        let mut idx: Vec<usize> = v.iter().map(|(_, idx)| *idx).collect();
        idx.sort();
        assert!(idx.iter().copied().eq(0..vals.len()));
    }
}

#[test]
fn empty_and_single() {
    let mut sorter = MergeSorter::<String>::new();

    let mut empty: [String; 0] = [];
    assert_eq!(sorter.sort(&mut empty), SortStats::default());

    let mut single = [String::from("x")];
    let stats = sorter.sort(&mut single);
    assert_eq!(single, ["x"]);
    assert_eq!(stats.runs, 1);

    assert_eq!(sorter.capacity(), 0);
}

#[test]
fn min_run_boundaries() {
    let mut sorter = MergeSorter::new();

    for len in [MIN_RUN - 1, MIN_RUN, MIN_RUN + 1] {
        let mut v = tagged(&patterns::descending(len));
        let stats = sorter.sort_by(&mut v, |a, b| a.0.cmp(&b.0));

        assert!(is_sorted_by_key(&v, |e| e.0));
        if len <= MIN_RUN {
            assert_eq!(stats.runs, 1);
        }
    }

    // Inputs up to MIN_RUN are insertion sorted without scratch.
    let mut sorter = MergeSorter::<i32>::new();
    let mut v = [4, 3, 2, 1];
    sorter.sort(&mut v);
    assert_eq!(v, [1, 2, 3, 4]);
    assert_eq!(sorter.capacity(), 0);
}

#[test]
fn equal_elements_keep_order() {
    let mut v = tagged(&[1, 0, 1, 0, 1, 0, 1, 0, 2, 2, 0]);
    sort_tagged_counting(&mut v);

    assert_eq!(
        v,
        [
            (0, 1),
            (0, 3),
            (0, 5),
            (0, 7),
            (0, 10),
            (1, 0),
            (1, 2),
            (1, 4),
            (1, 6),
            (2, 8),
            (2, 9)
        ]
    );
}

#[test]
fn rebalance_merges() {
    // Every third run is longer than the two runs after it.
    let mut v = tagged(&patterns::run_lengths(2460, &[40, 10, 32]));
    let (stats, comps) = sort_tagged_counting(&mut v);

    assert!(is_sorted_by_key(&v, |e| e.0));
    assert!(stats.rebalances > 0);
    assert!(comps <= comp_ceiling(v.len()));
}

#[test]
fn comparison_count_ceiling() {
    let pattern_fns: Vec<fn(usize) -> Vec<i32>> = vec![
        patterns::random,
        patterns::descending,
        patterns::pipe_organ,
        |len| patterns::random_uniform(len, 0..=1),
        |len| patterns::saw_mixed(len, 4),
        |len| patterns::random_swaps(len, len / 10, false),
        |len| patterns::run_lengths(len, &[1000, 500, 20, 300, 100, 5, 64, 600]),
    ];

    for pattern_fn in pattern_fns {
        for len in [10, 100, 1_000, 10_000] {
            let mut v = tagged(&pattern_fn(len));
            let (_, comps) = sort_tagged_counting(&mut v);

            assert!(is_sorted_by_key(&v, |e| e.0));
            assert!(
                comps <= comp_ceiling(len),
                "len: {len} comps: {comps} ceiling: {}",
                comp_ceiling(len)
            );
        }
    }
}

#[test]
fn sorter_reuse() {
    let mut sorter = MergeSorter::new();

    let mut small = patterns::random(100);
    sorter.sort(&mut small);
    let small_cap = sorter.capacity();
    assert!(small_cap > 0);
    assert!(is_sorted_by_key(&small, |e| *e));

    let mut large = patterns::random(5_000);
    sorter.sort(&mut large);
    let large_cap = sorter.capacity();
    assert!(large_cap >= small_cap);
    assert!(is_sorted_by_key(&large, |e| *e));

    // Does not shrink for smaller inputs.
    let mut small = patterns::random(100);
    sorter.sort(&mut small);
    assert_eq!(sorter.capacity(), large_cap);

    sorter.shrink_to_fit();
    assert_eq!(sorter.capacity(), 0);
}

#[test]
fn with_capacity_never_grows() {
    let len = 4_096;
    let mut sorter = MergeSorter::with_capacity(len);
    let cap = sorter.capacity();

    for pattern in [
        patterns::random(len),
        patterns::pipe_organ(len),
        patterns::saw_mixed(len, 7),
    ] {
        let mut v = pattern;
        sorter.sort(&mut v);
        assert!(is_sorted_by_key(&v, |e| *e));
        assert_eq!(sorter.capacity(), cap);
    }
}

#[test]
fn try_sort_by_ok() {
    let mut v = patterns::random(1_000);
    let mut expected = v.clone();
    expected.sort();

    let stats = adaptive_mergesort::try_sort_by(&mut v, |a, b| a.cmp(b)).unwrap();

    assert_eq!(v, expected);
    assert!(stats.runs > 1);
}

#[test]
fn sort_by_context() {
    let weights: Vec<i32> = patterns::random(500);
    let mut idx: Vec<usize> = (0..weights.len()).collect();

    adaptive_mergesort::sort_by_context(&mut idx, weights.as_slice(), |a, b, weights| {
        weights[*a].cmp(&weights[*b])
    });

    assert!(is_sorted_by_key(&idx, |i| weights[*i]));
}

#[test]
fn sort_by_key_stable() {
    let mut v: Vec<(String, usize)> = patterns::random_uniform(300, 0..=9)
        .into_iter()
        .map(|val| val.to_string())
        .zip(0..)
        .collect();

    adaptive_mergesort::sort_by_key(&mut v, |(key, _)| key.clone());

    assert!(v.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn insertion_sort_by() {
    let mut v = tagged(&patterns::random_uniform(200, 0..=20));
    adaptive_mergesort::insertion_sort_by(&mut v, |a, b| a.0.cmp(&b.0));

    assert!(v.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn zero_sized() {
    let mut v = [(); 100];
    let mut sorter = MergeSorter::new();

    assert_eq!(sorter.sort(&mut v), SortStats::default());
    assert_eq!(sorter.capacity(), 0);
}
