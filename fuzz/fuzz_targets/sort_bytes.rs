#![no_main]

use libfuzzer_sys::fuzz_target;

use adaptive_mergesort_fuzz::{is_sorted, u8_as_u64};

fuzz_target!(|data: &[u8]| {
    let mut v = data.to_vec();
    adaptive_mergesort::sort(&mut v);
    assert!(is_sorted(&v));

    let mut v = u8_as_u64(data);
    let mut expected = v.clone();
    expected.sort();

    adaptive_mergesort::sort(&mut v);
    assert_eq!(v, expected);
});
