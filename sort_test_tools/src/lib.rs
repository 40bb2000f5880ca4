//! Shared test and benchmark tooling for sort implementations.
//!
//! A sort implements [`Sort`] and gets the whole test suite with
//! [`instantiate_sort_tests!`](crate::instantiate_sort_tests).

pub trait Sort {
    fn name() -> String;

    fn sort<T>(arr: &mut [T])
    where
        T: Ord;

    fn sort_by<T, F>(arr: &mut [T], compare: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering;
}

pub mod patterns;
