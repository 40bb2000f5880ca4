//! Adaptive stable natural merge sort.
//!
//! Runs that are already present in the input are detected and merged, so presorted or nearly
//! presorted slices are sorted in close to *O*(*n*), while random input degrades gracefully to
//! *O*(*n* \* log(*n*)). Scratch space is sized to the longest left-hand run merged, and can be
//! kept across calls with [`MergeSorter`].

use std::cmp::Ordering;
use std::collections::TryReserveError;
use std::fmt;

mod merge;
mod mergesort;
mod scratch;
mod smallsort;

pub use mergesort::SortStats;
pub use smallsort::MIN_RUN;

use scratch::{Fallible, Infallible, ScratchBuf};

/// Sorts the slice, preserving the initial order of equal elements.
///
/// This sort is stable (i.e., does not reorder equal elements) and *O*(*n* \* log(*n*))
/// worst-case. It allocates temporary storage for the longest left-hand run it merges, less than
/// `v.len()` elements and nothing at all if `v` is already sorted.
///
/// # Current implementation
///
/// The slice is scanned from right to left for non-decreasing runs, runs shorter than
/// [`MIN_RUN`] are extended with insertion sort. Pending runs are merged so that each one is at
/// most half as long as its right-hand neighbour. A run that turns out longer than the two runs
/// before it triggers merging those two first, keeping merges balanced.
///
/// # Examples
///
/// ```
/// let mut v = [5, 3, 1, 2, 4];
///
/// adaptive_mergesort::sort(&mut v);
/// assert!(v == [1, 2, 3, 4, 5]);
/// ```
#[inline]
pub fn sort<T>(v: &mut [T])
where
    T: Ord,
{
    stable_sort(v, |a, b| a.lt(b));
}

/// Sorts the slice with a comparator function, preserving the initial order of equal elements.
///
/// The comparator function must define a total ordering for the elements in the slice. If the
/// ordering is not total, the order of the elements is unspecified, but the slice still holds
/// exactly the elements it held before. The same holds if `compare` panics.
///
/// ```
/// let mut floats = [5f64, 4.0, 1.0, 3.0, 2.0];
/// adaptive_mergesort::sort_by(&mut floats, |a, b| a.partial_cmp(b).unwrap());
/// assert_eq!(floats, [1.0, 2.0, 3.0, 4.0, 5.0]);
/// ```
#[inline]
pub fn sort_by<T, F>(v: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    stable_sort(v, |a, b| compare(a, b) == Ordering::Less);
}

/// Sorts the slice with a key extraction function, preserving the initial order of equal elements.
///
/// The key function is called twice per comparison.
#[inline]
pub fn sort_by_key<T, K, F>(v: &mut [T], mut f: F)
where
    F: FnMut(&T) -> K,
    K: Ord,
{
    stable_sort(v, |a, b| f(a).lt(&f(b)));
}

/// Sorts the slice with a comparator that additionally receives a shared `context` value.
///
/// ```
/// let offsets = [30, 10, 20];
/// let mut idx = [0, 1, 2];
///
/// adaptive_mergesort::sort_by_context(&mut idx, &offsets, |a, b, offsets| {
///     offsets[*a].cmp(&offsets[*b])
/// });
/// assert_eq!(idx, [1, 2, 0]);
/// ```
#[inline]
pub fn sort_by_context<T, C, F>(v: &mut [T], context: &C, mut compare: F)
where
    C: ?Sized,
    F: FnMut(&T, &T, &C) -> Ordering,
{
    stable_sort(v, |a, b| compare(a, b, context) == Ordering::Less);
}

/// Like [`sort_by`], but reports a failure to allocate scratch space instead of aborting.
///
/// On error `v` holds the elements it held before, in an unspecified order.
#[inline]
pub fn try_sort_by<T, F>(v: &mut [T], compare: F) -> Result<SortStats, TryReserveError>
where
    F: FnMut(&T, &T) -> Ordering,
{
    MergeSorter::new().try_sort_by(v, compare)
}

/// Stable insertion sort, *O*(*n*^2) worst-case, without allocating.
///
/// Faster than [`sort_by`] only for very short or almost sorted slices.
pub fn insertion_sort_by<T, F>(v: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    smallsort::insertion_sort(v, &mut |a, b| compare(a, b) == Ordering::Less);
}

#[inline]
fn stable_sort<T, F>(v: &mut [T], mut is_less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    MergeSorter::new().sort_impl(v, &mut is_less);
}

/// Owns the scratch buffer of the merge sort, so it can be reused across sort calls.
///
/// The buffer grows to the largest left-hand run merged so far and is only released on drop or
/// [`MergeSorter::shrink_to_fit`]. Sorting takes `&mut self`, a sorter can't be used by two sorts at
/// the same time. Use one sorter per thread.
///
/// ```
/// use adaptive_mergesort::MergeSorter;
///
/// let mut sorter = MergeSorter::new();
/// for mut batch in [vec![3, 1, 2], vec![9, 8, 7, 6, 5, 4]] {
///     sorter.sort(&mut batch);
///     assert!(batch.windows(2).all(|w| w[0] <= w[1]));
/// }
/// ```
pub struct MergeSorter<T> {
    scratch: ScratchBuf<T>,
}

impl<T> MergeSorter<T> {
    /// Creates a sorter without allocating.
    pub const fn new() -> Self {
        Self {
            scratch: ScratchBuf::new(),
        }
    }

    /// Creates a sorter with room for `capacity` scratch elements. Slices no longer than that never
    /// need to grow it.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            scratch: ScratchBuf::with_capacity(capacity),
        }
    }

    /// Number of elements the scratch buffer can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.scratch.capacity()
    }

    /// Releases the scratch buffer.
    pub fn shrink_to_fit(&mut self) {
        self.scratch.shrink_to_fit();
    }

    /// Sorts `v` stably, see [`sort`].
    pub fn sort(&mut self, v: &mut [T]) -> SortStats
    where
        T: Ord,
    {
        self.sort_impl(v, &mut |a, b| a.lt(b))
    }

    /// Sorts `v` stably with a comparator function, see [`sort_by`].
    pub fn sort_by<F>(&mut self, v: &mut [T], mut compare: F) -> SortStats
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.sort_impl(v, &mut |a, b| compare(a, b) == Ordering::Less)
    }

    /// Sorts `v` stably with a comparator function, see [`try_sort_by`].
    pub fn try_sort_by<F>(
        &mut self,
        v: &mut [T],
        mut compare: F,
    ) -> Result<SortStats, TryReserveError>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        mergesort::merge_sort(
            v,
            &mut self.scratch,
            &mut Fallible,
            &mut |a, b| compare(a, b) == Ordering::Less,
        )
    }

    fn sort_impl<F>(&mut self, v: &mut [T], is_less: &mut F) -> SortStats
    where
        F: FnMut(&T, &T) -> bool,
    {
        match mergesort::merge_sort(v, &mut self.scratch, &mut Infallible, is_less) {
            Ok(stats) => stats,
            Err(never) => match never {},
        }
    }
}

impl<T> Default for MergeSorter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for MergeSorter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeSorter")
            .field("capacity", &self.capacity())
            .finish()
    }
}
