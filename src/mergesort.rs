//! Natural merge sort driver.
//!
//! The slice is scanned right-to-left for non-decreasing runs, so that insertion sort used to
//! extend short runs moves elements left-to-right. The right boundaries of pending runs are kept on
//! a stack, and the runs are collapsed so that every stacked run is at most half as long as its
//! right-hand neighbour. This bounds the stack depth by the bit width of `usize` and the total merge
//! work by *O*(*n* \* log(*n*)), while a presorted slice is a single run and takes *O*(*n*).
//!
//! Occasionally a new run is longer than both runs stacked to its right:
//!
//! ```text
//!   |---------- #3 ----------|- #2 -|---- #1 ----| ...
//! ```
//!
//! Instead of merging the long #3 with the short #2, #2 and #1 are merged first, which is more
//! balanced. The merged run is still shorter than its own right-hand neighbour, so this can repeat
//! down the stack with no more than two runs violating the invariant at any time. A final 2-way
//! merge then restores it.

use core::mem;

use crate::merge::{merge, MergeKind};
use crate::scratch::{Reserve, ScratchBuf};
use crate::smallsort::{insert_head, insertion_sort, MIN_RUN};

/// Counters describing the work done by one sort call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SortStats {
    /// Runs found while scanning, after extending short runs to [`MIN_RUN`].
    pub runs: usize,
    /// 2-way merges of the newest run into its right-hand neighbour.
    pub merges: usize,
    /// Merges of two stacked runs done ahead of a longer new run.
    pub rebalances: usize,
    /// Merges that found both runs already in order and moved nothing.
    pub in_order_merges: usize,
    /// Merges that swapped two runs as whole blocks.
    pub reversed_merges: usize,
}

impl SortStats {
    fn record(&mut self, kind: MergeKind) {
        match kind {
            MergeKind::InOrder => self.in_order_merges += 1,
            MergeKind::Reversed => self.reversed_merges += 1,
            MergeKind::Interleaved => {}
        }
    }
}

const MAX_RUNS: usize = usize::BITS as usize;

/// Right boundaries of the pending runs, the newest one on top.
///
/// Each stacked run is at most half as long as the one to its right, so a slice addressable with
/// `usize` never needs more than `usize::BITS` entries.
pub(crate) struct RunStack {
    bounds: [usize; MAX_RUNS],
    len: usize,
}

impl RunStack {
    pub(crate) const fn new() -> Self {
        Self {
            bounds: [0; MAX_RUNS],
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, bound: usize) {
        debug_assert!(self.len < MAX_RUNS, "run stack overflow");
        debug_assert!(self.top().map_or(true, |top| bound < top));

        self.bounds[self.len] = bound;
        self.len += 1;
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        Some(self.bounds[self.len])
    }

    /// Right boundary of the newest stacked run.
    #[inline]
    pub(crate) fn top(&self) -> Option<usize> {
        self.len.checked_sub(1).map(|i| self.bounds[i])
    }

    /// Right boundary of the run stacked before the newest one.
    #[inline]
    pub(crate) fn second(&self) -> Option<usize> {
        self.len.checked_sub(2).map(|i| self.bounds[i])
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

/// Sorts `v` stably, using `scratch` for merges and `reserve` to grow it.
///
/// If growing the scratch buffer fails the error is returned and `v` holds its original elements in
/// an unspecified order.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn merge_sort<T, F, R>(
    v: &mut [T],
    scratch: &mut ScratchBuf<T>,
    reserve: &mut R,
    is_less: &mut F,
) -> Result<SortStats, R::Error>
where
    F: FnMut(&T, &T) -> bool,
    R: Reserve<T>,
{
    let len = v.len();
    let mut stats = SortStats::default();

    if mem::size_of::<T>() == 0 {
        // Sorting has no meaningful behavior on zero-sized types. Do nothing.
        return Ok(stats);
    }

    if len < 2 {
        // These inputs are always sorted.
        stats.runs = len;
        return Ok(stats);
    }

    if len <= MIN_RUN {
        insertion_sort(v, is_less);
        stats.runs = 1;
        return Ok(stats);
    }

    let mut runs = RunStack::new();
    let mut head = len;

    loop {
        let mut mid = head;
        head = find_run(&mut v[..mid], is_less);
        stats.runs += 1;

        // Once the scan reached the start everything left on the stack gets merged.
        let scan_done = head == 0;

        while let Some(mut tail) = runs.top() {
            while let Some(tail2) = runs.second() {
                if mid - head <= tail2 - tail {
                    break;
                }

                // SAFETY: head < mid < tail < tail2, both runs are non-empty.
                let kind =
                    unsafe { merge(&mut v[mid..tail2], tail - mid, scratch, reserve, is_less)? };
                stats.record(kind);
                stats.rebalances += 1;

                runs.pop();
                tail = tail2;
            }

            if !scan_done && mid - head <= (tail - mid) / 2 {
                break;
            }

            // SAFETY: head < mid < tail, both runs are non-empty.
            let kind = unsafe { merge(&mut v[head..tail], mid - head, scratch, reserve, is_less)? };
            stats.record(kind);
            stats.merges += 1;

            runs.pop();
            mid = tail;
        }

        runs.push(mid);

        if scan_done {
            break;
        }
    }

    // Finally, exactly one run must remain in the stack.
    debug_assert!(runs.len() == 1 && runs.top() == Some(len));

    Ok(stats)
}

/// Finds the non-decreasing run ending at `v.len()`, and returns its start.
///
/// A run shorter than [`MIN_RUN`] is extended to the left by inserting the element in front of it
/// into the run, until it reaches that length or the start of `v`.
fn find_run<T, F>(v: &mut [T], is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let end = v.len();
    debug_assert!(end > 0);

    let mut head = end - 1;

    while head > 0 {
        // SAFETY: 0 < head < end.
        if unsafe { is_less(v.get_unchecked(head), v.get_unchecked(head - 1)) } {
            if end - head >= MIN_RUN {
                break;
            }

            // SAFETY: v[head - 1..] has at least 2 elements, and v[head] < v[head - 1] was just
            // observed.
            unsafe {
                insert_head(&mut v[head - 1..], is_less);
            }
        }

        head -= 1;
    }

    head
}
