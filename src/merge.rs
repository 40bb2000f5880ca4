use core::ptr;

use crate::scratch::{Reserve, ScratchBuf};

/// How a call to [`merge`] resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum MergeKind {
    /// `v[..mid]` was already entirely in front of `v[mid..]`, nothing moved.
    InOrder,
    /// Every element of `v[mid..]` is less than every element of `v[..mid]`, the two runs were
    /// swapped as blocks.
    Reversed,
    /// Element by element merge.
    Interleaved,
}

/// Merges non-decreasing runs `v[..mid]` and `v[mid..]` and stores the result into `v[..]`.
///
/// Equal elements are taken from the left run first. The left run is copied into `scratch`, which
/// is grown through `reserve` if it can't hold `mid` elements. No scratch space is requested if the
/// runs are already in order.
///
/// If `reserve` fails `v` is left untouched.
///
/// # Safety
///
/// `0 < mid < v.len()`.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) unsafe fn merge<T, F, R>(
    v: &mut [T],
    mid: usize,
    scratch: &mut ScratchBuf<T>,
    reserve: &mut R,
    is_less: &mut F,
) -> Result<MergeKind, R::Error>
where
    F: FnMut(&T, &T) -> bool,
    R: Reserve<T>,
{
    let len = v.len();
    debug_assert!(mid > 0 && mid < len);

    // SAFETY: the caller guarantees 0 < mid < len, so mid - 1, mid, 0 and len - 1 are in bounds.
    let (in_order, reversed) = unsafe {
        let in_order = !is_less(v.get_unchecked(mid), v.get_unchecked(mid - 1));
        let reversed = !in_order && is_less(v.get_unchecked(len - 1), v.get_unchecked(0));
        (in_order, reversed)
    };

    if in_order {
        return Ok(MergeKind::InOrder);
    }

    let buf = reserve.reserve_for_merge(scratch, mid)?;

    // SAFETY: `buf` has room for `mid` elements and does not alias `v`. `mid < len`.
    unsafe {
        if reversed {
            swap_blocks(v, mid, buf);
            Ok(MergeKind::Reversed)
        } else {
            merge_forward(v, mid, buf, is_less);
            Ok(MergeKind::Interleaved)
        }
    }
}

/// Moves `v[mid..]` to the front and `v[..mid]` behind it, keeping the order within each block.
///
/// # Safety
///
/// `0 < mid < v.len()` and `buf` must be valid for writes of `mid` elements and not overlap `v`.
unsafe fn swap_blocks<T>(v: &mut [T], mid: usize, buf: *mut T) {
    let len = v.len();
    let arr_ptr = v.as_mut_ptr();

    // No user code runs in here, so no guard is needed.
    unsafe {
        ptr::copy_nonoverlapping(arr_ptr, buf, mid);
        ptr::copy(arr_ptr.add(mid), arr_ptr, len - mid);
        ptr::copy_nonoverlapping(buf, arr_ptr.add(len - mid), mid);
    }
}

/// # Safety
///
/// `0 < mid < v.len()` and `buf` must be valid for writes of `mid` elements and not overlap `v`.
unsafe fn merge_forward<T, F>(v: &mut [T], mid: usize, buf: *mut T, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    let arr_ptr = v.as_mut_ptr();

    // The merge process first copies the left run into `buf`. Then it traces the copied run and the
    // right run forwards, comparing their next unconsumed elements and copying the lesser one into
    // `v`.
    //
    // If the right run gets consumed first, whatever is left of the buffered run is copied into
    // the remaining hole in `v`. If the buffered run is consumed first, the rest of the right run is
    // already in place.
    //
    // Intermediate state of the process is always tracked by `hole`, which serves two purposes:
    // 1. Protects integrity of `v` from panics in `is_less`.
    // 2. Fills the remaining hole in `v` if the right run gets consumed first.
    //
    // Panic safety:
    //
    // If `is_less` panics at any point during the process, `hole` will get dropped and fill the
    // hole in `v` with the unconsumed range in `buf`, thus ensuring that `v` still holds every
    // object it initially held exactly once.
    //
    // Left elements are only ever compared through `buf`, the copy that ends up back in `v`.
    unsafe {
        ptr::copy_nonoverlapping(arr_ptr, buf, mid);

        let mut hole = MergeHole {
            start: buf,
            end: buf.add(mid),
            dest: arr_ptr,
        };

        let mut right = arr_ptr.add(mid);
        let v_end = arr_ptr.add(len);

        while hole.start < hole.end && right < v_end {
            // Consume the lesser side.
            // If equal, prefer the left run to maintain stability.
            if is_less(&*right, &*hole.start) {
                ptr::copy_nonoverlapping(right, hole.dest, 1);
                right = right.add(1);
            } else {
                ptr::copy_nonoverlapping(hole.start, hole.dest, 1);
                hole.start = hole.start.add(1);
            }
            hole.dest = hole.dest.add(1);
        }
        // Finally, `hole` gets dropped. If the left run was not fully consumed, whatever remains of
        // it will now be copied into the hole in `v`.
    }
}

// When dropped, copies the range `start..end` into `dest..`.
struct MergeHole<T> {
    start: *mut T,
    end: *mut T,
    dest: *mut T,
}

impl<T> Drop for MergeHole<T> {
    fn drop(&mut self) {
        // SAFETY: `T` is not a zero-sized type, `start..end` is a range of the scratch buffer and
        // `dest` points at a gap of exactly that many slots in the slice.
        unsafe {
            let len = self.end.offset_from(self.start) as usize;
            ptr::copy_nonoverlapping(self.start, self.dest, len);
        }
    }
}
