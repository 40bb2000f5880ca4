//! Insertion primitives used to build up short runs.

use core::mem::ManuallyDrop;
use core::ptr;

/// Natural runs shorter than this are extended with insertion sort before they are pushed onto the
/// run stack. Inputs of at most this length are handled by insertion sort alone.
pub const MIN_RUN: usize = 4;

// When dropped, copies from `src` into `dest`.
struct InsertionHole<T> {
    src: *const T,
    dest: *mut T,
}

impl<T> Drop for InsertionHole<T> {
    fn drop(&mut self) {
        // SAFETY: `src` points to the element that was lifted out of the slice and `dest` to the
        // single slot in the slice that is currently logically uninitialized.
        unsafe {
            ptr::copy_nonoverlapping(self.src, self.dest, 1);
        }
    }
}

/// Inserts `v[0]` into the pre-sorted sequence `v[1..]` so that the whole `v[..]` becomes sorted.
///
/// The caller must already have observed `is_less(&v[1], &v[0])`, that comparison is not repeated.
/// The scan stops at the first element that is not less than `v[0]`, so `v[0]` ends up in front
/// of any elements equal to it.
///
/// # Safety
///
/// `v.len()` must be at least 2.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) unsafe fn insert_head<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    debug_assert!(len >= 2);

    let arr_ptr = v.as_mut_ptr();

    unsafe {
        // Lift the head out, shift one element at a time and drop it into the last vacated slot.
        // This is a single rotation of `v[..dest]`, not a chain of swaps.
        let tmp = ManuallyDrop::new(ptr::read(arr_ptr));

        // Intermediate state of the insertion is tracked by `hole`, which serves two purposes:
        // 1. Protects integrity of `v` from panics in `is_less`.
        // 2. Fills the remaining hole in `v` in the end.
        //
        // Panic safety:
        //
        // If `is_less` panics at any point during the process, `hole` will get dropped and fill the
        // hole in `v` with `tmp`, thus ensuring that `v` still holds every object it initially held
        // exactly once.
        let mut hole = InsertionHole {
            src: &*tmp,
            dest: arr_ptr.add(1),
        };
        ptr::copy_nonoverlapping(arr_ptr.add(1), arr_ptr, 1);

        // v[1] is known to be less than tmp, start at v[2].
        for i in 2..len {
            let i_ptr = arr_ptr.add(i);
            if !is_less(&*i_ptr, &*tmp) {
                break;
            }

            ptr::copy_nonoverlapping(i_ptr, i_ptr.sub(1), 1);
            hole.dest = i_ptr;
        }
        // `hole` gets dropped and thus copies `tmp` into the remaining hole in `v`.
    }
}

/// Stable insertion sort, scanning right-to-left so that every insertion moves left-to-right.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn insertion_sort<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();

    if len < 2 {
        return;
    }

    for i in (0..len - 1).rev() {
        // SAFETY: i + 1 < len, so both reads are in bounds and v[i..] has at least 2 elements.
        unsafe {
            if is_less(v.get_unchecked(i + 1), v.get_unchecked(i)) {
                insert_head(&mut v[i..], is_less);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::panic::{self, AssertUnwindSafe};

    #[test]
    fn insert_head_moves_to_end() {
        let mut v = [9, 1, 2, 3, 4];
        unsafe { insert_head(&mut v, &mut |a: &i32, b: &i32| a < b) };
        assert_eq!(v, [1, 2, 3, 4, 9]);
    }

    #[test]
    fn insert_head_stops_before_equal() {
        // (key, tag), only the key is compared.
        let mut v = [(5, 0), (1, 1), (5, 2), (7, 3)];
        unsafe { insert_head(&mut v, &mut |a: &(i32, i32), b: &(i32, i32)| a.0 < b.0) };
        assert_eq!(v, [(1, 1), (5, 0), (5, 2), (7, 3)]);
    }

    #[test]
    fn insert_head_two_elements() {
        let mut v = [2, 1];
        unsafe { insert_head(&mut v, &mut |a: &i32, b: &i32| a < b) };
        assert_eq!(v, [1, 2]);
    }

    #[test]
    fn insert_head_panic_keeps_elements() {
        let mut v: Vec<String> = ["z", "a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let mut calls = 0;

        let res = panic::catch_unwind(AssertUnwindSafe(|| unsafe {
            insert_head(&mut v, &mut |a: &String, b: &String| {
                calls += 1;
                if calls == 2 {
                    panic!("comparison panic");
                }
                a < b
            });
        }));
        assert!(res.is_err());

        let mut seen = v.clone();
        seen.sort();
        assert_eq!(seen, ["a", "b", "c", "z"]);
    }

    #[test]
    fn insertion_sort_small() {
        for len in 0..=MIN_RUN + 1 {
            let mut v: Vec<i32> = (0..len as i32).rev().collect();
            insertion_sort(&mut v, &mut |a, b| a < b);
            assert_eq!(v, (0..len as i32).collect::<Vec<_>>());
        }
    }

    #[test]
    fn insertion_sort_stable() {
        let mut v = [(3, 0), (1, 1), (3, 2), (1, 3), (2, 4), (3, 5)];
        insertion_sort(&mut v, &mut |a: &(i32, i32), b: &(i32, i32)| a.0 < b.0);
        assert_eq!(v, [(1, 1), (1, 3), (2, 4), (3, 0), (3, 2), (3, 5)]);
    }
}
