use std::collections::TryReserveError;
use std::mem;

/// Uninitialized storage for the left-hand run of a merge.
///
/// The backing `Vec` always has length 0, only its capacity is used. Elements copied into the
/// buffer are bitwise duplicates of slice elements and are never dropped through the buffer.
pub(crate) struct ScratchBuf<T> {
    buf: Vec<T>,
}

impl<T> ScratchBuf<T> {
    pub(crate) const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(if mem::size_of::<T>() == 0 { 0 } else { capacity }),
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        if mem::size_of::<T>() == 0 {
            0
        } else {
            self.buf.capacity()
        }
    }

    /// Returns a pointer to at least `len` slots of storage, growing the buffer if needed. The
    /// buffer never shrinks here.
    #[inline]
    pub(crate) fn reserve(&mut self, len: usize) -> *mut T {
        debug_assert!(self.buf.is_empty());

        // len is 0, so this guarantees capacity >= len.
        self.buf.reserve(len);
        self.buf.as_mut_ptr()
    }

    /// Same as [`ScratchBuf::reserve`] but reports allocation failure instead of aborting.
    #[inline]
    pub(crate) fn try_reserve(&mut self, len: usize) -> Result<*mut T, TryReserveError> {
        debug_assert!(self.buf.is_empty());

        self.buf.try_reserve(len)?;
        Ok(self.buf.as_mut_ptr())
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.buf.shrink_to_fit();
    }
}

/// Source of scratch space for the driver, one impl per allocation policy.
pub(crate) trait Reserve<T> {
    type Error;

    fn reserve_for_merge(&mut self, buf: &mut ScratchBuf<T>, len: usize)
        -> Result<*mut T, Self::Error>;
}

/// Grows through `Vec::reserve`, allocation failure is handled by the global alloc error handler.
pub(crate) struct Infallible;

/// Grows through `Vec::try_reserve`.
pub(crate) struct Fallible;

impl<T> Reserve<T> for Infallible {
    type Error = core::convert::Infallible;

    #[inline]
    fn reserve_for_merge(
        &mut self,
        buf: &mut ScratchBuf<T>,
        len: usize,
    ) -> Result<*mut T, Self::Error> {
        Ok(buf.reserve(len))
    }
}

impl<T> Reserve<T> for Fallible {
    type Error = TryReserveError;

    #[inline]
    fn reserve_for_merge(
        &mut self,
        buf: &mut ScratchBuf<T>,
        len: usize,
    ) -> Result<*mut T, Self::Error> {
        buf.try_reserve(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_never_shrinks() {
        let mut buf = ScratchBuf::<u64>::new();
        assert_eq!(buf.capacity(), 0);

        buf.reserve(100);
        let cap = buf.capacity();
        assert!(cap >= 100);

        buf.reserve(10);
        assert_eq!(buf.capacity(), cap);

        buf.try_reserve(200).unwrap();
        assert!(buf.capacity() >= 200);
    }

    #[test]
    fn try_reserve_overflow() {
        let mut buf = ScratchBuf::<u64>::new();
        assert!(buf.try_reserve(usize::MAX).is_err());
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn zst_has_no_capacity() {
        let buf = ScratchBuf::<()>::with_capacity(50);
        assert_eq!(buf.capacity(), 0);
    }
}
