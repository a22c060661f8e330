//! A fixed-capacity ring buffer that overwrites its oldest item when pushed to while full.
//!
//! Items are addressed by their logical position, where `0` is the oldest retained item.
//! The buffer never shifts items around: logical position `i` lives in physical slot `(head + i) % capacity`
//! of a backing store that is allocated once and never resized.
//!
//! On top of plain iteration, [`Cursor`] and [`CursorMut`] provide random-access navigation
//! (stepping, offset arithmetic, distances and ordering) over the logical view.
//!
//! ```
//! use ring_cursor::RingBuffer;
//!
//! let mut buf = RingBuffer::new(3).unwrap();
//! buf.extend([0, 1, 2]);
//! assert_eq!(buf, [0, 1, 2]);
//!
//! // `0` is the oldest item, so it gets overwritten
//! buf.push_back(3);
//! assert_eq!(buf, [1, 2, 3]);
//! assert_eq!(buf.front(), Ok(&1));
//! assert_eq!(buf.back(), Ok(&3));
//! ```

pub mod cursor;
pub mod error;
pub mod iter;
mod pos;

use std::{
    fmt::{Debug, Formatter},
    hash::{Hash, Hasher},
    mem::{self, MaybeUninit},
    num::NonZeroUsize,
    ops::{Index, IndexMut},
    ptr,
};

pub use self::{
    cursor::{Cursor, CursorMut},
    error::RingBufferError,
    iter::{Iter, IterMut},
};

use self::pos::Pos;

/// Ring buffer that can hold up to [`capacity`](Self::capacity) items of type `A`.
pub struct RingBuffer<A> {
    // Invariant: the `len` items starting from `head` are initialized,
    // circling back to the beginning of the buf if overflowing the capacity
    buf: Box<[MaybeUninit<A>]>,
    pos: Pos,
}

/// # Safety
/// Every item of `slice` must be initialized.
#[inline(always)]
unsafe fn slice_assume_init_ref<A>(slice: &[MaybeUninit<A>]) -> &[A] {
    // `MaybeUninit<A>` is guaranteed to have the same layout as `A`
    &*(slice as *const [MaybeUninit<A>] as *const [A])
}

/// # Safety
/// Every item of `slice` must be initialized.
#[inline(always)]
unsafe fn slice_assume_init_mut<A>(slice: &mut [MaybeUninit<A>]) -> &mut [A] {
    &mut *(slice as *mut [MaybeUninit<A>] as *mut [A])
}

impl<A> RingBuffer<A> {
    /// Creates a new empty ring buffer that can hold up to `capacity` items.
    ///
    /// Returns [`RingBufferError::ZeroCapacity`] if `capacity` is 0.
    ///
    /// # Examples
    /// ```
    /// # use ring_cursor::{RingBuffer, RingBufferError};
    /// let buf = RingBuffer::<u8>::new(5).unwrap();
    /// assert_eq!(buf.capacity(), 5);
    /// assert!(buf.is_empty());
    ///
    /// assert_eq!(RingBuffer::<u8>::new(0).unwrap_err(), RingBufferError::ZeroCapacity);
    /// ```
    pub fn new(capacity: usize) -> Result<Self, RingBufferError> {
        match NonZeroUsize::new(capacity) {
            Some(capacity) => Ok(Self::with_capacity(capacity)),
            None => {
                tracing::debug!("rejected ring buffer with zero capacity");
                Err(RingBufferError::ZeroCapacity)
            }
        }
    }

    /// Creates a new empty ring buffer that can hold up to `capacity` items.
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            buf: Box::new_uninit_slice(capacity.get()),
            pos: Pos::zero(capacity),
        }
    }

    /// Returns the number of items in the ring buffer.
    pub const fn len(&self) -> usize {
        self.pos.len()
    }

    /// Returns `true` if the ring buffer is empty.
    pub const fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Returns `true` if the ring buffer is full, meaning the next push will overwrite the oldest item.
    pub const fn is_full(&self) -> bool {
        self.pos.is_full()
    }

    /// Returns the maximum number of items the ring buffer can hold. Fixed for the lifetime of the buffer.
    pub const fn capacity(&self) -> usize {
        self.pos.cap().get()
    }

    /// Returns the number of items that can be added to the ring buffer before it is full.
    ///
    /// Same as `self.capacity() - self.len()`.
    pub const fn remaining(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Returns a reference to the item at the given index without doing bounds checks. Also assumes that the item is initialized.
    ///
    /// # Safety
    /// The given index must be less than `self.len()`.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &A {
        debug_assert!(index < self.len());
        let index = self.pos.logical_index(index);
        self.buf.get_unchecked(index).assume_init_ref()
    }

    /// Returns a mutable reference to the item at the given index without doing bounds checks. Also assumes that the item is initialized.
    ///
    /// # Safety
    /// The given index must be less than `self.len()`.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut A {
        debug_assert!(index < self.len());
        let index = self.pos.logical_index(index);
        self.buf.get_unchecked_mut(index).assume_init_mut()
    }

    /// Returns a reference to the item at the given index, or `None` if the index is out of bounds.
    ///
    /// # Examples
    /// ```
    /// # use ring_cursor::RingBuffer;
    /// let mut buf = RingBuffer::new(3).unwrap();
    /// buf.extend([0, 1]);
    /// assert_eq!(buf.get(0), Some(&0));
    /// assert_eq!(buf.get(1), Some(&1));
    /// assert_eq!(buf.get(2), None);
    /// ```
    pub fn get(&self, index: usize) -> Option<&A> {
        if index >= self.len() {
            None
        } else {
            Some(unsafe { self.get_unchecked(index) })
        }
    }

    /// Returns a mutable reference to the item at the given index, or `None` if the index is out of bounds.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut A> {
        if index >= self.len() {
            None
        } else {
            Some(unsafe { self.get_unchecked_mut(index) })
        }
    }

    /// Returns a reference to the item at the given logical index.
    ///
    /// The index is checked against the number of items, not the capacity: slots that are not
    /// currently holding an item are never reachable.
    ///
    /// # Examples
    /// ```
    /// # use ring_cursor::{RingBuffer, RingBufferError};
    /// let mut buf = RingBuffer::new(5).unwrap();
    /// buf.extend([7, 8]);
    /// assert_eq!(buf.at(1), Ok(&8));
    /// assert_eq!(buf.at(3), Err(RingBufferError::OutOfRange { index: 3, len: 2 }));
    /// ```
    pub fn at(&self, index: usize) -> Result<&A, RingBufferError> {
        let len = self.len();
        self.get(index)
            .ok_or(RingBufferError::OutOfRange { index, len })
    }

    /// Returns a mutable reference to the item at the given logical index.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut A, RingBufferError> {
        let len = self.len();
        self.get_mut(index)
            .ok_or(RingBufferError::OutOfRange { index, len })
    }

    /// Returns a reference to the oldest item.
    pub fn front(&self) -> Result<&A, RingBufferError> {
        self.get(0).ok_or(RingBufferError::Empty)
    }

    /// Returns a mutable reference to the oldest item.
    pub fn front_mut(&mut self) -> Result<&mut A, RingBufferError> {
        self.get_mut(0).ok_or(RingBufferError::Empty)
    }

    /// Returns a reference to the newest item.
    pub fn back(&self) -> Result<&A, RingBufferError> {
        let last = self.len().checked_sub(1).ok_or(RingBufferError::Empty)?;
        // SAFETY: `last < self.len()`
        Ok(unsafe { self.get_unchecked(last) })
    }

    /// Returns a mutable reference to the newest item.
    pub fn back_mut(&mut self) -> Result<&mut A, RingBufferError> {
        let last = self.len().checked_sub(1).ok_or(RingBufferError::Empty)?;
        // SAFETY: `last < self.len()`
        Ok(unsafe { self.get_unchecked_mut(last) })
    }

    /// Adds an item to the end of the ring buffer, assuming the buffer is not [full](Self::is_full).
    ///
    /// # Safety
    /// `self.is_full()` must be `false`.
    #[inline]
    unsafe fn push_unchecked(&mut self, item: A) {
        debug_assert!(!self.is_full());
        self.buf.get_unchecked_mut(self.pos.tail()).write(item);
        self.pos.push();
    }

    /// Adds an item to the end of the ring buffer, removing the oldest item if the buffer [is full](Self::is_full).
    /// Returns the removed item if the buffer was full, otherwise `None`.
    ///
    /// # Examples
    /// ```
    /// # use ring_cursor::RingBuffer;
    /// let mut buf = RingBuffer::new(3).unwrap();
    /// assert_eq!(buf.pop_push(0), None);
    /// assert_eq!(buf.pop_push(1), None);
    /// assert_eq!(buf.pop_push(2), None);
    /// assert_eq!(buf, [0, 1, 2]);
    /// assert_eq!(buf.pop_push(3), Some(0));
    /// assert_eq!(buf, [1, 2, 3]);
    /// assert_eq!(buf.pop_push(4), Some(1));
    /// assert_eq!(buf, [2, 3, 4]);
    /// ```
    #[inline]
    pub fn pop_push(&mut self, item: A) -> Option<A> {
        if self.is_full() {
            let item = mem::replace(
                // SAFETY: `head` is always in bounds
                unsafe { self.buf.get_unchecked_mut(self.pos.head()) },
                MaybeUninit::new(item),
            );
            self.pos.evict();
            tracing::trace!(
                capacity = self.capacity(),
                "evicted oldest item from full ring buffer"
            );
            // SAFETY: buffer is full, so the item at `head` was initialized
            Some(unsafe { item.assume_init() })
        } else {
            // SAFETY: `self.is_full()` returned false
            unsafe { self.push_unchecked(item) };
            None
        }
    }

    /// Adds an item to the end of the ring buffer, overwriting the oldest item if the buffer [is full](Self::is_full).
    ///
    /// See [`pop_push`](Self::pop_push) to get hold of the overwritten item.
    #[inline]
    pub fn push_back(&mut self, item: A) {
        self.pop_push(item);
    }

    /// Tries to add an item to the end of the ring buffer without overwriting anything.
    /// Returns [`RingBufferError::Full`] if the buffer [is full](Self::is_full).
    ///
    /// # Examples
    /// ```
    /// # use ring_cursor::{RingBuffer, RingBufferError};
    /// let mut buf = RingBuffer::new(2).unwrap();
    /// assert_eq!(buf.try_push_back(1), Ok(()));
    /// assert_eq!(buf.try_push_back(2), Ok(()));
    /// assert_eq!(buf.try_push_back(3), Err(RingBufferError::Full));
    /// assert_eq!(buf, [1, 2]);
    /// ```
    #[inline]
    pub fn try_push_back(&mut self, item: A) -> Result<(), RingBufferError> {
        if self.is_full() {
            return Err(RingBufferError::Full);
        }
        // SAFETY: `self.is_full()` returned false
        unsafe { self.push_unchecked(item) };
        Ok(())
    }

    /// Removes the newest item from the ring buffer and returns it.
    ///
    /// The freed slot is where the next pushed item will be written. Returns [`RingBufferError::Empty`],
    /// leaving the buffer untouched, if there is nothing to remove.
    ///
    /// # Examples
    /// ```
    /// # use ring_cursor::{RingBuffer, RingBufferError};
    /// let mut buf = RingBuffer::new(3).unwrap();
    /// buf.extend([0, 1, 2, 3]);
    /// assert_eq!(buf.pop_back(), Ok(3));
    /// buf.push_back(4);
    /// assert_eq!(buf, [1, 2, 4]);
    /// buf.clear();
    /// assert_eq!(buf.pop_back(), Err(RingBufferError::Empty));
    /// ```
    #[inline]
    pub fn pop_back(&mut self) -> Result<A, RingBufferError> {
        let last = self.len().checked_sub(1).ok_or(RingBufferError::Empty)?;
        let index = self.pos.logical_index(last);
        // SAFETY: `last < self.len()`, so the item is initialized, and `self.pos` stops tracking it right after
        let item = unsafe { self.buf.get_unchecked(index).assume_init_read() };
        self.pos.pop_back();
        Ok(item)
    }

    /// Removes all items from the ring buffer.
    pub fn clear(&mut self) {
        let (front, back) = self.as_mut_slices();
        let front: *mut [A] = front;
        let back: *mut [A] = back;
        self.pos = Pos::zero(self.pos.cap());
        // SAFETY: the slices covered exactly the initialized items, which are no longer tracked by `self.pos`
        unsafe {
            ptr::drop_in_place(front);
            ptr::drop_in_place(back);
        }
    }

    /// Swaps the items at logical indices `i` and `j`.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    #[track_caller]
    pub fn swap(&mut self, i: usize, j: usize) {
        let len = self.len();
        assert!(i < len, "{}", RingBufferError::OutOfRange { index: i, len });
        assert!(j < len, "{}", RingBufferError::OutOfRange { index: j, len });
        let i = self.pos.logical_index(i);
        let j = self.pos.logical_index(j);
        self.buf.swap(i, j);
    }

    /// Returns an iterator over the items in the ring buffer, oldest first.
    ///
    /// The iterator is double-ended, so `iter().rev()` walks the items newest first.
    pub fn iter(&self) -> Iter<'_, A> {
        Iter::new(&self.buf, self.pos)
    }

    /// Returns an iterator over the mutable references to the items in the ring buffer.
    pub fn iter_mut(&mut self) -> IterMut<'_, A> {
        IterMut::new(&mut self.buf, self.pos)
    }

    /// Returns a cursor pointing at the oldest item.
    pub fn cursor_front(&self) -> Cursor<'_, A> {
        Cursor::new(self, 0)
    }

    /// Returns a cursor pointing one past the newest item. It is never dereferenceable.
    ///
    /// # Examples
    /// ```
    /// # use ring_cursor::RingBuffer;
    /// let buf = RingBuffer::try_from([1, 2, 3]).unwrap();
    /// let (begin, end) = (buf.cursor_front(), buf.cursor_end());
    /// assert_eq!(end - begin, 3);
    /// assert_eq!(end.get(), None);
    /// assert_eq!((end - 1).get(), Some(&3));
    /// ```
    pub fn cursor_end(&self) -> Cursor<'_, A> {
        Cursor::new(self, cursor::offset_of(self.len()))
    }

    /// Returns a cursor at the given logical offset.
    pub fn cursor_at(&self, offset: isize) -> Cursor<'_, A> {
        Cursor::new(self, offset)
    }

    /// Returns a mutable cursor pointing at the oldest item.
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, A> {
        CursorMut::new(self, 0)
    }

    /// Returns a mutable cursor pointing one past the newest item.
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, A> {
        let end = cursor::offset_of(self.len());
        CursorMut::new(self, end)
    }

    /// Returns a mutable cursor at the given logical offset.
    pub fn cursor_at_mut(&mut self, offset: isize) -> CursorMut<'_, A> {
        CursorMut::new(self, offset)
    }

    /// Returns a pair of slices which together contain the items of the ring buffer, oldest first.
    ///
    /// If the ring buffer is laid out contiguously in memory, the second slice is empty.
    ///
    /// # Examples
    /// ```
    /// # use ring_cursor::RingBuffer;
    /// let mut buf = RingBuffer::new(3).unwrap();
    /// buf.extend([0, 1, 2]);
    /// assert_eq!(buf.as_slices(), (&[0, 1, 2][..], &[][..]));
    /// buf.push_back(3);
    /// assert_eq!(buf.as_slices(), (&[1, 2][..], &[3][..]));
    /// ```
    pub fn as_slices(&self) -> (&[A], &[A]) {
        let head = self.pos.head();
        let front = &self.buf[head..head + self.pos.front_len()];
        let back = &self.buf[..self.pos.back_len()];
        // SAFETY: together, the two ranges cover exactly the initialized items
        unsafe { (slice_assume_init_ref(front), slice_assume_init_ref(back)) }
    }

    /// Returns a pair of mutable slices which together contain the items of the ring buffer, oldest first.
    ///
    /// # Examples
    /// ```
    /// # use ring_cursor::RingBuffer;
    /// let mut buf = RingBuffer::new(3).unwrap();
    /// buf.extend([0, 1, 2, 3]);
    /// let (front, back) = buf.as_mut_slices();
    /// front.copy_from_slice(&[4, 5]);
    /// back.copy_from_slice(&[6]);
    /// assert_eq!(buf, [4, 5, 6]);
    /// ```
    pub fn as_mut_slices(&mut self) -> (&mut [A], &mut [A]) {
        let head = self.pos.head();
        let front_len = self.pos.front_len();
        let back_len = self.pos.back_len();
        let (back, front) = self.buf.split_at_mut(head);
        // SAFETY: together, the two ranges cover exactly the initialized items
        unsafe {
            (
                slice_assume_init_mut(&mut front[..front_len]),
                slice_assume_init_mut(&mut back[..back_len]),
            )
        }
    }

    /// Rearranges the underlying storage so the items are contiguous, and returns them as one mutable slice.
    ///
    /// The logical order of the items is preserved. This is what lets slice algorithms
    /// such as [`sort`](slice::sort) or [`binary_search`](slice::binary_search) run over the buffer.
    ///
    /// # Examples
    /// ```
    /// # use ring_cursor::RingBuffer;
    /// let mut buf = RingBuffer::new(4).unwrap();
    /// buf.extend([5, 1, 4, 2, 3, 0]);
    /// assert_eq!(buf, [4, 2, 3, 0]);
    /// buf.make_contiguous().sort();
    /// assert_eq!(buf, [0, 2, 3, 4]);
    /// assert!(buf.as_slices().1.is_empty());
    /// ```
    pub fn make_contiguous(&mut self) -> &mut [A] {
        if !self.pos.is_contiguous() {
            tracing::trace!(
                head = self.pos.head(),
                len = self.len(),
                "rotating ring buffer into contiguous storage"
            );
            self.buf.rotate_left(self.pos.head());
            self.pos.rewind();
        }

        let head = self.pos.head();
        let len = self.len();
        // SAFETY: the items are contiguous, so `head..head + len` covers exactly the initialized items
        unsafe { slice_assume_init_mut(&mut self.buf[head..head + len]) }
    }

    /// Clones the contents of the ring buffer into a `Vec`, oldest first.
    pub fn to_vec(&self) -> Vec<A>
    where
        A: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<A> Drop for RingBuffer<A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<A: Clone> Clone for RingBuffer<A> {
    fn clone(&self) -> Self {
        let mut buf = Self::with_capacity(self.pos.cap());
        buf.extend(self.iter().cloned());
        buf
    }
}

/// Creates a full ring buffer whose capacity is the length of the array.
///
/// Fails with [`RingBufferError::ZeroCapacity`] for an empty array.
///
/// # Examples
///
/// ```rust
/// # use ring_cursor::{RingBuffer, RingBufferError};
/// let buf = RingBuffer::try_from([0, 1, 2]).unwrap();
/// assert!(buf.is_full());
/// assert_eq!(buf, [0, 1, 2]);
///
/// assert_eq!(RingBuffer::<u8>::try_from([]).unwrap_err(), RingBufferError::ZeroCapacity);
/// ```
impl<A, const N: usize> TryFrom<[A; N]> for RingBuffer<A> {
    type Error = RingBufferError;

    fn try_from(arr: [A; N]) -> Result<Self, Self::Error> {
        let mut buf = Self::new(N)?;
        buf.extend(arr);
        Ok(buf)
    }
}

/// Extends the ring buffer with the contents of the given iterator, overwriting the oldest items if necessary.
///
/// # Examples
/// ```
/// # use ring_cursor::RingBuffer;
/// let mut buf = RingBuffer::new(3).unwrap();
/// buf.extend([0, 1]);
/// assert_eq!(buf, [0, 1]);
/// buf.extend([2, 3]);
/// assert_eq!(buf, [1, 2, 3]);
/// ```
impl<A> Extend<A> for RingBuffer<A> {
    fn extend<T: IntoIterator<Item = A>>(&mut self, iter: T) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<A> Index<usize> for RingBuffer<A> {
    type Output = A;

    #[track_caller]
    fn index(&self, index: usize) -> &A {
        match self.at(index) {
            Ok(item) => item,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<A> IndexMut<usize> for RingBuffer<A> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut A {
        match self.at_mut(index) {
            Ok(item) => item,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<A: PartialEq> PartialEq for RingBuffer<A> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<A: Eq> Eq for RingBuffer<A> {}

impl<A: PartialOrd> PartialOrd for RingBuffer<A> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<A: Ord> Ord for RingBuffer<A> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<A: Hash> Hash for RingBuffer<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        self.iter().for_each(|item| item.hash(state))
    }
}

impl<A: PartialEq, B: AsRef<[A]> + ?Sized> PartialEq<B> for RingBuffer<A> {
    fn eq(&self, other: &B) -> bool {
        self.iter().eq(other.as_ref())
    }
}

impl<A: Debug> Debug for RingBuffer<A> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'buf, A> IntoIterator for &'buf RingBuffer<A> {
    type Item = &'buf A;
    type IntoIter = Iter<'buf, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'buf, A> IntoIterator for &'buf mut RingBuffer<A> {
    type Item = &'buf mut A;
    type IntoIter = IterMut<'buf, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use proptest::prelude::*;

    use super::*;

    fn holds_invariant<A>(buf: &RingBuffer<A>) -> bool {
        buf.pos.tail() == (buf.pos.head() + buf.len()) % buf.capacity()
    }

    #[test]
    fn test() {
        let mut arr = RingBuffer::new(3).unwrap();
        assert_eq!(arr.pop_back(), Err(RingBufferError::Empty));
        assert_eq!(arr.iter().next(), None);
        assert_eq!(arr, []);
        assert!(arr.is_empty());
        assert!(!arr.is_full());

        arr.push_back(0);
        arr.push_back(1);
        assert_eq!(arr, [0, 1]);
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.remaining(), 1);
        assert!(!arr.is_empty());
        assert!(!arr.is_full());

        // fill cap
        arr.push_back(2);

        assert_eq!(arr, [0, 1, 2]);
        assert_eq!(arr.len(), 3);
        assert!(arr.is_full());
        assert_eq!(arr.try_push_back(9), Err(RingBufferError::Full));

        assert_eq!(arr.pop_back(), Ok(2));
        assert_eq!(arr, [0, 1]);
        assert!(!arr.is_full());

        arr.push_back(3);
        arr.push_back(4);
        assert_eq!(arr, [1, 3, 4]);
        assert_eq!(arr.front(), Ok(&1));
        assert_eq!(arr.back(), Ok(&4));

        assert_eq!(arr.pop_back(), Ok(4));
        assert_eq!(arr.pop_back(), Ok(3));
        assert_eq!(arr.pop_back(), Ok(1));
        assert!(arr.is_empty());
        assert_eq!(arr, []);
        assert_eq!(arr.pop_back(), Err(RingBufferError::Empty));
    }

    #[test]
    fn test_empty_access() {
        let mut arr = RingBuffer::<i32>::new(5).unwrap();
        assert_eq!(arr.len(), 0);
        assert_eq!(arr.front(), Err(RingBufferError::Empty));
        assert_eq!(arr.back(), Err(RingBufferError::Empty));
        assert_eq!(arr.front_mut(), Err(RingBufferError::Empty));
        assert_eq!(arr.back_mut(), Err(RingBufferError::Empty));
        assert_eq!(arr.pop_back(), Err(RingBufferError::Empty));
        assert_eq!(arr.pos, Pos::zero(arr.pos.cap()));
    }

    #[test]
    fn test_zero_cap() {
        assert_eq!(
            RingBuffer::<i32>::new(0).unwrap_err(),
            RingBufferError::ZeroCapacity
        );
        assert_eq!(
            RingBuffer::<i32>::try_from([]).unwrap_err(),
            RingBufferError::ZeroCapacity
        );
    }

    #[test]
    fn test_fifo_eviction() {
        let mut arr = RingBuffer::new(4).unwrap();
        for i in 0..5 {
            arr.push_back(i);
            assert!(arr.len() <= arr.capacity());
            assert!(holds_invariant(&arr));
        }
        assert_eq!(arr, [1, 2, 3, 4]);
        assert_eq!(arr.len(), arr.capacity());
    }

    #[test]
    fn test_capacity_one() {
        let mut arr = RingBuffer::new(1).unwrap();
        for i in 0..4u32 {
            assert_eq!(arr.pop_push(i), i.checked_sub(1));
            assert_eq!(arr, [i]);
            assert!(holds_invariant(&arr));
        }
        assert_eq!(arr.pop_back(), Ok(3));
        assert!(holds_invariant(&arr));
    }

    #[test]
    fn test_at_checks_len_not_capacity() {
        let mut arr = RingBuffer::new(5).unwrap();
        arr.extend([10, 11, 12, 13, 14, 15, 16]);
        assert_eq!(arr.pop_back(), Ok(16));
        assert_eq!(arr.pop_back(), Ok(15));
        // the slots that held 15 and 16 are still in bounds of the backing store
        assert_eq!(arr.at(2), Ok(&14));
        assert_eq!(
            arr.at(3),
            Err(RingBufferError::OutOfRange { index: 3, len: 3 })
        );
        *arr.at_mut(0).unwrap() = 0;
        arr[1] += 100;
        assert_eq!(arr, [0, 113, 14]);
    }

    #[test]
    #[should_panic = "index 3 is out of range for ring buffer of length 3"]
    fn test_index_out_of_range() {
        let arr = RingBuffer::try_from([0, 1, 2]).unwrap();
        let _item = arr[3];
    }

    #[test]
    #[should_panic = "index 5 is out of range for ring buffer of length 2"]
    fn test_swap_out_of_range() {
        let mut arr = RingBuffer::new(8).unwrap();
        arr.extend([0, 1]);
        arr.swap(0, 5);
    }

    #[test]
    fn test_hash_ignores_physical_layout() {
        use std::collections::hash_map::DefaultHasher;

        fn hash_of(buf: &RingBuffer<i32>) -> u64 {
            let mut hasher = DefaultHasher::new();
            buf.hash(&mut hasher);
            hasher.finish()
        }

        let mut straight = RingBuffer::new(3).unwrap();
        straight.extend(0..3);

        let mut rotated = RingBuffer::new(3).unwrap();
        rotated.extend([8, 9, 0, 1]);
        assert_eq!(rotated.pop_back(), Ok(1));
        rotated.extend([1, 2]);
        assert_ne!(straight.pos.head(), rotated.pos.head());

        assert_eq!(straight, rotated);
        assert_eq!(hash_of(&straight), hash_of(&rotated));

        rotated.push_back(3);
        assert_ne!(hash_of(&straight), hash_of(&rotated));
    }

    #[test]
    fn test_swap() {
        let mut arr = RingBuffer::new(3).unwrap();
        arr.extend([0, 1, 2, 3]);
        arr.swap(0, 2);
        assert_eq!(arr, [3, 2, 1]);
    }

    #[test]
    fn test_to_vec() {
        let mut arr = RingBuffer::new(3).unwrap();
        assert_eq!(arr.to_vec(), Vec::<i32>::new());

        arr.push_back(0);
        assert_eq!(arr.to_vec(), &[0]);

        arr.extend([1, 2]);
        assert_eq!(arr.to_vec(), &[0, 1, 2]);

        arr.extend([3, 4]);
        assert_eq!(arr.to_vec(), &[2, 3, 4]);
        assert_eq!(arr.pop_back(), Ok(4));
        assert_eq!(arr.to_vec(), &[2, 3]);
    }

    #[test]
    fn test_make_contiguous() {
        let mut arr = RingBuffer::new(5).unwrap();
        arr.extend(0..8);
        assert_ne!(arr.pos.head(), 0);
        assert_eq!(arr.as_slices(), (&[3, 4][..], &[5, 6, 7][..]));

        assert_eq!(arr.make_contiguous(), &mut [3, 4, 5, 6, 7]);
        assert_eq!(arr.pos.head(), 0);
        assert!(holds_invariant(&arr));
        assert_eq!(arr, [3, 4, 5, 6, 7]);

        // keeps working as a ring afterwards
        arr.push_back(8);
        assert_eq!(arr, [4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_make_contiguous_partial() {
        let mut arr = RingBuffer::new(4).unwrap();
        arr.extend(0..6);
        assert_eq!(arr.pop_back(), Ok(5));
        assert_eq!(arr.pop_back(), Ok(4));
        // head is 2, items sit in slots 2 and 3
        assert_eq!(arr.make_contiguous(), &mut [2, 3]);
        arr.extend([6, 7]);
        assert_eq!(arr.make_contiguous(), &mut [2, 3, 6, 7]);
    }

    #[test]
    fn test_clone_and_eq() {
        let mut arr = RingBuffer::new(3).unwrap();
        arr.extend(["a", "b", "c", "d"]);
        let cloned = arr.clone();
        assert_eq!(cloned, arr);
        assert_eq!(cloned.capacity(), 3);
        assert_eq!(format!("{arr:?}"), r#"["b", "c", "d"]"#);

        let mut other = RingBuffer::new(3).unwrap();
        other.extend(["b", "c"]);
        assert!(other < arr);
        other.push_back("d");
        assert_eq!(other, arr);
    }

    #[test]
    fn test_drops_each_item_once() {
        let token = Rc::new(());
        {
            let mut arr = RingBuffer::new(3).unwrap();
            for _ in 0..5 {
                arr.push_back(Rc::clone(&token));
            }
            // two evicted items were dropped
            assert_eq!(Rc::strong_count(&token), 4);

            drop(arr.pop_back().unwrap());
            assert_eq!(Rc::strong_count(&token), 3);

            arr.clear();
            assert_eq!(Rc::strong_count(&token), 1);

            arr.extend([Rc::clone(&token), Rc::clone(&token)]);
            assert_eq!(Rc::strong_count(&token), 3);
        }
        assert_eq!(Rc::strong_count(&token), 1);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Push(u8),
        PopBack,
        MakeContiguous,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => any::<u8>().prop_map(Op::Push),
            1 => Just(Op::PopBack),
            1 => Just(Op::MakeContiguous),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn prop_tail_follows_head_and_len(cap in 1usize..8, ops in prop::collection::vec(op(), 0..64)) {
            let mut arr = RingBuffer::new(cap).unwrap();
            for op in ops {
                match op {
                    Op::Push(item) => arr.push_back(item),
                    Op::PopBack => { let _ = arr.pop_back(); }
                    Op::MakeContiguous => { arr.make_contiguous(); }
                }
                prop_assert!(arr.len() <= arr.capacity());
                prop_assert!(holds_invariant(&arr));
                if arr.is_empty() {
                    prop_assert_eq!(arr.pos.head(), 0);
                }
            }
        }
    }
}
