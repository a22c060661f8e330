//! Random-access cursors over the logical view of a [`RingBuffer`].
//!
//! A cursor is a borrow of the buffer plus a signed logical offset, `0` being the oldest item.
//! The offset is not clamped: a cursor can sit before the first item or past the last one,
//! and only dereferences (returns `Some`) while it points into `0..len`.
//! This makes a pair of cursors usable as a half-open range `[begin, end)` the way random-access
//! algorithms expect, with [`RingBuffer::cursor_end`] never being dereferenceable itself.
//!
//! Navigation and distances use wrapping `isize` arithmetic, so they never overflow. A cursor that
//! wrapped around is far outside the buffer and simply does not dereference.
//!
//! ```
//! # use ring_cursor::{Cursor, RingBuffer};
//! // lower bound over a sorted range, written purely against the cursor contract
//! fn lower_bound<'a>(mut begin: Cursor<'a, i32>, end: Cursor<'a, i32>, value: i32) -> Cursor<'a, i32> {
//!     let mut count = end - begin;
//!     while count > 0 {
//!         let step = count / 2;
//!         let mid = begin + step;
//!         if mid.get().is_some_and(|item| *item < value) {
//!             begin = mid + 1;
//!             count -= step + 1;
//!         } else {
//!             count = step;
//!         }
//!     }
//!     begin
//! }
//!
//! let mut buf = RingBuffer::new(4).unwrap();
//! buf.extend([1, 3, 5, 7, 9, 11]);
//! let found = lower_bound(buf.cursor_front(), buf.cursor_end(), 8);
//! assert_eq!(found.offset(), 2);
//! assert_eq!(found.get(), Some(&9));
//! ```

use std::{
    cmp::Ordering,
    fmt::{self, Debug, Formatter},
    iter::{Skip, Take},
    ops::{Add, AddAssign, Sub, SubAssign},
    ptr,
};

use crate::{Iter, RingBuffer, RingBufferError};

/// Converts a logical index into a cursor offset.
pub(crate) fn offset_of(index: usize) -> isize {
    isize::try_from(index).unwrap_or(isize::MAX)
}

/// Read-only cursor over a [`RingBuffer`].
pub struct Cursor<'buf, A> {
    buf: &'buf RingBuffer<A>,
    offset: isize,
}

/// Cursor over a [`RingBuffer`] that can mutate the items it points at.
///
/// Converts into a [`Cursor`] (see [`as_cursor`](Self::as_cursor) and the `From` impl), but not the other way around.
pub struct CursorMut<'buf, A> {
    buf: &'buf mut RingBuffer<A>,
    offset: isize,
}

macro_rules! cursor {
    ($name:ident) => {
        impl<'buf, A> $name<'buf, A> {
            /// Returns the logical offset this cursor points at.
            pub fn offset(&self) -> isize {
                self.offset
            }

            /// Returns the offset one past the newest item, i.e. the offset of the end cursor.
            pub fn end_offset(&self) -> isize {
                offset_of(self.buf.len())
            }

            /// Returns `true` if this cursor sits exactly one past the newest item.
            pub fn is_end(&self) -> bool {
                self.offset == self.end_offset()
            }

            /// Returns the logical index this cursor points at, or `None` if it is not dereferenceable.
            pub fn index(&self) -> Option<usize> {
                self.index_of(self.offset)
            }

            /// Index of the item `n` positions away, `None` if that overflows or leaves the buffer.
            fn peek_index(&self, n: isize) -> Option<usize> {
                self.index_of(self.offset.checked_add(n)?)
            }

            fn index_of(&self, offset: isize) -> Option<usize> {
                usize::try_from(offset)
                    .ok()
                    .filter(|&index| index < self.buf.len())
            }

            /// Moves the cursor to the next item.
            pub fn move_next(&mut self) {
                self.offset = self.offset.wrapping_add(1);
            }

            /// Moves the cursor to the previous item.
            pub fn move_prev(&mut self) {
                self.offset = self.offset.wrapping_sub(1);
            }
        }

        impl<A> AddAssign<isize> for $name<'_, A> {
            fn add_assign(&mut self, step: isize) {
                self.offset = self.offset.wrapping_add(step);
            }
        }

        impl<A> SubAssign<isize> for $name<'_, A> {
            fn sub_assign(&mut self, step: isize) {
                self.offset = self.offset.wrapping_sub(step);
            }
        }

        impl<A> Add<isize> for $name<'_, A> {
            type Output = Self;

            fn add(mut self, step: isize) -> Self {
                self += step;
                self
            }
        }

        impl<A> Sub<isize> for $name<'_, A> {
            type Output = Self;

            fn sub(mut self, step: isize) -> Self {
                self -= step;
                self
            }
        }

        impl<A> PartialEq for $name<'_, A> {
            fn eq(&self, other: &Self) -> bool {
                ptr::eq(&*self.buf, &*other.buf) && self.offset == other.offset
            }
        }

        impl<A> Eq for $name<'_, A> {}

        /// Cursors are ordered by offset. Cursors over different buffers are not comparable.
        impl<A> PartialOrd for $name<'_, A> {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                ptr::eq(&*self.buf, &*other.buf).then(|| self.offset.cmp(&other.offset))
            }
        }

        impl<A> Debug for $name<'_, A> {
            fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("offset", &self.offset)
                    .field("len", &self.buf.len())
                    .finish()
            }
        }
    };
}

cursor!(Cursor);
cursor!(CursorMut);

impl<'buf, A> Cursor<'buf, A> {
    pub(crate) fn new(buf: &'buf RingBuffer<A>, offset: isize) -> Self {
        Self { buf, offset }
    }

    /// Returns the item this cursor points at, or `None` if it is outside the buffer's items.
    pub fn get(&self) -> Option<&'buf A> {
        self.buf.get(self.index()?)
    }

    /// Returns the item `n` positions away from this cursor.
    ///
    /// # Examples
    /// ```
    /// # use ring_cursor::RingBuffer;
    /// let buf = RingBuffer::try_from(['a', 'b', 'c']).unwrap();
    /// let cursor = buf.cursor_at(1);
    /// assert_eq!(cursor.peek(-1), Some(&'a'));
    /// assert_eq!(cursor.peek(1), Some(&'c'));
    /// assert_eq!(cursor.peek(2), None);
    /// ```
    pub fn peek(&self, n: isize) -> Option<&'buf A> {
        self.buf.get(self.peek_index(n)?)
    }

    /// Returns the buffer this cursor borrows.
    pub fn buffer(&self) -> &'buf RingBuffer<A> {
        self.buf
    }

    /// Returns an iterator over the items in `[self, end)`, clamped to the buffer's items.
    ///
    /// # Examples
    /// ```
    /// # use ring_cursor::RingBuffer;
    /// let mut buf = RingBuffer::new(4).unwrap();
    /// buf.extend(0..6);
    /// let begin = buf.cursor_front() + 1;
    /// assert!(begin.until(buf.cursor_end()).eq(&[3, 4, 5]));
    /// assert!(begin.until(begin + 2).rev().eq(&[4, 3]));
    /// ```
    ///
    /// # Panics
    /// Panics if `end` is a cursor over a different ring buffer.
    pub fn until(self, end: Self) -> Take<Skip<Iter<'buf, A>>> {
        assert!(ptr::eq(self.buf, end.buf), "cursors over different ring buffers");
        let len = self.buf.len();
        let clamp = |offset: isize| usize::try_from(offset).unwrap_or(0).min(len);
        let start = clamp(self.offset);
        let stop = clamp(end.offset).max(start);
        self.buf.iter().skip(start).take(stop - start)
    }
}

impl<A> Clone for Cursor<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for Cursor<'_, A> {}

/// Signed logical distance between two cursors over the same buffer.
///
/// Panics if the cursors are over different ring buffers.
impl<A> Sub for Cursor<'_, A> {
    type Output = isize;

    fn sub(self, other: Self) -> isize {
        assert!(ptr::eq(self.buf, other.buf), "cursors over different ring buffers");
        self.offset.wrapping_sub(other.offset)
    }
}

impl<'buf, A> CursorMut<'buf, A> {
    pub(crate) fn new(buf: &'buf mut RingBuffer<A>, offset: isize) -> Self {
        Self { buf, offset }
    }

    /// Returns the item this cursor points at, or `None` if it is outside the buffer's items.
    pub fn get(&self) -> Option<&A> {
        self.buf.get(self.index()?)
    }

    /// Returns a mutable reference to the item this cursor points at.
    pub fn get_mut(&mut self) -> Option<&mut A> {
        let index = self.index()?;
        self.buf.get_mut(index)
    }

    /// Returns the item `n` positions away from this cursor.
    pub fn peek(&self, n: isize) -> Option<&A> {
        self.buf.get(self.peek_index(n)?)
    }

    /// Returns a mutable reference to the item `n` positions away from this cursor.
    pub fn peek_mut(&mut self, n: isize) -> Option<&mut A> {
        let index = self.peek_index(n)?;
        self.buf.get_mut(index)
    }

    /// Swaps the item this cursor points at with the item at logical offset `other`.
    ///
    /// # Examples
    /// ```
    /// # use ring_cursor::{RingBuffer, RingBufferError};
    /// let mut buf = RingBuffer::try_from([1, 2, 3]).unwrap();
    /// let mut cursor = buf.cursor_front_mut();
    /// cursor.swap_with(2).unwrap();
    /// assert_eq!(
    ///     cursor.swap_with(3),
    ///     Err(RingBufferError::CursorOutOfRange { offset: 3, len: 3 })
    /// );
    /// assert_eq!(buf, [3, 2, 1]);
    /// ```
    pub fn swap_with(&mut self, other: isize) -> Result<(), RingBufferError> {
        let len = self.buf.len();
        let this = self.index().ok_or(RingBufferError::CursorOutOfRange {
            offset: self.offset,
            len,
        })?;
        let other = self
            .index_of(other)
            .ok_or(RingBufferError::CursorOutOfRange { offset: other, len })?;
        self.buf.swap(this, other);
        Ok(())
    }

    /// Returns a read-only cursor at the same offset, borrowing from this one.
    pub fn as_cursor(&self) -> Cursor<'_, A> {
        Cursor::new(&*self.buf, self.offset)
    }

    /// Converts this cursor into a read-only cursor at the same offset.
    pub fn into_cursor(self) -> Cursor<'buf, A> {
        Cursor::new(self.buf, self.offset)
    }
}

impl<'buf, A> From<CursorMut<'buf, A>> for Cursor<'buf, A> {
    fn from(cursor: CursorMut<'buf, A>) -> Self {
        cursor.into_cursor()
    }
}
