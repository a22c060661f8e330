use std::num::NonZeroUsize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Pos {
    cap: NonZeroUsize,
    // Invariant: `head` < `cap`
    head: usize,
    // Invariant: `tail` == (`head` + `len`) % `cap`
    tail: usize,
    // Invariant: `len` <= `cap`
    len: usize,
}

impl Pos {
    pub const fn zero(cap: NonZeroUsize) -> Self {
        Self {
            cap,
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    #[inline(always)]
    pub const fn cap(&self) -> NonZeroUsize {
        self.cap
    }

    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub const fn head(&self) -> usize {
        self.head
    }

    #[inline(always)]
    pub const fn tail(&self) -> usize {
        self.tail
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub const fn is_full(&self) -> bool {
        self.len == self.cap.get()
    }

    #[inline(always)]
    pub const fn is_contiguous(&self) -> bool {
        self.head + self.len <= self.cap.get()
    }

    /// Number of items stored between `head` and the end of the underlying buffer.
    #[inline(always)]
    pub const fn front_len(&self) -> usize {
        self.len - self.back_len()
    }

    /// Number of items that wrapped around to the start of the underlying buffer.
    #[inline(always)]
    pub const fn back_len(&self) -> usize {
        (self.head + self.len).saturating_sub(self.cap.get())
    }

    /// Returns the index in the underlying buffer corresponding to the given logical index.
    /// The returned index is guaranteed to be in bounds (i.e. < `cap`), but the indexed item not necessarily initialized.
    #[inline(always)]
    pub const fn logical_index(&self, index: usize) -> usize {
        let cap = self.cap.get();
        (self.head + index % cap) % cap
    }

    #[inline(always)]
    const fn wrapping_next(&self, physical: usize) -> usize {
        if physical + 1 == self.cap.get() {
            0
        } else {
            physical + 1
        }
    }

    #[inline(always)]
    const fn wrapping_prev(&self, physical: usize) -> usize {
        if physical == 0 {
            self.cap.get() - 1
        } else {
            physical - 1
        }
    }

    /// Accounts for an item written at `tail`.
    pub fn push(&mut self) {
        debug_assert!(!self.is_full());
        self.tail = self.wrapping_next(self.tail);
        self.len += 1;
        self.check();
    }

    /// Accounts for the item at `head` being overwritten by a new item, which only happens when full.
    pub fn evict(&mut self) {
        debug_assert!(self.is_full());
        self.head = self.wrapping_next(self.head);
        self.tail = self.wrapping_next(self.tail);
        self.check();
    }

    /// Accounts for the newest item being removed.
    pub fn pop_back(&mut self) {
        debug_assert!(!self.is_empty());
        self.len -= 1;
        if self.len == 0 {
            *self = Self::zero(self.cap);
        } else {
            self.tail = self.wrapping_prev(self.tail);
        }
        self.check();
    }

    /// Drops the first `n` items from this window. Used by iterators, the buffer itself only shrinks from the back.
    pub fn skip_front(&mut self, n: usize) {
        debug_assert!(n <= self.len);
        self.head = self.logical_index(n);
        self.len -= n;
        self.check();
    }

    /// Drops the last `n` items from this window.
    pub fn skip_back(&mut self, n: usize) {
        debug_assert!(n <= self.len);
        self.len -= n;
        self.tail = self.logical_index(self.len);
        self.check();
    }

    /// Moves the window to the start of the underlying buffer, after its items were rotated there.
    pub fn rewind(&mut self) {
        self.head = 0;
        self.tail = self.len % self.cap.get();
        self.check();
    }

    #[inline(always)]
    fn check(&self) {
        debug_assert!(self.len <= self.cap.get());
        debug_assert!(self.head < self.cap.get());
        debug_assert_eq!(self.tail, (self.head + self.len) % self.cap.get());
    }
}
