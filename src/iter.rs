use std::{iter::FusedIterator, marker::PhantomData, mem::MaybeUninit};

use crate::pos::Pos;

macro_rules! iter {
    ($name:ident(*$raw_mut:tt, {$( $mut_:tt )?}, $as_ptr:ident)) => {
        pub struct $name<'buf, A> {
            // Points at the first slot of the ring buffer's storage
            buf: *$raw_mut MaybeUninit<A>,
            // Window of items not yet yielded from either end
            pos: Pos,
            _marker: PhantomData<&'buf $($mut_)? A>,
        }

        impl<'buf, A> $name<'buf, A> {
            pub(crate) fn new(buf: &'buf $($mut_)? [MaybeUninit<A>], pos: Pos) -> Self {
                debug_assert_eq!(buf.len(), pos.cap().get());
                Self {
                    buf: buf.$as_ptr(),
                    pos,
                    _marker: PhantomData,
                }
            }

            /// Returns a pointer to the item at the given index of the remaining window, without doing bounds checks.
            #[inline(always)]
            fn get_unchecked(&self, index: usize) -> *$raw_mut A {
                let index = self.pos.logical_index(index);
                self.buf.wrapping_add(index).cast::<A>()
            }
        }

        impl<'buf, A> Iterator for $name<'buf, A> {
            type Item = &'buf $($mut_)? A;

            fn next(&mut self) -> Option<Self::Item> {
                if self.pos.is_empty() {
                    return None;
                }
                let item = self.get_unchecked(0);
                self.pos.skip_front(1);
                // SAFETY: the item was in the window, so it is initialized, and it is never yielded again
                Some(unsafe { & $($mut_)? *item })
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                (self.pos.len(), Some(self.pos.len()))
            }

            fn count(self) -> usize {
                self.pos.len()
            }

            fn nth(&mut self, n: usize) -> Option<Self::Item> {
                if n >= self.pos.len() {
                    self.pos.skip_front(self.pos.len());
                    return None;
                }
                self.pos.skip_front(n);
                self.next()
            }

            fn last(mut self) -> Option<Self::Item> {
                self.next_back()
            }
        }

        impl<A> DoubleEndedIterator for $name<'_, A> {
            fn next_back(&mut self) -> Option<Self::Item> {
                if self.pos.is_empty() {
                    return None;
                }
                self.pos.skip_back(1);
                let item = self.get_unchecked(self.pos.len());
                // SAFETY: the item was in the window, so it is initialized, and it is never yielded again
                Some(unsafe { & $($mut_)? *item })
            }

            fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
                if n >= self.pos.len() {
                    self.pos.skip_back(self.pos.len());
                    return None;
                }
                self.pos.skip_back(n);
                self.next_back()
            }
        }

        impl<A> FusedIterator for $name<'_, A> {}

        impl<A> ExactSizeIterator for $name<'_, A> {
            fn len(&self) -> usize {
                self.pos.len()
            }
        }
    };
}

iter!(Iter(*const, {/* no mut */}, as_ptr));
iter!(IterMut(*mut, {mut}, as_mut_ptr));

impl<A> Clone for Iter<'_, A> {
    fn clone(&self) -> Self {
        Self {
            buf: self.buf,
            pos: self.pos,
            _marker: PhantomData,
        }
    }
}

unsafe impl<A: Sync> Sync for Iter<'_, A> {}
unsafe impl<A: Sync> Send for Iter<'_, A> {}

unsafe impl<A: Sync> Sync for IterMut<'_, A> {}
unsafe impl<A: Send> Send for IterMut<'_, A> {}
