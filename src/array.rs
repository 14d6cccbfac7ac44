//! GrowableArray: contiguous owned storage with doubling growth.
//!
//! The buffer is managed directly through `std::alloc`; the first `len`
//! slots are initialized, the rest of `cap` is spare. Any reallocation
//! moves every element, so positions held as raw pointers do not survive a
//! growing push. Index-based access is unaffected.

use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem::{self, ManuallyDrop};
use core::ops::{Deref, DerefMut, Index, IndexMut};
use core::ptr::{self, NonNull};
use core::slice;
use std::alloc::{self, Layout};

use crate::container::Container;
use crate::error::{Error, Result};

/// Capacity of the first allocation.
const MIN_NON_ZERO_CAP: usize = 4;

#[cold]
fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

/// Heap-allocated array with amortized O(1) append.
pub struct GrowableArray<T> {
    ptr: NonNull<T>,
    cap: usize,
    len: usize,
    // Owns `T`s for the drop checker.
    _marker: PhantomData<T>,
}

unsafe impl<T: Send> Send for GrowableArray<T> {}
unsafe impl<T: Sync> Sync for GrowableArray<T> {}

impl<T> GrowableArray<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// Creates an empty array. Does not allocate.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: if Self::IS_ZST { usize::MAX } else { 0 },
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Creates an empty array able to hold `capacity` elements before
    /// reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut arr = Self::new();
        if capacity > arr.cap {
            arr.grow_to(capacity);
        }
        arr
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the array can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Checked access; fails with [`Error::IndexOutOfRange`].
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.len;
        self.as_slice()
            .get(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Appends to the back. Amortized O(1): a full buffer doubles.
    pub fn push(&mut self, value: T) {
        if self.len == self.cap {
            self.grow_one();
        }
        unsafe { ptr::write(self.ptr.as_ptr().add(self.len), value) };
        self.len += 1;
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        unsafe { Some(ptr::read(self.ptr.as_ptr().add(self.len))) }
    }

    /// Inserts `value` at `index`, shifting later elements right.
    /// `index == len` appends.
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        if index > self.len {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        if self.len == self.cap {
            self.grow_one();
        }
        unsafe {
            let base = self.ptr.as_ptr();
            ptr::copy(base.add(index), base.add(index + 1), self.len - index);
            ptr::write(base.add(index), value);
        }
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the element at `index`, shifting later elements
    /// left.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        if index >= self.len {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        self.len -= 1;
        unsafe {
            let base = self.ptr.as_ptr();
            let value = ptr::read(base.add(index));
            ptr::copy(base.add(index + 1), base.add(index), self.len - index);
            Ok(value)
        }
    }

    /// Ensures room for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        let required = self
            .len
            .checked_add(additional)
            .unwrap_or_else(|| capacity_overflow());
        if required <= self.cap {
            return;
        }
        let doubled = self.cap.saturating_mul(2);
        self.grow_to(required.max(doubled).max(MIN_NON_ZERO_CAP));
    }

    /// Keeps the first `len` elements and drops the rest.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let tail = ptr::slice_from_raw_parts_mut(
            unsafe { self.ptr.as_ptr().add(len) },
            self.len - len,
        );
        // Shrink first so a panicking destructor cannot cause a double drop.
        self.len = len;
        unsafe { ptr::drop_in_place(tail) };
    }

    /// Grows or shrinks to `new_len`, filling new slots with `f()`.
    pub fn resize_with<F>(&mut self, new_len: usize, mut f: F)
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }
        self.reserve(new_len - self.len);
        while self.len < new_len {
            self.push(f());
        }
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }

    fn grow_one(&mut self) {
        if Self::IS_ZST {
            // `len` reached `usize::MAX`.
            capacity_overflow();
        }
        let new_cap = if self.cap == 0 {
            MIN_NON_ZERO_CAP
        } else {
            self.cap
                .checked_mul(2)
                .unwrap_or_else(|| capacity_overflow())
        };
        self.grow_to(new_cap);
    }

    fn grow_to(&mut self, new_cap: usize) {
        debug_assert!(!Self::IS_ZST && new_cap > self.cap);
        let new_layout = Layout::array::<T>(new_cap).unwrap_or_else(|_| capacity_overflow());

        let raw = if self.cap == 0 {
            unsafe { alloc::alloc(new_layout) }
        } else {
            let old_layout =
                Layout::array::<T>(self.cap).unwrap_or_else(|_| capacity_overflow());
            unsafe { alloc::realloc(self.ptr.as_ptr().cast::<u8>(), old_layout, new_layout.size()) }
        };

        self.ptr = match NonNull::new(raw.cast::<T>()) {
            Some(p) => p,
            None => alloc::handle_alloc_error(new_layout),
        };
        self.cap = new_cap;
    }
}

/// Frees a buffer previously produced by `grow_to`.
///
/// # Safety
/// `ptr` must have been allocated with `Layout::array::<T>(cap)`.
unsafe fn deallocate<T>(ptr: NonNull<T>, cap: usize) {
    if mem::size_of::<T>() == 0 || cap == 0 {
        return;
    }
    if let Ok(layout) = Layout::array::<T>(cap) {
        alloc::dealloc(ptr.as_ptr().cast::<u8>(), layout);
    }
}

impl<T> Drop for GrowableArray<T> {
    fn drop(&mut self) {
        if mem::needs_drop::<T>() {
            unsafe { ptr::drop_in_place(self.as_mut_slice() as *mut [T]) };
        }
        unsafe { deallocate(self.ptr, self.cap) };
    }
}

impl<T> Default for GrowableArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for GrowableArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for GrowableArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> Index<usize> for GrowableArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.at(index) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T> IndexMut<usize> for GrowableArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.at_mut(index) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T: Clone> Clone for GrowableArray<T> {
    fn clone(&self) -> Self {
        let mut arr = Self::with_capacity(self.len);
        arr.extend(self.as_slice().iter().cloned());
        arr
    }
}

impl<T: fmt::Debug> fmt::Debug for GrowableArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq> PartialEq for GrowableArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for GrowableArray<T> {}

impl<T> Extend<T> for GrowableArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve(lower);
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> FromIterator<T> for GrowableArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut arr = Self::new();
        arr.extend(iter);
        arr
    }
}

impl<T> Container for GrowableArray<T> {
    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        GrowableArray::clear(self);
    }
}

/// Owning iterator; unread elements are dropped with it.
pub struct IntoIter<T> {
    buf: NonNull<T>,
    cap: usize,
    start: usize,
    end: usize,
    _marker: PhantomData<T>,
}

impl<T> IntoIterator for GrowableArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let arr = ManuallyDrop::new(self);
        IntoIter {
            buf: arr.ptr,
            cap: arr.cap,
            start: 0,
            end: arr.len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> IntoIterator for &'a GrowableArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a mut GrowableArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.as_mut_slice().iter_mut()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        let value = unsafe { ptr::read(self.buf.as_ptr().add(self.start)) };
        self.start += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.start;
        (n, Some(n))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        unsafe { Some(ptr::read(self.buf.as_ptr().add(self.end))) }
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        if mem::needs_drop::<T>() {
            let rest = ptr::slice_from_raw_parts_mut(
                unsafe { self.buf.as_ptr().add(self.start) },
                self.end - self.start,
            );
            unsafe { ptr::drop_in_place(rest) };
        }
        unsafe { deallocate(self.buf, self.cap) };
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rest = unsafe {
            slice::from_raw_parts(self.buf.as_ptr().add(self.start), self.end - self.start)
        };
        f.debug_tuple("IntoIter").field(&rest).finish()
    }
}
