//! ForwardList: singly-linked list with a before-first sentinel position.
//!
//! Nodes are allocated one by one and never move, so a list can sit inside
//! a `GrowableArray` that reallocates without disturbing its nodes. Edits in
//! the middle go through [`CursorMut`], which remembers the node *before*
//! the edit point; that is all a singly-linked unlink needs.

use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::container::Container;
use crate::error::{Error, Result};

type Link<T> = Option<NonNull<Node<T>>>;

struct Node<T> {
    value: T,
    next: Link<T>,
}

/// Singly-linked list with O(1) push at both ends and O(1) insert/remove
/// after a cursor.
pub struct ForwardList<T> {
    head: Link<T>,
    tail: Link<T>,
    len: usize,
    _marker: PhantomData<Box<Node<T>>>,
}

unsafe impl<T: Send> Send for ForwardList<T> {}
unsafe impl<T: Sync> Sync for ForwardList<T> {}

impl<T> ForwardList<T> {
    pub const fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn front(&self) -> Option<&T> {
        self.head.map(|n| unsafe { &(*n.as_ptr()).value })
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.head.map(|n| unsafe { &mut (*n.as_ptr()).value })
    }

    pub fn push_front(&mut self, value: T) {
        unsafe { self.link_after(None, value) };
    }

    pub fn back(&self) -> Option<&T> {
        self.tail.map(|n| unsafe { &(*n.as_ptr()).value })
    }

    /// Appends in O(1) through the cached tail and returns the new element.
    pub fn push_back(&mut self, value: T) -> &mut T {
        let tail = self.tail;
        unsafe {
            let node = self.link_after(tail, value);
            &mut (*node.as_ptr()).value
        }
    }

    pub fn pop_front(&mut self) -> Option<T> {
        unsafe { self.unlink_after(None) }
    }

    /// Positional access; walks `index` nodes.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.iter().nth(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.iter_mut().nth(index)
    }

    /// Checked positional access; fails with [`Error::IndexOutOfRange`].
    pub fn at(&self, index: usize) -> Result<&T> {
        self.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.len,
        })
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|v| v == value)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head,
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            next: self.head,
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Cursor at the before-first sentinel.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut {
            list: self,
            current: None,
            index: None,
        }
    }

    pub fn clear(&mut self) {
        // Iterative so long chains do not recurse in drop.
        while self.pop_front().is_some() {}
    }

    /// Links a new node after `prev`, or at the head when `prev` is `None`.
    ///
    /// # Safety
    /// `prev` must be `None` or a node owned by this list.
    unsafe fn link_after(&mut self, prev: Link<T>, value: T) -> NonNull<Node<T>> {
        let next = match prev {
            None => self.head,
            Some(p) => (*p.as_ptr()).next,
        };
        let node = NonNull::from(Box::leak(Box::new(Node { value, next })));
        match prev {
            None => self.head = Some(node),
            Some(p) => (*p.as_ptr()).next = Some(node),
        }
        if next.is_none() {
            self.tail = Some(node);
        }
        self.len += 1;
        node
    }

    /// Unlinks the node after `prev` (the head when `prev` is `None`).
    ///
    /// # Safety
    /// `prev` must be `None` or a node owned by this list.
    unsafe fn unlink_after(&mut self, prev: Link<T>) -> Option<T> {
        let target = match prev {
            None => self.head,
            Some(p) => (*p.as_ptr()).next,
        }?;
        let Node { value, next } = *Box::from_raw(target.as_ptr());
        match prev {
            None => self.head = next,
            Some(p) => (*p.as_ptr()).next = next,
        }
        if next.is_none() {
            self.tail = prev;
        }
        self.len -= 1;
        Some(value)
    }
}

impl<T> Drop for ForwardList<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for ForwardList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for ForwardList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: fmt::Debug> fmt::Debug for ForwardList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for ForwardList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for ForwardList<T> {}

impl<T> Extend<T> for ForwardList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> FromIterator<T> for ForwardList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Container for ForwardList<T> {
    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        ForwardList::clear(self);
    }
}

/// Mutable position inside a [`ForwardList`].
///
/// Starts at the before-first sentinel. `insert_after` and `remove_after`
/// act on the link following the current position in O(1).
pub struct CursorMut<'a, T> {
    list: &'a mut ForwardList<T>,
    current: Link<T>,
    index: Option<usize>,
}

impl<'a, T> CursorMut<'a, T> {
    /// Index of the current node; `None` at the sentinel.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_before_begin(&self) -> bool {
        self.current.is_none()
    }

    pub fn current(&mut self) -> Option<&mut T> {
        self.current.map(|n| unsafe { &mut (*n.as_ptr()).value })
    }

    pub fn peek_next(&self) -> Option<&T> {
        self.next_link().map(|n| unsafe { &(*n.as_ptr()).value })
    }

    pub fn peek_next_mut(&mut self) -> Option<&mut T> {
        self.next_link().map(|n| unsafe { &mut (*n.as_ptr()).value })
    }

    /// Steps to the following node. Returns `false`, leaving the cursor in
    /// place, when there is none.
    pub fn move_next(&mut self) -> bool {
        match self.next_link() {
            Some(next) => {
                self.current = Some(next);
                self.index = Some(self.index.map_or(0, |i| i + 1));
                true
            }
            None => false,
        }
    }

    pub fn insert_after(&mut self, value: T) {
        unsafe { self.list.link_after(self.current, value) };
    }

    /// Unlinks and returns the element after the cursor, if any.
    pub fn remove_after(&mut self) -> Option<T> {
        unsafe { self.list.unlink_after(self.current) }
    }

    fn next_link(&self) -> Link<T> {
        match self.current {
            None => self.list.head,
            Some(n) => unsafe { (*n.as_ptr()).next },
        }
    }
}

/// Borrowing iterator over a [`ForwardList`].
pub struct Iter<'a, T> {
    next: Link<T>,
    remaining: usize,
    _marker: PhantomData<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.next.map(|n| unsafe {
            let node = &*n.as_ptr();
            self.next = node.next;
            self.remaining -= 1;
            &node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            next: self.next,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

/// Mutable borrowing iterator over a [`ForwardList`].
pub struct IterMut<'a, T> {
    next: Link<T>,
    remaining: usize,
    _marker: PhantomData<&'a mut Node<T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        self.next.map(|n| unsafe {
            let node = &mut *n.as_ptr();
            self.next = node.next;
            self.remaining -= 1;
            &mut node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning iterator over a [`ForwardList`].
pub struct IntoIter<T> {
    list: ForwardList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len, Some(self.list.len))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for ForwardList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { list: self }
    }
}

impl<'a, T> IntoIterator for &'a ForwardList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut ForwardList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}
