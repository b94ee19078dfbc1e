// src/buffer/chain.rs

//! # Chain List
//!
//! An unbounded, doubly linked sequence for places where capacity cannot be
//! fixed ahead of time, such as the guidance path. Nodes live in an arena of
//! indexed slots owned by the list; links are slot indices rather than
//! pointers, so removing a node re-links its neighbours in the same step and
//! can never leave a dangling reference.
//!
//! [`ChainList::append`] returns a [`Handle`]. A handle stays valid until its
//! node is removed or the list is cleared; after that it simply resolves to
//! `None`, even if the slot has been reused.

use alloc::vec::Vec;
use core::fmt;

/// Stable reference to one node of a [`ChainList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: usize,
    generation: u32,
}

#[derive(Clone)]
struct Node<T> {
    item: T,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Clone)]
enum Slot<T> {
    Occupied { generation: u32, node: Node<T> },
    Vacant { generation: u32, next_free: Option<usize> },
}

/// Arena-backed doubly linked list.
pub struct ChainList<T> {
    slots: Vec<Slot<T>>,
    head: Option<usize>,
    tail: Option<usize>,
    free: Option<usize>,
    len: usize,
}

impl<T> ChainList<T> {
    /// Creates an empty list. Does not allocate.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            head: None,
            tail: None,
            free: None,
            len: 0,
        }
    }

    /// Adds `item` at the back and returns a handle to its node.
    pub fn append(&mut self, item: T) -> Handle {
        let node = Node {
            item,
            prev: self.tail,
            next: None,
        };
        let handle = self.allocate(node);
        match self.tail {
            Some(tail) => {
                if let Some(tail_node) = self.node_mut(tail) {
                    tail_node.next = Some(handle.index);
                }
            }
            None => self.head = Some(handle.index),
        }
        self.tail = Some(handle.index);
        self.len += 1;
        handle
    }

    /// Removes the first item for which `matches` returns `true`.
    ///
    /// Returns `false`, leaving the list untouched, if nothing matched.
    pub fn remove_first_by<F>(&mut self, mut matches: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        let found = self.index_iter().find(|&i| {
            self.node(i)
                .map(|node| matches(&node.item))
                .unwrap_or(false)
        });
        match found {
            Some(index) => self.unlink(index).is_some(),
            None => false,
        }
    }

    /// Removes and returns the item at the front.
    pub fn remove_front(&mut self) -> Option<T> {
        let head = self.head?;
        self.unlink(head)
    }

    /// Removes and returns the item at the back.
    pub fn remove_back(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.unlink(tail)
    }

    /// Removes the node behind `handle`. Returns `None` for a stale handle.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        if !self.contains_handle(handle) {
            return None;
        }
        self.unlink(handle.index)
    }

    /// Drops every item and invalidates every outstanding handle.
    pub fn clear(&mut self) {
        let mut next_free = None;
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            let generation = match slot {
                Slot::Occupied { generation, .. } => generation.wrapping_add(1),
                Slot::Vacant { generation, .. } => *generation,
            };
            *slot = Slot::Vacant {
                generation,
                next_free,
            };
            next_free = Some(index);
        }
        self.free = next_free;
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Reference to the item at `position` (0 is the front).
    pub fn get(&self, position: usize) -> Option<&T> {
        let index = self.index_iter().nth(position)?;
        self.node(index).map(|node| &node.item)
    }

    /// Mutable reference to the item at `position`.
    pub fn get_mut(&mut self, position: usize) -> Option<&mut T> {
        let index = self.index_iter().nth(position)?;
        self.node_mut(index).map(|node| &mut node.item)
    }

    /// Reference to the item behind `handle`, if it is still in the list.
    pub fn get_by_handle(&self, handle: Handle) -> Option<&T> {
        match self.slots.get(handle.index)? {
            Slot::Occupied { generation, node } if *generation == handle.generation => {
                Some(&node.item)
            }
            _ => None,
        }
    }

    /// Returns `true` if `handle` still refers to a node of this list.
    pub fn contains_handle(&self, handle: Handle) -> bool {
        self.get_by_handle(handle).is_some()
    }

    /// The front item.
    pub fn front(&self) -> Option<&T> {
        self.node(self.head?).map(|node| &node.item)
    }

    /// The back item.
    pub fn back(&self) -> Option<&T> {
        self.node(self.tail?).map(|node| &node.item)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list holds no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn index_iter(&self) -> impl Iterator<Item = usize> + '_ {
        let mut cursor = self.head;
        core::iter::from_fn(move || {
            let index = cursor?;
            cursor = self.node(index).and_then(|node| node.next);
            Some(index)
        })
    }

    fn node(&self, index: usize) -> Option<&Node<T>> {
        match self.slots.get(index)? {
            Slot::Occupied { node, .. } => Some(node),
            Slot::Vacant { .. } => None,
        }
    }

    fn node_mut(&mut self, index: usize) -> Option<&mut Node<T>> {
        match self.slots.get_mut(index)? {
            Slot::Occupied { node, .. } => Some(node),
            Slot::Vacant { .. } => None,
        }
    }

    fn allocate(&mut self, node: Node<T>) -> Handle {
        if let Some(index) = self.free {
            if let Some(Slot::Vacant {
                generation,
                next_free,
            }) = self.slots.get(index)
            {
                let generation = *generation;
                self.free = *next_free;
                self.slots[index] = Slot::Occupied { generation, node };
                return Handle { index, generation };
            }
        }
        let index = self.slots.len();
        self.slots.push(Slot::Occupied {
            generation: 0,
            node,
        });
        Handle {
            index,
            generation: 0,
        }
    }

    /// Detaches the node at `index`, re-linking its neighbours, and returns
    /// its item. The slot joins the free list with a bumped generation.
    fn unlink(&mut self, index: usize) -> Option<T> {
        let generation = match self.slots.get(index)? {
            Slot::Occupied { generation, .. } => generation.wrapping_add(1),
            Slot::Vacant { .. } => return None,
        };
        let vacant = Slot::Vacant {
            generation,
            next_free: self.free,
        };
        let node = match core::mem::replace(&mut self.slots[index], vacant) {
            Slot::Occupied { node, .. } => node,
            Slot::Vacant { .. } => return None,
        };
        self.free = Some(index);

        match node.prev {
            Some(prev) => {
                if let Some(prev_node) = self.node_mut(prev) {
                    prev_node.next = node.next;
                }
            }
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => {
                if let Some(next_node) = self.node_mut(next) {
                    next_node.prev = node.prev;
                }
            }
            None => self.tail = node.prev,
        }
        self.len -= 1;
        Some(node.item)
    }
}

impl<T: PartialEq> ChainList<T> {
    /// Removes the first item equal to `item`.
    pub fn remove_item(&mut self, item: &T) -> bool {
        self.remove_first_by(|candidate| candidate == item)
    }

    /// Position of the first item equal to `item`.
    pub fn search(&self, item: &T) -> Option<usize> {
        self.iter().position(|candidate| candidate == item)
    }
}

impl<T> Default for ChainList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloning builds new nodes holding copies of the values, front to back.
impl<T: Clone> Clone for ChainList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: fmt::Debug> fmt::Debug for ChainList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for ChainList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for ChainList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.append(item);
        }
    }
}

/// Front-to-back iterator over a [`ChainList`].
pub struct Iter<'a, T> {
    list: &'a ChainList<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.list.node(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.item)
    }
}

impl<'a, T> IntoIterator for &'a ChainList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
