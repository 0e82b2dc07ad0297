//! Fixed-Capacity Circular Buffer for Telemetry Windows
//!
//! ## Overview
//!
//! This module provides the ring buffer behind the sliding-window feature
//! extractor. Capacity is chosen at construction (the window size comes from
//! configuration, not from the type), storage is allocated exactly once, and
//! every later operation is allocation-free.
//!
//! ## Design Rationale
//!
//! ### Why a Circular Buffer?
//!
//! Feature extraction always looks at the most recent `N` telemetry points:
//! - Rate of change needs the oldest and newest point in the window
//! - Mean and variance need every point in the window, in any order
//! - Eviction must be strict: the window never holds more than `N` points
//!
//! A ring buffer gives:
//! - O(1) insertion (overwrites oldest when full)
//! - O(1) access to the oldest and the most recent point
//! - O(n) iteration in arrival order
//!
//! Eviction is explicit in `push` rather than left to an auto-evicting
//! collection, so the buffered sequence is fully determined by the sequence
//! of pushes.
//!
//! ### Memory Layout
//!
//! ```text
//! CircularBuffer with capacity 5, after 7 pushes (values 0..=6):
//! ┌─────┬─────┬─────┬─────┬─────┐
//! │  5  │  6  │  2  │  3  │  4  │  ← physical slots
//! └─────┴─────┴─────┴─────┴─────┘
//!              ↑
//!              └── write_pos = 2 (also the oldest element when full)
//!
//! Logical view (oldest → newest): [2, 3, 4, 5, 6]
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use habitat_core::buffer::CircularBuffer;
//!
//! let mut window: CircularBuffer<f64> = CircularBuffer::new(3);
//! for value in [1.0, 2.0, 3.0, 4.0] {
//!     window.push(value);
//! }
//!
//! let values: Vec<f64> = window.iter().copied().collect();
//! assert_eq!(values, vec![2.0, 3.0, 4.0]);
//! assert_eq!(window.first(), Some(&2.0));
//! assert_eq!(window.last(), Some(&4.0));
//! ```

/// Fixed-capacity circular buffer for time-ordered values
///
/// ## Internal Invariants
///
/// - `write_pos < capacity` whenever `capacity > 0`
/// - `len <= capacity`
/// - Logical index 0 is the oldest buffered value
///
/// ## Thread Safety
///
/// Not synchronized. Each virtual node owns its buffer exclusively.
#[derive(Debug, Clone)]
pub struct CircularBuffer<T: Copy> {
    /// Storage slots; `None` until first written
    data: Box<[Option<T>]>,

    /// Index where the next write will occur
    write_pos: usize,

    /// Current number of valid values
    len: usize,
}

impl<T: Copy> CircularBuffer<T> {
    /// Creates an empty buffer holding at most `capacity` values
    ///
    /// A zero capacity yields a buffer that silently discards every push.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![None; capacity].into_boxed_slice(),
            write_pos: 0,
            len: 0,
        }
    }

    /// Adds a value, evicting the oldest one first when the buffer is full
    pub fn push(&mut self, value: T) {
        let capacity = self.capacity();
        if capacity == 0 {
            return;
        }

        self.data[self.write_pos] = Some(value);
        self.write_pos = (self.write_pos + 1) % capacity;

        if self.len < capacity {
            self.len += 1;
        }
    }

    /// Maximum number of values held
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of values currently held
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Oldest buffered value
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Most recent value
    pub fn last(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.get(self.len - 1)
    }

    /// Gets a value by logical index (0 = oldest, len-1 = newest)
    ///
    /// When the buffer has not wrapped yet, logical and physical indices
    /// match. Once full, the oldest value sits at `write_pos`:
    ///
    /// ```text
    /// Physical array:  [D, E, A, B, C]  (write_pos = 2)
    /// Logical view:    [A, B, C, D, E]
    ///
    /// logical[i] = physical[(write_pos + i) % capacity]
    /// ```
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }

        let actual_index = if self.is_full() {
            (self.write_pos + index) % self.capacity()
        } else {
            index
        };

        self.data[actual_index].as_ref()
    }

    /// Iterate over values from oldest to newest
    pub fn iter(&self) -> CircularBufferIter<'_, T> {
        CircularBufferIter {
            buffer: self,
            index: 0,
        }
    }

    /// Drop every buffered value, keeping the allocation
    pub fn clear(&mut self) {
        self.data.iter_mut().for_each(|slot| *slot = None);
        self.write_pos = 0;
        self.len = 0;
    }
}

/// Iterator over buffer contents in arrival order
pub struct CircularBufferIter<'a, T: Copy> {
    buffer: &'a CircularBuffer<T>,
    index: usize,
}

impl<'a, T: Copy> Iterator for CircularBufferIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.buffer.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<'a, T: Copy> ExactSizeIterator for CircularBufferIter<'a, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer() {
        let buffer: CircularBuffer<f64> = CircularBuffer::new(5);
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.capacity(), 5);
        assert!(buffer.first().is_none());
        assert!(buffer.last().is_none());
    }

    #[test]
    fn push_and_retrieve() {
        let mut buffer = CircularBuffer::new(5);
        buffer.push(25.0);

        assert_eq!(buffer.len(), 1);
        assert!(!buffer.is_empty());
        assert_eq!(buffer.first(), Some(&25.0));
        assert_eq!(buffer.last(), Some(&25.0));
    }

    #[test]
    fn circular_overwrite() {
        let mut buffer = CircularBuffer::new(3);
        for i in 0..5 {
            buffer.push(i);
        }

        assert_eq!(buffer.len(), 3);
        assert!(buffer.is_full());

        // 0 and 1 were evicted
        let values: Vec<i32> = buffer.iter().copied().collect();
        assert_eq!(values, vec![2, 3, 4]);
        assert_eq!(buffer.first(), Some(&2));
        assert_eq!(buffer.last(), Some(&4));
    }

    #[test]
    fn logical_indexing_after_wrap() {
        let mut buffer = CircularBuffer::new(4);
        for i in 0..6 {
            buffer.push(i);
        }

        assert_eq!(buffer.get(0), Some(&2));
        assert_eq!(buffer.get(3), Some(&5));
        assert_eq!(buffer.get(4), None);
        assert_eq!(buffer.iter().len(), 4);
    }

    #[test]
    fn clear_resets_state() {
        let mut buffer = CircularBuffer::new(2);
        buffer.push(1);
        buffer.push(2);
        buffer.push(3);
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 2);

        buffer.push(7);
        let values: Vec<i32> = buffer.iter().copied().collect();
        assert_eq!(values, vec![7]);
    }

    #[test]
    fn zero_capacity_discards() {
        let mut buffer = CircularBuffer::new(0);
        buffer.push(1.0);
        assert!(buffer.is_empty());
        assert!(buffer.is_full());
        assert!(buffer.last().is_none());
    }
}
