/// Result of pushing onto a [`BoundedStack`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Push {
    Pushed,
    /// The stack was at capacity; the value was dropped.
    Full,
}

impl Push {
    pub fn is_full(self) -> bool {
        self == Push::Full
    }
}

/// Fixed-capacity LIFO stack.
///
/// Pushing onto a full stack leaves it untouched and reports [`Push::Full`];
/// nothing already stored is ever overwritten or evicted.
#[derive(Debug, Clone)]
pub struct BoundedStack<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> BoundedStack<T> {
    /// Create an empty stack holding at most `capacity` values.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Push `value` unless the stack is full.
    pub fn push(&mut self, value: T) -> Push {
        if self.is_full() {
            return Push::Full;
        }
        self.items.push(value);
        Push::Pushed
    }

    /// Remove and return the most recently pushed value.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Most recently pushed value, if any.
    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    /// Drop every stored value.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
