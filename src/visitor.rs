/// Receives merge output element by element. Lets the eager merge functions
/// write into counters, vectors or preallocated slices alike.
pub trait Visitor<T> {
    fn visit(&mut self, value: T);
}

/// Counts merge output size without storing the result.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    count: usize,
}

impl<T> Visitor<T> for Counter {
    fn visit(&mut self, _value: T) {
        self.count += 1;
    }
}

impl Counter {
    pub fn new() -> Self {
        Self { count: 0 }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// Stores merge output in a vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VecWriter<T> {
    items: Vec<T>,
}

impl<T> VecWriter<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
        }
    }

    pub fn with_capacity(cardinality: usize) -> Self {
        Self {
            items: Vec::with_capacity(cardinality),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> AsRef<[T]> for VecWriter<T> {
    fn as_ref(&self) -> &[T] {
        &self.items
    }
}

impl<T> From<VecWriter<T>> for Vec<T> {
    fn from(value: VecWriter<T>) -> Self {
        value.items
    }
}

impl<T> Default for VecWriter<T> {
    fn default() -> Self {
        Self { items: Vec::default() }
    }
}

impl<T> Visitor<T> for VecWriter<T> {
    fn visit(&mut self, value: T) {
        self.items.push(value);
    }
}

/// Writes merge output to a provided slice.
///
/// Panics when more elements are visited than the slice can hold.
#[derive(Debug)]
pub struct SliceWriter<'a, T> {
    data: &'a mut [T],
    position: usize,
}

impl<'a, T> SliceWriter<'a, T> {
    /// Number of elements written so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The written prefix of the underlying slice.
    pub fn written(&self) -> &[T] {
        &self.data[..self.position]
    }
}

impl<'a, T> From<&'a mut [T]> for SliceWriter<'a, T> {
    fn from(data: &'a mut [T]) -> Self {
        Self {
            data,
            position: 0,
        }
    }
}

impl<'a, T> Visitor<T> for SliceWriter<'a, T> {
    fn visit(&mut self, value: T) {
        assert!(
            self.position < self.data.len(),
            "SliceWriter overflow: capacity is {}", self.data.len());
        self.data[self.position] = value;
        self.position += 1;
    }
}
