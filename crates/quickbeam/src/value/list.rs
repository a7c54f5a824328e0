//! Ordered sequences of values

use super::buffer::Buffer;
use super::Value;

/// An ordered sequence of [`Value`]s with owned-or-shared storage.
#[derive(Clone)]
pub struct List {
    items: Buffer<Value>,
}

impl List {
    /// Create an owned list.
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items: Buffer::Owned(items),
        }
    }

    /// An empty owned list
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Whether this list is a reference view
    pub fn is_ref(&self) -> bool {
        self.items.is_ref()
    }

    /// Number of top-level elements
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list has no elements
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The elements
    pub fn as_slice(&self) -> &[Value] {
        self.items.as_slice()
    }

    /// Iterate over the elements
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.as_slice().iter()
    }

    /// A reference view of the same sequence.
    pub fn share(&self) -> Self {
        Self {
            items: self.items.share(),
        }
    }

    /// Give up exclusive ownership without copying.
    pub fn into_shared(self) -> Self {
        Self {
            items: self.items.into_shared(),
        }
    }

    /// Take the elements out: moves owned storage, clones a shared view.
    pub fn into_vec(self) -> Vec<Value> {
        self.items.into_vec()
    }

    /// Append one value.
    ///
    /// A `List` argument is spliced in one level deep; nested lists inside it
    /// stay nested. Any other value is pushed as a single element. Owned
    /// lists grow in place; a shared list is cloned first so other views are
    /// unaffected.
    pub fn append(self, value: Value) -> List {
        let mut items = self.items.into_vec();
        match value {
            Value::List(other) => match other.items {
                Buffer::Owned(mut tail) => items.append(&mut tail),
                Buffer::Shared(tail) => items.extend(tail.iter().map(Value::share)),
            },
            other => items.push(other),
        }
        List::new(items)
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl From<Vec<Value>> for List {
    fn from(items: Vec<Value>) -> Self {
        List::new(items)
    }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        List::new(iter.into_iter().collect())
    }
}
