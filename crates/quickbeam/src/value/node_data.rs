//! Dense rank-0..2 numeric arrays

use std::fmt;

use super::buffer::Buffer;
use crate::counters;

/// Element types an array can hold.
pub trait Element: Copy + PartialEq + PartialOrd + fmt::Debug + Default + Send + Sync + 'static {
    /// Whether buffers of this element type feed the copy/move counters
    const TRACKED: bool = false;

    /// Widen to `f64`
    fn to_f64(self) -> f64;

    /// Addition that reports overflow as `None`. Floats never overflow.
    fn checked_add(self, other: Self) -> Option<Self>;
}

impl Element for f64 {
    const TRACKED: bool = true;

    fn to_f64(self) -> f64 {
        self
    }

    fn checked_add(self, other: Self) -> Option<Self> {
        Some(self + other)
    }
}

impl Element for i64 {
    fn to_f64(self) -> f64 {
        self as f64
    }

    fn checked_add(self, other: Self) -> Option<Self> {
        i64::checked_add(self, other)
    }
}

impl Element for u8 {
    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn checked_add(self, other: Self) -> Option<Self> {
        u8::checked_add(self, other)
    }
}

/// Dimensions of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Rank 0
    Scalar,
    /// Rank 1 with the given length
    Vector(usize),
    /// Rank 2, row-major
    Matrix {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },
}

impl Shape {
    /// Number of dimensions (0, 1 or 2)
    pub fn rank(&self) -> usize {
        match self {
            Shape::Scalar => 0,
            Shape::Vector(_) => 1,
            Shape::Matrix { .. } => 2,
        }
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        match self {
            Shape::Scalar => 1,
            Shape::Vector(n) => *n,
            Shape::Matrix { rows, cols } => rows * cols,
        }
    }

    /// Whether the shape holds no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Scalar => write!(f, "()"),
            Shape::Vector(n) => write!(f, "({},)", n),
            Shape::Matrix { rows, cols } => write!(f, "({}, {})", rows, cols),
        }
    }
}

fn track<T: Element>(record: fn()) {
    if T::TRACKED {
        record();
    }
}

/// A rank 0, 1 or 2 array of `T`, owning its buffer or viewing a shared one.
pub struct NodeData<T> {
    shape: Shape,
    data: Buffer<T>,
}

impl<T: Element> NodeData<T> {
    /// A rank-0 array.
    pub fn scalar(value: T) -> Self {
        Self {
            shape: Shape::Scalar,
            data: Buffer::Owned(vec![value]),
        }
    }

    /// A rank-1 array.
    pub fn vector(values: Vec<T>) -> Self {
        Self {
            shape: Shape::Vector(values.len()),
            data: Buffer::Owned(values),
        }
    }

    /// A rank-2 array from row-major elements.
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != rows * cols`.
    pub fn matrix(rows: usize, cols: usize, values: Vec<T>) -> Self {
        assert_eq!(
            values.len(),
            rows * cols,
            "matrix of {}x{} needs {} elements",
            rows,
            cols,
            rows * cols
        );
        Self {
            shape: Shape::Matrix { rows, cols },
            data: Buffer::Owned(values),
        }
    }

    /// Wrap an owned buffer with a shape. The caller guarantees the length
    /// matches.
    pub(crate) fn from_vec(shape: Shape, values: Vec<T>) -> Self {
        debug_assert_eq!(shape.len(), values.len());
        Self {
            shape,
            data: Buffer::Owned(values),
        }
    }

    /// Dimensions
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Number of dimensions
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Number of rows: 1 for scalars and vectors
    pub fn rows(&self) -> usize {
        match self.shape {
            Shape::Matrix { rows, .. } => rows,
            _ => 1,
        }
    }

    /// Number of columns: vector length, 1 for scalars
    pub fn cols(&self) -> usize {
        match self.shape {
            Shape::Scalar => 1,
            Shape::Vector(n) => n,
            Shape::Matrix { cols, .. } => cols,
        }
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.shape.len()
    }

    /// Whether there are no elements
    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    /// Whether this array is a reference view that must not be mutated
    pub fn is_ref(&self) -> bool {
        self.data.is_ref()
    }

    /// Row-major elements
    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice()
    }

    /// Mutable row-major elements, only for owned arrays.
    pub fn as_mut_slice(&mut self) -> Option<&mut [T]> {
        self.data.owned_mut().map(Vec::as_mut_slice)
    }

    /// The single element of a rank-0 array.
    pub fn scalar_value(&self) -> Option<T> {
        match self.shape {
            Shape::Scalar => self.as_slice().first().copied(),
            _ => None,
        }
    }

    /// Row `i` of a matrix (or the whole vector for `i == 0`).
    pub fn row(&self, i: usize) -> &[T] {
        let cols = self.cols();
        &self.as_slice()[i * cols..(i + 1) * cols]
    }

    /// Element at `(row, col)`; vectors are one row, scalars one element.
    pub fn at(&self, row: usize, col: usize) -> T {
        self.as_slice()[row * self.cols() + col]
    }

    /// A reference view of the same elements.
    ///
    /// Shared arrays hand out another reference; owned arrays are copied
    /// since the owner keeps the right to mutate.
    pub fn share(&self) -> Self {
        if !self.is_ref() {
            track::<T>(counters::record_copy_construction);
        }
        Self {
            shape: self.shape,
            data: self.data.share(),
        }
    }

    /// Give up exclusive ownership: the buffer becomes a shared view without
    /// being copied.
    pub fn into_shared(self) -> Self {
        if !self.is_ref() {
            track::<T>(counters::record_move_construction);
        }
        Self {
            shape: self.shape,
            data: self.data.into_shared(),
        }
    }

    /// An owned array: moves owned storage, copies a shared view.
    pub fn into_owned(self) -> Self {
        if self.is_ref() {
            track::<T>(counters::record_copy_construction);
            Self {
                shape: self.shape,
                data: Buffer::Owned(self.data.into_vec()),
            }
        } else {
            self
        }
    }

    /// Take the buffer out together with its shape.
    ///
    /// Owned storage is moved; a shared view is copied.
    pub fn into_parts(self) -> (Shape, Vec<T>) {
        if self.is_ref() {
            track::<T>(counters::record_copy_construction);
        } else {
            track::<T>(counters::record_move_construction);
        }
        (self.shape, self.data.into_vec())
    }

    /// Replace this array with `other`, returning the previous contents.
    pub fn replace(&mut self, other: NodeData<T>) -> NodeData<T> {
        track::<T>(counters::record_move_assignment);
        std::mem::replace(self, other)
    }

    /// Elementwise conversion into a new owned array.
    pub fn map<U: Element>(&self, f: impl Fn(T) -> U) -> NodeData<U> {
        NodeData::from_vec(self.shape, self.as_slice().iter().map(|&x| f(x)).collect())
    }

    /// Widen every element to `f64`.
    pub fn to_f64(&self) -> NodeData<f64> {
        self.map(Element::to_f64)
    }

    /// Whether two arrays view the same shared allocation
    pub fn shares_storage_with(&self, other: &NodeData<T>) -> bool {
        self.data.shares_storage_with(&other.data)
    }
}

impl<T: Element> Clone for NodeData<T> {
    fn clone(&self) -> Self {
        if !self.is_ref() {
            track::<T>(counters::record_copy_construction);
        }
        Self {
            shape: self.shape,
            data: self.data.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        track::<T>(counters::record_copy_assignment);
        match self.data.owned_mut() {
            Some(dest) if !source.is_ref() => {
                dest.clear();
                dest.extend_from_slice(source.as_slice());
                self.shape = source.shape;
            }
            _ => {
                self.shape = source.shape;
                self.data = source.data.clone();
            }
        }
    }
}

impl<T: Element> PartialEq for NodeData<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.as_slice() == other.as_slice()
    }
}

impl<T: Element> From<T> for NodeData<T> {
    fn from(value: T) -> Self {
        NodeData::scalar(value)
    }
}

impl<T: Element> From<Vec<T>> for NodeData<T> {
    fn from(values: Vec<T>) -> Self {
        NodeData::vector(values)
    }
}

impl<T: Element + fmt::Display> fmt::Display for NodeData<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_row<T: fmt::Display>(f: &mut fmt::Formatter<'_>, row: &[T]) -> fmt::Result {
            write!(f, "[")?;
            for (i, x) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", x)?;
            }
            write!(f, "]")
        }

        match self.shape {
            Shape::Scalar => write!(f, "{}", self.as_slice()[0]),
            Shape::Vector(_) => write_row(f, self.as_slice()),
            Shape::Matrix { rows, .. } => {
                write!(f, "[")?;
                for i in 0..rows {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_row(f, self.row(i))?;
                }
                write!(f, "]")
            }
        }
    }
}

impl<T: Element + fmt::Display> fmt::Debug for NodeData<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ownership = if self.is_ref() { "ref" } else { "owned" };
        write!(f, "NodeData<{}>{}{}", ownership, self.shape, self)
    }
}
