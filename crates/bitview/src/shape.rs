//! Dimension sizes and bit strides of a view.

use smallvec::SmallVec;

/// Inline storage for per-dimension metadata; most record views have at most four axes.
pub type RVec<T> = SmallVec<[T; 4]>;

/// Element counts per dimension, outer to inner.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape(RVec<usize>);

impl Shape {
    pub fn new(dims: RVec<usize>) -> Self {
        Self(dims)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn numel(&self) -> usize {
        self.0.iter().product()
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.0.iter()
    }

    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// The shape without its innermost dimension.
    pub fn outer(&self) -> Shape {
        match self.0.split_last() {
            Some((_, outer)) => Shape(outer.into()),
            None => Shape::default(),
        }
    }

    pub fn push(&mut self, dim: usize) {
        self.0.push(dim);
    }
}

impl std::fmt::Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut shape = format!("[{}", self.0.first().unwrap_or(&0));
        for dim in self.0.iter().skip(1) {
            shape.push_str(&format!("x{}", dim));
        }
        write!(f, "{}]", shape)
    }
}

impl std::ops::Index<usize> for Shape {
    type Output = usize;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self(dims.into())
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self(dims.into())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Self(dims.as_slice().into())
    }
}

/// Bit displacement per unit step along each dimension.
///
/// Strides are unsigned: a zero stride broadcasts, negative strides are not representable.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Strides(RVec<usize>);

impl Strides {
    pub fn new(strides: RVec<usize>) -> Self {
        Self(strides)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.0.iter()
    }

    pub fn push(&mut self, stride: usize) {
        self.0.push(stride);
    }

    /// Row-major strides for `shape`: the innermost stride is 1 and each outer stride is the
    /// product of the sizes to its right.
    pub fn row_major(shape: &Shape) -> Self {
        let mut strides: RVec<usize> = SmallVec::with_capacity(shape.rank());
        let mut stride = 1;
        for size in shape.iter().rev() {
            strides.push(stride);
            stride *= *size;
        }
        strides.reverse();
        Self(strides)
    }
}

impl std::fmt::Debug for Strides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut strides = format!("[{}", self.0.first().unwrap_or(&0));
        for stride in self.0.iter().skip(1) {
            strides.push_str(&format!("x{}", stride));
        }
        write!(f, "{}]", strides)
    }
}

impl std::ops::Index<usize> for Strides {
    type Output = usize;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl From<Vec<usize>> for Strides {
    fn from(strides: Vec<usize>) -> Self {
        Self(strides.into())
    }
}

impl From<&[usize]> for Strides {
    fn from(strides: &[usize]) -> Self {
        Self(strides.into())
    }
}

impl<const N: usize> From<[usize; N]> for Strides {
    fn from(strides: [usize; N]) -> Self {
        Self(strides.as_slice().into())
    }
}
