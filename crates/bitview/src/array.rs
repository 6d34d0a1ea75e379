//! Owned, row-major arrays of materialized values.

use crate::shape::{Shape, Strides};

/// Values decoded from a view, stored row-major with the view's (outer) shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Array<T> {
    shape: Shape,
    data: Vec<T>,
}

impl<T> Array<T> {
    pub(crate) fn from_parts(shape: Shape, data: Vec<T>) -> Self {
        debug_assert_eq!(shape.numel(), data.len());
        Self { shape, data }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Values in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Element at a multi-dimensional index, or `None` if out of range.
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.shape.rank() {
            return None;
        }

        let strides = Strides::row_major(&self.shape);
        let mut flat = 0;
        for ((&i, &dim), &stride) in index.iter().zip(self.shape.iter()).zip(strides.iter()) {
            if i >= dim {
                return None;
            }
            flat += i * stride;
        }

        self.data.get(flat)
    }
}
