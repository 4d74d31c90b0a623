//! Shape-checked elementwise operations over strided views.
//!
//! The public functions validate shapes once and then call the unchecked
//! kernels, which the multiplication algorithms use directly on shapes they
//! produced themselves.

use crate::error::{GemmError, Result};
use crate::view::{MatrixView, MatrixViewMut};

fn same_shape(expected: (usize, usize), got: (usize, usize)) -> Result<()> {
    if expected != got {
        return Err(GemmError::ShapeMismatch { expected, got });
    }
    Ok(())
}

/// `c = a + b`.
pub fn add(a: &MatrixView<'_>, b: &MatrixView<'_>, c: &mut MatrixViewMut<'_>) -> Result<()> {
    same_shape(a.shape(), b.shape())?;
    same_shape(a.shape(), c.shape())?;
    add_into(a, b, c);
    Ok(())
}

/// `c = a - b`.
pub fn sub(a: &MatrixView<'_>, b: &MatrixView<'_>, c: &mut MatrixViewMut<'_>) -> Result<()> {
    same_shape(a.shape(), b.shape())?;
    same_shape(a.shape(), c.shape())?;
    sub_into(a, b, c);
    Ok(())
}

/// `c += a`, the in-place form of `add` where the output aliases an input.
pub fn add_assign(c: &mut MatrixViewMut<'_>, a: &MatrixView<'_>) -> Result<()> {
    same_shape(c.shape(), a.shape())?;
    add_assign_into(c, a);
    Ok(())
}

/// `c -= a`.
pub fn sub_assign(c: &mut MatrixViewMut<'_>, a: &MatrixView<'_>) -> Result<()> {
    same_shape(c.shape(), a.shape())?;
    sub_assign_into(c, a);
    Ok(())
}

/// Copy every addressed element of `src` into `dst`.
pub fn copy(src: &MatrixView<'_>, dst: &mut MatrixViewMut<'_>) -> Result<()> {
    same_shape(src.shape(), dst.shape())?;
    copy_into(src, dst);
    Ok(())
}

/// Overwrite all `rows * cols` addressed elements, leaving stride padding alone.
pub fn fill(dst: &mut MatrixViewMut<'_>, value: f32) {
    for i in 0..dst.rows() {
        dst.row_mut(i).fill(value);
    }
}

pub(crate) fn add_into(a: &MatrixView<'_>, b: &MatrixView<'_>, c: &mut MatrixViewMut<'_>) {
    debug_assert_eq!(a.shape(), b.shape());
    debug_assert_eq!(a.shape(), c.shape());
    for i in 0..a.rows() {
        let (ra, rb) = (a.row(i), b.row(i));
        for (dst, (x, y)) in c.row_mut(i).iter_mut().zip(ra.iter().zip(rb)) {
            *dst = x + y;
        }
    }
}

pub(crate) fn sub_into(a: &MatrixView<'_>, b: &MatrixView<'_>, c: &mut MatrixViewMut<'_>) {
    debug_assert_eq!(a.shape(), b.shape());
    debug_assert_eq!(a.shape(), c.shape());
    for i in 0..a.rows() {
        let (ra, rb) = (a.row(i), b.row(i));
        for (dst, (x, y)) in c.row_mut(i).iter_mut().zip(ra.iter().zip(rb)) {
            *dst = x - y;
        }
    }
}

pub(crate) fn add_assign_into(c: &mut MatrixViewMut<'_>, a: &MatrixView<'_>) {
    debug_assert_eq!(c.shape(), a.shape());
    for i in 0..a.rows() {
        for (dst, x) in c.row_mut(i).iter_mut().zip(a.row(i)) {
            *dst += x;
        }
    }
}

pub(crate) fn sub_assign_into(c: &mut MatrixViewMut<'_>, a: &MatrixView<'_>) {
    debug_assert_eq!(c.shape(), a.shape());
    for i in 0..a.rows() {
        for (dst, x) in c.row_mut(i).iter_mut().zip(a.row(i)) {
            *dst -= x;
        }
    }
}

pub(crate) fn copy_into(src: &MatrixView<'_>, dst: &mut MatrixViewMut<'_>) {
    debug_assert_eq!(src.shape(), dst.shape());
    for i in 0..src.rows() {
        dst.row_mut(i).copy_from_slice(src.row(i));
    }
}
