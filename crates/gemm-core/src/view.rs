use crate::error::{GemmError, Result};

/// One of the four half-size blocks of a matrix with even extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// Row and column offset of this quadrant for the given half extents.
    fn offset(self, half_rows: usize, half_cols: usize) -> (usize, usize) {
        match self {
            Quadrant::TopLeft => (0, 0),
            Quadrant::TopRight => (0, half_cols),
            Quadrant::BottomLeft => (half_rows, 0),
            Quadrant::BottomRight => (half_rows, half_cols),
        }
    }
}

/// Number of buffer elements a `rows x cols` window with `stride` spans.
pub(crate) fn span(rows: usize, cols: usize, stride: usize) -> usize {
    if rows == 0 || cols == 0 {
        0
    } else {
        (rows - 1) * stride + cols
    }
}

fn check_layout(len: usize, rows: usize, cols: usize, stride: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(GemmError::InvalidDimension {
            rows: rows as i64,
            cols: cols as i64,
        });
    }
    if stride < cols {
        return Err(GemmError::InvalidStride { stride, cols });
    }
    let needed = span(rows, cols, stride);
    if len < needed {
        return Err(GemmError::BufferTooSmall { needed, got: len });
    }
    Ok(())
}

/// A read-only strided window over a flat row-major `f32` buffer.
///
/// Element `(i, j)` lives at `data[i * stride + j]`. The view never owns its
/// storage; quadrants share the parent's stride.
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a> {
    data: &'a [f32],
    rows: usize,
    cols: usize,
    stride: usize,
}

impl<'a> MatrixView<'a> {
    /// Create a view, checking extents, stride and buffer length.
    pub fn new(data: &'a [f32], rows: usize, cols: usize, stride: usize) -> Result<Self> {
        check_layout(data.len(), rows, cols, stride)?;
        Ok(Self::new_unchecked(data, rows, cols, stride))
    }

    /// Create a view over a densely packed buffer (`stride == cols`).
    pub fn dense(data: &'a [f32], rows: usize, cols: usize) -> Result<Self> {
        Self::new(data, rows, cols, cols)
    }

    pub(crate) fn new_unchecked(data: &'a [f32], rows: usize, cols: usize, stride: usize) -> Self {
        debug_assert!(stride >= cols);
        debug_assert!(data.len() >= span(rows, cols, stride));
        MatrixView {
            data,
            rows,
            cols,
            stride,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Element `(i, j)`.
    ///
    /// # Panics
    /// Panics if `i >= rows()` or `j >= cols()`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        assert!(i < self.rows && j < self.cols, "index ({i}, {j}) out of bounds");
        self.data[i * self.stride + j]
    }

    /// Row `i` as a contiguous slice of `cols()` elements.
    #[inline]
    pub fn row(&self, i: usize) -> &'a [f32] {
        let start = i * self.stride;
        &self.data[start..start + self.cols]
    }

    /// A `rows x cols` block starting at `(row, col)`, sharing this view's stride.
    ///
    /// # Panics
    /// Panics if the block does not fit inside this view.
    pub fn block(&self, row: usize, col: usize, rows: usize, cols: usize) -> MatrixView<'a> {
        assert!(
            row + rows <= self.rows && col + cols <= self.cols,
            "block [{row}+{rows}, {col}+{cols}] exceeds view {}x{}",
            self.rows,
            self.cols
        );
        let start = row * self.stride + col;
        let end = start + span(rows, cols, self.stride);
        MatrixView::new_unchecked(&self.data[start..end], rows, cols, self.stride)
    }

    /// One half-size quadrant of this view.
    ///
    /// # Panics
    /// Panics if either extent is odd; splitting is only defined for even shapes.
    pub fn quadrant(&self, q: Quadrant) -> MatrixView<'a> {
        assert!(
            self.rows % 2 == 0 && self.cols % 2 == 0,
            "cannot split odd shape {}x{}",
            self.rows,
            self.cols
        );
        let (hr, hc) = (self.rows / 2, self.cols / 2);
        let (r0, c0) = q.offset(hr, hc);
        self.block(r0, c0, hr, hc)
    }

    /// All four quadrants in `[11, 12, 21, 22]` order.
    pub fn split_quadrants(&self) -> [MatrixView<'a>; 4] {
        Quadrant::ALL.map(|q| self.quadrant(q))
    }

    /// Copy the addressed elements into a new dense row-major vector.
    pub fn to_vec(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.rows * self.cols);
        for i in 0..self.rows {
            out.extend_from_slice(self.row(i));
        }
        out
    }
}

/// A mutable strided window over a flat row-major `f32` buffer.
///
/// Quadrants are handed out one at a time by reborrowing, so at most one
/// mutable window into the parent is live at once.
#[derive(Debug)]
pub struct MatrixViewMut<'a> {
    data: &'a mut [f32],
    rows: usize,
    cols: usize,
    stride: usize,
}

impl<'a> MatrixViewMut<'a> {
    /// Create a mutable view, checking extents, stride and buffer length.
    pub fn new(data: &'a mut [f32], rows: usize, cols: usize, stride: usize) -> Result<Self> {
        check_layout(data.len(), rows, cols, stride)?;
        Ok(Self::new_unchecked(data, rows, cols, stride))
    }

    /// Create a mutable view over a densely packed buffer (`stride == cols`).
    pub fn dense(data: &'a mut [f32], rows: usize, cols: usize) -> Result<Self> {
        Self::new(data, rows, cols, cols)
    }

    pub(crate) fn new_unchecked(
        data: &'a mut [f32],
        rows: usize,
        cols: usize,
        stride: usize,
    ) -> Self {
        debug_assert!(stride >= cols);
        debug_assert!(data.len() >= span(rows, cols, stride));
        MatrixViewMut {
            data,
            rows,
            cols,
            stride,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        assert!(i < self.rows && j < self.cols, "index ({i}, {j}) out of bounds");
        self.data[i * self.stride + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f32) {
        assert!(i < self.rows && j < self.cols, "index ({i}, {j}) out of bounds");
        self.data[i * self.stride + j] = value;
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        let start = i * self.stride;
        &self.data[start..start + self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f32] {
        let start = i * self.stride;
        &mut self.data[start..start + self.cols]
    }

    /// Read-only view of the same window.
    pub fn as_view(&self) -> MatrixView<'_> {
        MatrixView::new_unchecked(&*self.data, self.rows, self.cols, self.stride)
    }

    /// Mutable `rows x cols` block starting at `(row, col)`.
    ///
    /// # Panics
    /// Panics if the block does not fit inside this view.
    pub fn block_mut(
        &mut self,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    ) -> MatrixViewMut<'_> {
        assert!(
            row + rows <= self.rows && col + cols <= self.cols,
            "block [{row}+{rows}, {col}+{cols}] exceeds view {}x{}",
            self.rows,
            self.cols
        );
        let start = row * self.stride + col;
        let end = start + span(rows, cols, self.stride);
        MatrixViewMut::new_unchecked(&mut self.data[start..end], rows, cols, self.stride)
    }

    /// Mutable half-size quadrant of this view.
    ///
    /// # Panics
    /// Panics if either extent is odd.
    pub fn quadrant_mut(&mut self, q: Quadrant) -> MatrixViewMut<'_> {
        assert!(
            self.rows % 2 == 0 && self.cols % 2 == 0,
            "cannot split odd shape {}x{}",
            self.rows,
            self.cols
        );
        let (hr, hc) = (self.rows / 2, self.cols / 2);
        let (r0, c0) = q.offset(hr, hc);
        self.block_mut(r0, c0, hr, hc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(n: usize) -> Vec<f32> {
        (0..n).map(|i| i as f32).collect()
    }

    #[test]
    fn test_view_addressing_with_stride() {
        // 3x2 window inside a 3x4 parent
        let data = seq(12);
        let v = MatrixView::new(&data, 3, 2, 4).unwrap();
        assert_eq!(v.get(0, 0), 0.0);
        assert_eq!(v.get(1, 1), 5.0);
        assert_eq!(v.get(2, 0), 8.0);
        assert_eq!(v.row(2), &[8.0, 9.0]);
        assert_eq!(v.to_vec(), vec![0.0, 1.0, 4.0, 5.0, 8.0, 9.0]);
    }

    #[test]
    fn test_view_rejects_bad_layout() {
        let data = seq(6);
        assert_eq!(
            MatrixView::new(&data, 2, 3, 2).unwrap_err(),
            GemmError::InvalidStride { stride: 2, cols: 3 }
        );
        assert_eq!(
            MatrixView::new(&data, 3, 3, 3).unwrap_err(),
            GemmError::BufferTooSmall { needed: 9, got: 6 }
        );
        assert!(matches!(
            MatrixView::new(&data, 0, 3, 3),
            Err(GemmError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_trailing_row_needs_no_padding() {
        // last row only needs `cols` elements, not a full stride
        let data = seq(6);
        let v = MatrixView::new(&data, 2, 2, 4).unwrap();
        assert_eq!(v.to_vec(), vec![0.0, 1.0, 4.0, 5.0]);
    }

    #[test]
    fn test_quadrants() {
        let data = seq(16);
        let v = MatrixView::dense(&data, 4, 4).unwrap();
        let [q11, q12, q21, q22] = v.split_quadrants();
        assert_eq!(q11.to_vec(), vec![0.0, 1.0, 4.0, 5.0]);
        assert_eq!(q12.to_vec(), vec![2.0, 3.0, 6.0, 7.0]);
        assert_eq!(q21.to_vec(), vec![8.0, 9.0, 12.0, 13.0]);
        assert_eq!(q22.to_vec(), vec![10.0, 11.0, 14.0, 15.0]);
        assert_eq!(q22.stride(), 4);
    }

    #[test]
    fn test_nested_quadrant() {
        let data = seq(64);
        let v = MatrixView::dense(&data, 8, 8).unwrap();
        let inner = v.quadrant(Quadrant::BottomRight).quadrant(Quadrant::TopLeft);
        assert_eq!(inner.shape(), (2, 2));
        assert_eq!(inner.to_vec(), vec![36.0, 37.0, 44.0, 45.0]);
    }

    #[test]
    #[should_panic]
    fn test_odd_split_panics() {
        let data = seq(9);
        let v = MatrixView::dense(&data, 3, 3).unwrap();
        let _ = v.quadrant(Quadrant::TopLeft);
    }

    #[test]
    fn test_quadrant_mut_writes_in_place() {
        let mut data = vec![0.0; 16];
        let mut v = MatrixViewMut::dense(&mut data, 4, 4).unwrap();
        {
            let mut q = v.quadrant_mut(Quadrant::TopRight);
            q.set(1, 0, 7.0);
        }
        v.quadrant_mut(Quadrant::BottomLeft).set(0, 1, 3.0);
        assert_eq!(data[6], 7.0);
        assert_eq!(data[9], 3.0);
        assert_eq!(data.iter().filter(|&&x| x != 0.0).count(), 2);
    }
}
