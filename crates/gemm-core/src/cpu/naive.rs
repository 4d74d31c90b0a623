use crate::view::{MatrixView, MatrixViewMut};

/// Reference matrix multiplication: `c = a @ b`.
///
/// `a` is `[m, n]`, `b` is `[n, k]`, `c` is `[m, k]`. Every output cell is
/// overwritten with a dot product accumulated in increasing `p` order from
/// zero, which is the ordering the other strategies are measured against.
pub(crate) fn naive(a: &MatrixView<'_>, b: &MatrixView<'_>, c: &mut MatrixViewMut<'_>) {
    debug_assert_eq!(a.cols(), b.rows());
    debug_assert_eq!(c.shape(), (a.rows(), b.cols()));

    let n = a.cols();
    for i in 0..a.rows() {
        let a_row = a.row(i);
        let c_row = c.row_mut(i);
        for (j, out) in c_row.iter_mut().enumerate() {
            let mut dot = 0.0f32;
            for p in 0..n {
                dot += a_row[p] * b.row(p)[j];
            }
            *out = dot;
        }
    }
}
