use crate::arena::ScratchArena;
use crate::cpu::naive::naive;
use crate::error::Result;
use crate::ops::{add_assign_into, fill};
use crate::view::{MatrixView, MatrixViewMut};

/// Cache-tiled matrix multiplication: `c = a @ b`.
///
/// Each `block_dim`-square output tile is zeroed, then every contributing
/// pair of `a` and `b` tiles is multiplied into a scratch tile and added in.
/// Boundary tiles use their true extents. The scratch tile comes from the
/// caller's arena, so concurrent or nested calls never share it.
pub(crate) fn blocked(
    a: &MatrixView<'_>,
    b: &MatrixView<'_>,
    c: &mut MatrixViewMut<'_>,
    block_dim: usize,
    arena: &ScratchArena,
) -> Result<()> {
    debug_assert!(block_dim > 0);
    debug_assert_eq!(a.cols(), b.rows());
    debug_assert_eq!(c.shape(), (a.rows(), b.cols()));

    let (m, n, k) = (a.rows(), a.cols(), b.cols());
    let mut tile = arena.alloc(block_dim.min(m), block_dim.min(k))?;

    for i0 in (0..m).step_by(block_dim) {
        let rows = block_dim.min(m - i0);
        for j0 in (0..k).step_by(block_dim) {
            let cols = block_dim.min(k - j0);
            let mut c_tile = c.block_mut(i0, j0, rows, cols);
            fill(&mut c_tile, 0.0);

            for p0 in (0..n).step_by(block_dim) {
                let depth = block_dim.min(n - p0);
                let a_tile = a.block(i0, p0, rows, depth);
                let b_tile = b.block(p0, j0, depth, cols);
                naive(&a_tile, &b_tile, &mut tile.corner_mut(rows, cols));
                add_assign_into(&mut c_tile, &tile.corner(rows, cols));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(a: &[f32], b: &[f32], m: usize, n: usize, k: usize, block_dim: usize) -> Vec<f32> {
        let arena = ScratchArena::new();
        let mut c = vec![f32::NAN; m * k];
        blocked(
            &MatrixView::dense(a, m, n).unwrap(),
            &MatrixView::dense(b, n, k).unwrap(),
            &mut MatrixViewMut::dense(&mut c, m, k).unwrap(),
            block_dim,
            &arena,
        )
        .unwrap();
        assert_eq!(arena.live_buffers(), 0);
        c
    }

    fn reference(a: &[f32], b: &[f32], m: usize, n: usize, k: usize) -> Vec<f32> {
        let mut c = vec![0.0; m * k];
        naive(
            &MatrixView::dense(a, m, n).unwrap(),
            &MatrixView::dense(b, n, k).unwrap(),
            &mut MatrixViewMut::dense(&mut c, m, k).unwrap(),
        );
        c
    }

    #[test]
    fn test_blocked_2x2() {
        let c = product(&[1.0, 2.0, 3.0, 4.0], &[5.0, 6.0, 7.0, 8.0], 2, 2, 2, 64);
        assert_eq!(c, vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_partial_boundary_tiles() {
        // Small integers keep every partial sum exact, so tiling must match exactly.
        for &(m, n, k, bd) in &[(5, 7, 3, 2), (9, 9, 9, 4), (3, 10, 6, 5), (8, 8, 8, 3), (1, 1, 1, 7)] {
            let a: Vec<f32> = (0..m * n).map(|i| (i % 7) as f32 - 3.0).collect();
            let b: Vec<f32> = (0..n * k).map(|i| (i % 5) as f32).collect();
            assert_eq!(
                product(&a, &b, m, n, k, bd),
                reference(&a, &b, m, n, k),
                "m={} n={} k={} block_dim={}",
                m,
                n,
                k,
                bd
            );
        }
    }

    #[test]
    fn test_blocked_into_strided_output() {
        let arena = ScratchArena::new();
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [5.0, 6.0, 7.0, 8.0];
        // 2x2 output inside a 2x4 parent
        let mut c = [7.0; 8];
        blocked(
            &MatrixView::dense(&a, 2, 2).unwrap(),
            &MatrixView::dense(&b, 2, 2).unwrap(),
            &mut MatrixViewMut::new(&mut c[1..], 2, 2, 4).unwrap(),
            1,
            &arena,
        )
        .unwrap();
        assert_eq!(c, [7.0, 19.0, 22.0, 7.0, 7.0, 43.0, 50.0, 7.0]);
    }
}
