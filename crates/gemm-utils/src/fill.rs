use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fill the `rows x cols` window of a strided buffer with values drawn
/// uniformly from `[low, high)`.
///
/// Elements between the end of a row and the next stride are left alone.
///
/// # Panics
/// Panics if `low >= high` or the buffer is shorter than the window.
pub fn random_fill<R: Rng + ?Sized>(
    buf: &mut [f32],
    rows: usize,
    cols: usize,
    stride: usize,
    low: f32,
    high: f32,
    rng: &mut R,
) {
    let dist = Uniform::new(low, high);
    for_each_cell(buf, rows, cols, stride, |_, _, x| *x = dist.sample(&mut *rng));
}

/// A dense `rows x cols` matrix of values in `[0, 1)` from a seeded generator.
pub fn random_matrix(rows: usize, cols: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0.0; rows * cols];
    random_fill(&mut data, rows, cols, cols, 0.0, 1.0, &mut rng);
    data
}

/// Set every addressed element to `value`.
pub fn constant_fill(buf: &mut [f32], rows: usize, cols: usize, stride: usize, value: f32) {
    for_each_cell(buf, rows, cols, stride, |_, _, x| *x = value);
}

/// Set every addressed element to one.
pub fn one_fill(buf: &mut [f32], rows: usize, cols: usize, stride: usize) {
    constant_fill(buf, rows, cols, stride, 1.0);
}

/// A dense `n x n` identity matrix.
pub fn identity(n: usize) -> Vec<f32> {
    let mut data = vec![0.0; n * n];
    for_each_cell(&mut data, n, n, n, |i, j, x| {
        if i == j {
            *x = 1.0;
        }
    });
    data
}

fn for_each_cell<F>(buf: &mut [f32], rows: usize, cols: usize, stride: usize, mut f: F)
where
    F: FnMut(usize, usize, &mut f32),
{
    assert!(stride >= cols, "stride {} < cols {}", stride, cols);
    for i in 0..rows {
        let start = i * stride;
        for (j, x) in buf[start..start + cols].iter_mut().enumerate() {
            f(i, j, x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_matrix_is_seeded() {
        let a = random_matrix(4, 5, 7);
        let b = random_matrix(4, 5, 7);
        let c = random_matrix(4, 5, 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(|&x| (0.0..1.0).contains(&x)));
    }

    #[test]
    fn test_random_fill_respects_stride() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut buf = vec![-5.0; 8];
        random_fill(&mut buf, 2, 3, 4, 10.0, 20.0, &mut rng);
        assert_eq!(buf[3], -5.0);
        assert_eq!(buf[7], -5.0);
        for &i in &[0, 1, 2, 4, 5, 6] {
            assert!((10.0..20.0).contains(&buf[i]));
        }
    }

    #[test]
    fn test_constant_fills() {
        let mut buf = vec![0.0; 5];
        one_fill(&mut buf, 2, 2, 3);
        assert_eq!(buf, vec![1.0, 1.0, 0.0, 1.0, 1.0]);
        constant_fill(&mut buf, 1, 5, 5, 2.5);
        assert_eq!(buf, vec![2.5; 5]);
    }

    #[test]
    fn test_identity() {
        assert_eq!(identity(2), vec![1.0, 0.0, 0.0, 1.0]);
    }
}
