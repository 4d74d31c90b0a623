use thiserror::Error;

/// Default absolute tolerance when comparing products of different algorithms.
pub const DEFAULT_TOLERANCE: f32 = 1e-1;

/// The first cell where two matrices disagree beyond tolerance.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("mismatch at [{row}][{col}]: expected {expected}, got {got} (tolerance {tolerance})")]
pub struct Mismatch {
    pub row: usize,
    pub col: usize,
    pub expected: f32,
    pub got: f32,
    pub tolerance: f32,
}

/// Compare two dense `rows x cols` matrices cell by cell.
///
/// A cell matches when `|expected - got| <= tolerance`. NaN never matches.
///
/// # Panics
/// Panics if either slice is shorter than `rows * cols`.
pub fn check_same(
    expected: &[f32],
    got: &[f32],
    rows: usize,
    cols: usize,
    tolerance: f32,
) -> Result<(), Mismatch> {
    let n = rows * cols;
    assert!(expected.len() >= n && got.len() >= n, "buffers shorter than {}x{}", rows, cols);
    for (pos, (&e, &g)) in expected[..n].iter().zip(&got[..n]).enumerate() {
        // Written so that NaN on either side fails.
        if !((e - g).abs() <= tolerance) {
            return Err(Mismatch {
                row: pos / cols,
                col: pos % cols,
                expected: e,
                got: g,
                tolerance,
            });
        }
    }
    Ok(())
}

/// Largest absolute elementwise difference, or NaN if either side has one.
pub fn max_abs_diff(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "length mismatch");
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0f32, |acc, d| if d.is_nan() || acc.is_nan() { f32::NAN } else { acc.max(d) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_check_same_within_tolerance() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [1.05, 1.95, 3.0, 4.09];
        assert!(check_same(&a, &b, 2, 2, DEFAULT_TOLERANCE).is_ok());
    }

    #[test]
    fn test_check_same_reports_first_mismatch() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = [1.0, 2.0, 3.0, 4.5, 5.0, 9.0];
        let err = check_same(&a, &b, 2, 3, 0.1).unwrap_err();
        assert_eq!((err.row, err.col), (1, 0));
        assert_eq!(err.got, 4.5);
        assert!(err.to_string().contains("[1][0]"));
    }

    #[test]
    fn test_nan_never_matches() {
        assert!(check_same(&[f32::NAN], &[f32::NAN], 1, 1, 1.0).is_err());
        assert!(max_abs_diff(&[0.0, f32::NAN], &[0.0, 1.0]).is_nan());
    }

    #[test]
    fn test_max_abs_diff() {
        assert_abs_diff_eq!(max_abs_diff(&[1.0, -2.0, 3.0], &[1.5, -2.0, 2.0]), 1.0);
    }
}
