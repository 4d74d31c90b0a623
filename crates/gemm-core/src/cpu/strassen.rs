use tracing::trace;

use crate::config::GemmConfig;
use crate::cpu::blocked::blocked;
use crate::cpu::naive::naive;
use crate::cpu::{Algorithm, Context};
use crate::error::Result;
use crate::ops::{add_assign_into, add_into, sub_assign_into, sub_into};
use crate::view::{MatrixView, MatrixViewMut, Quadrant};

/// Why a Strassen invocation delegates instead of splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    MaxDepth,
    DimThreshold,
    ScaleThreshold,
    OddDimension,
}

/// Decide whether an `[m, n] @ [n, k]` product at `depth` should stop recursing.
///
/// Odd extents cannot be halved without padding, so they always delegate.
pub fn stop_reason(
    m: usize,
    n: usize,
    k: usize,
    depth: usize,
    config: &GemmConfig,
) -> Option<StopReason> {
    if depth >= config.max_depth {
        return Some(StopReason::MaxDepth);
    }
    if m.min(n).min(k) <= config.dim_threshold {
        return Some(StopReason::DimThreshold);
    }
    if m.saturating_mul(n).saturating_mul(k) <= config.scale_threshold {
        return Some(StopReason::ScaleThreshold);
    }
    if m % 2 != 0 || n % 2 != 0 || k % 2 != 0 {
        return Some(StopReason::OddDimension);
    }
    None
}

fn direct(
    a: &MatrixView<'_>,
    b: &MatrixView<'_>,
    c: &mut MatrixViewMut<'_>,
    ctx: &Context<'_>,
) -> Result<()> {
    match ctx.config.base_case {
        Algorithm::Naive => {
            naive(a, b, c);
            Ok(())
        }
        // A validated config never names Strassen as its base case.
        Algorithm::Blocked | Algorithm::Strassen => {
            blocked(a, b, c, ctx.config.block_dim, ctx.arena)
        }
    }
}

/// Strassen matrix multiplication: `c = a @ b`.
///
/// Splits both operands into quadrants and forms seven half-size products,
/// each through a recursive call at `depth + 1`:
///
/// ```text
/// M1 = (A11 + A22)(B11 + B22)    M5 = (A11 + A12) B22
/// M2 = (A21 + A22) B11           M6 = (A21 - A11)(B11 + B12)
/// M3 = A11 (B12 - B22)           M7 = (A12 - A22)(B21 + B22)
/// M4 = A22 (B21 - B11)
///
/// C11 = M1 + M4 - M5 + M7        C12 = M3 + M5
/// C21 = M2 + M4                  C22 = M1 - M2 + M3 + M6
/// ```
///
/// The products and the two operand temporaries live in scratch owned by
/// this frame and are dropped before it returns, on success or error. All
/// scratch is acquired before `c` is touched, so an allocation failure
/// leaves the output unmodified.
pub(crate) fn strassen(
    a: &MatrixView<'_>,
    b: &MatrixView<'_>,
    c: &mut MatrixViewMut<'_>,
    depth: usize,
    ctx: &mut Context<'_>,
) -> Result<()> {
    let (m, n, k) = (a.rows(), a.cols(), b.cols());
    ctx.stats.calls += 1;
    ctx.stats.max_depth = ctx.stats.max_depth.max(depth);

    if let Some(reason) = stop_reason(m, n, k, depth, ctx.config) {
        trace!(depth, m, n, k, ?reason, "strassen delegating");
        ctx.stats.base_cases += 1;
        return direct(a, b, c, ctx);
    }

    trace!(depth, m, n, k, "strassen split");
    ctx.stats.splits += 1;

    let (hm, hn, hk) = (m / 2, n / 2, k / 2);
    let [a11, a12, a21, a22] = a.split_quadrants();
    let [b11, b12, b21, b22] = b.split_quadrants();

    let arena = ctx.arena;
    let mut lhs = arena.alloc(hm, hn)?;
    let mut rhs = arena.alloc(hn, hk)?;
    let mut m1 = arena.alloc(hm, hk)?;
    let mut m2 = arena.alloc(hm, hk)?;
    let mut m3 = arena.alloc(hm, hk)?;
    let mut m4 = arena.alloc(hm, hk)?;
    let mut m5 = arena.alloc(hm, hk)?;
    let mut m6 = arena.alloc(hm, hk)?;
    let mut m7 = arena.alloc(hm, hk)?;

    let next = depth + 1;

    add_into(&a11, &a22, &mut lhs.view_mut());
    add_into(&b11, &b22, &mut rhs.view_mut());
    strassen(&lhs.view(), &rhs.view(), &mut m1.view_mut(), next, ctx)?;

    add_into(&a21, &a22, &mut lhs.view_mut());
    strassen(&lhs.view(), &b11, &mut m2.view_mut(), next, ctx)?;

    sub_into(&b12, &b22, &mut rhs.view_mut());
    strassen(&a11, &rhs.view(), &mut m3.view_mut(), next, ctx)?;

    sub_into(&b21, &b11, &mut rhs.view_mut());
    strassen(&a22, &rhs.view(), &mut m4.view_mut(), next, ctx)?;

    add_into(&a11, &a12, &mut lhs.view_mut());
    strassen(&lhs.view(), &b22, &mut m5.view_mut(), next, ctx)?;

    sub_into(&a21, &a11, &mut lhs.view_mut());
    add_into(&b11, &b12, &mut rhs.view_mut());
    strassen(&lhs.view(), &rhs.view(), &mut m6.view_mut(), next, ctx)?;

    sub_into(&a12, &a22, &mut lhs.view_mut());
    add_into(&b21, &b22, &mut rhs.view_mut());
    strassen(&lhs.view(), &rhs.view(), &mut m7.view_mut(), next, ctx)?;

    drop(lhs);
    drop(rhs);

    let (m1, m2, m3, m4, m5, m6, m7) = (
        m1.view(),
        m2.view(),
        m3.view(),
        m4.view(),
        m5.view(),
        m6.view(),
        m7.view(),
    );

    // Quadrants of c may be strided windows of a larger parent; the
    // elementwise kernels address them row by row.
    {
        let mut c11 = c.quadrant_mut(Quadrant::TopLeft);
        add_into(&m1, &m4, &mut c11);
        sub_assign_into(&mut c11, &m5);
        add_assign_into(&mut c11, &m7);
    }
    add_into(&m3, &m5, &mut c.quadrant_mut(Quadrant::TopRight));
    add_into(&m2, &m4, &mut c.quadrant_mut(Quadrant::BottomLeft));
    {
        let mut c22 = c.quadrant_mut(Quadrant::BottomRight);
        sub_into(&m1, &m2, &mut c22);
        add_assign_into(&mut c22, &m3);
        add_assign_into(&mut c22, &m6);
    }

    Ok(())
}
