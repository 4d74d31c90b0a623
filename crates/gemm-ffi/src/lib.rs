mod error;
mod types;

pub use error::*;
pub use types::*;

use std::os::raw::c_char;
use std::ffi::CString;

use gemm_core::{config, GemmConfig, GemmError};

/// Execute a closure that returns a `GemmStatus`, catching any panics
/// and converting them into `GemmStatus::ErrorInternal`.
fn catch_panic<F: FnOnce() -> GemmStatus + std::panic::UnwindSafe>(f: F) -> GemmStatus {
    match std::panic::catch_unwind(f) {
        Ok(status) => status,
        Err(_) => {
            set_last_error("internal panic".to_string());
            GemmStatus::ErrorInternal
        }
    }
}

fn fail(err: GemmError) -> GemmStatus {
    let status = GemmStatus::from(&err);
    set_last_error(err.to_string());
    status
}

fn extent(rows: i64, cols: i64) -> Result<(usize, usize), GemmError> {
    match (usize::try_from(rows), usize::try_from(cols)) {
        (Ok(r), Ok(c)) if r > 0 && c > 0 => Ok((r, c)),
        _ => Err(GemmError::InvalidDimension { rows, cols }),
    }
}

type Extents = ((usize, usize), (usize, usize), (usize, usize));

fn extents(m: i64, n: i64, n2: i64, k: i64, m2: i64, k2: i64) -> Result<Extents, GemmError> {
    Ok((extent(m, n)?, extent(n2, k)?, extent(m2, k2)?))
}

/// Elements spanned by a `rows x cols` window with the given stride, or
/// `None` for a negative stride or overflow.
fn span(rows: usize, cols: usize, stride: i64) -> Option<(usize, usize)> {
    let stride = usize::try_from(stride).ok()?;
    let len = (rows - 1).checked_mul(stride)?.checked_add(cols)?;
    Some((stride, len))
}

/// Compute `C = A @ B` for flat row-major `f32` buffers with explicit strides.
///
/// `a` is `[m, n]` with row stride `stride_a`, `b` is `[n2, k]` with row
/// stride `stride_b`, and `c` is `[m2, k2]` with row stride `stride_c`. Any
/// of them may be a sub-block of a larger matrix. On error `c` is not written
/// and a message is available from `gemm_last_error`.
///
/// # Safety
/// Each pointer must be valid for `(rows - 1) * stride + cols` elements, and
/// the region written through `c` must not overlap `a` or `b`.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn gemm_multiply(
    algorithm: GemmAlgorithm,
    a: *const f32,
    m: i64,
    n: i64,
    stride_a: i64,
    b: *const f32,
    n2: i64,
    k: i64,
    stride_b: i64,
    c: *mut f32,
    m2: i64,
    k2: i64,
    stride_c: i64,
) -> GemmStatus {
    catch_panic(|| {
        let ((m, n), (n2, k), (m2, k2)) = match extents(m, n, n2, k, m2, k2) {
            Ok(d) => d,
            Err(e) => return fail(e),
        };
        if a.is_null() || b.is_null() || c.is_null() {
            set_last_error("null buffer argument".to_string());
            return GemmStatus::ErrorInvalidArgument;
        }
        let (Some((sa, len_a)), Some((sb, len_b)), Some((sc, len_c))) = (
            span(m, n, stride_a),
            span(n2, k, stride_b),
            span(m2, k2, stride_c),
        ) else {
            set_last_error("negative or overflowing stride".to_string());
            return GemmStatus::ErrorInvalidArgument;
        };

        let a = unsafe { std::slice::from_raw_parts(a, len_a) };
        let b = unsafe { std::slice::from_raw_parts(b, len_b) };
        let c = unsafe { std::slice::from_raw_parts_mut(c, len_c) };

        match gemm_core::multiply(algorithm.into(), a, m, n, sa, b, n2, k, sb, c, m2, k2, sc) {
            Ok(()) => GemmStatus::Ok,
            Err(e) => fail(e),
        }
    })
}

/// Install new process-wide tunables.
///
/// # Safety
/// `tunables` must be null or point to a valid `GemmTunables`.
#[no_mangle]
pub unsafe extern "C" fn gemm_set_config(tunables: *const GemmTunables) -> GemmStatus {
    catch_panic(|| {
        if tunables.is_null() {
            set_last_error("tunables is null".to_string());
            return GemmStatus::ErrorInvalidArgument;
        }
        let tunables = unsafe { &*tunables };
        match GemmConfig::try_from(tunables).and_then(config::set_global) {
            Ok(()) => GemmStatus::Ok,
            Err(e) => fail(e),
        }
    })
}

/// Read the current process-wide tunables into `*out`.
///
/// # Safety
/// `out` must be null or point to writable memory for one `GemmTunables`.
#[no_mangle]
pub unsafe extern "C" fn gemm_get_config(out: *mut GemmTunables) -> GemmStatus {
    if out.is_null() {
        set_last_error("out is null".to_string());
        return GemmStatus::ErrorInvalidArgument;
    }
    unsafe {
        *out = GemmTunables::from(&config::global());
    }
    GemmStatus::Ok
}

/// Get the last error message for this thread, or null if there is none.
///
/// The returned string must be freed with `gemm_free_string`.
#[no_mangle]
pub extern "C" fn gemm_last_error() -> *const c_char {
    match error::take_last_error() {
        Some(e) => e.into_raw(),
        None => std::ptr::null(),
    }
}

/// Free a string previously returned by `gemm_last_error`.
///
/// # Safety
/// `s` must be null or a pointer obtained from `gemm_last_error`.
#[no_mangle]
pub unsafe extern "C" fn gemm_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
