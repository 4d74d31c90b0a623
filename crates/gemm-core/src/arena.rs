use std::cell::Cell;
use std::mem;

use crate::error::{GemmError, Result};
use crate::view::{MatrixView, MatrixViewMut};

/// Hands out densely packed scratch buffers for one multiplication.
///
/// An arena belongs to a single top-level call and is never shared between
/// calls, so nested or concurrent multiplications each see private scratch.
/// Buffers return their accounting to the arena when dropped.
#[derive(Debug, Default)]
pub struct ScratchArena {
    limit: Option<usize>,
    live_buffers: Cell<usize>,
    live_bytes: Cell<usize>,
    peak_bytes: Cell<usize>,
    allocations: Cell<usize>,
}

impl ScratchArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arena that refuses to hold more than `limit` live bytes.
    pub fn with_limit(limit: Option<usize>) -> Self {
        ScratchArena {
            limit,
            ..Self::default()
        }
    }

    /// Allocate a zeroed `rows x cols` buffer.
    ///
    /// # Errors
    /// Returns `AllocationFailure` if the size overflows, the configured
    /// limit would be exceeded, or the allocator refuses the request.
    pub fn alloc(&self, rows: usize, cols: usize) -> Result<ScratchBuffer<'_>> {
        let len = rows
            .checked_mul(cols)
            .ok_or(GemmError::AllocationFailure { bytes: usize::MAX })?;
        let bytes = len
            .checked_mul(mem::size_of::<f32>())
            .ok_or(GemmError::AllocationFailure { bytes: usize::MAX })?;

        let live = self.live_bytes.get();
        if let Some(limit) = self.limit {
            if live.saturating_add(bytes) > limit {
                tracing::debug!(bytes, live, limit, "scratch limit exceeded");
                return Err(GemmError::AllocationFailure { bytes });
            }
        }

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| GemmError::AllocationFailure { bytes })?;
        data.resize(len, 0.0);

        self.live_buffers.set(self.live_buffers.get() + 1);
        self.live_bytes.set(live + bytes);
        self.peak_bytes.set(self.peak_bytes.get().max(live + bytes));
        self.allocations.set(self.allocations.get() + 1);

        Ok(ScratchBuffer {
            data,
            rows,
            cols,
            arena: self,
        })
    }

    /// Buffers currently checked out.
    pub fn live_buffers(&self) -> usize {
        self.live_buffers.get()
    }

    pub fn live_bytes(&self) -> usize {
        self.live_bytes.get()
    }

    /// High-water mark of live bytes over the arena's lifetime.
    pub fn peak_bytes(&self) -> usize {
        self.peak_bytes.get()
    }

    /// Total successful allocations.
    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    fn release(&self, bytes: usize) {
        self.live_buffers.set(self.live_buffers.get() - 1);
        self.live_bytes.set(self.live_bytes.get() - bytes);
    }
}

/// An owned, densely packed (`stride == cols`) temporary matrix.
#[derive(Debug)]
pub struct ScratchBuffer<'a> {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
    arena: &'a ScratchArena,
}

impl ScratchBuffer<'_> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn view(&self) -> MatrixView<'_> {
        MatrixView::new_unchecked(&self.data, self.rows, self.cols, self.cols)
    }

    pub fn view_mut(&mut self) -> MatrixViewMut<'_> {
        MatrixViewMut::new_unchecked(&mut self.data, self.rows, self.cols, self.cols)
    }

    /// Leading `rows x cols` corner, used for partial boundary tiles.
    ///
    /// # Panics
    /// Panics if the corner is larger than the buffer.
    pub fn corner_mut(&mut self, rows: usize, cols: usize) -> MatrixViewMut<'_> {
        assert!(rows <= self.rows && cols <= self.cols);
        MatrixViewMut::new_unchecked(&mut self.data, rows, cols, self.cols)
    }

    pub fn corner(&self, rows: usize, cols: usize) -> MatrixView<'_> {
        assert!(rows <= self.rows && cols <= self.cols);
        MatrixView::new_unchecked(&self.data, rows, cols, self.cols)
    }
}

impl Drop for ScratchBuffer<'_> {
    fn drop(&mut self) {
        self.arena
            .release(self.data.len() * mem::size_of::<f32>());
    }
}
