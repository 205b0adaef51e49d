//! Memory Arena Adapter (C3, spec.md §4.3): bounds-checked reads and writes
//! against a guest's exported linear memory.
//!
//! Grounded on the classic (non-component-model) `Memory::data`/`data_mut`
//! access pattern used for plugin sandboxes, e.g. the typst `plugin.rs`
//! wasmtime embedding in the retrieval pack: fetch the `memory` export once,
//! then read/write through checked slices rather than raw pointer math.

use wasmtime::{AsContext, AsContextMut, Memory, StoreContext};

use crate::error::PipelineError;

/// A thin wrapper around a guest's exported `memory`, providing bounds-checked
/// access keyed by `(ptr, len)` pairs as they appear in address-URLs and
/// JSON descriptors.
pub struct MemoryArena {
    memory: Memory,
}

impl MemoryArena {
    pub fn new(memory: Memory) -> Self {
        MemoryArena { memory }
    }

    /// Read `len` bytes starting at `ptr`, copying out of guest memory.
    pub fn read(
        &self,
        ctx: impl AsContext,
        ptr: u32,
        len: u32,
    ) -> Result<Vec<u8>, PipelineError> {
        let data = self.memory.data(ctx);
        let start = ptr as usize;
        let end = start
            .checked_add(len as usize)
            .ok_or(PipelineError::OutOfBounds { ptr, len })?;
        data.get(start..end)
            .map(|slice| slice.to_vec())
            .ok_or(PipelineError::OutOfBounds { ptr, len })
    }

    /// Write `bytes` starting at `ptr`.
    pub fn write(
        &self,
        mut ctx: impl AsContextMut,
        ptr: u32,
        bytes: &[u8],
    ) -> Result<(), PipelineError> {
        let len = bytes.len() as u32;
        let data = self.memory.data_mut(&mut ctx);
        let start = ptr as usize;
        let end = start
            .checked_add(bytes.len())
            .ok_or(PipelineError::OutOfBounds { ptr, len })?;
        let dest = data
            .get_mut(start..end)
            .ok_or(PipelineError::OutOfBounds { ptr, len })?;
        dest.copy_from_slice(bytes);
        Ok(())
    }

    /// Current size of the guest's linear memory, in bytes.
    pub fn size(&self, ctx: impl AsContext) -> usize {
        self.memory.data_size(ctx)
    }

    /// Borrow `[ptr, ptr+len)` without copying. Unlike [`MemoryArena::read`],
    /// the returned slice aliases live guest memory, so it is only valid
    /// until the next guest call — re-entering the guest may grow memory and
    /// invalidate it. Callers MUST NOT retain this view across a guest call
    /// (spec.md §4.3, §5); copy out first if the bytes need to outlive one.
    pub fn view<'a, T: 'a>(
        &self,
        ctx: impl Into<StoreContext<'a, T>>,
        ptr: u32,
        len: u32,
    ) -> Result<&'a [u8], PipelineError> {
        let data = self.memory.data(ctx);
        let start = ptr as usize;
        let end = start
            .checked_add(len as usize)
            .ok_or(PipelineError::OutOfBounds { ptr, len })?;
        data.get(start..end).ok_or(PipelineError::OutOfBounds { ptr, len })
    }
}
