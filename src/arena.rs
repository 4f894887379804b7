//! Record pool for the bucket queue.
//!
//! Records are stored in one contiguous `Vec` which grows by whole blocks. Released records go to
//! a freelist (stack of indices) and are reused before the next block is allocated, so a flood
//! run does only a handful of allocations regardless of the image size and frees nothing until
//! the arena is dropped.

use crate::common::Error;

/// Number of records allocated at once when the freelist runs dry.
pub const BLOCK_SIZE: usize = 4096;

/// Pixel waiting in the bucket queue.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct QueuedPixel {
    /// Linear index into the label grid.
    pub label_index: u32,
    /// Byte offset of the pixel in the `RGBImage`.
    pub pixel_offset: u32,
    /// Accumulated compactness bias (grows by `compactness_step` with every hop from the seed).
    pub compactness_bias: f32,
}

/// Index of a record inside `RecordArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordHandle(u32);

#[derive(Debug, Default)]
pub struct RecordArena {
    records: Vec<QueuedPixel>,
    free: Vec<RecordHandle>,
}

impl RecordArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record` in a free slot, allocating a new block if there is none.
    #[inline]
    pub fn allocate(&mut self, record: QueuedPixel) -> Result<RecordHandle, Error> {
        if self.free.is_empty() {
            self.allocate_block()?;
        }
        match self.free.pop() {
            Some(handle) => {
                self.records[handle.0 as usize] = record;
                Ok(handle)
            }
            None => Err(Error::AllocationFailure(BLOCK_SIZE)),
        }
    }

    /// Returns the record and puts its slot on top of the freelist.
    #[inline]
    pub fn release(&mut self, handle: RecordHandle) -> QueuedPixel {
        let record = self.records[handle.0 as usize];
        self.free.push(handle);
        record
    }

    #[inline]
    pub fn get(&self, handle: RecordHandle) -> &QueuedPixel {
        &self.records[handle.0 as usize]
    }

    /// Total number of records in all allocated blocks.
    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    pub fn num_blocks(&self) -> usize {
        self.records.len() / BLOCK_SIZE
    }

    pub fn num_free(&self) -> usize {
        self.free.len()
    }

    fn allocate_block(&mut self) -> Result<(), Error> {
        let start = self.records.len();
        if start + BLOCK_SIZE > u32::MAX as usize {
            return Err(Error::AllocationFailure(BLOCK_SIZE));
        }
        self.records
            .try_reserve_exact(BLOCK_SIZE)
            .map_err(|_| Error::AllocationFailure(BLOCK_SIZE))?;
        self.free
            .try_reserve(BLOCK_SIZE)
            .map_err(|_| Error::AllocationFailure(BLOCK_SIZE))?;
        self.records
            .resize(start + BLOCK_SIZE, QueuedPixel::default());
        // Reversed, so that the lowest index of the block is handed out first.
        self.free.extend(
            (start..start + BLOCK_SIZE)
                .rev()
                .map(|i| RecordHandle(i as u32)),
        );
        Ok(())
    }
}
