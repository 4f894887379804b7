use crate::arena::{QueuedPixel, RecordArena, RecordHandle};
use crate::common::Error;
use std::collections::VecDeque;

/// Number of discrete priority levels.
pub const NUM_LEVELS: usize = 1024;

/// Priority queue made of `NUM_LEVELS` FIFO buckets.
///
/// `active_level` is never above the lowest non-empty level: `pop_lowest()` only scans forward
/// from it, and after pushing below it the caller must call `lower_active()`. Inside one level the
/// records come out in insertion order, which is the tie-break for equal priorities.
pub struct BucketQueue {
    levels: Vec<VecDeque<RecordHandle>>,
    active_level: usize,
    arena: RecordArena,
    len: usize,
    num_clamped: usize,
}

impl BucketQueue {
    pub fn new() -> Self {
        Self {
            levels: (0..NUM_LEVELS).map(|_| VecDeque::new()).collect(),
            active_level: 0,
            arena: RecordArena::new(),
            len: 0,
            num_clamped: 0,
        }
    }

    /// Appends `record` to the tail of `level`.
    ///
    /// The level is clamped into `0..NUM_LEVELS`; levels above the range end up in the last
    /// bucket. Returns the level actually used.
    #[inline]
    pub fn push(&mut self, level: i64, record: QueuedPixel) -> Result<usize, Error> {
        let clamped = level.clamp(0, NUM_LEVELS as i64 - 1) as usize;
        if clamped as i64 != level {
            self.num_clamped += 1;
        }
        let handle = self.arena.allocate(record)?;
        self.levels[clamped].push_back(handle);
        self.len += 1;
        Ok(clamped)
    }

    /// Removes the head of the lowest non-empty level at or above `active_level`.
    #[inline]
    pub fn pop_lowest(&mut self) -> Option<QueuedPixel> {
        let level = (self.active_level..NUM_LEVELS).find(|l| !self.levels[*l].is_empty())?;
        self.active_level = level;
        let handle = self.levels[level].pop_front()?;
        self.len -= 1;
        Some(self.arena.release(handle))
    }

    /// Moves the cursor down to `level` if it is below the current one.
    ///
    /// Pushing does not do this on its own. The flood pushes neighbors of the popped pixel and
    /// then lowers the cursor, so the cheaper new work gets served before older, more expensive
    /// records.
    #[inline(always)]
    pub fn lower_active(&mut self, level: usize) {
        if level < self.active_level {
            self.active_level = level;
        }
    }

    pub fn active_level(&self) -> usize {
        self.active_level
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of pushes whose level had to be clamped.
    pub fn num_clamped(&self) -> usize {
        self.num_clamped
    }

    pub fn arena(&self) -> &RecordArena {
        &self.arena
    }
}

impl Default for BucketQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{BucketQueue, NUM_LEVELS};
    use crate::arena::QueuedPixel;

    fn record(i: u32) -> QueuedPixel {
        QueuedPixel {
            label_index: i,
            pixel_offset: 0,
            compactness_bias: 0f32,
        }
    }

    fn drain(queue: &mut BucketQueue) -> Vec<u32> {
        std::iter::from_fn(|| queue.pop_lowest())
            .map(|r| r.label_index)
            .collect()
    }

    #[test]
    fn pop_lowest_fifo_test() {
        let mut queue = BucketQueue::new();
        queue.push(5, record(1)).unwrap();
        queue.push(2, record(2)).unwrap();
        queue.push(5, record(3)).unwrap();
        queue.push(2, record(4)).unwrap();
        assert_eq!(queue.len(), 4);
        assert_eq!(drain(&mut queue), vec![2, 4, 1, 3]);
        assert!(queue.is_empty());
        assert_eq!(queue.pop_lowest(), None);
    }

    #[test]
    fn clamp_levels_test() {
        let mut queue = BucketQueue::new();
        assert_eq!(queue.push(-3, record(1)).unwrap(), 0);
        assert_eq!(queue.push(5000, record(2)).unwrap(), NUM_LEVELS - 1);
        assert_eq!(queue.push(NUM_LEVELS as i64 - 1, record(3)).unwrap(), NUM_LEVELS - 1);
        assert_eq!(queue.num_clamped(), 2);
        assert_eq!(drain(&mut queue), vec![1, 2, 3]);
        assert_eq!(queue.active_level(), NUM_LEVELS - 1);
    }

    #[test]
    fn lower_active_test() {
        let mut queue = BucketQueue::new();
        queue.push(10, record(1)).unwrap();
        queue.push(10, record(2)).unwrap();
        assert_eq!(queue.pop_lowest().unwrap().label_index, 1);
        assert_eq!(queue.active_level(), 10);
        // below the cursor, invisible until the cursor is lowered
        queue.push(3, record(3)).unwrap();
        assert_eq!(queue.pop_lowest().unwrap().label_index, 2);
        queue.push(10, record(4)).unwrap();
        queue.lower_active(3);
        assert_eq!(queue.active_level(), 3);
        queue.lower_active(7);
        assert_eq!(queue.active_level(), 3);
        assert_eq!(drain(&mut queue), vec![3, 4]);
    }

    #[test]
    fn records_are_recycled_test() {
        let mut queue = BucketQueue::new();
        for round in 0..10u32 {
            for i in 0..1000 {
                queue.push((i % 7) as i64, record(round * 1000 + i)).unwrap();
            }
            assert_eq!(drain(&mut queue).len(), 1000);
            queue.lower_active(0);
        }
        assert_eq!(queue.arena().num_blocks(), 1);
    }
}
