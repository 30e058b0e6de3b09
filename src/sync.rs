//! Batch construction and delivery of overrides to viewers.
//!
//! Each sync call builds one batch and hands it to the sink once per
//! recipient, so a viewer never sees half of an edit.

use crate::block_position::{BlockPosition, ChunkKey};
use crate::block_state::BlockState;
use crate::store::ChunkBlockStore;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

pub type BlockBatch = FxHashMap<BlockPosition, BlockState>;

/// Transport that delivers a batch of block changes to one viewer.
///
/// Delivery is fire-and-forget: the manager neither retries nor tracks
/// failures, and its cache does not depend on the outcome.
pub trait BlockChangeSink<V> {
    fn send_block_changes(&self, viewer: &V, batch: &BlockBatch);
}

impl<V, T: BlockChangeSink<V> + ?Sized> BlockChangeSink<V> for &T {
    fn send_block_changes(&self, viewer: &V, batch: &BlockBatch) {
        (**self).send_block_changes(viewer, batch)
    }
}

impl<V, T: BlockChangeSink<V> + ?Sized> BlockChangeSink<V> for Rc<T> {
    fn send_block_changes(&self, viewer: &V, batch: &BlockBatch) {
        (**self).send_block_changes(viewer, batch)
    }
}

impl<V, T: BlockChangeSink<V> + ?Sized> BlockChangeSink<V> for Arc<T> {
    fn send_block_changes(&self, viewer: &V, batch: &BlockBatch) {
        (**self).send_block_changes(viewer, batch)
    }
}

/// Adapts a closure into a [`BlockChangeSink`].
pub struct FnSink<F>(pub F);

impl<V, F> BlockChangeSink<V> for FnSink<F>
where
    F: Fn(&V, &BlockBatch),
{
    fn send_block_changes(&self, viewer: &V, batch: &BlockBatch) {
        (self.0)(viewer, batch)
    }
}

/// Sink that keeps every delivered batch in memory, in delivery order.
#[derive(Debug)]
pub struct RecordingSink<V> {
    sent: RefCell<Vec<(V, BlockBatch)>>,
}

impl<V> Default for RecordingSink<V> {
    fn default() -> Self {
        RecordingSink {
            sent: RefCell::new(Vec::new()),
        }
    }
}

impl<V: Clone> RecordingSink<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliveries(&self) -> Vec<(V, BlockBatch)> {
        self.sent.borrow().clone()
    }

    /// Drains and returns everything recorded so far.
    pub fn take(&self) -> Vec<(V, BlockBatch)> {
        std::mem::take(&mut *self.sent.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.sent.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.borrow().is_empty()
    }
}

impl<V: Clone> BlockChangeSink<V> for RecordingSink<V> {
    fn send_block_changes(&self, viewer: &V, batch: &BlockBatch) {
        self.sent.borrow_mut().push((viewer.clone(), batch.clone()));
    }
}

/// Every cached override.
pub fn collect_all(store: &ChunkBlockStore) -> BlockBatch {
    let mut batch = BlockBatch::default();
    batch.reserve(store.len());
    for (pos, block) in store.iter() {
        batch.insert(*pos, block.clone());
    }
    batch
}

/// Overrides at the given positions; positions without one are skipped.
pub fn collect_positions<'a, I>(store: &ChunkBlockStore, positions: I) -> BlockBatch
where
    I: IntoIterator<Item = &'a BlockPosition>,
{
    positions
        .into_iter()
        .filter_map(|pos| store.get_block(*pos).map(|block| (*pos, block.clone())))
        .collect()
}

/// Every override in the given chunks.
pub fn collect_chunks<'a, I>(store: &ChunkBlockStore, keys: I) -> BlockBatch
where
    I: IntoIterator<Item = &'a ChunkKey>,
{
    let mut batch = BlockBatch::default();
    for key in keys {
        if let Some(chunk) = store.chunk(*key) {
            batch.extend(chunk.iter().map(|(pos, block)| (*pos, block.clone())));
        }
    }
    batch
}

/// Every cached position mapped to `reset`, restoring what the world really holds.
pub fn reset_batch(store: &ChunkBlockStore, reset: &BlockState) -> BlockBatch {
    store.positions().map(|pos| (*pos, reset.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> ChunkBlockStore {
        let mut store = ChunkBlockStore::new();
        store.set_block(BlockPosition::new(0, 0, 0), BlockState::new("minecraft:stone"));
        store.set_block(BlockPosition::new(1, 0, 0), BlockState::new("minecraft:dirt"));
        store.set_block(BlockPosition::new(40, 0, 0), BlockState::new("minecraft:glass"));
        store
    }

    #[test]
    fn test_collect_all() {
        let batch = collect_all(&sample_store());
        assert_eq!(batch.len(), 3);
        assert_eq!(
            batch.get(&BlockPosition::new(40, 0, 0)).map(|b| b.name()),
            Some("minecraft:glass")
        );
    }

    #[test]
    fn test_collect_positions_skips_missing() {
        let store = sample_store();
        let wanted = [BlockPosition::new(1, 0, 0), BlockPosition::new(9, 9, 9)];
        let batch = collect_positions(&store, &wanted);
        assert_eq!(batch.len(), 1);
        assert!(batch.contains_key(&BlockPosition::new(1, 0, 0)));
    }

    #[test]
    fn test_collect_chunks() {
        let store = sample_store();
        let keys = [ChunkKey::new(0, 0), ChunkKey::new(5, 5)];
        let batch = collect_chunks(&store, &keys);
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_reset_batch_uses_sentinel() {
        let batch = reset_batch(&sample_store(), &BlockState::air());
        assert_eq!(batch.len(), 3);
        assert!(batch.values().all(|b| b.is_air()));
    }

    #[test]
    fn test_recording_sink_through_reference() {
        let sink: RecordingSink<u32> = RecordingSink::new();
        let by_ref = &sink;
        by_ref.send_block_changes(&7, &BlockBatch::default());
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.deliveries()[0].0, 7);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.take()[0].0, 7);
        assert!(sink.is_empty());
        assert!(sink.deliveries().is_empty());
    }
}
