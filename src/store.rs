//! Chunk-partitioned cache of per-viewer block overrides.

use crate::block_position::{BlockPosition, ChunkKey};
use crate::block_state::BlockState;
use rustc_hash::FxHashMap;

pub type ChunkBlocks = FxHashMap<BlockPosition, BlockState>;

/// Maps each chunk key to the overrides placed in that chunk.
///
/// A chunk entry exists only while it holds at least one override; removing the
/// last override of a chunk drops the entry.
#[derive(Debug, Clone, Default)]
pub struct ChunkBlockStore {
    chunks: FxHashMap<ChunkKey, ChunkBlocks>,
}

impl ChunkBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_block(&mut self, pos: BlockPosition, block: BlockState) {
        self.chunks
            .entry(pos.chunk_key())
            .or_default()
            .insert(pos, block);
    }

    pub fn set_blocks<I>(&mut self, blocks: I)
    where
        I: IntoIterator<Item = (BlockPosition, BlockState)>,
    {
        for (pos, block) in blocks {
            self.set_block(pos, block);
        }
    }

    pub fn fill<I>(&mut self, positions: I, block: &BlockState)
    where
        I: IntoIterator<Item = BlockPosition>,
    {
        for pos in positions {
            self.set_block(pos, block.clone());
        }
    }

    pub fn get_block(&self, pos: BlockPosition) -> Option<&BlockState> {
        self.chunks.get(&pos.chunk_key())?.get(&pos)
    }

    pub fn remove_block(&mut self, pos: BlockPosition) -> Option<BlockState> {
        let key = pos.chunk_key();
        let chunk = self.chunks.get_mut(&key)?;
        let removed = chunk.remove(&pos);
        if chunk.is_empty() {
            self.chunks.remove(&key);
        }
        removed
    }

    pub fn has_chunk(&self, key: ChunkKey) -> bool {
        self.chunks.contains_key(&key)
    }

    pub fn has_block(&self, pos: BlockPosition) -> bool {
        self.chunks
            .get(&pos.chunk_key())
            .is_some_and(|chunk| chunk.contains_key(&pos))
    }

    /// Overrides in the chunk, or an empty map when the chunk is not cached.
    pub fn blocks_in_chunk(&self, key: ChunkKey) -> ChunkBlocks {
        self.chunks.get(&key).cloned().unwrap_or_default()
    }

    pub fn chunk(&self, key: ChunkKey) -> Option<&ChunkBlocks> {
        self.chunks.get(&key)
    }

    /// Highest overridden position in the column at `(x, z)`.
    ///
    /// Scans every cached chunk rather than only the column's own chunk.
    pub fn highest_at(&self, x: i32, z: i32) -> Option<BlockPosition> {
        self.chunks
            .values()
            .flat_map(|chunk| chunk.keys())
            .filter(|pos| pos.x == x && pos.z == z)
            .max_by_key(|pos| pos.y)
            .copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BlockPosition, &BlockState)> {
        self.chunks.values().flat_map(|chunk| chunk.iter())
    }

    pub fn positions(&self) -> impl Iterator<Item = &BlockPosition> {
        self.chunks.values().flat_map(|chunk| chunk.keys())
    }

    pub fn chunk_keys(&self) -> impl Iterator<Item = &ChunkKey> {
        self.chunks.keys()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn len(&self) -> usize {
        self.chunks.values().map(|chunk| chunk.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
    }
}
