use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of a chunk column along X and Z, in blocks.
pub const CHUNK_WIDTH: i32 = 16;

/// Bits to shift a block coordinate by to get its chunk coordinate.
pub const CHUNK_SHIFT: u32 = 4;

/// Integer block coordinates in world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPosition {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        BlockPosition { x, y, z }
    }

    pub fn chunk_key(&self) -> ChunkKey {
        ChunkKey::from_position(*self)
    }
}

impl From<(i32, i32, i32)> for BlockPosition {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        BlockPosition::new(x, y, z)
    }
}

impl From<BlockPosition> for (i32, i32, i32) {
    fn from(pos: BlockPosition) -> Self {
        (pos.x, pos.y, pos.z)
    }
}

impl fmt::Display for BlockPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Packed identifier of a 16x16 full-height chunk column.
///
/// The low 32 bits hold the chunk X coordinate and the high 32 bits the chunk Z
/// coordinate, matching the key layout used by Paper servers. Every conversion
/// from a block position goes through [`ChunkKey::from_position`] so the store,
/// the layering index and view claims all agree on the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkKey(pub i64);

impl ChunkKey {
    /// Key for the chunk at chunk-grid coordinates `(chunk_x, chunk_z)`.
    pub fn new(chunk_x: i32, chunk_z: i32) -> Self {
        ChunkKey((chunk_x as u32 as i64) | ((chunk_z as u32 as i64) << 32))
    }

    pub fn from_block_coords(x: i32, z: i32) -> Self {
        ChunkKey::new(x >> CHUNK_SHIFT, z >> CHUNK_SHIFT)
    }

    pub fn from_position(pos: BlockPosition) -> Self {
        ChunkKey::from_block_coords(pos.x, pos.z)
    }

    pub fn chunk_x(&self) -> i32 {
        self.0 as i32
    }

    pub fn chunk_z(&self) -> i32 {
        (self.0 >> 32) as i32
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ChunkKey {
    fn from(raw: i64) -> Self {
        ChunkKey(raw)
    }
}

impl fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.chunk_x(), self.chunk_z())
    }
}
