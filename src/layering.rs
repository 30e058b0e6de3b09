//! Per-chunk priority ordering of the views that claim each chunk.

use crate::block_position::ChunkKey;
use crate::view::ViewId;
use rustc_hash::FxHashMap;

/// A view listed on a chunk, with the priority it had when it was attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerEntry {
    pub priority: i32,
    pub view: ViewId,
}

/// Chunk key -> views covering it, highest priority first.
///
/// A view appears at most once per chunk. Among equal priorities the view that
/// was attached first stays ahead. Chunks with no views have no entry.
#[derive(Debug, Clone, Default)]
pub struct LayeringIndex {
    chunks: FxHashMap<ChunkKey, Vec<LayerEntry>>,
}

impl LayeringIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lists `view` on `key`. Returns `false` if it was already listed.
    pub fn attach(&mut self, key: ChunkKey, view: &ViewId, priority: i32) -> bool {
        let layers = self.chunks.entry(key).or_default();
        if layers.iter().any(|entry| &entry.view == view) {
            return false;
        }
        let at = layers.partition_point(|entry| entry.priority >= priority);
        layers.insert(
            at,
            LayerEntry {
                priority,
                view: view.clone(),
            },
        );
        log::trace!("attached view {}/{} to chunk {}", view.stage, view.view, key);
        true
    }

    /// Removes `view` from `key`. Survivors keep their relative order.
    pub fn detach(&mut self, key: ChunkKey, view: &ViewId) -> bool {
        let Some(layers) = self.chunks.get_mut(&key) else {
            return false;
        };
        let before = layers.len();
        layers.retain(|entry| &entry.view != view);
        let removed = layers.len() != before;
        if layers.is_empty() {
            self.chunks.remove(&key);
        }
        if removed {
            log::trace!("detached view {}/{} from chunk {}", view.stage, view.view, key);
        }
        removed
    }

    pub fn detach_all<'a, I>(&mut self, keys: I, view: &ViewId)
    where
        I: IntoIterator<Item = &'a ChunkKey>,
    {
        for key in keys {
            self.detach(*key, view);
        }
    }

    /// Moves `view` to its new priority slot on every chunk in `keys`.
    pub fn reprioritize<'a, I>(&mut self, keys: I, view: &ViewId, priority: i32)
    where
        I: IntoIterator<Item = &'a ChunkKey>,
    {
        for key in keys {
            if self.detach(*key, view) {
                self.attach(*key, view, priority);
            }
        }
    }

    /// The highest-priority view claiming `key`.
    pub fn resolve_top(&self, key: ChunkKey) -> Option<&ViewId> {
        self.chunks
            .get(&key)
            .and_then(|layers| layers.first())
            .map(|entry| &entry.view)
    }

    /// Views on `key`, highest priority first. Empty if none.
    pub fn layers(&self, key: ChunkKey) -> &[LayerEntry] {
        self.chunks.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_chunk(&self, key: ChunkKey) -> bool {
        self.chunks.contains_key(&key)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChunkKey, &[LayerEntry])> {
        self.chunks.iter().map(|(key, layers)| (key, layers.as_slice()))
    }
}
