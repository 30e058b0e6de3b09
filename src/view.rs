use crate::block_position::{BlockPosition, ChunkKey};
use crate::bounding_box::BoundingBox;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

/// Identifies a view across stages: `(stage name, view name)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId {
    pub stage: SmolStr,
    pub view: SmolStr,
}

impl ViewId {
    pub fn new(stage: impl Into<SmolStr>, view: impl Into<SmolStr>) -> Self {
        ViewId {
            stage: stage.into(),
            view: view.into(),
        }
    }
}

/// A named, prioritized region of overrides inside a stage.
///
/// Higher `priority` wins where views overlap. `breakable` is only read by the
/// interaction layer. A view without a bound claims chunks exclusively through
/// [`View::add_chunk`].
#[derive(Debug, Clone)]
pub struct View {
    name: SmolStr,
    stage: SmolStr,
    priority: i32,
    breakable: bool,
    bound: Option<BoundingBox>,
    chunk_keys: FxHashSet<ChunkKey>,
}

impl View {
    pub fn new(stage: impl Into<SmolStr>, name: impl Into<SmolStr>, bound: BoundingBox) -> Self {
        View {
            name: name.into(),
            stage: stage.into(),
            priority: 0,
            breakable: false,
            bound: Some(bound),
            chunk_keys: FxHashSet::default(),
        }
    }

    pub fn unbounded(stage: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        View {
            name: name.into(),
            stage: stage.into(),
            priority: 0,
            breakable: false,
            bound: None,
            chunk_keys: FxHashSet::default(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_breakable(mut self, breakable: bool) -> Self {
        self.breakable = breakable;
        self
    }

    pub fn id(&self) -> ViewId {
        ViewId::new(self.stage.clone(), self.name.clone())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the stage this view belongs to.
    pub fn stage(&self) -> &str {
        &self.stage
    }

    pub(crate) fn set_stage(&mut self, stage: SmolStr) {
        self.stage = stage;
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    pub fn is_breakable(&self) -> bool {
        self.breakable
    }

    pub fn set_breakable(&mut self, breakable: bool) {
        self.breakable = breakable;
    }

    pub fn bound(&self) -> Option<&BoundingBox> {
        self.bound.as_ref()
    }

    /// `None` makes the view unbounded, so tagged adds no longer match it.
    pub fn set_bound(&mut self, bound: Option<BoundingBox>) {
        self.bound = bound;
    }

    /// True when the view has a bound and `pos` lies inside it.
    pub fn bound_contains(&self, pos: BlockPosition) -> bool {
        self.bound.is_some_and(|b| b.contains(pos))
    }

    /// Returns `true` when the key was not claimed before.
    pub fn add_chunk(&mut self, key: ChunkKey) -> bool {
        self.chunk_keys.insert(key)
    }

    pub fn contains_chunk(&self, key: ChunkKey) -> bool {
        self.chunk_keys.contains(&key)
    }

    pub(crate) fn clear_chunks(&mut self) {
        self.chunk_keys.clear();
    }

    pub fn chunk_keys(&self) -> &FxHashSet<ChunkKey> {
        &self.chunk_keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_chunk_is_idempotent() {
        let mut view = View::new("s", "v", BoundingBox::new((0, 0, 0), (15, 255, 15)));
        let key = ChunkKey::new(0, 0);
        assert!(view.add_chunk(key));
        assert!(!view.add_chunk(key));
        assert_eq!(view.chunk_keys().len(), 1);
        assert!(view.contains_chunk(key));
        assert!(!view.contains_chunk(ChunkKey::new(1, 0)));
    }

    #[test]
    fn test_unbounded_view_contains_nothing() {
        let view = View::unbounded("s", "v");
        assert!(view.bound().is_none());
        assert!(!view.bound_contains(BlockPosition::new(0, 0, 0)));
    }

    #[test]
    fn test_clearing_bound_makes_view_unbounded() {
        let mut view = View::new("s", "v", BoundingBox::new((0, 0, 0), (15, 255, 15)));
        assert!(view.bound_contains(BlockPosition::new(1, 1, 1)));
        view.set_bound(None);
        assert!(view.bound().is_none());
        assert!(!view.bound_contains(BlockPosition::new(1, 1, 1)));
        view.set_bound(Some(BoundingBox::new((16, 0, 0), (31, 0, 15))));
        assert!(view.bound_contains(BlockPosition::new(20, 0, 4)));
    }

    #[test]
    fn test_builder_flags() {
        let view = View::new("arena", "floor", BoundingBox::default())
            .with_priority(3)
            .with_breakable(true);
        assert_eq!(view.priority(), 3);
        assert!(view.is_breakable());
        assert_eq!(view.id(), ViewId::new("arena", "floor"));
        assert_eq!(view.stage(), "arena");
    }
}
