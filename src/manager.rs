//! Per-viewer owner of the override cache, stages, layering index and spectators.

use crate::block_position::{BlockPosition, ChunkKey};
use crate::block_state::BlockState;
use crate::bounding_box::BoundingBox;
use crate::error::{ChromaError, Result};
use crate::layering::LayeringIndex;
use crate::settings::ManagerSettings;
use crate::stage::Stage;
use crate::store::{ChunkBlockStore, ChunkBlocks};
use crate::sync::{self, BlockBatch, BlockChangeSink};
use crate::view::View;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use std::collections::BTreeMap;
use std::hash::Hash;

/// Everything one viewer sees instead of the real world.
///
/// `V` identifies viewers (the owner and its spectators) and `S` delivers
/// batches to them. A manager is owned by the viewer's session and mutated from
/// a single thread; it holds no locks.
///
/// Mutations only touch the cache. Call one of the `sync_*` methods afterwards
/// to push the change to the viewer and spectators.
pub struct BlockManager<V, S> {
    viewer: V,
    sink: S,
    settings: ManagerSettings,
    store: ChunkBlockStore,
    stages: BTreeMap<SmolStr, Stage>,
    layering: LayeringIndex,
    spectators: FxHashSet<V>,
}

impl<V, S> BlockManager<V, S>
where
    V: Clone + Eq + Hash,
    S: BlockChangeSink<V>,
{
    pub fn new(viewer: V, sink: S) -> Self {
        Self::with_settings(viewer, sink, ManagerSettings::default())
    }

    pub fn with_settings(viewer: V, sink: S, settings: ManagerSettings) -> Self {
        BlockManager {
            viewer,
            sink,
            settings,
            store: ChunkBlockStore::new(),
            stages: BTreeMap::new(),
            layering: LayeringIndex::new(),
            spectators: FxHashSet::default(),
        }
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn settings(&self) -> &ManagerSettings {
        &self.settings
    }

    pub fn store(&self) -> &ChunkBlockStore {
        &self.store
    }

    pub fn layering(&self) -> &LayeringIndex {
        &self.layering
    }

    // -- Overrides --

    pub fn set_block(&mut self, pos: BlockPosition, block: BlockState) {
        self.store.set_block(pos, block);
    }

    pub fn set_blocks<I>(&mut self, blocks: I)
    where
        I: IntoIterator<Item = (BlockPosition, BlockState)>,
    {
        self.store.set_blocks(blocks);
    }

    /// Sets the same block at every position.
    pub fn fill<I>(&mut self, positions: I, block: &BlockState)
    where
        I: IntoIterator<Item = BlockPosition>,
    {
        self.store.fill(positions, block);
    }

    /// Stores an override, optionally on behalf of a view.
    ///
    /// Without a view name the override is stored and no view is involved. With
    /// one, stages are searched in name order for a view of that name whose bound
    /// contains `pos`; that view claims the chunk and is layered onto it. If no
    /// such view exists nothing is stored and `false` is returned.
    pub fn add_block_data(
        &mut self,
        pos: BlockPosition,
        block: BlockState,
        view_name: Option<&str>,
    ) -> bool {
        let Some(view_name) = view_name else {
            self.store.set_block(pos, block);
            return true;
        };

        let key = pos.chunk_key();
        let Some(view) = self
            .stages
            .values_mut()
            .filter_map(|stage| stage.view_mut(view_name))
            .find(|view| view.bound_contains(pos))
        else {
            log::trace!("no view '{}' covers {}, override dropped", view_name, pos);
            return false;
        };

        view.add_chunk(key);
        let id = view.id();
        let priority = view.priority();

        self.store.set_block(pos, block);
        self.layering.attach(key, &id, priority);
        true
    }

    pub fn get_block(&self, pos: BlockPosition) -> Option<&BlockState> {
        self.store.get_block(pos)
    }

    pub fn remove_block(&mut self, pos: BlockPosition) -> Option<BlockState> {
        self.store.remove_block(pos)
    }

    pub fn has_block(&self, pos: BlockPosition) -> bool {
        self.store.has_block(pos)
    }

    pub fn has_chunk(&self, key: ChunkKey) -> bool {
        self.store.has_chunk(key)
    }

    pub fn blocks_in_chunk(&self, key: ChunkKey) -> ChunkBlocks {
        self.store.blocks_in_chunk(key)
    }

    pub fn highest_at(&self, x: i32, z: i32) -> Option<BlockPosition> {
        self.store.highest_at(x, z)
    }

    // -- Stages and views --

    /// Registers a stage and layers every chunk its views already claim.
    ///
    /// A stage registered under the same name is unwound and replaced.
    pub fn add_stage(&mut self, stage: Stage) {
        let name = SmolStr::new(stage.name());
        if let Some(old) = self.stages.remove(&name) {
            log::debug!("replacing stage '{}'", name);
            for view in old.views() {
                self.layering.detach_all(view.chunk_keys(), &view.id());
            }
        }
        for view in stage.views() {
            attach_view(&mut self.layering, view);
        }
        log::debug!("added stage '{}' with {} view(s)", name, stage.len());
        self.stages.insert(name, stage);
    }

    /// Unregisters a stage, removing all of its views from the layering index.
    pub fn remove_stage(&mut self, name: &str) -> Option<Stage> {
        let stage = self.stages.remove(name)?;
        for view in stage.views() {
            self.layering.detach_all(view.chunk_keys(), &view.id());
        }
        log::debug!("removed stage '{}'", name);
        Some(stage)
    }

    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.get(name)
    }

    pub fn stages(&self) -> impl Iterator<Item = &Stage> {
        self.stages.values()
    }

    /// Adds a view to a registered stage and layers the chunks it claims.
    ///
    /// Returns `false` without doing anything if the stage is unknown.
    pub fn add_view_to_stage(&mut self, stage_name: &str, view: View) -> bool {
        self.try_add_view_to_stage(stage_name, view).is_ok()
    }

    pub fn try_add_view_to_stage(&mut self, stage_name: &str, view: View) -> Result<()> {
        let stage = self
            .stages
            .get_mut(stage_name)
            .ok_or_else(|| ChromaError::UnknownStage(stage_name.into()))?;

        let view_name = SmolStr::new(view.name());
        if let Some(replaced) = stage.add_view(view) {
            self.layering.detach_all(replaced.chunk_keys(), &replaced.id());
        }
        if let Some(view) = stage.view(&view_name) {
            attach_view(&mut self.layering, view);
        }
        log::debug!("added view '{}' to stage '{}'", view_name, stage_name);
        Ok(())
    }

    /// Removes a view from its stage and from every chunk it claims.
    pub fn remove_view_from_stage(&mut self, stage_name: &str, view_name: &str) -> Option<View> {
        let view = self.stages.get_mut(stage_name)?.remove_view(view_name)?;
        self.layering.detach_all(view.chunk_keys(), &view.id());
        log::debug!("removed view '{}' from stage '{}'", view_name, stage_name);
        Some(view)
    }

    pub fn view(&self, stage_name: &str, view_name: &str) -> Option<&View> {
        self.stages.get(stage_name)?.view(view_name)
    }

    /// The highest-priority view claiming the chunk that contains `pos`.
    pub fn view_at(&self, pos: BlockPosition) -> Option<&View> {
        let id = self.layering.resolve_top(pos.chunk_key())?;
        self.view(&id.stage, &id.view)
    }

    /// Whether the governing view at `pos` allows the block to be broken.
    pub fn is_breakable_at(&self, pos: BlockPosition) -> Option<bool> {
        self.view_at(pos).map(View::is_breakable)
    }

    /// Changes a view's priority and moves it within every chunk it claims.
    pub fn set_view_priority(
        &mut self,
        stage_name: &str,
        view_name: &str,
        priority: i32,
    ) -> Result<()> {
        let Self { stages, layering, .. } = self;
        let view = view_mut(stages, stage_name, view_name)?;
        view.set_priority(priority);
        layering.reprioritize(view.chunk_keys(), &view.id(), priority);
        Ok(())
    }

    pub fn set_view_breakable(
        &mut self,
        stage_name: &str,
        view_name: &str,
        breakable: bool,
    ) -> Result<()> {
        view_mut(&mut self.stages, stage_name, view_name)?.set_breakable(breakable);
        Ok(())
    }

    /// Replaces a view's bound, or clears it with `None`. Chunks it already
    /// claims stay claimed.
    pub fn set_view_bound(
        &mut self,
        stage_name: &str,
        view_name: &str,
        bound: Option<BoundingBox>,
    ) -> Result<()> {
        view_mut(&mut self.stages, stage_name, view_name)?.set_bound(bound);
        Ok(())
    }

    // -- Spectators --

    /// Adds a spectator and, unless disabled, sends it every current override.
    /// The owning viewer is never registered as its own spectator.
    pub fn add_spectator(&mut self, spectator: V) {
        if spectator == self.viewer {
            log::debug!("ignoring owner added as spectator");
            return;
        }
        if !self.spectators.insert(spectator.clone()) {
            return;
        }
        log::debug!("spectator added, {} watching", self.spectators.len());
        if self.settings.sync_on_spectator_join {
            self.sync_all_to(&spectator);
        }
    }

    /// Removes a spectator. No corrective batch is sent.
    pub fn remove_spectator(&mut self, spectator: &V) -> bool {
        self.spectators.remove(spectator)
    }

    pub fn is_spectator(&self, viewer: &V) -> bool {
        self.spectators.contains(viewer)
    }

    pub fn spectators(&self) -> impl Iterator<Item = &V> {
        self.spectators.iter()
    }

    // -- Synchronization --

    /// Sends every cached override to the viewer and spectators.
    /// Returns the batch size.
    pub fn sync_all(&self) -> usize {
        let batch = sync::collect_all(&self.store);
        self.dispatch(&batch);
        batch.len()
    }

    /// Sends every cached override to a single recipient.
    pub fn sync_all_to(&self, recipient: &V) -> usize {
        let batch = sync::collect_all(&self.store);
        self.send(recipient, &batch);
        batch.len()
    }

    /// Sends the overrides at `positions`, skipping positions without one.
    pub fn sync_positions<'a, I>(&self, positions: I) -> usize
    where
        I: IntoIterator<Item = &'a BlockPosition>,
    {
        let batch = sync::collect_positions(&self.store, positions);
        self.dispatch(&batch);
        batch.len()
    }

    /// Sends every override in the chunks a view claims. `None` if the view is unknown.
    pub fn sync_view(&self, stage_name: &str, view_name: &str) -> Option<usize> {
        let view = self.view(stage_name, view_name)?;
        let batch = sync::collect_chunks(&self.store, view.chunk_keys());
        self.dispatch(&batch);
        Some(batch.len())
    }

    /// Sends the reset block at every cached position to one recipient, leaving
    /// the cache untouched.
    pub fn reset_viewer(&self, recipient: &V) -> usize {
        let batch = sync::reset_batch(&self.store, &self.settings.reset_block);
        self.send(recipient, &batch);
        batch.len()
    }

    /// Restores reality for the viewer and spectators, then clears all cached
    /// overrides, the layering index and every view's chunk claims.
    pub fn teardown(&mut self) -> usize {
        let batch = sync::reset_batch(&self.store, &self.settings.reset_block);
        self.dispatch(&batch);

        self.store.clear();
        self.layering.clear();
        for stage in self.stages.values_mut() {
            for view in stage.views_mut() {
                view.clear_chunks();
            }
        }
        log::debug!("teardown reset {} position(s)", batch.len());
        batch.len()
    }

    fn dispatch(&self, batch: &BlockBatch) {
        if batch.is_empty() && self.settings.skip_empty_batches {
            return;
        }
        self.sink.send_block_changes(&self.viewer, batch);
        for spectator in &self.spectators {
            self.sink.send_block_changes(spectator, batch);
        }
    }

    fn send(&self, recipient: &V, batch: &BlockBatch) {
        if batch.is_empty() && self.settings.skip_empty_batches {
            return;
        }
        self.sink.send_block_changes(recipient, batch);
    }
}

fn attach_view(layering: &mut LayeringIndex, view: &View) {
    let id = view.id();
    for key in view.chunk_keys() {
        layering.attach(*key, &id, view.priority());
    }
}

fn view_mut<'a>(
    stages: &'a mut BTreeMap<SmolStr, Stage>,
    stage_name: &str,
    view_name: &str,
) -> Result<&'a mut View> {
    stages
        .get_mut(stage_name)
        .ok_or_else(|| ChromaError::UnknownStage(stage_name.into()))?
        .view_mut(view_name)
        .ok_or_else(|| ChromaError::UnknownView {
            stage: stage_name.into(),
            view: view_name.into(),
        })
}
