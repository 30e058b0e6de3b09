//! Per-viewer block illusions: chunk-indexed override caches layered by
//! prioritized views and synchronized to a viewer and its spectators.

pub mod block_position;
pub mod block_state;
pub mod bounding_box;
pub mod error;
pub mod layering;
pub mod manager;
pub mod settings;
pub mod stage;
pub mod store;
pub mod sync;
pub mod view;

pub use block_position::{BlockPosition, ChunkKey};
pub use block_state::BlockState;
pub use bounding_box::BoundingBox;
pub use error::{ChromaError, Result};
pub use layering::{LayerEntry, LayeringIndex};
pub use manager::BlockManager;
pub use settings::ManagerSettings;
pub use stage::Stage;
pub use store::ChunkBlockStore;
pub use sync::{BlockBatch, BlockChangeSink, FnSink, RecordingSink};
pub use view::{View, ViewId};
