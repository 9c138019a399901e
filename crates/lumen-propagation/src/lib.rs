//! Batch value propagation (block light, sunlight) over chunked voxel grids.
#![forbid(unsafe_code)]

pub mod batch;
pub mod change;
pub mod edge;
pub mod face;
pub mod light;
pub mod rules;
pub mod view;

pub use batch::{BatchPropagator, ProcessStats};
pub use change::BlockChange;
pub use edge::relight_loaded_neighbors;
pub use face::Face;
pub use light::{LightRules, SunlightRules};
pub use rules::{PropagationComparison, PropagationRules};
pub use view::{ChunkView, LocalChunkView, PropagatorWorldView, ProviderWorldView};
