//! Chunk grids, world/chunk coordinates and the in-memory chunk store.
#![forbid(unsafe_code)]

pub mod chunk;
pub mod coord;
pub mod store;

pub use chunk::{Chunk, ValueChannel};
pub use coord::{BlockPos, ChunkCoord, ChunkDims, neighborhood_index};
pub use store::{ChunkProvider, ChunkStore};
