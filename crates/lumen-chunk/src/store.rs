use hashbrown::{HashMap, HashSet};
use lumen_blocks::Block;

use crate::chunk::Chunk;
use crate::coord::{BlockPos, ChunkCoord, ChunkDims, neighborhood_index};

/// Storage backend seen by propagation: chunk lookup by coordinate plus dirty notification.
pub trait ChunkProvider {
    fn dims(&self) -> ChunkDims;
    fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk>;
    fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk>;
    /// Mutable access to two distinct loaded chunks at once.
    fn chunk_pair_mut(&mut self, a: ChunkCoord, b: ChunkCoord) -> Option<[&mut Chunk; 2]>;
    /// Geometry of `coord` must be regenerated.
    fn mark_dirty(&mut self, coord: ChunkCoord);
}

#[derive(Default, Debug, Clone, Copy)]
pub struct ChunkStoreStats {
    pub loaded: usize,
    pub dirty: usize,
}

/// In-memory chunk map with dirty tracking.
pub struct ChunkStore {
    dims: ChunkDims,
    chunks: HashMap<ChunkCoord, Chunk>,
    dirty: HashSet<ChunkCoord>,
}

impl ChunkStore {
    pub fn new(dims: ChunkDims) -> Self {
        Self {
            dims,
            chunks: HashMap::new(),
            dirty: HashSet::new(),
        }
    }

    pub fn stats(&self) -> ChunkStoreStats {
        ChunkStoreStats {
            loaded: self.chunks.len(),
            dirty: self.dirty.len(),
        }
    }

    /// Inserts a chunk, replacing any chunk at the same coordinate. Chunks with
    /// different dimensions are rejected and handed back.
    pub fn insert(&mut self, chunk: Chunk) -> Result<Option<Chunk>, Chunk> {
        if chunk.dims != self.dims {
            return Err(chunk);
        }
        Ok(self.chunks.insert(chunk.coord, chunk))
    }

    pub fn remove(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        self.dirty.remove(&coord);
        self.chunks.remove(&coord)
    }

    #[inline]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn coords(&self) -> Vec<ChunkCoord> {
        let mut v: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        v.sort();
        v
    }

    pub fn block_at(&self, pos: BlockPos) -> Option<Block> {
        let (x, y, z) = self.dims.local_of(pos);
        self.chunks
            .get(&self.dims.chunk_of(pos))
            .map(|c| c.get_local(x, y, z))
    }

    /// Replaces the block at `pos`, returning the previous one. Values are left untouched;
    /// callers feed the returned pair to a propagator as a block change.
    pub fn set_block(&mut self, pos: BlockPos, block: Block) -> Option<Block> {
        let (x, y, z) = self.dims.local_of(pos);
        let chunk = self.chunks.get_mut(&self.dims.chunk_of(pos))?;
        Some(chunk.set_local(x, y, z, block))
    }

    /// Mutable borrows of every loaded chunk in the 3x3x3 neighborhood of `center`.
    pub fn neighborhood_mut(&mut self, center: ChunkCoord) -> [Option<&mut Chunk>; 27] {
        let mut slots: [Option<&mut Chunk>; 27] = std::array::from_fn(|_| None);
        for (coord, chunk) in self.chunks.iter_mut() {
            if let Some(i) = neighborhood_index(center, *coord) {
                slots[i] = Some(chunk);
            }
        }
        slots
    }

    #[inline]
    pub fn is_dirty(&self, coord: ChunkCoord) -> bool {
        self.dirty.contains(&coord)
    }

    /// Drains the dirty set in coordinate order.
    pub fn take_dirty(&mut self) -> Vec<ChunkCoord> {
        let mut v: Vec<ChunkCoord> = self.dirty.drain().collect();
        v.sort();
        v
    }
}

impl ChunkProvider for ChunkStore {
    #[inline]
    fn dims(&self) -> ChunkDims {
        self.dims
    }

    #[inline]
    fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    #[inline]
    fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    fn chunk_pair_mut(&mut self, a: ChunkCoord, b: ChunkCoord) -> Option<[&mut Chunk; 2]> {
        self.chunks.get_many_mut([&a, &b])
    }

    fn mark_dirty(&mut self, coord: ChunkCoord) {
        // Unloaded chunks have no geometry to rebuild
        if self.chunks.contains_key(&coord) {
            self.dirty.insert(coord);
        }
    }
}
