use lumen_blocks::Block;
use lumen_chunk::{BlockPos, Chunk, ChunkCoord, ChunkDims, ChunkProvider, ChunkStore, neighborhood_index};

use crate::rules::PropagationRules;

/// World-space access used by the propagator. `None` means the position is not
/// loaded; writes to such positions are ignored.
pub trait PropagatorWorldView {
    fn value_at(&self, pos: BlockPos) -> Option<u8>;
    fn set_value_at(&mut self, pos: BlockPos, value: u8);
    fn block_at(&self, pos: BlockPos) -> Option<Block>;
}

/// View over a single chunk; everything outside it is unavailable.
pub struct ChunkView<'a, R> {
    rules: &'a R,
    chunk: &'a mut Chunk,
}

impl<'a, R: PropagationRules> ChunkView<'a, R> {
    pub fn new(rules: &'a R, chunk: &'a mut Chunk) -> Self {
        Self { rules, chunk }
    }
}

impl<R: PropagationRules> PropagatorWorldView for ChunkView<'_, R> {
    fn value_at(&self, pos: BlockPos) -> Option<u8> {
        let (x, y, z) = self.chunk.to_local(pos)?;
        Some(self.rules.value(&*self.chunk, x, y, z))
    }

    fn set_value_at(&mut self, pos: BlockPos, value: u8) {
        if let Some((x, y, z)) = self.chunk.to_local(pos) {
            self.rules.set_value(self.chunk, x, y, z, value);
        }
    }

    fn block_at(&self, pos: BlockPos) -> Option<Block> {
        self.chunk.get_world(pos)
    }
}

/// View over the 3x3x3 chunks around `center`; missing slots are unavailable.
pub struct LocalChunkView<'a, R> {
    rules: &'a R,
    dims: ChunkDims,
    center: ChunkCoord,
    slots: [Option<&'a mut Chunk>; 27],
}

impl<'a, R: PropagationRules> LocalChunkView<'a, R> {
    /// `slots` are ordered by `neighborhood_index`.
    pub fn new(
        rules: &'a R,
        dims: ChunkDims,
        center: ChunkCoord,
        slots: [Option<&'a mut Chunk>; 27],
    ) -> Self {
        Self {
            rules,
            dims,
            center,
            slots,
        }
    }

    pub fn from_store(rules: &'a R, store: &'a mut ChunkStore, center: ChunkCoord) -> Self {
        let dims = store.dims();
        Self::new(rules, dims, center, store.neighborhood_mut(center))
    }

    #[inline]
    pub fn center(&self) -> ChunkCoord {
        self.center
    }

    #[inline]
    fn slot(&self, pos: BlockPos) -> Option<&Chunk> {
        let i = neighborhood_index(self.center, self.dims.chunk_of(pos))?;
        self.slots[i].as_deref()
    }

    #[inline]
    fn slot_mut(&mut self, pos: BlockPos) -> Option<&mut Chunk> {
        let i = neighborhood_index(self.center, self.dims.chunk_of(pos))?;
        self.slots[i].as_deref_mut()
    }
}

impl<R: PropagationRules> PropagatorWorldView for LocalChunkView<'_, R> {
    fn value_at(&self, pos: BlockPos) -> Option<u8> {
        let chunk = self.slot(pos)?;
        let (x, y, z) = self.dims.local_of(pos);
        Some(self.rules.value(chunk, x, y, z))
    }

    fn set_value_at(&mut self, pos: BlockPos, value: u8) {
        let (x, y, z) = self.dims.local_of(pos);
        let rules = self.rules;
        if let Some(chunk) = self.slot_mut(pos) {
            rules.set_value(chunk, x, y, z, value);
        }
    }

    fn block_at(&self, pos: BlockPos) -> Option<Block> {
        let chunk = self.slot(pos)?;
        let (x, y, z) = self.dims.local_of(pos);
        Some(chunk.get_local(x, y, z))
    }
}

/// View over every loaded chunk of a provider. Writes mark the chunks touching
/// the written cell dirty so their geometry is rebuilt.
pub struct ProviderWorldView<'a, P: ?Sized, R> {
    rules: &'a R,
    provider: &'a mut P,
}

impl<'a, P: ChunkProvider + ?Sized, R: PropagationRules> ProviderWorldView<'a, P, R> {
    pub fn new(rules: &'a R, provider: &'a mut P) -> Self {
        Self { rules, provider }
    }

    fn mark_around(&mut self, pos: BlockPos) {
        let dims = self.provider.dims();
        let lo = dims.chunk_of(pos.offset(-1, -1, -1));
        let hi = dims.chunk_of(pos.offset(1, 1, 1));
        for cy in lo.cy..=hi.cy {
            for cz in lo.cz..=hi.cz {
                for cx in lo.cx..=hi.cx {
                    self.provider.mark_dirty(ChunkCoord::new(cx, cy, cz));
                }
            }
        }
    }
}

impl<P: ChunkProvider + ?Sized, R: PropagationRules> PropagatorWorldView for ProviderWorldView<'_, P, R> {
    fn value_at(&self, pos: BlockPos) -> Option<u8> {
        let dims = self.provider.dims();
        let chunk = self.provider.chunk(dims.chunk_of(pos))?;
        let (x, y, z) = dims.local_of(pos);
        Some(self.rules.value(chunk, x, y, z))
    }

    fn set_value_at(&mut self, pos: BlockPos, value: u8) {
        let dims = self.provider.dims();
        let (x, y, z) = dims.local_of(pos);
        let Some(chunk) = self.provider.chunk_mut(dims.chunk_of(pos)) else {
            return;
        };
        self.rules.set_value(chunk, x, y, z, value);
        self.mark_around(pos);
    }

    fn block_at(&self, pos: BlockPos) -> Option<Block> {
        let dims = self.provider.dims();
        let chunk = self.provider.chunk(dims.chunk_of(pos))?;
        let (x, y, z) = dims.local_of(pos);
        Some(chunk.get_local(x, y, z))
    }
}
