use lumen_blocks::Block;

use crate::coord::{BlockPos, ChunkCoord, ChunkDims};

/// Which per-cell value grid of a chunk a propagator reads and writes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueChannel {
    Light,
    Sunlight,
}

/// Fixed-size block grid plus the parallel value grids.
#[derive(Clone, Debug)]
pub struct Chunk {
    pub coord: ChunkCoord,
    pub dims: ChunkDims,
    pub blocks: Vec<Block>,
    pub light: Vec<u8>,
    pub sunlight: Vec<u8>,
}

impl Chunk {
    pub fn filled(coord: ChunkCoord, dims: ChunkDims, block: Block) -> Self {
        let n = dims.volume();
        Chunk {
            coord,
            dims,
            blocks: vec![block; n],
            light: vec![0; n],
            sunlight: vec![0; n],
        }
    }

    pub fn from_blocks_local(coord: ChunkCoord, dims: ChunkDims, blocks: Vec<Block>) -> Self {
        let mut b = blocks;
        let expect = dims.volume();
        if b.len() != expect {
            b.resize(expect, Block::AIR);
        }
        Chunk {
            coord,
            dims,
            blocks: b,
            light: vec![0; expect],
            sunlight: vec![0; expect],
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        self.dims.idx(x, y, z)
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> Block {
        self.blocks[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, block: Block) -> Block {
        let i = self.idx(x, y, z);
        std::mem::replace(&mut self.blocks[i], block)
    }

    #[inline]
    pub fn origin(&self) -> BlockPos {
        self.dims.origin(self.coord)
    }

    #[inline]
    pub fn world_pos(&self, x: usize, y: usize, z: usize) -> BlockPos {
        self.origin().offset(x as i32, y as i32, z as i32)
    }

    /// Local coordinates of a world position, if it lies inside this chunk.
    #[inline]
    pub fn to_local(&self, pos: BlockPos) -> Option<(usize, usize, usize)> {
        let o = self.origin();
        let (lx, ly, lz) = (pos.x - o.x, pos.y - o.y, pos.z - o.z);
        if !self.dims.contains_local(lx, ly, lz) {
            return None;
        }
        Some((lx as usize, ly as usize, lz as usize))
    }

    #[inline]
    pub fn contains_world(&self, pos: BlockPos) -> bool {
        self.to_local(pos).is_some()
    }

    #[inline]
    pub fn get_world(&self, pos: BlockPos) -> Option<Block> {
        let (x, y, z) = self.to_local(pos)?;
        Some(self.get_local(x, y, z))
    }

    #[inline]
    pub fn channel(&self, channel: ValueChannel) -> &[u8] {
        match channel {
            ValueChannel::Light => &self.light,
            ValueChannel::Sunlight => &self.sunlight,
        }
    }

    #[inline]
    pub fn channel_mut(&mut self, channel: ValueChannel) -> &mut [u8] {
        match channel {
            ValueChannel::Light => &mut self.light,
            ValueChannel::Sunlight => &mut self.sunlight,
        }
    }

    #[inline]
    pub fn value(&self, channel: ValueChannel, x: usize, y: usize, z: usize) -> u8 {
        self.channel(channel)[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set_value(&mut self, channel: ValueChannel, x: usize, y: usize, z: usize, v: u8) {
        let i = self.idx(x, y, z);
        self.channel_mut(channel)[i] = v;
    }
}
