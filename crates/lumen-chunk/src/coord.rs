use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            cz: self.cz + dz,
        }
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkCoord> for (i32, i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy, value.cz)
    }
}

/// Absolute block position in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Manhattan distance, the number of face steps between two cells.
    #[inline]
    pub fn grid_distance(self, other: BlockPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) + self.z.abs_diff(other.z)
    }
}

impl From<(i32, i32, i32)> for BlockPos {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<BlockPos> for (i32, i32, i32) {
    fn from(value: BlockPos) -> Self {
        (value.x, value.y, value.z)
    }
}

/// Chunk extent shared by every chunk of a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkDims {
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
}

impl ChunkDims {
    #[inline]
    pub const fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self { sx, sy, sz }
    }

    #[inline]
    pub fn volume(self) -> usize {
        self.sx * self.sy * self.sz
    }

    #[inline]
    pub fn idx(self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    pub fn contains_local(self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.sx
            && (y as usize) < self.sy
            && (z as usize) < self.sz
    }

    #[inline]
    pub fn chunk_of(self, pos: BlockPos) -> ChunkCoord {
        ChunkCoord::new(
            pos.x.div_euclid(self.sx as i32),
            pos.y.div_euclid(self.sy as i32),
            pos.z.div_euclid(self.sz as i32),
        )
    }

    #[inline]
    pub fn local_of(self, pos: BlockPos) -> (usize, usize, usize) {
        (
            pos.x.rem_euclid(self.sx as i32) as usize,
            pos.y.rem_euclid(self.sy as i32) as usize,
            pos.z.rem_euclid(self.sz as i32) as usize,
        )
    }

    #[inline]
    pub fn origin(self, coord: ChunkCoord) -> BlockPos {
        BlockPos::new(
            coord.cx * self.sx as i32,
            coord.cy * self.sy as i32,
            coord.cz * self.sz as i32,
        )
    }
}

/// Slot of `coord` in the 3x3x3 neighborhood around `center`, or `None` when it lies outside.
#[inline]
pub fn neighborhood_index(center: ChunkCoord, coord: ChunkCoord) -> Option<usize> {
    let dx = coord.cx - center.cx;
    let dy = coord.cy - center.cy;
    let dz = coord.cz - center.cz;
    if !(-1..=1).contains(&dx) || !(-1..=1).contains(&dy) || !(-1..=1).contains(&dz) {
        return None;
    }
    Some(((dy + 1) * 9 + (dz + 1) * 3 + (dx + 1)) as usize)
}
