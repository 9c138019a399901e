use std::error::Error;
use std::fs;
use std::path::Path;

use lumen_blocks::{Block, BlockRegistry};
use lumen_chunk::{BlockPos, Chunk, ChunkCoord, ChunkDims, ChunkStore};
use lumen_propagation::BlockChange;
use serde::Deserialize;

// Top-level scene file
#[derive(Deserialize, Debug)]
pub struct SceneConfig {
    pub chunks: ChunkRange,
    // Block every cell starts as
    #[serde(default = "default_fill")]
    pub fill: String,
    // Lowest y with open sky; only used by the sunlight channel
    #[serde(default)]
    pub sky_height: i32,
    #[serde(default)]
    pub boxes: Vec<BoxDef>,
    #[serde(default)]
    pub blocks: Vec<PlaceDef>,
    // Applied as one batch after the initial lighting
    #[serde(default)]
    pub edits: Vec<PlaceDef>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct ChunkRange {
    pub size: [usize; 3],
    #[serde(default)]
    pub min: [i32; 3],
    // Inclusive
    #[serde(default)]
    pub max: [i32; 3],
}

// Inclusive world-space box
#[derive(Deserialize, Debug, Clone)]
pub struct BoxDef {
    pub block: String,
    pub min: [i32; 3],
    pub max: [i32; 3],
}

#[derive(Deserialize, Debug, Clone)]
pub struct PlaceDef {
    pub block: String,
    pub pos: [i32; 3],
}

fn default_fill() -> String {
    "air".to_string()
}

fn pos_of(p: [i32; 3]) -> BlockPos {
    BlockPos::new(p[0], p[1], p[2])
}

impl SceneConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: SceneConfig = toml::from_str(s)?;
        let [sx, sy, sz] = cfg.chunks.size;
        if sx == 0 || sy == 0 || sz == 0 {
            return Err(format!("chunk size {:?} has a zero dimension", cfg.chunks.size).into());
        }
        if (0..3).any(|i| cfg.chunks.min[i] > cfg.chunks.max[i]) {
            return Err(format!("chunk range {:?}..={:?} is empty", cfg.chunks.min, cfg.chunks.max).into());
        }
        Ok(cfg)
    }

    pub fn dims(&self) -> ChunkDims {
        let [sx, sy, sz] = self.chunks.size;
        ChunkDims::new(sx, sy, sz)
    }

    /// Chunk coordinates of the scene in load order (x fastest, then z, then y).
    pub fn chunk_coords(&self) -> Vec<ChunkCoord> {
        let ChunkRange { min, max, .. } = self.chunks;
        let mut out = Vec::new();
        for cy in min[1]..=max[1] {
            for cz in min[2]..=max[2] {
                for cx in min[0]..=max[0] {
                    out.push(ChunkCoord::new(cx, cy, cz));
                }
            }
        }
        out
    }

    /// Builds every chunk with fill, boxes and single blocks applied. Values start at 0.
    pub fn build_store(&self, reg: &BlockRegistry) -> Result<ChunkStore, Box<dyn Error>> {
        let dims = self.dims();
        let fill = resolve(reg, &self.fill)?;
        let mut store = ChunkStore::new(dims);
        for coord in self.chunk_coords() {
            if store.insert(Chunk::filled(coord, dims, fill)).is_err() {
                return Err(format!("chunk {:?} does not match dims {:?}", coord, dims).into());
            }
        }
        for b in &self.boxes {
            let block = resolve(reg, &b.block)?;
            for y in b.min[1]..=b.max[1] {
                for z in b.min[2]..=b.max[2] {
                    for x in b.min[0]..=b.max[0] {
                        // Parts of a box outside the loaded range are dropped
                        store.set_block(BlockPos::new(x, y, z), block);
                    }
                }
            }
        }
        for p in &self.blocks {
            let block = resolve(reg, &p.block)?;
            if store.set_block(pos_of(p.pos), block).is_none() {
                log::warn!("block `{}` at {:?} is outside the loaded chunks", p.block, p.pos);
            }
        }
        Ok(store)
    }

    /// Writes the scene edits into `store` and returns the ones that replaced a
    /// different block as block changes.
    pub fn apply_edits(&self, reg: &BlockRegistry, store: &mut ChunkStore) -> Result<Vec<BlockChange>, Box<dyn Error>> {
        let mut changes = Vec::with_capacity(self.edits.len());
        for e in &self.edits {
            let to = resolve(reg, &e.block)?;
            let pos = pos_of(e.pos);
            match store.set_block(pos, to) {
                Some(from) => {
                    let change = BlockChange::new(pos, from, to);
                    if change.is_effective() {
                        changes.push(change);
                    }
                }
                None => log::warn!("edit `{}` at {:?} is outside the loaded chunks", e.block, e.pos),
            }
        }
        Ok(changes)
    }
}

fn resolve(reg: &BlockRegistry, name: &str) -> Result<Block, Box<dyn Error>> {
    reg.block_by_name(name)
        .ok_or_else(|| format!("unknown block `{}` in scene", name).into())
}
