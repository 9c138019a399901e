use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::{BlockDef, BlocksConfig};
use super::types::{Block, BlockId, BlockState, Shape};

// Minimal duplication of the propagation face order to avoid a dependency from blocks → propagation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
enum Face {
    PosY = 0,
    NegY = 1,
}
impl Face {
    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

const ALL_FACES: u8 = 0b11_1111;

#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
    pub unknown_block_id: Option<BlockId>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            by_name: HashMap::new(),
            unknown_block_id: None,
        }
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize).filter(|ty| !ty.name.is_empty())
    }

    #[inline]
    pub fn get_block(&self, b: Block) -> Option<&BlockType> {
        self.get(b.id)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn block_by_name(&self, name: &str) -> Option<Block> {
        self.id_by_name(name).map(Block::from_id)
    }

    /// Resolves a block by name, falling back to the configured unknown block and then air.
    pub fn block_or_fallback(&self, name: &str) -> Block {
        self.block_by_name(name)
            .or_else(|| self.unknown_block_id.map(Block::from_id))
            .unwrap_or(Block::AIR)
    }

    pub fn load_from_path(blocks_path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let blocks_toml = fs::read_to_string(blocks_path)?;
        Self::from_toml_str(&blocks_toml)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry::new();
        let unknown_name = cfg.unknown_block.clone();
        for def in cfg.blocks.into_iter() {
            let id = def.id.unwrap_or(reg.blocks.len() as u16);
            if reg.by_name.contains_key(&def.name) {
                return Err(format!("duplicate block name `{}`", def.name).into());
            }
            if reg.get(id).is_some() {
                return Err(format!("block id {} of `{}` is already taken", id, def.name).into());
            }
            let ty = compile_block(id, def)?;
            if reg.blocks.len() <= id as usize {
                reg.blocks.resize(id as usize + 1, BlockType::placeholder(id));
            }
            reg.by_name.insert(ty.name.clone(), id);
            reg.blocks[id as usize] = ty;
        }
        if let Some(name) = unknown_name {
            reg.unknown_block_id = reg.id_by_name(&name);
        }
        Ok(reg)
    }
}

fn compile_block(id: BlockId, def: BlockDef) -> Result<BlockType, Box<dyn Error>> {
    if def.name.is_empty() {
        return Err(format!("block id {} has an empty name", id).into());
    }
    let solid = def.solid.unwrap_or(true);
    let blocks_skylight = def.blocks_skylight.unwrap_or(solid);
    let propagates_light = def.propagates_light.unwrap_or(!solid);
    let emission = def.emission.unwrap_or(0);
    let shape = match def.shape.as_deref() {
        Some(s) => Shape::from_name(s)
            .ok_or_else(|| format!("block `{}` has unknown shape `{}`", def.name, s))?,
        None if solid => Shape::Cube,
        None => Shape::None,
    };
    let full_faces = match shape {
        Shape::Cube if solid => ALL_FACES,
        Shape::SlabBottom => Face::NegY.bit(),
        Shape::SlabTop => Face::PosY.bit(),
        _ => 0,
    };
    Ok(BlockType {
        id,
        name: def.name,
        solid,
        blocks_skylight,
        propagates_light,
        emission,
        shape,
        full_faces,
    })
}

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub solid: bool,
    pub blocks_skylight: bool,
    pub propagates_light: bool,
    pub emission: u8,
    pub shape: Shape,
    // 6 bits in face order (+Y,-Y,+X,-X,+Z,-Z): faces fully covered by the shape
    pub full_faces: u8,
}

impl BlockType {
    fn placeholder(id: BlockId) -> Self {
        BlockType {
            id,
            name: String::new(),
            solid: true,
            blocks_skylight: true,
            propagates_light: false,
            emission: 0,
            shape: Shape::Cube,
            full_faces: ALL_FACES,
        }
    }

    pub fn is_solid(&self, _state: BlockState) -> bool {
        self.solid
    }
    pub fn blocks_skylight(&self, _state: BlockState) -> bool {
        self.blocks_skylight
    }
    pub fn propagates_light(&self, _state: BlockState) -> bool {
        self.propagates_light
    }
    pub fn light_emission(&self, _state: BlockState) -> u8 {
        self.emission
    }

    #[inline]
    pub fn is_face_full(&self, face_index: usize) -> bool {
        face_index < 6 && (self.full_faces & (1u8 << face_index)) != 0
    }

    /// Light may cross this face when the block is transparent or the face is not fully covered.
    #[inline]
    pub fn is_face_permeable(&self, state: BlockState, face_index: usize) -> bool {
        self.propagates_light(state) || !self.is_face_full(face_index)
    }
}
