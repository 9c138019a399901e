use serde::{Deserialize, Serialize};

// Compact voxel representation used at runtime
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub state: BlockState,
}

pub type BlockId = u16;
pub type BlockState = u16;

impl Block {
    pub const AIR: Block = Block { id: 0, state: 0 };

    #[inline]
    pub const fn from_id(id: BlockId) -> Self {
        Block { id, state: 0 }
    }
}

// Coarse shape, only used to decide which faces fully cover the cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Cube,
    SlabBottom,
    SlabTop,
    None,
}

impl Shape {
    pub fn from_name(s: &str) -> Option<Shape> {
        match s {
            "cube" => Some(Shape::Cube),
            "slab_bottom" => Some(Shape::SlabBottom),
            "slab_top" => Some(Shape::SlabTop),
            "none" => Some(Shape::None),
            _ => None,
        }
    }
}
