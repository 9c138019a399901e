use std::sync::Arc;

use lumen_blocks::{Block, BlockRegistry, BlockType};
use lumen_chunk::{BlockPos, ValueChannel};

use crate::face::Face;
use crate::rules::PropagationRules;

pub const MAX_LIGHT: u8 = 15;

/// Block light: emitters are sources, one unit lost per step.
#[derive(Clone)]
pub struct LightRules {
    reg: Arc<BlockRegistry>,
}

impl LightRules {
    pub fn new(reg: Arc<BlockRegistry>) -> Self {
        Self { reg }
    }

    #[inline]
    fn ty(&self, block: Block) -> Option<&BlockType> {
        self.reg.get_block(block)
    }
}

impl PropagationRules for LightRules {
    #[inline]
    fn max_value(&self) -> u8 {
        MAX_LIGHT
    }

    fn fixed_value(&self, block: Block, _pos: BlockPos) -> u8 {
        self.ty(block)
            .map(|ty| ty.light_emission(block.state).min(MAX_LIGHT))
            .unwrap_or(0)
    }

    #[inline]
    fn propagate_value(&self, value: u8, _face: Face, _from: Block, scale: u8) -> u8 {
        value.saturating_sub(scale)
    }

    fn can_spread_out_of(&self, block: Block, face: Face) -> bool {
        self.ty(block).is_some_and(|ty| {
            ty.is_face_permeable(block.state, face.index()) || ty.light_emission(block.state) > 0
        })
    }

    fn can_spread_into(&self, block: Block, face: Face) -> bool {
        self.ty(block)
            .is_some_and(|ty| ty.is_face_permeable(block.state, face.index()))
    }

    #[inline]
    fn channel(&self) -> ValueChannel {
        ValueChannel::Light
    }
}

/// Sky light: open cells at or above `sky_height` hold full strength, which
/// falls straight down without loss.
#[derive(Clone)]
pub struct SunlightRules {
    reg: Arc<BlockRegistry>,
    sky_height: i32,
}

impl SunlightRules {
    pub fn new(reg: Arc<BlockRegistry>, sky_height: i32) -> Self {
        Self { reg, sky_height }
    }

    #[inline]
    pub fn sky_height(&self) -> i32 {
        self.sky_height
    }

    // Unknown ids block sky light like stone
    fn passes(&self, block: Block, face: Face) -> bool {
        self.reg.get_block(block).is_some_and(|ty| {
            let f = face.index();
            ty.is_face_permeable(block.state, f)
                && (!ty.blocks_skylight(block.state) || !ty.is_face_full(f))
        })
    }
}

impl PropagationRules for SunlightRules {
    #[inline]
    fn max_value(&self) -> u8 {
        MAX_LIGHT
    }

    fn fixed_value(&self, block: Block, pos: BlockPos) -> u8 {
        if pos.y < self.sky_height {
            return 0;
        }
        match self.reg.get_block(block) {
            Some(ty) if !ty.blocks_skylight(block.state) => MAX_LIGHT,
            _ => 0,
        }
    }

    #[inline]
    fn propagate_value(&self, value: u8, face: Face, _from: Block, scale: u8) -> u8 {
        if face == Face::NegY && value == MAX_LIGHT {
            MAX_LIGHT
        } else {
            value.saturating_sub(scale)
        }
    }

    #[inline]
    fn can_spread_out_of(&self, block: Block, face: Face) -> bool {
        self.passes(block, face)
    }

    #[inline]
    fn can_spread_into(&self, block: Block, face: Face) -> bool {
        self.passes(block, face)
    }

    #[inline]
    fn channel(&self) -> ValueChannel {
        ValueChannel::Sunlight
    }
}
