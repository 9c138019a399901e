use lumen_blocks::Block;
use lumen_chunk::{BlockPos, Chunk, ValueChannel};

use crate::face::Face;

/// How a block change alters flow through one face.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PropagationComparison {
    MoreRestricted,
    MorePermissive,
    Identical,
}

impl PropagationComparison {
    #[inline]
    pub fn is_restricting(self) -> bool {
        self == PropagationComparison::MoreRestricted
    }

    #[inline]
    pub fn is_permitting(self) -> bool {
        self == PropagationComparison::MorePermissive
    }
}

/// Policy for one propagated quantity. Implementations must attenuate strictly
/// enough that every path eventually reaches 0.
pub trait PropagationRules {
    fn max_value(&self) -> u8;

    /// Source value a block holds regardless of its surroundings.
    fn fixed_value(&self, block: Block, pos: BlockPos) -> u8;

    /// Value arriving across `face` when a cell holding `from` has `value`.
    fn propagate_value(&self, value: u8, face: Face, from: Block, scale: u8) -> u8;

    fn can_spread_out_of(&self, block: Block, face: Face) -> bool;

    /// `face` is the side of `block` being entered.
    fn can_spread_into(&self, block: Block, face: Face) -> bool;

    /// Classifies replacing `old` with `new` for flow through `face`.
    fn compare_propagation(&self, new: Block, old: Block, face: Face) -> PropagationComparison {
        let out_new = self.can_spread_out_of(new, face);
        let out_old = self.can_spread_out_of(old, face);
        let in_new = self.can_spread_into(new, face);
        let in_old = self.can_spread_into(old, face);
        if (out_old && !out_new) || (in_old && !in_new) {
            PropagationComparison::MoreRestricted
        } else if (out_new && !out_old) || (in_new && !in_old) {
            PropagationComparison::MorePermissive
        } else {
            PropagationComparison::Identical
        }
    }

    /// Value grid this rule set reads and writes.
    fn channel(&self) -> ValueChannel;

    #[inline]
    fn value(&self, chunk: &Chunk, x: usize, y: usize, z: usize) -> u8 {
        chunk.value(self.channel(), x, y, z)
    }

    #[inline]
    fn set_value(&self, chunk: &mut Chunk, x: usize, y: usize, z: usize, value: u8) {
        chunk.set_value(self.channel(), x, y, z, value)
    }
}
