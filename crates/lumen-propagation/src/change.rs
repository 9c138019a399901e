use lumen_blocks::Block;
use lumen_chunk::BlockPos;

/// A block replaced at `pos` during one edit tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockChange {
    pub pos: BlockPos,
    pub from: Block,
    pub to: Block,
}

impl BlockChange {
    #[inline]
    pub fn new(pos: BlockPos, from: Block, to: Block) -> Self {
        Self { pos, from, to }
    }

    /// True when the block id or state actually differs.
    #[inline]
    pub fn is_effective(&self) -> bool {
        self.from != self.to
    }
}
