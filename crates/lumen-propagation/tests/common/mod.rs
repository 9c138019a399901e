#![allow(dead_code)]

use std::sync::Arc;

use lumen_blocks::config::{BlockDef, BlocksConfig};
use lumen_blocks::{Block, BlockRegistry};
use lumen_chunk::BlockPos;
use lumen_propagation::{Face, PropagationRules, PropagatorWorldView};

pub const AIR: Block = Block::from_id(0);
pub const STONE: Block = Block::from_id(1);
pub const TORCH: Block = Block::from_id(2);
pub const DIM_TORCH: Block = Block::from_id(3);
pub const GLOWSTONE: Block = Block::from_id(4);
pub const SLAB: Block = Block::from_id(5);
pub const GLASS: Block = Block::from_id(6);

pub const PALETTE: [Block; 7] = [AIR, STONE, TORCH, DIM_TORCH, GLOWSTONE, SLAB, GLASS];

pub fn registry() -> Arc<BlockRegistry> {
    let toml = r#"
        [[blocks]]
        name = "air"
        solid = false

        [[blocks]]
        name = "stone"

        [[blocks]]
        name = "torch"
        solid = false
        emission = 15

        [[blocks]]
        name = "dim_torch"
        solid = false
        emission = 8

        [[blocks]]
        name = "glowstone"
        emission = 15

        [[blocks]]
        name = "slab"
        shape = "slab_bottom"

        [[blocks]]
        name = "glass"
        propagates_light = true
        blocks_skylight = false
    "#;
    let cfg: BlocksConfig = toml::from_str(toml).unwrap();
    Arc::new(BlockRegistry::from_config(cfg).unwrap())
}

pub fn registry_from_defs(defs: Vec<BlockDef>) -> Arc<BlockRegistry> {
    Arc::new(BlockRegistry::from_config(BlocksConfig { blocks: defs, unknown_block: None }).unwrap())
}

/// Reference result: reset every available cell in `[lo, hi]` to its fixed
/// value, then relax until nothing changes.
pub fn relax<R: PropagationRules, V: PropagatorWorldView>(rules: &R, view: &mut V, lo: BlockPos, hi: BlockPos) {
    let cells: Vec<BlockPos> = (lo.y..=hi.y)
        .flat_map(|y| (lo.z..=hi.z).flat_map(move |z| (lo.x..=hi.x).map(move |x| BlockPos::new(x, y, z))))
        .collect();
    for &pos in &cells {
        if let Some(b) = view.block_at(pos) {
            view.set_value_at(pos, rules.fixed_value(b, pos));
        }
    }
    loop {
        let mut changed = false;
        for &pos in &cells {
            let (Some(block), Some(value)) = (view.block_at(pos), view.value_at(pos)) else {
                continue;
            };
            for face in Face::ALL {
                if !rules.can_spread_out_of(block, face) {
                    continue;
                }
                let passed = rules.propagate_value(value, face, block, 1);
                let adj = face.step(pos);
                let (Some(adj_block), Some(adj_value)) = (view.block_at(adj), view.value_at(adj)) else {
                    continue;
                };
                if adj_value < passed && rules.can_spread_into(adj_block, face.opposite()) {
                    view.set_value_at(adj, passed);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
}
