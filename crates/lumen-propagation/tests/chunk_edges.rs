mod common;

use common::*;
use lumen_blocks::Block;
use lumen_chunk::{BlockPos, Chunk, ChunkCoord, ChunkDims, ChunkProvider, ChunkStore};
use lumen_propagation::{
    BatchPropagator, ChunkView, Face, LightRules, LocalChunkView, PropagationRules, ProviderWorldView,
    SunlightRules, relight_loaded_neighbors,
};
use proptest::prelude::*;

const D: usize = 6;

fn block() -> impl Strategy<Value = Block> {
    prop_oneof![
        10 => Just(AIR),
        4 => Just(STONE),
        1 => Just(TORCH),
        1 => Just(DIM_TORCH),
        1 => Just(SLAB),
        1 => Just(GLASS),
    ]
}

fn chunk_blocks() -> impl Strategy<Value = Vec<Block>> {
    prop::collection::vec(block(), D * D * D)
}

fn dims() -> ChunkDims {
    ChunkDims::new(D, D, D)
}

fn load(coords: &[ChunkCoord], blocks: &[Vec<Block>]) -> ChunkStore {
    let mut store = ChunkStore::new(dims());
    for (&coord, b) in coords.iter().zip(blocks) {
        store.insert(Chunk::from_blocks_local(coord, dims(), b.clone())).unwrap();
    }
    store
}

// Each chunk lit as if it were alone in the world
fn settle_isolated<R: PropagationRules>(rules: &R, store: &mut ChunkStore, coords: &[ChunkCoord]) {
    for &coord in coords {
        let chunk = store.chunk_mut(coord).unwrap();
        let mut prop = BatchPropagator::new(rules);
        prop.seed_fixed_values(chunk);
        prop.process(&mut ChunkView::new(rules, chunk), &[]);
    }
}

fn bounds(coords: &[ChunkCoord]) -> (BlockPos, BlockPos) {
    let origins: Vec<BlockPos> = coords.iter().map(|&c| dims().origin(c)).collect();
    let lo = BlockPos::new(
        origins.iter().map(|o| o.x).min().unwrap(),
        origins.iter().map(|o| o.y).min().unwrap(),
        origins.iter().map(|o| o.z).min().unwrap(),
    );
    let hi = BlockPos::new(
        origins.iter().map(|o| o.x).max().unwrap() + D as i32 - 1,
        origins.iter().map(|o| o.y).max().unwrap() + D as i32 - 1,
        origins.iter().map(|o| o.z).max().unwrap() + D as i32 - 1,
    );
    (lo, hi)
}

fn unified<R: PropagationRules>(rules: &R, coords: &[ChunkCoord], blocks: &[Vec<Block>]) -> ChunkStore {
    let mut store = load(coords, blocks);
    let (lo, hi) = bounds(coords);
    relax(rules, &mut ProviderWorldView::new(rules, &mut store), lo, hi);
    store
}

fn assert_same<R: PropagationRules>(rules: &R, a: &ChunkStore, b: &ChunkStore, coords: &[ChunkCoord]) -> Result<(), TestCaseError> {
    for &coord in coords {
        let ca = a.chunk(coord).unwrap();
        let cb = b.chunk(coord).unwrap();
        prop_assert_eq!(ca.channel(rules.channel()), cb.channel(rules.channel()), "chunk {:?}", coord);
    }
    Ok(())
}

fn pair(axis: usize) -> [ChunkCoord; 2] {
    let a = ChunkCoord::new(0, 0, 0);
    let b = match axis {
        0 => ChunkCoord::new(1, 0, 0),
        1 => ChunkCoord::new(0, 1, 0),
        _ => ChunkCoord::new(0, 0, 1),
    };
    [a, b]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    // Two chunks lit apart and then joined equal one unsplit grid
    #[test]
    fn joined_pair_matches_unsplit_light(
        a in chunk_blocks(),
        b in chunk_blocks(),
        axis in 0usize..3,
        external in any::<bool>(),
    ) {
        let rules = LightRules::new(registry());
        let coords = pair(axis);
        let blocks = [a, b];
        let expect = unified(&rules, &coords, &blocks);

        let mut store = load(&coords, &blocks);
        settle_isolated(&rules, &mut store, &coords);
        let mut prop = BatchPropagator::new(&rules);
        relight_loaded_neighbors(&mut prop, &mut store, coords[1], external);
        assert_same(&rules, &store, &expect, &coords)?;
    }

    #[test]
    fn joined_pair_matches_unsplit_sunlight(
        a in chunk_blocks(),
        b in chunk_blocks(),
        axis in 0usize..3,
        external in any::<bool>(),
    ) {
        // Sky line inside the upper chunk for vertical pairs
        let sky = if axis == 1 { D as i32 + 3 } else { 3 };
        let rules = SunlightRules::new(registry(), sky);
        let coords = pair(axis);
        let blocks = [a, b];
        let expect = unified(&rules, &coords, &blocks);

        let mut store = load(&coords, &blocks);
        settle_isolated(&rules, &mut store, &coords);
        let mut prop = BatchPropagator::new(&rules);
        relight_loaded_neighbors(&mut prop, &mut store, coords[0], external);
        assert_same(&rules, &store, &expect, &coords)?;
    }

    // Driving the seam by hand through a local 3x3x3 view gives the same result
    #[test]
    fn manual_seam_through_local_view(a in chunk_blocks(), b in chunk_blocks(), external in any::<bool>()) {
        let rules = LightRules::new(registry());
        let coords = pair(0);
        let blocks = [a, b];
        let expect = unified(&rules, &coords, &blocks);

        let mut store = load(&coords, &blocks);
        settle_isolated(&rules, &mut store, &coords);
        let mut prop = BatchPropagator::new(&rules);
        {
            let [left, right] = store.chunk_pair_mut(coords[0], coords[1]).unwrap();
            prop.propagate_between(left, right, Face::PosX, external);
            prop.propagate_between(right, left, Face::NegX, external);
        }
        prop.process(&mut LocalChunkView::from_store(&rules, &mut store, coords[0]), &[]);
        assert_same(&rules, &store, &expect, &coords)?;
    }

    // Three chunks in an L, each joined once in load order
    #[test]
    fn l_shape_with_external_borders(
        a in chunk_blocks(),
        b in chunk_blocks(),
        c in chunk_blocks(),
    ) {
        let rules = LightRules::new(registry());
        let coords = [ChunkCoord::new(0, 0, 0), ChunkCoord::new(1, 0, 0), ChunkCoord::new(1, 0, 1)];
        let blocks = [a, b, c];
        let expect = unified(&rules, &coords, &blocks);

        let mut store = load(&coords, &blocks);
        settle_isolated(&rules, &mut store, &coords);
        let mut prop = BatchPropagator::new(&rules);
        for &coord in &coords {
            relight_loaded_neighbors(&mut prop, &mut store, coord, true);
        }
        assert_same(&rules, &store, &expect, &coords)?;
    }
}

#[test]
fn torch_light_crosses_the_seam_and_marks_dirty() {
    let rules = LightRules::new(registry());
    let coords = pair(0);
    let mut left = vec![AIR; D * D * D];
    // Torch against the +X face of the left chunk
    left[dims().idx(D - 1, 2, 2)] = TORCH;
    let right = vec![AIR; D * D * D];
    let mut store = load(&coords, &[left, right]);
    settle_isolated(&rules, &mut store, &coords);
    assert_eq!(store.chunk(coords[1]).unwrap().light.iter().copied().max(), Some(0));

    let mut prop = BatchPropagator::new(&rules);
    let seams = relight_loaded_neighbors(&mut prop, &mut store, coords[1], false);
    assert_eq!(seams, 1);
    let right = store.chunk(coords[1]).unwrap();
    assert_eq!(right.light[dims().idx(0, 2, 2)], 14);
    assert_eq!(right.light[dims().idx(D - 1, 2, 2)], 15 - D as u8);
    // One step sideways inside the right chunk
    assert_eq!(right.light[dims().idx(0, 3, 2)], 13);
    assert_eq!(store.take_dirty(), coords.to_vec());
}

#[test]
fn unloaded_or_missing_chunks_do_nothing() {
    let rules = LightRules::new(registry());
    let mut store = ChunkStore::new(dims());
    let mut prop = BatchPropagator::new(&rules);
    assert_eq!(relight_loaded_neighbors(&mut prop, &mut store, ChunkCoord::new(0, 0, 0), true), 0);

    store.insert(Chunk::filled(ChunkCoord::new(0, 0, 0), dims(), AIR)).unwrap();
    assert_eq!(relight_loaded_neighbors(&mut prop, &mut store, ChunkCoord::new(0, 0, 0), true), 0);
    assert!(store.take_dirty().is_empty());
}
