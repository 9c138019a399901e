use lumen_blocks::config::{BlockDef, BlocksConfig};
use lumen_blocks::registry::BlockRegistry;
use lumen_blocks::{Block, Shape};
use proptest::prelude::*;

const BLOCKS_TOML: &str = r#"
unknown_block = "unknown"

[[blocks]]
name = "air"
id = 0
solid = false

[[blocks]]
name = "stone"

[[blocks]]
name = "glass"
propagates_light = true
blocks_skylight = false

[[blocks]]
name = "torch"
solid = false
emission = 15

[[blocks]]
name = "slab"
shape = "slab_bottom"

[[blocks]]
name = "unknown"
"#;

#[test]
fn parses_defaults_from_toml() {
    let reg = BlockRegistry::from_toml_str(BLOCKS_TOML).expect("registry");
    let air = reg.get(0).unwrap();
    assert_eq!(air.name, "air");
    assert!(!air.solid);
    assert!(!air.blocks_skylight);
    assert!(air.propagates_light);
    assert_eq!(air.shape, Shape::None);

    let stone = reg.get(reg.id_by_name("stone").unwrap()).unwrap();
    assert!(stone.solid && stone.blocks_skylight && !stone.propagates_light);
    assert_eq!(stone.full_faces, 0b11_1111);

    let torch = reg.get(reg.id_by_name("torch").unwrap()).unwrap();
    assert_eq!(torch.light_emission(0), 15);
    assert!(torch.propagates_light(0));
}

#[test]
fn slab_blocks_only_its_covered_face() {
    let reg = BlockRegistry::from_toml_str(BLOCKS_TOML).unwrap();
    let slab = reg.get(reg.id_by_name("slab").unwrap()).unwrap();
    // -Y is face index 1
    assert!(!slab.is_face_permeable(0, 1));
    for face in [0, 2, 3, 4, 5] {
        assert!(slab.is_face_permeable(0, face), "face {face}");
    }
}

#[test]
fn glass_is_full_but_permeable() {
    let reg = BlockRegistry::from_toml_str(BLOCKS_TOML).unwrap();
    let glass = reg.get(reg.id_by_name("glass").unwrap()).unwrap();
    assert!(glass.is_face_full(2));
    assert!(glass.is_face_permeable(0, 2));
    assert!(!glass.blocks_skylight(0));
}

#[test]
fn unknown_names_fall_back() {
    let reg = BlockRegistry::from_toml_str(BLOCKS_TOML).unwrap();
    let unknown = reg.block_by_name("unknown").unwrap();
    assert_eq!(reg.block_or_fallback("no_such_block"), unknown);

    let bare = BlockRegistry::from_config(BlocksConfig {
        blocks: vec![BlockDef::named("air")],
        unknown_block: None,
    })
    .unwrap();
    assert_eq!(bare.block_or_fallback("missing"), Block::AIR);
}

#[test]
fn rejects_duplicate_names_and_ids() {
    let dup_name = BlocksConfig {
        blocks: vec![BlockDef::named("stone"), BlockDef::named("stone")],
        unknown_block: None,
    };
    assert!(BlockRegistry::from_config(dup_name).is_err());

    let mut a = BlockDef::named("a");
    a.id = Some(3);
    let mut b = BlockDef::named("b");
    b.id = Some(3);
    let dup_id = BlocksConfig { blocks: vec![a, b], unknown_block: None };
    assert!(BlockRegistry::from_config(dup_id).is_err());
}

#[test]
fn rejects_unknown_shape() {
    let err = BlockRegistry::from_toml_str(
        r#"
        [[blocks]]
        name = "odd"
        shape = "dodecahedron"
    "#,
    );
    assert!(err.is_err());
}

#[test]
fn sparse_ids_leave_gaps_unresolved() {
    let mut far = BlockDef::named("far");
    far.id = Some(9);
    let reg = BlockRegistry::from_config(BlocksConfig {
        blocks: vec![BlockDef::named("air"), far],
        unknown_block: None,
    })
    .unwrap();
    assert!(reg.get(5).is_none());
    assert_eq!(reg.get(9).unwrap().name, "far");
    assert!(reg.get(10).is_none());
}

proptest! {
    // Auto-assigned ids follow definition order and resolve back by name
    #[test]
    fn auto_ids_roundtrip(n in 1usize..40) {
        let blocks = (0..n).map(|i| BlockDef::named(format!("b{i}"))).collect();
        let reg = BlockRegistry::from_config(BlocksConfig { blocks, unknown_block: None }).unwrap();
        for i in 0..n {
            let id = reg.id_by_name(&format!("b{i}")).unwrap();
            prop_assert_eq!(id as usize, i);
            prop_assert_eq!(&reg.get(id).unwrap().name, &format!("b{i}"));
        }
    }

    // Permeability never exceeds what the covered-face mask allows for opaque blocks
    #[test]
    fn opaque_permeability_matches_mask(face in 0usize..6, shape in prop::sample::select(vec!["cube", "slab_bottom", "slab_top", "none"])) {
        let mut def = BlockDef::named("x");
        def.shape = Some(shape.to_string());
        def.propagates_light = Some(false);
        let reg = BlockRegistry::from_config(BlocksConfig { blocks: vec![def], unknown_block: None }).unwrap();
        let ty = reg.get(0).unwrap();
        prop_assert_eq!(ty.is_face_permeable(0, face), !ty.is_face_full(face));
    }
}
