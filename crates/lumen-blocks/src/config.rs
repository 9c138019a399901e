use serde::Deserialize;

// Top-level blocks config file
#[derive(Deserialize, Debug, Default)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
    // Optional name of a block to use when a requested block is unavailable.
    // If absent or not found, fallbacks use `air`.
    #[serde(default)]
    pub unknown_block: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    #[serde(default)]
    pub solid: Option<bool>,
    #[serde(default)]
    pub blocks_skylight: Option<bool>,
    #[serde(default)]
    pub propagates_light: Option<bool>,
    #[serde(default)]
    pub emission: Option<u8>,
    // "cube" (default), "slab_bottom", "slab_top" or "none"
    #[serde(default)]
    pub shape: Option<String>,
}

impl BlockDef {
    pub fn named(name: impl Into<String>) -> Self {
        BlockDef {
            name: name.into(),
            id: None,
            solid: None,
            blocks_skylight: None,
            propagates_light: None,
            emission: None,
            shape: None,
        }
    }
}
