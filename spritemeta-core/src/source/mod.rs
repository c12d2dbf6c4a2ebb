//! Read-only input model handed over by the asset-container parser.
//!
//! The container owns every object; this crate only borrows them through
//! [`AssetResolver`]. [`AssetTable`] is an in-memory resolver that can be
//! loaded from a YAML or JSON dump.

pub mod schema;

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use schema::*;

/// Object lookup backed by the container. A `None` means the reference does
/// not resolve; callers treat that as missing data, never as a crash.
pub trait AssetResolver {
    fn sprite(&self, r: ObjectRef) -> Option<&Sprite>;
    fn atlas(&self, r: ObjectRef) -> Option<&SpriteAtlas>;
    fn texture(&self, r: ObjectRef) -> Option<&Texture>;
}

/// Flat object table keyed by path id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetTable {
    #[serde(default)]
    pub sprites: BTreeMap<ObjectRef, Sprite>,
    #[serde(default)]
    pub atlases: BTreeMap<ObjectRef, SpriteAtlas>,
    #[serde(default)]
    pub textures: BTreeMap<ObjectRef, Texture>,
}

impl AssetResolver for AssetTable {
    fn sprite(&self, r: ObjectRef) -> Option<&Sprite> { self.sprites.get(&r) }
    fn atlas(&self, r: ObjectRef) -> Option<&SpriteAtlas> { self.atlases.get(&r) }
    fn texture(&self, r: ObjectRef) -> Option<&Texture> { self.textures.get(&r) }
}

pub fn load_from_yaml_str(s: &str) -> Result<AssetTable> {
    let table: AssetTable = serde_yaml::from_str(s)?;
    Ok(table)
}

pub fn load_from_json_str(s: &str) -> Result<AssetTable> {
    let table: AssetTable = serde_json::from_str(s)?;
    Ok(table)
}

/// Load a table dump; `.json` files are read as JSON, anything else as YAML.
pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<AssetTable> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_from_json_str(&data),
        _ => load_from_yaml_str(&data),
    }
}
