//! Importer settings that are not derived from the sprite itself.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::meta::TextureImporterNpotScale;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    pub alpha_is_transparency: bool,
    pub npot_scale: TextureImporterNpotScale,
    pub sprite_packing_tag: String,
    pub user_data: String,
    pub generate_fallback_physics_shape: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            alpha_is_transparency: true,
            npot_scale: TextureImporterNpotScale::None,
            sprite_packing_tag: String::new(),
            user_data: String::new(),
            generate_fallback_physics_shape: true,
        }
    }
}

pub fn load_options_from_yaml_str(s: &str) -> Result<ImportOptions> {
    let opts: ImportOptions = serde_yaml::from_str(s)?;
    Ok(opts)
}

pub fn load_options_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<ImportOptions> {
    let data = std::fs::read_to_string(path)?;
    load_options_from_yaml_str(&data)
}
