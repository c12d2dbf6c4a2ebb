//! Reconstructed import settings for one texture.
//!
//! [`TextureMeta`] is the document root. A single sprite produces a sheet
//! whose geometry sits on the sheet itself. An atlas page produces a sheet
//! with one [`MetaSprite`] per packed sprite plus a matching internal-ID
//! table.

mod enums;
mod sprite;

use log::{debug, warn};
use serde::Serialize;

pub use enums::{SpriteAlignment, SpriteImportMode, TextureImporterNpotScale, TextureImporterType};
pub use sprite::{MetaBone, MetaSprite};

use crate::config::ImportOptions;
use crate::error::DecodeError;
use crate::guid::Guid;
use crate::math::{Vec2, Vec4};
use crate::mesh::Triangle;
use crate::source::{AssetResolver, Sprite, SpriteAtlas, Texture};
use crate::transform::{self, PIVOT_CENTER};

/// Type-registry id of sprite objects; base of the synthetic internal ids.
pub const SPRITE_CLASS_ID: i64 = 213;
pub const FILE_FORMAT_VERSION: i64 = 2;

/// Internal id of the `index`-th sprite in an atlas.
pub fn internal_id_for(index: usize) -> i64 {
    SPRITE_CLASS_ID * 100_000 + index as i64 * 2
}

/// Where the geometry lives. Exactly one of the two is ever populated.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SheetLayout {
    Single { bones: Vec<MetaBone>, outline: Vec<Triangle>, physics_shape: Vec<Vec<Vec2>> },
    Multiple { sprites: Vec<MetaSprite> },
}

#[derive(Debug, Clone, Serialize)]
pub struct SpriteSheet {
    pub layout: SheetLayout,
    pub sprite_id: Guid,
}

impl SpriteSheet {
    pub fn sprites(&self) -> &[MetaSprite] {
        match &self.layout {
            SheetLayout::Multiple { sprites } => sprites,
            SheetLayout::Single { .. } => &[],
        }
    }

    pub fn bones(&self) -> &[MetaBone] {
        match &self.layout {
            SheetLayout::Single { bones, .. } => bones,
            SheetLayout::Multiple { .. } => &[],
        }
    }

    pub fn outline(&self) -> &[Triangle] {
        match &self.layout {
            SheetLayout::Single { outline, .. } => outline,
            SheetLayout::Multiple { .. } => &[],
        }
    }

    pub fn physics_shape(&self) -> &[Vec<Vec2>] {
        match &self.layout {
            SheetLayout::Single { physics_shape, .. } => physics_shape,
            SheetLayout::Multiple { .. } => &[],
        }
    }
}

/// `{class_id: internal_id} -> name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InternalIdEntry {
    pub class_id: i64,
    pub internal_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextureImporter {
    pub internal_id_table: Vec<InternalIdEntry>,
    pub npot_scale: TextureImporterNpotScale,
    pub alpha_is_transparency: bool,
    pub sprite_mode: SpriteImportMode,
    pub alignment: SpriteAlignment,
    pub sprite_pivot: Vec2,
    pub sprite_pixels_to_units: f32,
    pub sprite_border: Vec4,
    pub generate_fallback_physics_shape: bool,
    pub texture_type: TextureImporterType,
    pub sprite_sheet: SpriteSheet,
    pub sprite_packing_tag: String,
    pub user_data: String,
}

impl TextureImporter {
    fn with_options(
        options: &ImportOptions,
        sprite_mode: SpriteImportMode,
        sprite_sheet: SpriteSheet,
    ) -> Self {
        Self {
            internal_id_table: Vec::new(),
            npot_scale: options.npot_scale,
            alpha_is_transparency: options.alpha_is_transparency,
            sprite_mode,
            alignment: SpriteAlignment::Center,
            sprite_pivot: PIVOT_CENTER,
            sprite_pixels_to_units: 0.0,
            sprite_border: Vec4::ZERO,
            generate_fallback_physics_shape: options.generate_fallback_physics_shape,
            texture_type: TextureImporterType::Sprite,
            sprite_sheet,
            sprite_packing_tag: options.sprite_packing_tag.clone(),
            user_data: options.user_data.clone(),
        }
    }
}

/// Document root: `fileFormatVersion`, `guid`, `TextureImporter`.
#[derive(Debug, Clone, Serialize)]
pub struct TextureMeta {
    pub guid: Guid,
    pub importer: TextureImporter,
}

impl TextureMeta {
    /// Settings for a texture that holds exactly one sprite.
    pub fn from_sprite<R: AssetResolver + ?Sized>(
        sprite: &Sprite,
        resolver: &R,
        options: &ImportOptions,
    ) -> Result<Self, DecodeError> {
        Self::from_sprite_with_rng(sprite, resolver, options, &mut fastrand::Rng::new())
    }

    pub fn from_sprite_with_rng<R: AssetResolver + ?Sized>(
        sprite: &Sprite,
        resolver: &R,
        options: &ImportOptions,
        rng: &mut fastrand::Rng,
    ) -> Result<Self, DecodeError> {
        let guid = Guid::from_rng(rng);
        let meta = MetaSprite::with_rng(sprite, 0, resolver, rng)?;
        let (alignment, pivot, border, ppu) =
            (meta.alignment(), meta.pivot(), meta.border(), meta.pixels_to_units());
        let (bones, outline, physics_shape) = meta.into_geometry();
        let sheet = SpriteSheet {
            layout: SheetLayout::Single { bones, outline, physics_shape },
            sprite_id: Guid::from_rng(rng),
        };

        let mut importer = TextureImporter::with_options(options, SpriteImportMode::Single, sheet);
        importer.alignment = alignment;
        importer.sprite_pivot = pivot;
        importer.sprite_border = border;
        importer.sprite_pixels_to_units = ppu;
        debug!("single-sprite meta for '{}'", sprite.name);
        Ok(Self { guid, importer })
    }

    /// Settings for an atlas page: every sprite of `atlas` whose pixels live in
    /// `texture` (matched by name) becomes one sheet entry.
    ///
    /// Sprites that fail to resolve or decode are skipped with a warning and
    /// get no internal-ID entry.
    pub fn from_atlas<R: AssetResolver + ?Sized>(
        texture: &Texture,
        atlas: &SpriteAtlas,
        resolver: &R,
        options: &ImportOptions,
    ) -> Self {
        Self::from_atlas_with_rng(texture, atlas, resolver, options, &mut fastrand::Rng::new())
    }

    pub fn from_atlas_with_rng<R: AssetResolver + ?Sized>(
        texture: &Texture,
        atlas: &SpriteAtlas,
        resolver: &R,
        options: &ImportOptions,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let guid = Guid::from_rng(rng);
        let mut sprites = Vec::new();
        let mut table = Vec::new();
        let mut ppu: Option<f32> = None;

        for (index, &sprite_ref) in atlas.packed_sprites.iter().enumerate() {
            let Some(sprite) = resolver.sprite(sprite_ref) else {
                warn!("atlas '{}': sprite {sprite_ref:?} could not be resolved", atlas.name);
                continue;
            };
            match transform::resolve_texture(sprite, resolver) {
                Ok(t) if t.name == texture.name => {}
                Ok(_) => continue,
                Err(e) => {
                    warn!("atlas '{}': sprite '{}': {e}", atlas.name, sprite.name);
                    continue;
                }
            }

            let internal_id = internal_id_for(index);
            let meta = match MetaSprite::with_rng(sprite, internal_id, resolver, rng) {
                Ok(meta) => meta,
                Err(e) => {
                    warn!("atlas '{}': skipping sprite '{}': {e}", atlas.name, sprite.name);
                    continue;
                }
            };
            match ppu {
                None => ppu = Some(sprite.pixels_to_units),
                Some(first) if first != sprite.pixels_to_units => warn!(
                    "atlas '{}': sprite '{}' has {} pixels per unit, sheet uses {first}",
                    atlas.name, sprite.name, sprite.pixels_to_units
                ),
                Some(_) => {}
            }
            table.push(InternalIdEntry {
                class_id: SPRITE_CLASS_ID,
                internal_id,
                name: sprite.name.clone(),
            });
            sprites.push(meta);
        }
        debug!("atlas '{}': {} sprites on texture '{}'", atlas.name, sprites.len(), texture.name);

        let sheet = SpriteSheet {
            layout: SheetLayout::Multiple { sprites },
            sprite_id: Guid::from_rng(rng),
        };
        let mut importer =
            TextureImporter::with_options(options, SpriteImportMode::Multiple, sheet);
        importer.internal_id_table = table;
        importer.sprite_pixels_to_units = ppu.unwrap_or(0.0);
        Self { guid, importer }
    }
}
