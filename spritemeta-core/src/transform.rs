//! Unit space → pixel space conversion.
//!
//! Three frames are involved:
//!
//! ```text
//!  unit space        sprite rect (nominal)        texture frame (packed)
//!  origin = pivot    origin = rect corner         origin = packed rect corner
//!  1 unit = ppu px   size = rect.width/height     size = texture_rect size,
//!                                                 placed at `offset` inside the
//!                                                 nominal rect by the packer
//! ```
//!
//! Bone values go through [`unit_to_pixel`]. Outline and physics-shape points
//! go through [`OutlineTransform`]. The pivot written to the meta file is
//! re-expressed against the texture frame by [`effective_pivot`].

use log::debug;

use crate::error::ResolveError;
use crate::math::{Rect, Vec2, Vec3};
use crate::mesh::Triangle;
use crate::source::{AssetResolver, Sprite, SpriteAtlasData, Texture};

pub const PIVOT_CENTER: Vec2 = Vec2::splat(0.5);

/// Where a sprite's pixels actually live.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureFrame {
    /// Rect inside the texture the pixels were read from.
    pub rect: Rect,
    /// Offset of `rect` inside the sprite's nominal rect.
    pub offset: Vec2,
    /// True when the frame came from a sprite atlas entry.
    pub packed: bool,
}

/// Atlas placement for a packed sprite, `None` for a sprite that is not
/// packed.
fn resolve_atlas_entry<'a, R: AssetResolver + ?Sized>(
    sprite: &Sprite,
    resolver: &'a R,
) -> Result<Option<&'a SpriteAtlasData>, ResolveError> {
    let Some(atlas_ref) = sprite.atlas else {
        return Ok(None);
    };
    let atlas = resolver.atlas(atlas_ref).ok_or(ResolveError::MissingAtlas(atlas_ref))?;
    let data = sprite
        .render_data_key
        .as_ref()
        .and_then(|key| atlas.render_data_map.get(key))
        .ok_or_else(|| ResolveError::MissingRenderData {
            atlas: atlas.name.clone(),
            key: sprite.render_data_key.clone(),
        })?;
    debug!("sprite '{}' packed into atlas '{}'", sprite.name, atlas.name);
    Ok(Some(data))
}

/// Texture rect and offset for `sprite`: the atlas entry when the sprite is
/// packed, its own render data otherwise.
pub fn resolve_frame<R: AssetResolver + ?Sized>(
    sprite: &Sprite,
    resolver: &R,
) -> Result<TextureFrame, ResolveError> {
    Ok(match resolve_atlas_entry(sprite, resolver)? {
        Some(data) => TextureFrame {
            rect: data.texture_rect,
            offset: data.texture_rect_offset,
            packed: true,
        },
        None => TextureFrame {
            rect: sprite.render_data.texture_rect,
            offset: sprite.render_data.texture_rect_offset,
            packed: false,
        },
    })
}

/// The texture holding `sprite`'s pixels, following the same atlas rules as
/// [`resolve_frame`].
pub fn resolve_texture<'a, R: AssetResolver + ?Sized>(
    sprite: &Sprite,
    resolver: &'a R,
) -> Result<&'a Texture, ResolveError> {
    let texture_ref = match resolve_atlas_entry(sprite, resolver)? {
        Some(data) => data.texture,
        None => sprite.render_data.texture,
    };
    let texture_ref = texture_ref.ok_or(ResolveError::NoTexture)?;
    resolver.texture(texture_ref).ok_or(ResolveError::MissingTexture(texture_ref))
}

/// `(unit + pivot * band_length / ppu) * ppu`.
///
/// `band_length` is the rect dimension for root bone positions and zero for
/// everything else. A zero `pixels_to_units` yields `pivot * band_length`.
pub fn unit_to_pixel(unit: f32, pivot: f32, pixels_to_units: f32, band_length: f32) -> f32 {
    if pixels_to_units == 0.0 {
        return pivot * band_length;
    }
    let offset = pivot * band_length / pixels_to_units;
    (unit + offset) * pixels_to_units
}

/// Bone position in pixels. Only root bones are shifted by the pivot; `z` is
/// dropped.
pub fn bone_position_to_pixel(
    unit: Vec3,
    pivot: Vec2,
    pixels_to_units: f32,
    rect_size: Vec2,
    is_root: bool,
) -> Vec3 {
    let band = if is_root { rect_size } else { Vec2::ZERO };
    Vec3::new(
        unit_to_pixel(unit.x, pivot.x, pixels_to_units, band.x),
        unit_to_pixel(unit.y, pivot.y, pixels_to_units, band.y),
        0.0,
    )
}

pub fn bone_length_to_pixel(unit_length: f32, pixels_to_units: f32) -> f32 {
    unit_to_pixel(unit_length, 0.0, pixels_to_units, 0.0)
}

/// `(pivot - 0.5) * rect size`: moves pivot-relative points to be relative to
/// the rect's center.
pub fn pivot_pixel_offset(pivot: Vec2, rect: Rect) -> Vec2 {
    (pivot - PIVOT_CENTER) * rect.size()
}

/// Shift introduced by the packer trimming or moving the sprite's rect.
///
/// Zero for unpacked frames and for packed frames that kept the nominal size
/// at zero offset.
pub fn texture_offset(rect: Rect, frame: &TextureFrame) -> Vec2 {
    if !frame.packed || (frame.offset == Vec2::ZERO && frame.rect.size() == rect.size()) {
        return Vec2::ZERO;
    }
    -frame.offset + (rect.size() - frame.rect.size()) * 0.5
}

/// Pivot re-expressed as a fraction of the packed texture rect.
///
/// Unpacked frames keep the nominal pivot. A degenerate packed rect also
/// keeps it.
pub fn effective_pivot(pivot: Vec2, rect: Rect, frame: &TextureFrame) -> Vec2 {
    if !frame.packed || frame.rect.is_degenerate() {
        return pivot;
    }
    if frame.offset == Vec2::ZERO && frame.rect.size() == rect.size() {
        return pivot;
    }
    (pivot * rect.size() - frame.offset) / frame.rect.size()
}

/// Point transform shared by outlines and physics shapes:
/// `p * ppu + pivot_offset + texture_offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineTransform {
    pub pixels_to_units: f32,
    pub pivot_offset: Vec2,
    pub texture_offset: Vec2,
}

impl OutlineTransform {
    /// Built from the sprite's nominal rect and pivot. `frame` is `None` when
    /// the texture frame could not be resolved, which leaves the texture
    /// offset at zero.
    pub fn new(
        rect: Rect,
        pivot: Vec2,
        pixels_to_units: f32,
        frame: Option<&TextureFrame>,
    ) -> Self {
        Self {
            pixels_to_units,
            pivot_offset: pivot_pixel_offset(pivot, rect),
            texture_offset: frame.map(|f| texture_offset(rect, f)).unwrap_or(Vec2::ZERO),
        }
    }

    pub fn for_sprite(sprite: &Sprite, frame: Option<&TextureFrame>) -> Self {
        Self::new(sprite.rect, sprite.pivot, sprite.pixels_to_units, frame)
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        p * self.pixels_to_units + self.pivot_offset + self.texture_offset
    }

    pub fn apply_triangles(&self, triangles: &[Triangle]) -> Vec<Triangle> {
        triangles.iter().map(|tri| tri.map(|p| self.apply(p))).collect()
    }

    pub fn apply_polygons(&self, polygons: &[Vec<Vec2>]) -> Vec<Vec<Vec2>> {
        polygons
            .iter()
            .map(|poly| poly.iter().map(|&p| self.apply(p)).collect())
            .collect()
    }
}
