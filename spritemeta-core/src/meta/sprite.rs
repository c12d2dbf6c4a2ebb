use log::{debug, warn};
use serde::Serialize;

use crate::error::DecodeError;
use crate::guid::Guid;
use crate::math::{Rect, Rotation, Vec2, Vec3, Vec4};
use crate::mesh::{self, Triangle};
use crate::source::{AssetResolver, Sprite, SpriteBone};
use crate::transform::{self, OutlineTransform, TextureFrame};

use super::SpriteAlignment;

/// Bone in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaBone {
    pub name: String,
    pub position: Vec3,
    pub rotation: Rotation,
    pub length: f32,
    pub parent_id: i32,
}

impl MetaBone {
    /// `pivot` and `rect_size` only affect root bones.
    pub fn from_bone(
        bone: &SpriteBone,
        pivot: Vec2,
        pixels_to_units: f32,
        rect_size: Vec2,
    ) -> Self {
        Self {
            name: bone.name.clone(),
            position: transform::bone_position_to_pixel(
                bone.position,
                pivot,
                pixels_to_units,
                rect_size,
                bone.is_root(),
            ),
            rotation: bone.rotation,
            length: transform::bone_length_to_pixel(bone.length, pixels_to_units),
            parent_id: bone.parent_id,
        }
    }
}

/// One reconstructed sprite.
///
/// Built in one go from the source sprite; `alignment` is always derived from
/// `pivot`, so neither is settable.
#[derive(Debug, Clone, Serialize)]
pub struct MetaSprite {
    internal_id: i64,
    name: String,
    rect: Option<Rect>,
    alignment: SpriteAlignment,
    pivot: Vec2,
    border: Vec4,
    pixels_to_units: f32,
    bones: Vec<MetaBone>,
    outline: Vec<Triangle>,
    physics_shape: Vec<Vec<Vec2>>,
    sprite_id: Guid,
}

impl MetaSprite {
    pub fn new<R: AssetResolver + ?Sized>(
        sprite: &Sprite,
        internal_id: i64,
        resolver: &R,
    ) -> Result<Self, DecodeError> {
        Self::with_rng(sprite, internal_id, resolver, &mut fastrand::Rng::new())
    }

    /// Like [`MetaSprite::new`], drawing the sprite id from `rng`.
    pub fn with_rng<R: AssetResolver + ?Sized>(
        sprite: &Sprite,
        internal_id: i64,
        resolver: &R,
        rng: &mut fastrand::Rng,
    ) -> Result<Self, DecodeError> {
        let frame: Option<TextureFrame> = match transform::resolve_frame(sprite, resolver) {
            Ok(frame) => Some(frame),
            Err(e) => {
                warn!("sprite '{}': {e}; rect unknown", sprite.name);
                None
            }
        };

        let pivot = match &frame {
            Some(f) => transform::effective_pivot(sprite.pivot, sprite.rect, f),
            None => sprite.pivot,
        };
        let band = frame
            .as_ref()
            .map(|f| f.rect.size())
            .filter(|size| *size != Vec2::ZERO)
            .unwrap_or_else(|| sprite.rect.size());
        let bones = sprite
            .bones
            .iter()
            .map(|b| MetaBone::from_bone(b, pivot, sprite.pixels_to_units, band))
            .collect();

        let outline_tf = OutlineTransform::for_sprite(sprite, frame.as_ref());
        let triangles = mesh::decode_triangles(&sprite.render_data.mesh)?;
        let outline = outline_tf.apply_triangles(&triangles);
        let physics_shape = outline_tf.apply_polygons(&sprite.physics_shape);
        debug!(
            "sprite '{}': {} triangles, {} physics polygons, pivot {pivot}",
            sprite.name,
            outline.len(),
            physics_shape.len()
        );

        Ok(Self {
            internal_id,
            name: sprite.name.clone(),
            rect: frame.map(|f| f.rect),
            alignment: SpriteAlignment::from_pivot(pivot),
            pivot,
            border: sprite.border,
            pixels_to_units: sprite.pixels_to_units,
            bones,
            outline,
            physics_shape,
            sprite_id: Guid::from_rng(rng),
        })
    }

    pub fn internal_id(&self) -> i64 { self.internal_id }
    pub fn name(&self) -> &str { &self.name }
    /// `None` when the atlas entry could not be resolved.
    pub fn rect(&self) -> Option<Rect> { self.rect }
    pub fn alignment(&self) -> SpriteAlignment { self.alignment }
    pub fn pivot(&self) -> Vec2 { self.pivot }
    pub fn border(&self) -> Vec4 { self.border }
    pub fn pixels_to_units(&self) -> f32 { self.pixels_to_units }
    pub fn bones(&self) -> &[MetaBone] { &self.bones }
    pub fn outline(&self) -> &[Triangle] { &self.outline }
    pub fn physics_shape(&self) -> &[Vec<Vec2>] { &self.physics_shape }
    pub fn sprite_id(&self) -> Guid { self.sprite_id }

    /// Moves bones, outline and physics shape out, for hoisting onto a sheet.
    pub(crate) fn into_geometry(self) -> (Vec<MetaBone>, Vec<Triangle>, Vec<Vec<Vec2>>) {
        (self.bones, self.outline, self.physics_shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fixtures::{key, sprite};
    use crate::source::{AssetTable, ObjectRef, SpriteAtlas, SpriteAtlasData};

    fn bone(name: &str, parent_id: i32, position: Vec3, length: f32) -> SpriteBone {
        SpriteBone { name: name.into(), parent_id, position, rotation: Rotation::IDENTITY, length }
    }

    fn table_with_atlas() -> AssetTable {
        let mut atlas = SpriteAtlas {
            name: "chars".into(),
            packed_sprites: vec![ObjectRef(10)],
            render_data_map: Default::default(),
        };
        atlas.render_data_map.insert(
            key(1),
            SpriteAtlasData {
                texture: Some(ObjectRef(2)),
                texture_rect: Rect::new(10.0, 5.0, 80.0, 40.0),
                texture_rect_offset: Vec2::new(10.0, 5.0),
            },
        );
        let mut table = AssetTable::default();
        table.atlases.insert(ObjectRef(20), atlas);
        table
    }

    #[test]
    fn centered_sprite_with_one_child_bone() {
        let mut s = sprite("hero", Vec2::splat(0.5));
        s.bones.push(bone("root", -1, Vec3::ZERO, 0.0));
        s.bones.push(bone("arm", 0, Vec3::ZERO, 0.0));
        let m = MetaSprite::new(&s, 21300000, &AssetTable::default()).unwrap();

        assert_eq!(m.alignment(), SpriteAlignment::Center);
        assert_eq!(m.pivot(), Vec2::splat(0.5));
        assert_eq!(m.rect(), Some(s.rect));
        // Child bones are not shifted by the pivot.
        assert_eq!(m.bones()[1].position, Vec3::ZERO);
        assert_eq!(m.bones()[1].length, 0.0);
        // Root bones are: 0.5 * (100, 50).
        assert_eq!(m.bones()[0].position, Vec3::new(50.0, 25.0, 0.0));
        assert_eq!(m.bones()[0].parent_id, -1);
    }

    #[test]
    fn top_left_pivot_shifts_outline() {
        let s = sprite("flag", Vec2::new(0.0, 1.0));
        let m = MetaSprite::new(&s, 0, &AssetTable::default()).unwrap();
        assert_eq!(m.alignment(), SpriteAlignment::TopLeft);
        assert_eq!(m.outline().len(), 2);
        // (-0.5, -0.25) * 100 + (-50, 25)
        assert_eq!(m.outline()[0][0], Vec2::new(-100.0, 0.0));
    }

    #[test]
    fn packed_sprite_uses_atlas_frame() {
        let table = table_with_atlas();
        let mut s = sprite("packed", Vec2::ZERO);
        s.atlas = Some(ObjectRef(20));
        s.render_data_key = Some(key(1));
        s.bones.push(bone("root", -1, Vec3::ZERO, 0.25));
        let m = MetaSprite::new(&s, 7, &table).unwrap();

        assert_eq!(m.rect(), Some(Rect::new(10.0, 5.0, 80.0, 40.0)));
        assert_eq!(m.pivot(), Vec2::new(-0.125, -0.125));
        assert_eq!(m.alignment(), SpriteAlignment::Custom);
        // -0.125 * (80, 40)
        assert_eq!(m.bones()[0].position, Vec3::new(-10.0, -5.0, 0.0));
        assert_eq!(m.bones()[0].length, 25.0);
    }

    #[test]
    fn unresolvable_atlas_leaves_rect_unknown() {
        let mut s = sprite("orphan", Vec2::splat(0.5));
        s.atlas = Some(ObjectRef(404));
        let m = MetaSprite::new(&s, 0, &AssetTable::default()).unwrap();
        assert_eq!(m.rect(), None);
        assert_eq!(m.pivot(), Vec2::splat(0.5));
        assert_eq!(m.outline().len(), 2);
    }

    #[test]
    fn decode_failure_aborts_the_sprite() {
        let mut s = sprite("broken", Vec2::splat(0.5));
        if let crate::source::RenderMesh::Legacy { indices, .. } = &mut s.render_data.mesh {
            indices[0] = 99;
        }
        let err = MetaSprite::new(&s, 0, &AssetTable::default()).unwrap_err();
        assert!(matches!(err, DecodeError::LegacyIndexOutOfRange { index: 99, .. }));
    }

    #[test]
    fn physics_shape_follows_the_outline_transform() {
        let mut s = sprite("body", Vec2::splat(0.5));
        s.physics_shape = vec![vec![Vec2::new(0.5, 0.25), Vec2::new(-0.5, -0.25)]];
        let table = AssetTable::default();
        let m = MetaSprite::with_rng(&s, 0, &table, &mut fastrand::Rng::with_seed(1)).unwrap();
        assert_eq!(m.physics_shape(), &[vec![Vec2::new(50.0, 25.0), Vec2::new(-50.0, -25.0)]]);
        let again = MetaSprite::with_rng(&s, 0, &table, &mut fastrand::Rng::with_seed(1)).unwrap();
        assert_eq!(m.sprite_id(), again.sprite_id());
    }
}
