//! Meta-file rendering.
//!
//! Every model type maps onto a [`Node`] with a fixed key order; the emitter
//! in [`emit`] turns the tree into text.

pub mod emit;

pub use emit::{FlowVector, MapBuilder, Node};

use crate::guid::Guid;
use crate::math::{Rect, Vec2};
use crate::meta::{
    InternalIdEntry, MetaBone, MetaSprite, SpriteSheet, TextureImporter, TextureMeta,
    FILE_FORMAT_VERSION,
};
use crate::mesh::Triangle;

pub const IMPORTER_SERIALIZED_VERSION: i64 = 11;
pub const SHEET_SERIALIZED_VERSION: i64 = 2;
pub const SPRITE_SERIALIZED_VERSION: i64 = 2;
pub const RECT_SERIALIZED_VERSION: i64 = 2;

pub trait ToNode {
    fn to_node(&self) -> Node;
}

impl ToNode for Guid {
    fn to_node(&self) -> Node { Node::Scalar(self.to_string()) }
}

impl ToNode for Rect {
    fn to_node(&self) -> Node {
        MapBuilder::new()
            .entry("serializedVersion", Node::int(RECT_SERIALIZED_VERSION))
            .entry("x", Node::float(self.x))
            .entry("y", Node::float(self.y))
            .entry("width", Node::float(self.width))
            .entry("height", Node::float(self.height))
            .build()
    }
}

impl ToNode for MetaBone {
    fn to_node(&self) -> Node {
        MapBuilder::new()
            .entry("name", Node::str(&self.name))
            .entry("position", Node::vector(self.position))
            .entry("rotation", Node::vector(self.rotation.to_vec4()))
            .entry("length", Node::float(self.length))
            .entry("parentId", Node::int(self.parent_id.into()))
            .build()
    }
}

impl ToNode for InternalIdEntry {
    fn to_node(&self) -> Node {
        let first = MapBuilder::new()
            .entry(self.class_id.to_string(), Node::int(self.internal_id))
            .build();
        MapBuilder::new()
            .entry("first", first)
            .entry("second", Node::str(&self.name))
            .build()
    }
}

fn outline_node(outline: &[Triangle]) -> Node {
    Node::seq(outline, |tri| Node::seq(tri, |&p| Node::vector(p)))
}

fn polygons_node(polygons: &[Vec<Vec2>]) -> Node {
    Node::seq(polygons, |poly| Node::seq(poly, |&p| Node::vector(p)))
}

fn bones_node(bones: &[MetaBone]) -> Node {
    Node::seq(bones, ToNode::to_node)
}

impl ToNode for MetaSprite {
    fn to_node(&self) -> Node {
        MapBuilder::new()
            .entry("serializedVersion", Node::int(SPRITE_SERIALIZED_VERSION))
            .entry("name", Node::str(self.name()))
            .entry("rect", self.rect().unwrap_or(Rect::ZERO).to_node())
            .entry("alignment", Node::int(self.alignment().code()))
            .entry("pivot", Node::vector(self.pivot()))
            .entry("border", Node::vector(self.border()))
            .entry("outline", outline_node(self.outline()))
            .entry("physicsShape", polygons_node(self.physics_shape()))
            .entry("bones", bones_node(self.bones()))
            .entry("spriteID", self.sprite_id().to_node())
            .entry("internalID", Node::int(self.internal_id()))
            .build()
    }
}

impl ToNode for SpriteSheet {
    fn to_node(&self) -> Node {
        MapBuilder::new()
            .entry("serializedVersion", Node::int(SHEET_SERIALIZED_VERSION))
            .entry("sprites", Node::seq(self.sprites(), ToNode::to_node))
            .entry("outline", outline_node(self.outline()))
            .entry("physicsShape", polygons_node(self.physics_shape()))
            .entry("bones", bones_node(self.bones()))
            .entry("spriteID", self.sprite_id.to_node())
            .build()
    }
}

impl ToNode for TextureImporter {
    fn to_node(&self) -> Node {
        MapBuilder::new()
            .entry("internalIDToNameTable", Node::seq(&self.internal_id_table, ToNode::to_node))
            .entry("externalObjects", Node::Map(Vec::new()))
            .entry("serializedVersion", Node::int(IMPORTER_SERIALIZED_VERSION))
            .entry("nPOTScale", Node::int(self.npot_scale.code()))
            .entry("alphaIsTransparency", Node::bool(self.alpha_is_transparency))
            .entry("spriteMode", Node::int(self.sprite_mode.code()))
            .entry("alignment", Node::int(self.alignment.code()))
            .entry("spritePivot", Node::vector(self.sprite_pivot))
            .entry("spritePixelsToUnits", Node::float(self.sprite_pixels_to_units))
            .entry("spriteBorder", Node::vector(self.sprite_border))
            .entry(
                "spriteGenerateFallbackPhysicsShape",
                Node::bool(self.generate_fallback_physics_shape),
            )
            .entry("textureType", Node::int(self.texture_type.code()))
            .entry("spriteSheet", self.sprite_sheet.to_node())
            .entry("spritePackingTag", Node::str(&self.sprite_packing_tag))
            .entry("userData", Node::str(&self.user_data))
            .build()
    }
}

impl ToNode for TextureMeta {
    fn to_node(&self) -> Node {
        MapBuilder::new()
            .entry("fileFormatVersion", Node::int(FILE_FORMAT_VERSION))
            .entry("guid", self.guid.to_node())
            .entry("TextureImporter", self.importer.to_node())
            .build()
    }
}

impl TextureMeta {
    /// The `.meta` file text.
    pub fn to_meta_string(&self) -> String { emit::to_string(&self.to_node()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImportOptions;
    use crate::math::{Rotation, Vec3};
    use crate::source::fixtures::{key, sprite};
    use crate::source::{AssetTable, ObjectRef, SpriteAtlas, SpriteAtlasData, SpriteBone, Texture};
    use serde_yaml::Value;

    fn single_text() -> String {
        let mut s = sprite("hero", Vec2::splat(0.5));
        s.bones.push(SpriteBone {
            name: "root".into(),
            parent_id: -1,
            position: Vec3::ZERO,
            rotation: Rotation::IDENTITY,
            length: 0.5,
        });
        let mut rng = fastrand::Rng::with_seed(11);
        let opts = ImportOptions::default();
        TextureMeta::from_sprite_with_rng(&s, &AssetTable::default(), &opts, &mut rng)
            .unwrap()
            .to_meta_string()
    }

    fn atlas_text() -> String {
        let mut table = AssetTable::default();
        let mut atlas = SpriteAtlas {
            name: "ui".into(),
            packed_sprites: Vec::new(),
            render_data_map: Default::default(),
        };
        for n in 0..2 {
            let mut s = sprite(&format!("icon_{n}"), Vec2::ZERO);
            s.atlas = Some(ObjectRef(100));
            s.render_data_key = Some(key(n));
            table.sprites.insert(ObjectRef(n), s);
            atlas.packed_sprites.push(ObjectRef(n));
            atlas.render_data_map.insert(
                key(n),
                SpriteAtlasData {
                    texture: Some(ObjectRef(50)),
                    texture_rect: Rect::new(n as f32 * 100.0, 0.0, 100.0, 50.0),
                    texture_rect_offset: Vec2::ZERO,
                },
            );
        }
        table.atlases.insert(ObjectRef(100), atlas.clone());
        let page = Texture { name: "ui_page0".into() };
        table.textures.insert(ObjectRef(50), page.clone());
        TextureMeta::from_atlas(&page, &atlas, &table, &ImportOptions::default()).to_meta_string()
    }

    #[test]
    fn header_and_key_order() {
        let text = single_text();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("fileFormatVersion: 2"));
        let guid = lines.next().unwrap().strip_prefix("guid: ").unwrap().to_string();
        assert_eq!(guid.len(), 32);
        assert_eq!(lines.next(), Some("TextureImporter:"));
        assert_eq!(lines.next(), Some("  internalIDToNameTable: []"));
        assert_eq!(lines.next(), Some("  externalObjects: {}"));
        assert_eq!(lines.next(), Some("  serializedVersion: 11"));
        assert!(text.contains("  spritePivot: {x: 0.5, y: 0.5}\n"));
        assert!(text.contains("  spriteBorder: {x: 0, y: 0, z: 0, w: 0}\n"));
        assert!(text.contains("  spriteMode: 1\n"));
        assert!(text.contains("  textureType: 8\n"));
        assert!(text.contains("  spritePackingTag: ''\n"));
    }

    #[test]
    fn single_sprite_document_parses_back() {
        let doc: Value = serde_yaml::from_str(&single_text()).unwrap();
        let imp = &doc["TextureImporter"];
        assert_eq!(imp["alignment"].as_i64(), Some(0));
        assert_eq!(imp["spritePixelsToUnits"].as_i64(), Some(100));
        let sheet = &imp["spriteSheet"];
        assert_eq!(sheet["serializedVersion"].as_i64(), Some(2));
        assert_eq!(sheet["sprites"].as_sequence().map(Vec::len), Some(0));
        assert_eq!(sheet["outline"].as_sequence().map(Vec::len), Some(2));
        assert_eq!(sheet["outline"][0][0]["x"].as_f64(), Some(-50.0));
        let bone = &sheet["bones"][0];
        assert_eq!(bone["name"].as_str(), Some("root"));
        assert_eq!(bone["position"]["x"].as_i64(), Some(50));
        assert_eq!(bone["rotation"]["w"].as_i64(), Some(1));
        assert_eq!(bone["length"].as_i64(), Some(50));
        assert_eq!(bone["parentId"].as_i64(), Some(-1));
        assert_eq!(sheet["spriteID"].as_str().map(str::len), Some(32));
    }

    #[test]
    fn atlas_document_lists_sprites_and_ids() {
        let text = atlas_text();
        assert!(text.contains(
            "  internalIDToNameTable:\n  - first:\n      213: 21300000\n    second: icon_0\n"
        ));
        let doc: Value = serde_yaml::from_str(&text).unwrap();
        let imp = &doc["TextureImporter"];
        assert_eq!(imp["spriteMode"].as_i64(), Some(2));
        assert_eq!(imp["internalIDToNameTable"][1]["first"][213].as_i64(), Some(21_300_002));
        let sprites = imp["spriteSheet"]["sprites"].as_sequence().unwrap();
        assert_eq!(sprites.len(), 2);
        let second = &sprites[1];
        assert_eq!(second["name"].as_str(), Some("icon_1"));
        assert_eq!(second["rect"]["x"].as_i64(), Some(100));
        assert_eq!(second["rect"]["serializedVersion"].as_i64(), Some(2));
        assert_eq!(second["alignment"].as_i64(), Some(6));
        assert_eq!(second["internalID"].as_i64(), Some(21_300_002));
        assert_eq!(second["outline"][0].as_sequence().map(Vec::len), Some(3));
        assert!(imp["spriteSheet"]["outline"].as_sequence().unwrap().is_empty());
    }

    #[test]
    fn unknown_rect_renders_as_zero() {
        let mut s = sprite("lost", Vec2::splat(0.5));
        s.atlas = Some(ObjectRef(1));
        let m = MetaSprite::new(&s, 0, &AssetTable::default()).unwrap();
        let Node::Map(entries) = m.to_node() else { panic!("sprite is a map") };
        let rect = &entries.iter().find(|(k, _)| k == "rect").unwrap().1;
        assert_eq!(*rect, Rect::ZERO.to_node());
    }

    #[test]
    fn names_needing_quotes_survive() {
        let mut s = sprite("null", Vec2::splat(0.5));
        s.bones.push(SpriteBone {
            name: "a: b".into(),
            parent_id: -1,
            position: Vec3::ZERO,
            rotation: Rotation::IDENTITY,
            length: 0.0,
        });
        let text = TextureMeta::from_sprite(&s, &AssetTable::default(), &ImportOptions::default())
            .unwrap()
            .to_meta_string();
        let doc: Value = serde_yaml::from_str(&text).unwrap();
        let bone = &doc["TextureImporter"]["spriteSheet"]["bones"][0];
        assert_eq!(bone["name"].as_str(), Some("a: b"));
    }
}
