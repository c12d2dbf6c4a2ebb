use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::math::{Rect, Rotation, Vec2, Vec3, Vec4};

/// Path id of an object inside the asset container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectRef(pub i64);

/// Key into a sprite atlas' render-data map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderDataKey {
    pub guid: String,
    pub second: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Texture {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprite {
    pub name: String,
    /// Nominal rect in the source texture.
    pub rect: Rect,
    /// Normalized pivot. Not clamped.
    pub pivot: Vec2,
    /// Insets as left, bottom, right, top.
    #[serde(default)]
    pub border: Vec4,
    pub pixels_to_units: f32,
    pub render_data: SpriteRenderData,
    #[serde(default)]
    pub bones: Vec<SpriteBone>,
    #[serde(default)]
    pub physics_shape: Vec<Vec<Vec2>>,
    #[serde(default)]
    pub atlas: Option<ObjectRef>,
    #[serde(default)]
    pub render_data_key: Option<RenderDataKey>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteRenderData {
    #[serde(default)]
    pub texture: Option<ObjectRef>,
    pub texture_rect: Rect,
    /// Offset of `texture_rect` inside the sprite's own rect.
    #[serde(default)]
    pub texture_rect_offset: Vec2,
    pub mesh: RenderMesh,
}

/// The two historical mesh encodings. Exactly one is present per sprite.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum RenderMesh {
    /// Explicit vertex and index arrays (older containers).
    Legacy { vertices: Vec<LegacyVertex>, indices: Vec<u16> },
    /// Interleaved vertex streams plus a 16-bit index buffer split into submeshes.
    Stream { vertex_data: VertexData, index_buffer: Vec<u8>, sub_meshes: Vec<SubMesh> },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LegacyVertex {
    pub pos: Vec3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexData {
    #[serde(default)]
    pub vertex_count: u32,
    /// Channel 0 is the position channel.
    pub channels: Vec<ChannelInfo>,
    pub streams: Vec<StreamInfo>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub stream: u8,
    pub offset: u8,
    #[serde(default)]
    pub format: u8,
    #[serde(default)]
    pub dimension: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StreamInfo {
    pub offset: u32,
    pub stride: u32,
    #[serde(default)]
    pub channel_mask: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SubMesh {
    pub first_byte: u32,
    pub index_count: u32,
    pub first_vertex: u32,
    pub vertex_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteBone {
    pub name: String,
    /// `-1` marks the root.
    #[serde(default = "root_parent")]
    pub parent_id: i32,
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default)]
    pub length: f32,
}

fn root_parent() -> i32 { -1 }

impl SpriteBone {
    pub fn is_root(&self) -> bool { self.parent_id == -1 }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteAtlas {
    pub name: String,
    pub packed_sprites: Vec<ObjectRef>,
    #[serde(default)]
    pub render_data_map: RenderDataMap,
}

/// Where the packer put one sprite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpriteAtlasData {
    #[serde(default)]
    pub texture: Option<ObjectRef>,
    pub texture_rect: Rect,
    #[serde(default)]
    pub texture_rect_offset: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderDataEntry {
    pub key: RenderDataKey,
    pub data: SpriteAtlasData,
}

/// Render-data key → packed placement. Serialized as a list of entries.
#[derive(Debug, Clone, Default)]
pub struct RenderDataMap(HashMap<RenderDataKey, SpriteAtlasData>);

impl RenderDataMap {
    pub fn get(&self, key: &RenderDataKey) -> Option<&SpriteAtlasData> { self.0.get(key) }

    pub fn insert(&mut self, key: RenderDataKey, data: SpriteAtlasData) {
        self.0.insert(key, data);
    }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl From<Vec<RenderDataEntry>> for RenderDataMap {
    fn from(entries: Vec<RenderDataEntry>) -> Self {
        Self(entries.into_iter().map(|e| (e.key, e.data)).collect())
    }
}

impl Serialize for RenderDataMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<RenderDataEntry> = self
            .0
            .iter()
            .map(|(key, data)| RenderDataEntry { key: key.clone(), data: *data })
            .collect();
        entries.sort_by(|a, b| (&a.key.guid, a.key.second).cmp(&(&b.key.guid, b.key.second)));
        entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RenderDataMap {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<RenderDataEntry>::deserialize(deserializer).map(Self::from)
    }
}
