use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Named pivot anchors, in the authoring tool's numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpriteAlignment {
    Center,
    TopLeft,
    TopCenter,
    TopRight,
    LeftCenter,
    RightCenter,
    BottomLeft,
    BottomCenter,
    BottomRight,
    Custom,
}

impl SpriteAlignment {
    pub fn code(self) -> i64 {
        match self {
            SpriteAlignment::Center => 0,
            SpriteAlignment::TopLeft => 1,
            SpriteAlignment::TopCenter => 2,
            SpriteAlignment::TopRight => 3,
            SpriteAlignment::LeftCenter => 4,
            SpriteAlignment::RightCenter => 5,
            SpriteAlignment::BottomLeft => 6,
            SpriteAlignment::BottomCenter => 7,
            SpriteAlignment::BottomRight => 8,
            SpriteAlignment::Custom => 9,
        }
    }

    /// Anchor for a normalized pivot. Matching is exact: a pivot of
    /// 0.4999999 is `Custom`, not `Center`.
    #[allow(clippy::float_cmp)]
    pub fn from_pivot(pivot: Vec2) -> Self {
        let column = |v: f32| -> Option<u8> {
            if v == 0.0 {
                Some(0)
            } else if v == 0.5 {
                Some(1)
            } else if v == 1.0 {
                Some(2)
            } else {
                None
            }
        };
        match (column(pivot.x), column(pivot.y)) {
            (Some(0), Some(2)) => SpriteAlignment::TopLeft,
            (Some(1), Some(2)) => SpriteAlignment::TopCenter,
            (Some(2), Some(2)) => SpriteAlignment::TopRight,
            (Some(0), Some(1)) => SpriteAlignment::LeftCenter,
            (Some(1), Some(1)) => SpriteAlignment::Center,
            (Some(2), Some(1)) => SpriteAlignment::RightCenter,
            (Some(0), Some(0)) => SpriteAlignment::BottomLeft,
            (Some(1), Some(0)) => SpriteAlignment::BottomCenter,
            (Some(2), Some(0)) => SpriteAlignment::BottomRight,
            _ => SpriteAlignment::Custom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextureImporterType { Default, Sprite }

impl TextureImporterType {
    pub fn code(self) -> i64 {
        match self {
            TextureImporterType::Default => 0,
            TextureImporterType::Sprite => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpriteImportMode { Single, Multiple }

impl SpriteImportMode {
    pub fn code(self) -> i64 {
        match self {
            SpriteImportMode::Single => 1,
            SpriteImportMode::Multiple => 2,
        }
    }
}

/// Power-of-two rescaling applied on import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureImporterNpotScale {
    #[default]
    None,
    ToNearest,
    ToLarger,
    ToSmaller,
}

impl TextureImporterNpotScale {
    pub fn code(self) -> i64 {
        match self {
            TextureImporterNpotScale::None => 0,
            TextureImporterNpotScale::ToNearest => 1,
            TextureImporterNpotScale::ToLarger => 2,
            TextureImporterNpotScale::ToSmaller => 3,
        }
    }
}
