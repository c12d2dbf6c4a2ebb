use std::fmt;

use thiserror::Error;

use crate::source::{ObjectRef, RenderDataKey};

/// Which of the two render-data buffers a read went past.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind { Vertex, Index }

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferKind::Vertex => f.write_str("vertex"),
            BufferKind::Index => f.write_str("index"),
        }
    }
}

/// Malformed render-data buffers. Fatal to the sprite being reconstructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("legacy index count {count} is not a multiple of 3")]
    LegacyIndexCount { count: usize },
    #[error("legacy index {index} out of range for {vertex_count} vertices")]
    LegacyIndexOutOfRange { index: u16, vertex_count: usize },
    #[error("vertex data declares no position channel")]
    MissingPositionChannel,
    #[error("position channel uses stream {stream}, but only {available} streams are declared")]
    MissingStream { stream: u8, available: usize },
    #[error("stream {stream}: stride {stride} too small for a position at offset {channel_offset}")]
    BadStride { stream: u8, stride: u32, channel_offset: u8 },
    #[error("submesh {submesh}: index count {count} is not a multiple of 3")]
    SubMeshIndexCount { submesh: usize, count: u32 },
    #[error("submesh {submesh}: index {index} (base {first_vertex}) past {vertex_count} vertices")]
    IndexOutOfRange { submesh: usize, index: u16, first_vertex: u32, vertex_count: u32 },
    #[error("submesh {submesh}: {buffer} buffer needs {needed} bytes at {offset}, has {len}")]
    ShortBuffer { submesh: usize, buffer: BufferKind, offset: usize, needed: usize, len: usize },
}

/// A cross-reference the container could not satisfy. Callers degrade to
/// "unknown" instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("sprite atlas {0:?} could not be resolved")] MissingAtlas(ObjectRef),
    #[error("sprite atlas '{atlas}' has no render data for key {key:?}")]
    MissingRenderData { atlas: String, key: Option<RenderDataKey> },
    #[error("texture {0:?} could not be resolved")] MissingTexture(ObjectRef),
    #[error("render data carries no texture reference")] NoTexture,
}
