//! Sprite outline mesh decoding.
//!
//! Turns a sprite's render data into a flat list of triangles in the sprite's
//! local unit space. Two encodings exist and are never mixed:
//!
//! ```text
//! Legacy: vertices[] ──┐
//!         indices[]  ──┴─► gather XY per index triple
//!
//! Stream: data[] + channel 0 + stream ─► per submesh:
//!           vertex cursor = stream.offset + firstVertex * stride + channel.offset
//!           read vertexCount positions, stepping by the full stride
//!           index cursor  = firstByte
//!           read indexCount/3 u16 triples, rebase by firstVertex
//! ```
//!
//! Each submesh computes its own start offsets, so a bad submesh never shifts
//! the reads of the next one.

mod reader;

use log::trace;

use crate::error::{BufferKind, DecodeError};
use crate::math::Vec2;
use crate::source::{ChannelInfo, LegacyVertex, RenderMesh, StreamInfo, SubMesh, VertexData};

use reader::{read_u16, read_vec3, U16_SIZE, VEC3_SIZE};

/// Three points in 2D.
pub type Triangle = [Vec2; 3];

pub fn decode_triangles(mesh: &RenderMesh) -> Result<Vec<Triangle>, DecodeError> {
    match mesh {
        RenderMesh::Legacy { vertices, indices } => decode_legacy(vertices, indices),
        RenderMesh::Stream { vertex_data, index_buffer, sub_meshes } => {
            decode_stream(vertex_data, index_buffer, sub_meshes)
        }
    }
}

fn decode_legacy(vertices: &[LegacyVertex], indices: &[u16]) -> Result<Vec<Triangle>, DecodeError> {
    if indices.len() % 3 != 0 {
        return Err(DecodeError::LegacyIndexCount { count: indices.len() });
    }
    indices
        .chunks_exact(3)
        .map(|triple| {
            let mut tri = [Vec2::ZERO; 3];
            for (slot, &index) in tri.iter_mut().zip(triple) {
                let vertex = vertices.get(usize::from(index)).ok_or(
                    DecodeError::LegacyIndexOutOfRange { index, vertex_count: vertices.len() },
                )?;
                *slot = vertex.pos.truncate();
            }
            Ok(tri)
        })
        .collect()
}

fn decode_stream(
    vertex_data: &VertexData,
    index_buffer: &[u8],
    sub_meshes: &[SubMesh],
) -> Result<Vec<Triangle>, DecodeError> {
    let channel = vertex_data.channels.first().ok_or(DecodeError::MissingPositionChannel)?;
    let stream = vertex_data.streams.get(usize::from(channel.stream)).ok_or(
        DecodeError::MissingStream { stream: channel.stream, available: vertex_data.streams.len() },
    )?;
    if (stream.stride as usize) < usize::from(channel.offset) + VEC3_SIZE {
        return Err(DecodeError::BadStride {
            stream: channel.stream,
            stride: stream.stride,
            channel_offset: channel.offset,
        });
    }

    let mut triangles = Vec::new();
    for (index, sub_mesh) in sub_meshes.iter().enumerate() {
        let vertices = read_sub_mesh_vertices(index, sub_mesh, channel, stream, &vertex_data.data)?;
        let before = triangles.len();
        read_sub_mesh_triangles(index, sub_mesh, &vertices, index_buffer, &mut triangles)?;
        trace!(
            "submesh {index}: {} vertices, {} triangles",
            vertices.len(),
            triangles.len() - before
        );
    }
    Ok(triangles)
}

fn read_sub_mesh_vertices(
    submesh: usize,
    sub_mesh: &SubMesh,
    channel: &ChannelInfo,
    stream: &StreamInfo,
    data: &[u8],
) -> Result<Vec<Vec2>, DecodeError> {
    let stride = stream.stride as usize;
    let short = |offset: usize| DecodeError::ShortBuffer {
        submesh,
        buffer: BufferKind::Vertex,
        offset,
        needed: VEC3_SIZE,
        len: data.len(),
    };
    let start = (sub_mesh.first_vertex as usize)
        .checked_mul(stride)
        .and_then(|o| o.checked_add(stream.offset as usize))
        .and_then(|o| o.checked_add(usize::from(channel.offset)))
        .ok_or_else(|| short(usize::MAX))?;

    // The last position must fit before anything is allocated for the count.
    if let Some(last) = (sub_mesh.vertex_count as usize).checked_sub(1) {
        let last_offset = last.checked_mul(stride).and_then(|o| o.checked_add(start));
        let fits = last_offset
            .and_then(|o| o.checked_add(VEC3_SIZE))
            .is_some_and(|end| end <= data.len());
        if !fits {
            return Err(short(last_offset.unwrap_or(usize::MAX)));
        }
    }

    let mut vertices = Vec::with_capacity(sub_mesh.vertex_count as usize);
    let mut cursor = start;
    for _ in 0..sub_mesh.vertex_count {
        let (position, _) = read_vec3(data, cursor).ok_or_else(|| short(cursor))?;
        vertices.push(position.truncate());
        cursor = cursor.checked_add(stride).ok_or_else(|| short(usize::MAX))?;
    }
    Ok(vertices)
}

fn read_sub_mesh_triangles(
    submesh: usize,
    sub_mesh: &SubMesh,
    vertices: &[Vec2],
    index_buffer: &[u8],
    out: &mut Vec<Triangle>,
) -> Result<(), DecodeError> {
    if sub_mesh.index_count % 3 != 0 {
        return Err(DecodeError::SubMeshIndexCount { submesh, count: sub_mesh.index_count });
    }
    let mut cursor = sub_mesh.first_byte as usize;
    for _ in 0..sub_mesh.index_count / 3 {
        let mut tri = [Vec2::ZERO; 3];
        for slot in tri.iter_mut() {
            let (raw, next) = read_u16(index_buffer, cursor).ok_or(DecodeError::ShortBuffer {
                submesh,
                buffer: BufferKind::Index,
                offset: cursor,
                needed: U16_SIZE,
                len: index_buffer.len(),
            })?;
            cursor = next;
            let local = u32::from(raw)
                .checked_sub(sub_mesh.first_vertex)
                .filter(|&i| i < sub_mesh.vertex_count)
                .ok_or(DecodeError::IndexOutOfRange {
                    submesh,
                    index: raw,
                    first_vertex: sub_mesh.first_vertex,
                    vertex_count: sub_mesh.vertex_count,
                })?;
            *slot = vertices[local as usize];
        }
        out.push(tri);
    }
    Ok(())
}
