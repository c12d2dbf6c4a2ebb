//! Little-endian readers over an immutable byte slice.
//!
//! Every read takes an explicit offset and returns the value together with the
//! offset just past it, or `None` when the slice is too short. There is no
//! shared cursor, so a failed read cannot disturb any other read.

use crate::math::Vec3;

pub(crate) const U16_SIZE: usize = 2;
pub(crate) const F32_SIZE: usize = 4;
pub(crate) const VEC3_SIZE: usize = 3 * F32_SIZE;

fn window(buf: &[u8], offset: usize, len: usize) -> Option<(&[u8], usize)> {
    let end = offset.checked_add(len)?;
    buf.get(offset..end).map(|bytes| (bytes, end))
}

pub(crate) fn read_u16(buf: &[u8], offset: usize) -> Option<(u16, usize)> {
    let (bytes, next) = window(buf, offset, U16_SIZE)?;
    let raw: u16 = bytemuck::pod_read_unaligned(bytes);
    Some((u16::from_le(raw), next))
}

pub(crate) fn read_f32(buf: &[u8], offset: usize) -> Option<(f32, usize)> {
    let (bytes, next) = window(buf, offset, F32_SIZE)?;
    let raw: u32 = bytemuck::pod_read_unaligned(bytes);
    Some((f32::from_bits(u32::from_le(raw)), next))
}

pub(crate) fn read_vec3(buf: &[u8], offset: usize) -> Option<(Vec3, usize)> {
    let (x, offset) = read_f32(buf, offset)?;
    let (y, offset) = read_f32(buf, offset)?;
    let (z, offset) = read_f32(buf, offset)?;
    Some((Vec3::new(x, y, z), offset))
}
