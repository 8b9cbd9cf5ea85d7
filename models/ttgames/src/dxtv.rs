use ultraviolet::vec::Vec4;

pub const MAGIC: [u8; 4] = *b"DXTV";
/// Reserved bytes between the attribute table and the vertex data
pub const RESERVED_SIZE: u64 = 6;
/// Bytes following the vertex data of each buffer.
///
/// Observed on a single format version; other versions may differ.
pub const TRAILER_SIZE: u64 = 16;

/// Semantic slot of a vertex attribute
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttributeKind {
	Position,
	Normal,
	Color0,
	Tangent,
	Color1,
	Uv0,
	Uv1,
	BlendIndices,
	BlendWeights,
	LightDirection,
	LightColor,
	Other(u8),
}

impl AttributeKind {
	pub fn from_u8(kind: u8) -> AttributeKind {
		match kind {
			0 => AttributeKind::Position,
			1 => AttributeKind::Normal,
			2 => AttributeKind::Color0,
			3 => AttributeKind::Tangent,
			4 => AttributeKind::Color1,
			5 => AttributeKind::Uv0,
			7 => AttributeKind::Uv1,
			9 => AttributeKind::BlendIndices,
			10 => AttributeKind::BlendWeights,
			12 => AttributeKind::LightDirection,
			13 => AttributeKind::LightColor,
			k => AttributeKind::Other(k),
		}
	}
}

/// On-disk numeric encoding of a vertex attribute
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(u8)]
pub enum AttributeFormat {
	Vec2Float = 2,
	Vec3Float,
	Vec4Float,
	Vec2Half,
	Vec4Half,
	/// Four raw bytes, kept in the 0..255 range
	Vec4Byte,
	/// Four bytes scaled to 0..1
	Vec4UNorm,
	/// Four raw color bytes; scaled when the mesh is assembled
	Color4Byte,
}

impl AttributeFormat {
	pub fn from_u8(format: u8) -> Option<AttributeFormat> {
		match format {
			2 => Some(AttributeFormat::Vec2Float),
			3 => Some(AttributeFormat::Vec3Float),
			4 => Some(AttributeFormat::Vec4Float),
			5 => Some(AttributeFormat::Vec2Half),
			6 => Some(AttributeFormat::Vec4Half),
			7 => Some(AttributeFormat::Vec4Byte),
			8 => Some(AttributeFormat::Vec4UNorm),
			9 => Some(AttributeFormat::Color4Byte),
			_ => None,
		}
	}

	/// Width in bytes of one value
	pub fn size(self) -> u32 {
		match self {
			AttributeFormat::Vec2Float => 8,
			AttributeFormat::Vec3Float => 12,
			AttributeFormat::Vec4Float => 16,
			AttributeFormat::Vec2Half => 4,
			AttributeFormat::Vec4Half => 8,
			AttributeFormat::Vec4Byte |
			AttributeFormat::Vec4UNorm |
			AttributeFormat::Color4Byte => 4,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttributeDescriptor {
	pub kind: AttributeKind,
	pub format: AttributeFormat,
	/// Offset from the start of each vertex record
	pub offset: u8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
	pub desc: AttributeDescriptor,
	/// One value per vertex. Components the format lacks are zero.
	pub data: Vec<Vec4>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VertexBuffer {
	pub version: u32,
	pub attributes: Vec<Attribute>,
}

impl VertexBuffer {
	/// Size of one interleaved vertex record
	pub fn stride(&self) -> u64 {
		stride(self.attributes.iter().map(|a| &a.desc))
	}
}

fn stride<'a, I>(descs: I) -> u64
where
	I: Iterator<Item = &'a AttributeDescriptor>,
{
	descs.map(|d| d.format.size() as u64).sum()
}

#[cfg(feature = "import")]
pub mod import {
	use log::trace;

	use crate::{
		cursor::{
			ByteCursor,
			Endian
		},
		import::TTImportError
	};

	use super::*;

	impl AttributeDescriptor {
		fn read(cur: &mut ByteCursor) -> Result<AttributeDescriptor, TTImportError> {
			let kind = AttributeKind::from_u8(cur.read_u8()?);

			let format_offset = cur.position();
			let raw_format = cur.read_u8()?;
			let format = AttributeFormat::from_u8(raw_format).ok_or(TTImportError::AttributeFormat {
				offset: format_offset,
				format: raw_format,
			})?;

			Ok(AttributeDescriptor {
				kind: kind,
				format: format,
				offset: cur.read_u8()?,
			})
		}
	}

	/// Decodes one value at the cursor
	pub fn value(cur: &mut ByteCursor, format: AttributeFormat) -> Result<Vec4, TTImportError> {
		Ok(match format {
			AttributeFormat::Vec2Float => Vec4::new(cur.read_f32()?, cur.read_f32()?, 0.0, 0.0),
			AttributeFormat::Vec3Float => Vec4::new(cur.read_f32()?, cur.read_f32()?, cur.read_f32()?, 0.0),
			AttributeFormat::Vec4Float => Vec4::new(cur.read_f32()?, cur.read_f32()?, cur.read_f32()?,
				cur.read_f32()?),
			AttributeFormat::Vec2Half => Vec4::new(cur.read_f16()?, cur.read_f16()?, 0.0, 0.0),
			AttributeFormat::Vec4Half => Vec4::new(cur.read_f16()?, cur.read_f16()?, cur.read_f16()?,
				cur.read_f16()?),
			AttributeFormat::Vec4Byte | AttributeFormat::Color4Byte => {
				let b = cur.read_tag::<4>()?;
				Vec4::new(b[0] as f32, b[1] as f32, b[2] as f32, b[3] as f32)
			},
			AttributeFormat::Vec4UNorm => {
				let b = cur.read_tag::<4>()?;
				Vec4::new(b[0] as f32, b[1] as f32, b[2] as f32, b[3] as f32) / 255.0
			},
		})
	}

	/// Decodes one DXTV block holding `num_verts` interleaved vertices.
	///
	/// The cursor ends up past the block's trailer, as computed from the
	/// stride, and back in big endian mode.
	pub fn vertex_buffer(cur: &mut ByteCursor, num_verts: u32) -> Result<VertexBuffer, TTImportError> {
		cur.expect_signature(&MAGIC)?;
		let version = cur.read_u32()?;
		let num_attrs = cur.read_u32()?;

		let mut descs = vec![];
		for _ in 0..num_attrs {
			descs.push(AttributeDescriptor::read(cur)?);
		}
		cur.skip(RESERVED_SIZE);

		let stride = stride(descs.iter());
		let base = cur.position();
		trace!("vertex buffer at {:#X}: {} attributes, stride {}", base, descs.len(), stride);

		// Bounded by what the buffer can hold; a bogus count fails on read instead
		let capacity = match stride {
			0 => 0,
			s => (num_verts as u64).min(cur.remaining() / s) as usize,
		};
		let mut attributes: Vec<Attribute> = descs.into_iter().map(|d| Attribute {
			desc: d,
			data: Vec::with_capacity(capacity),
		}).collect();

		// An attribute-less buffer has nothing to iterate
		let num_reads = if attributes.is_empty() { 0 } else { num_verts as u64 };

		cur.set_endian(Endian::Little);
		for v in 0..num_reads {
			for attr in attributes.iter_mut() {
				cur.seek(base + stride * v + attr.desc.offset as u64);
				attr.data.push(value(cur, attr.desc.format)?);
			}
		}
		cur.set_endian(Endian::Big);

		cur.seek(base + stride * num_verts as u64 + TRAILER_SIZE);

		Ok(VertexBuffer {
			version: version,
			attributes: attributes,
		})
	}

}
