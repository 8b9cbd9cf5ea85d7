/// Unused bytes after each material record
pub const MATERIAL_TRAILER_SIZE: u64 = 3;
/// Fixed part of the data between a sub-mesh's indices and the next sub-mesh.
///
/// Observed on a single format version; other versions may differ.
pub const SUBMESH_TRAILER_SIZE: u64 = 70;
/// Per vertex buffer part of the sub-mesh trailer
pub const SUBMESH_TRAILER_BUFFER_SIZE: u64 = 4;
/// Position of `num_verts` within a sub-mesh header
pub const NUM_VERTS_OFFSET: u64 = 20;

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
	pub file_path: String,
	pub name: String,
}

/// Sub-mesh record header. Packed, big endian, read field by field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubMeshHeader {
	pub magic: u32,
	pub version: u32,
	pub num_buffers: u32,
	pub unknown1: u32,
	pub unknown2: u32,
	pub num_verts: u32,
}

impl SubMeshHeader {
	/// Bytes to skip after this sub-mesh's index list
	pub fn trailer_size(&self) -> u64 {
		SUBMESH_TRAILER_SIZE + SUBMESH_TRAILER_BUFFER_SIZE * self.num_buffers as u64
	}
}

/// On-disk index width
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(u32)]
pub enum IndexFormat {
	U16 = 2,
	U32 = 4,
}

impl IndexFormat {
	pub fn from_u32(format: u32) -> Option<IndexFormat> {
		match format {
			2 => Some(IndexFormat::U16),
			4 => Some(IndexFormat::U32),
			_ => None,
		}
	}

	pub fn size(self) -> u64 {
		self as u32 as u64
	}
}

#[cfg(feature = "import")]
pub mod import {
	use log::trace;

	use crate::{
		cursor::{
			ByteCursor,
			Endian
		},
		dxtv,
		import::TTImportError,
		mesh::{
			assemble,
			DecodedModel
		}
	};

	use super::*;

	impl SubMeshHeader {
		fn read(cur: &mut ByteCursor) -> Result<SubMeshHeader, TTImportError> {
			Ok(SubMeshHeader {
				magic: cur.read_u32()?,
				version: cur.read_u32()?,
				num_buffers: cur.read_u32()?,
				unknown1: cur.read_u32()?,
				unknown2: cur.read_u32()?,
				num_verts: cur.read_u32()?,
			})
		}
	}

	impl Material {
		fn read(cur: &mut ByteCursor) -> Result<Material, TTImportError> {
			let file_path = cur.read_cstr_pair()?;
			let name = cur.read_cstr_pair()?;
			cur.skip(MATERIAL_TRAILER_SIZE);

			Ok(Material {
				file_path: file_path,
				name: name,
			})
		}
	}

	/// Reads `count` little endian indices, widened to 32 bits.
	/// The cursor is left in big endian mode.
	pub fn indices(cur: &mut ByteCursor, count: u32, format: IndexFormat) -> Result<Vec<u32>, TTImportError> {
		let mut out = Vec::with_capacity((count as u64).min(cur.remaining() / format.size()) as usize);

		cur.set_endian(Endian::Little);
		for _ in 0..count {
			out.push(match format {
				IndexFormat::U16 => cur.read_u16()? as u32,
				IndexFormat::U32 => cur.read_u32()?,
			});
		}
		cur.set_endian(Endian::Big);

		Ok(out)
	}

	/// Decodes a scene chunk body, appending its materials and meshes to `model`
	pub fn scene(cur: &mut ByteCursor, model: &mut DecodedModel) -> Result<(), TTImportError> {
		let num_materials = cur.read_u32()?;
		let _unknown = cur.read_u16()?;
		let _padding = cur.read_u16()?;

		for _ in 0..num_materials {
			model.materials.push(Material::read(cur)?);
		}

		let _padding = cur.read_u32()?;
		let num_meshes = cur.read_u32()?;
		let _one = cur.read_u32()?;

		for _ in 0..num_meshes {
			let start = cur.position();
			let header = SubMeshHeader::read(cur)?;
			trace!("sub-mesh at {:#X}: {} buffers, {} vertices", start, header.num_buffers,
				header.num_verts);

			let mut buffers = vec![];
			for _ in 0..header.num_buffers {
				buffers.push(dxtv::import::vertex_buffer(cur, header.num_verts)?);
			}

			// Without attribute data nothing bounds the vertex count, so hold it
			// to what the rest of the file could plausibly describe
			let has_data = buffers.iter().any(|b| b.stride() > 0);
			if !has_data && header.num_verts as u64 > cur.remaining() {
				return Err(TTImportError::Truncated {
					offset: start + NUM_VERTS_OFFSET,
				});
			}

			let num_indices = cur.read_u32()?;
			let format_offset = cur.position();
			let raw_format = cur.read_u32()?;
			let format = IndexFormat::from_u32(raw_format).ok_or(TTImportError::IndexFormat {
				offset: format_offset,
				format: raw_format,
			})?;

			let idx = indices(cur, num_indices, format)?;
			cur.skip(header.trailer_size());

			let name = format!("Mesh_{}", model.meshes.len());
			model.meshes.push(assemble(name, header.num_verts, &buffers, idx));
		}

		Ok(())
	}

}
