/// Resource hierarchy chunk, holding the model's name
pub const HIERARCHY: [u8; 12] = *b".CC4HSERHSER";
/// Scene data chunk, holding materials and sub-meshes
pub const SCENE: [u8; 12] = *b".CC4HSER2CSG";

/// Chunk header record size: size, type tag and version
pub const HEADER_SIZE: u64 = 20;
/// The next chunk starts `size + SIZE_BIAS` bytes after the current one
pub const SIZE_BIAS: u64 = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChunkType {
	Hierarchy,
	Scene,
	Unknown,
}

impl ChunkType {
	pub fn from_tag(tag: &[u8; 12]) -> ChunkType {
		match tag {
			&HIERARCHY => ChunkType::Hierarchy,
			&SCENE => ChunkType::Scene,
			_ => ChunkType::Unknown,
		}
	}
}

/// Top level container record. All fields are big endian.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkHeader {
	pub size: u32,
	pub tag: [u8; 12],
	pub version: u32,
}

impl ChunkHeader {
	pub fn kind(&self) -> ChunkType {
		ChunkType::from_tag(&self.tag)
	}

	/// Type tag as text, for diagnostics
	pub fn tag_str(&self) -> String {
		String::from_utf8_lossy(&self.tag).into_owned()
	}
}

#[cfg(feature = "import")]
pub mod import {
	use log::debug;

	use crate::{
		csg,
		cursor::{
			ByteCursor,
			Endian
		},
		import::TTImportError,
		mesh::DecodedModel
	};

	use super::*;

	impl ChunkHeader {
		fn read(cur: &mut ByteCursor) -> Result<ChunkHeader, TTImportError> {
			Ok(ChunkHeader {
				size: cur.read_u32()?,
				tag: cur.read_tag::<12>()?,
				version: cur.read_u32()?,
			})
		}
	}

	/// Visits every chunk in the buffer.
	///
	/// `visit` gets the cursor positioned at the chunk payload. Whatever it
	/// consumes, the walk resumes at `start + size + SIZE_BIAS`.
	pub fn walk<F>(cur: &mut ByteCursor, mut visit: F) -> Result<(), TTImportError>
	where
		F: FnMut(&ChunkHeader, &mut ByteCursor) -> Result<(), TTImportError>,
	{
		while !cur.at_end() {
			let start = cur.position();
			cur.set_endian(Endian::Big);

			let header = ChunkHeader::read(cur)?;
			debug!("chunk {:?} at {:#X}, size {}", header.tag_str(), start, header.size);

			visit(&header, cur)?;
			cur.seek(start + header.size as u64 + SIZE_BIAS);
		}

		Ok(())
	}

	/// Routes one chunk to its decoder. Unknown chunks are left untouched.
	pub fn dispatch(header: &ChunkHeader, cur: &mut ByteCursor, model: &mut DecodedModel)
		-> Result<(), TTImportError>
	{
		match header.kind() {
			ChunkType::Hierarchy => {
				cur.read_cstr()?;
				model.name = cur.read_cstr_pair()?;
			},
			ChunkType::Scene => csg::import::scene(cur, model)?,
			ChunkType::Unknown => debug!("skipping chunk {:?}", header.tag_str()),
		}

		Ok(())
	}

	impl DecodedModel {
		/// Decodes a whole `.model` file
		pub fn read(data: &[u8]) -> Result<DecodedModel, TTImportError> {
			let mut cur = ByteCursor::new(data);
			let mut model = DecodedModel::default();

			walk(&mut cur, |header, cur| dispatch(header, cur, &mut model))?;

			Ok(model)
		}
	}

}
