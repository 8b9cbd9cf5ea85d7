pub mod chunk;
pub mod csg;
#[cfg(feature = "import")]
pub mod cursor;
pub mod dxtv;
pub mod mesh;
#[cfg(feature = "export")]
pub mod obj;

use bitflags::bitflags;

use std::path::Path;

use ultraviolet::vec::Vec2;

use rgk_core::scene::{
	Material,
	Mesh,
	Node,
	NodeData,
	ObjRef,
	Scene,
	Vertex
};

use mesh::{
	DecodedMesh,
	DecodedModel,
	VertexSlots
};

bitflags! {
	pub struct ImportFlag: u32 {
		const INCLUDE_NORMALS = 1;
		const INCLUDE_UVS = 2;
		const INCLUDE_COLORS = 4;
		const FLIP_UV_Y = 8;
		/// Lists parsed materials in the scene. Meshes are not bound to them.
		const INCLUDE_MATERIALS = 16;
	}
}

impl Default for ImportFlag {
	fn default() -> Self {
		ImportFlag::INCLUDE_NORMALS | ImportFlag::INCLUDE_UVS | ImportFlag::INCLUDE_COLORS
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportCfg {
	pub flags: ImportFlag,
	/// Replaces the name stored in the hierarchy chunk
	pub model_name: Option<String>,
}

/// Converts a decoded model into the shared scene representation.
/// Every sub-mesh becomes a geometry child of a root node named after the model.
pub fn to_scene(model: &DecodedModel, cfg: &ImportCfg) -> Scene {
	let name = cfg.model_name.clone().unwrap_or_else(|| model.name.clone());
	let mut root = Node::new(ObjRef::Name(name));

	for decoded in model.meshes.iter() {
		let mut node = Node::new(ObjRef::Name(decoded.name.clone()));
		node.data = NodeData::Geometry(convert_mesh(decoded, cfg.flags));
		root.children.push(node);
	}

	let mut scene = Scene::new(root);

	if cfg.flags.contains(ImportFlag::INCLUDE_MATERIALS) {
		scene.materials = model.materials.iter().map(|m| Material {
			name: m.name.clone(),
			path: Some(m.file_path.clone()),
		}).collect();
	}

	scene
}

fn convert_mesh(decoded: &DecodedMesh, flags: ImportFlag) -> Mesh {
	let slots = decoded.slots;

	// Sets are positional, so a second set keeps an empty first one in place
	let num_uvs = if slots.contains(VertexSlots::UV1) {
		2
	} else if slots.contains(VertexSlots::UV0) {
		1
	} else {
		0
	};
	let num_colors = if slots.contains(VertexSlots::COLOR1) {
		2
	} else if slots.contains(VertexSlots::COLOR0) {
		1
	} else {
		0
	};

	let vertices = decoded.vertices.iter().map(|src| {
		let mut vert = Vertex::default();
		vert.position = src.position;

		if flags.contains(ImportFlag::INCLUDE_NORMALS) && slots.contains(VertexSlots::NORMAL) {
			vert.normal = Some(src.normal);
		}

		if flags.contains(ImportFlag::INCLUDE_UVS) {
			vert.uvs = [src.uv0, src.uv1][..num_uvs].iter().map(|t| {
				if flags.contains(ImportFlag::FLIP_UV_Y) {
					Vec2::new(t.x, 1.0 - t.y)
				} else {
					*t
				}
			}).collect();
		}

		if flags.contains(ImportFlag::INCLUDE_COLORS) {
			vert.colors = [src.color0, src.color1][..num_colors].to_vec();
		}

		vert
	}).collect();

	Mesh {
		vertices: vertices,
		indices: decoded.indices.clone(),
	}
}

/// Picks the file stem used for exported files: the model's own name without
/// extension, or the input file's stem when the model carries no name.
pub fn output_stem(model_name: &str, input: &Path) -> String {
	let from_model = Path::new(model_name).file_stem()
		.map(|s| s.to_string_lossy().into_owned())
		.filter(|s| !s.is_empty());

	from_model.or_else(|| input.file_stem().map(|s| s.to_string_lossy().into_owned()))
		.unwrap_or_else(|| "model".to_string())
}

#[cfg(feature = "import")]
pub fn read<P>(filepath: P, cfg: &ImportCfg) -> Result<Scene, import::TTImportError>
where
	P: AsRef<Path>,
{
	let data = std::fs::read(filepath)?;
	let model = DecodedModel::read(&data)?;

	Ok(to_scene(&model, cfg))
}

#[cfg(feature = "import")]
pub mod import {
	use std::io;
	use thiserror::Error;

	#[derive(Error, Debug)]
	pub enum TTImportError {
		#[error("I/O error")]
		IO {
			#[from]
			source: io::Error,
		},
		#[error("Truncated or invalid data at offset {offset:#X}")]
		Truncated {
			offset: u64,
		},
		#[error("Invalid vertex buffer signature at offset {offset:#X}: {found:?}")]
		Signature {
			offset: u64,
			found: String,
		},
		#[error("Unknown/unsupported index format at offset {offset:#X}: {format}")]
		IndexFormat {
			offset: u64,
			format: u32,
		},
		#[error("Unknown/unsupported attribute format at offset {offset:#X}: {format}")]
		AttributeFormat {
			offset: u64,
			format: u8,
		},
	}

	impl TTImportError {
		/// Byte offset the error occurred at, if it came from the decoder
		pub fn offset(&self) -> Option<u64> {
			match self {
				TTImportError::IO { .. } => None,
				TTImportError::Truncated { offset } |
				TTImportError::Signature { offset, .. } |
				TTImportError::IndexFormat { offset, .. } |
				TTImportError::AttributeFormat { offset, .. } => Some(*offset),
			}
		}
	}
}

/// Builders for synthetic `.model` data
#[cfg(test)]
pub(crate) mod fixture {
	use byteorder::{
		BE,
		LE,
		WriteBytesExt
	};

	use rgk_core::tag4;

	use crate::{
		chunk::{
			HIERARCHY,
			SCENE
		},
		csg::{
			MATERIAL_TRAILER_SIZE,
			SUBMESH_TRAILER_BUFFER_SIZE,
			SUBMESH_TRAILER_SIZE
		},
		dxtv::{
			MAGIC,
			RESERVED_SIZE,
			TRAILER_SIZE
		}
	};

	/// Wraps a payload in a chunk record
	pub fn chunk(tag: &[u8; 12], payload: &[u8]) -> Vec<u8> {
		let mut buf = vec![];
		buf.write_u32::<BE>(16 + payload.len() as u32).unwrap();
		buf.extend_from_slice(tag);
		buf.write_u32::<BE>(1).unwrap();
		buf.extend_from_slice(payload);
		buf
	}

	pub fn hierarchy(name: &str) -> Vec<u8> {
		let mut payload = b"root\x00".to_vec();
		payload.extend_from_slice(name.as_bytes());
		payload.push(0);
		payload.extend_from_slice(name.to_uppercase().as_bytes());
		payload.push(0);
		chunk(&HIERARCHY, &payload)
	}

	pub fn f32s_le(vals: &[f32]) -> Vec<u8> {
		let mut buf = vec![];
		for v in vals.iter() {
			buf.write_f32::<LE>(*v).unwrap();
		}
		buf
	}

	/// Vertex buffer block; `attrs` holds `(kind, format, offset)` triples
	pub fn dxtv(attrs: &[(u8, u8, u8)], vertex_data: &[u8]) -> Vec<u8> {
		let mut buf = MAGIC.to_vec();
		buf.write_u32::<BE>(1).unwrap();
		buf.write_u32::<BE>(attrs.len() as u32).unwrap();
		for (kind, format, offset) in attrs.iter() {
			buf.extend_from_slice(&[*kind, *format, *offset]);
		}
		buf.extend(std::iter::repeat(0).take(RESERVED_SIZE as usize));
		buf.extend_from_slice(vertex_data);
		buf.extend(std::iter::repeat(0xEE).take(TRAILER_SIZE as usize));
		buf
	}

	/// Sub-mesh record: header, buffers, index list and trailer
	pub fn submesh(num_verts: u32, buffers: &[Vec<u8>], num_indices: u32, index_format: u32,
		index_data: &[u8]) -> Vec<u8>
	{
		let mut buf = vec![];
		for v in [tag4!(b"MESH"), 1, buffers.len() as u32, 0, 0, num_verts] {
			buf.write_u32::<BE>(v).unwrap();
		}
		for b in buffers.iter() {
			buf.extend_from_slice(b);
		}
		buf.write_u32::<BE>(num_indices).unwrap();
		buf.write_u32::<BE>(index_format).unwrap();
		buf.extend_from_slice(index_data);

		let trailer = SUBMESH_TRAILER_SIZE + SUBMESH_TRAILER_BUFFER_SIZE * buffers.len() as u64;
		buf.extend(std::iter::repeat(0xAB).take(trailer as usize));
		buf
	}

	/// Scene chunk body; materials are `(file_path, name)` pairs
	pub fn scene_payload(materials: &[(&str, &str)], submeshes: &[Vec<u8>]) -> Vec<u8> {
		let mut buf = vec![];
		buf.write_u32::<BE>(materials.len() as u32).unwrap();
		buf.write_u16::<BE>(0x0102).unwrap();
		buf.write_u16::<BE>(0).unwrap();

		for (path, name) in materials.iter() {
			for s in [path, path, name, name] {
				buf.extend_from_slice(s.as_bytes());
				buf.push(0);
			}
			buf.extend(std::iter::repeat(0x55).take(MATERIAL_TRAILER_SIZE as usize));
		}

		buf.write_u32::<BE>(0).unwrap();
		buf.write_u32::<BE>(submeshes.len() as u32).unwrap();
		buf.write_u32::<BE>(1).unwrap();
		for s in submeshes.iter() {
			buf.extend_from_slice(s);
		}
		buf
	}

	pub fn scene(materials: &[(&str, &str)], submeshes: &[Vec<u8>]) -> Vec<u8> {
		chunk(&SCENE, &scene_payload(materials, submeshes))
	}
}
