use bitflags::bitflags;

use ultraviolet::vec::{
	Vec2,
	Vec3,
	Vec4
};

use crate::{
	csg::Material,
	dxtv::{
		AttributeKind,
		VertexBuffer
	}
};

bitflags! {
	/// Vertex slots supplied by at least one attribute
	pub struct VertexSlots: u8 {
		const POSITION = 1;
		const NORMAL = 2;
		const UV0 = 4;
		const UV1 = 8;
		const COLOR0 = 16;
		const COLOR1 = 32;
	}
}

impl AttributeKind {
	/// Vertex slot this kind fills, if any
	pub fn slot(self) -> Option<VertexSlots> {
		match self {
			AttributeKind::Position => Some(VertexSlots::POSITION),
			AttributeKind::Normal => Some(VertexSlots::NORMAL),
			AttributeKind::Uv0 => Some(VertexSlots::UV0),
			AttributeKind::Uv1 => Some(VertexSlots::UV1),
			AttributeKind::Color0 => Some(VertexSlots::COLOR0),
			AttributeKind::Color1 => Some(VertexSlots::COLOR1),
			_ => None,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnifiedVertex {
	pub position: Vec3,
	pub normal: Vec3,
	pub uv0: Vec2,
	pub uv1: Vec2,
	/// 0..1 range
	pub color0: Vec4,
	/// 0..1 range
	pub color1: Vec4,
}

impl Default for UnifiedVertex {
	fn default() -> Self {
		UnifiedVertex {
			position: Vec3::zero(),
			normal: Vec3::zero(),
			uv0: Vec2::zero(),
			uv1: Vec2::zero(),
			color0: Vec4::zero(),
			color1: Vec4::zero(),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecodedMesh {
	pub name: String,
	pub vertices: Vec<UnifiedVertex>,
	/// Index list as authored
	pub indices: Vec<u32>,
	pub slots: VertexSlots,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodedModel {
	pub name: String,
	pub meshes: Vec<DecodedMesh>,
	/// Parsed but not bound to any mesh
	pub materials: Vec<Material>,
}

/// Folds a sub-mesh's vertex buffers into one vertex per index.
///
/// Buffers and their attributes are applied in declaration order, so a later
/// attribute of the same kind overwrites an earlier one. Colors are scaled
/// from 0..255 here. Kinds without a slot are dropped.
pub fn assemble(name: String, num_verts: u32, buffers: &[VertexBuffer], indices: Vec<u32>) -> DecodedMesh {
	let mut slots = VertexSlots::empty();
	for attr in buffers.iter().flat_map(|b| b.attributes.iter()) {
		if let Some(s) = attr.desc.kind.slot() {
			slots |= s;
		}
	}

	let mut vertices = Vec::with_capacity(num_verts as usize);
	for v in 0..(num_verts as usize) {
		let mut vert = UnifiedVertex::default();

		for attr in buffers.iter().flat_map(|b| b.attributes.iter()) {
			let d = match attr.data.get(v) {
				Some(d) => *d,
				None => continue,
			};

			match attr.desc.kind {
				AttributeKind::Position => vert.position = Vec3::new(d.x, d.y, d.z),
				AttributeKind::Normal => vert.normal = Vec3::new(d.x, d.y, d.z),
				AttributeKind::Uv0 => vert.uv0 = Vec2::new(d.x, d.y),
				AttributeKind::Uv1 => vert.uv1 = Vec2::new(d.x, d.y),
				AttributeKind::Color0 => vert.color0 = d / 255.0,
				AttributeKind::Color1 => vert.color1 = d / 255.0,
				_ => {},
			}
		}

		vertices.push(vert);
	}

	DecodedMesh {
		name: name,
		vertices: vertices,
		indices: indices,
		slots: slots,
	}
}

#[cfg(test)]
mod tests {
	use approx::assert_relative_eq;

	use crate::dxtv::{
		Attribute,
		AttributeDescriptor,
		AttributeFormat
	};

	use super::*;

	fn attr(kind: AttributeKind, format: AttributeFormat, data: Vec<Vec4>) -> Attribute {
		Attribute {
			desc: AttributeDescriptor {
				kind: kind,
				format: format,
				offset: 0,
			},
			data: data,
		}
	}

	fn buffer(attributes: Vec<Attribute>) -> VertexBuffer {
		VertexBuffer {
			version: 1,
			attributes: attributes,
		}
	}

	#[test]
	fn test_color_normalization() {
		let colors = buffer(vec![attr(AttributeKind::Color0, AttributeFormat::Color4Byte,
			vec![Vec4::new(255.0, 128.0, 0.0, 255.0)])]);
		let mesh = assemble("m".to_string(), 1, &[colors], vec![]);

		let c = mesh.vertices[0].color0;
		assert_relative_eq!(c.x, 1.0);
		assert_relative_eq!(c.y, 0.5019608, epsilon = 1e-6);
		assert_relative_eq!(c.z, 0.0);
		assert_relative_eq!(c.w, 1.0);
		assert_eq!(mesh.slots, VertexSlots::COLOR0);
	}

	#[test]
	fn test_slots_across_buffers() {
		let a = buffer(vec![
			attr(AttributeKind::Position, AttributeFormat::Vec3Float, vec![Vec4::new(1.0, 2.0, 3.0, 0.0)]),
			attr(AttributeKind::Tangent, AttributeFormat::Vec4Float, vec![Vec4::new(9.0, 9.0, 9.0, 9.0)]),
		]);
		let b = buffer(vec![
			attr(AttributeKind::Uv1, AttributeFormat::Vec2Half, vec![Vec4::new(0.5, 0.25, 0.0, 0.0)]),
			attr(AttributeKind::Color1, AttributeFormat::Color4Byte, vec![Vec4::new(0.0, 0.0, 255.0, 0.0)]),
			attr(AttributeKind::Other(6), AttributeFormat::Vec4Byte, vec![Vec4::new(1.0, 1.0, 1.0, 1.0)]),
		]);
		let mesh = assemble("m".to_string(), 1, &[a, b], vec![]);

		assert_eq!(mesh.slots, VertexSlots::POSITION | VertexSlots::UV1 | VertexSlots::COLOR1);

		let v = mesh.vertices[0];
		assert_eq!(v.position, Vec3::new(1.0, 2.0, 3.0));
		assert_eq!(v.uv1, Vec2::new(0.5, 0.25));
		assert_eq!(v.color1, Vec4::new(0.0, 0.0, 1.0, 0.0));
		assert_eq!(v.normal, Vec3::zero());
		assert_eq!(v.uv0, Vec2::zero());
	}

	#[test]
	fn test_last_writer_wins() {
		let a = buffer(vec![attr(AttributeKind::Normal, AttributeFormat::Vec3Float,
			vec![Vec4::new(1.0, 0.0, 0.0, 0.0), Vec4::new(1.0, 0.0, 0.0, 0.0)])]);
		let b = buffer(vec![attr(AttributeKind::Normal, AttributeFormat::Vec4Half,
			vec![Vec4::new(0.0, 1.0, 0.0, 1.0), Vec4::new(0.0, 0.0, 1.0, 1.0)])]);
		let mesh = assemble("m".to_string(), 2, &[a, b], vec![]);

		assert_eq!(mesh.vertices[0].normal, Vec3::new(0.0, 1.0, 0.0));
		assert_eq!(mesh.vertices[1].normal, Vec3::new(0.0, 0.0, 1.0));
	}

	#[test]
	fn test_indices_pass_through() {
		let indices = vec![0, 0, 0, 5, 1];
		let mesh = assemble("m".to_string(), 0, &[], indices.clone());

		assert!(mesh.vertices.is_empty());
		assert_eq!(mesh.indices, indices);
		assert_eq!(mesh.slots, VertexSlots::empty());
	}
}
