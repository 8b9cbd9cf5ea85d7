use ultraviolet::vec::{
	Vec2,
	Vec3,
	Vec4
};

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
	pub name: String,
	/// Texture or material definition path, as stored by the source format
	pub path: Option<String>,
}

/// Node identification type
#[derive(Clone, Debug, PartialEq)]
pub enum ObjRef {
	Name(String),
	Number(u32),
}

impl ObjRef {
	/// Returns a printable name for the node
	pub fn label(&self) -> String {
		match self {
			ObjRef::Name(s) => s.clone(),
			ObjRef::Number(n) => format!("{}", n),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeData {
	Geometry(Mesh),
	Null,
}

/// Base type of the 3D environment
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: ObjRef,
	pub children: Vec<Node>,
	pub data: NodeData,
}

impl Node {
	pub fn new(id: ObjRef) -> Node {
		Node {
			id: id,
			children: vec![],
			data: NodeData::Null,
		}
	}

	/// Collects every node carrying geometry, depth first, starting with this node
	pub fn geometry(&self) -> Vec<(&ObjRef, &Mesh)> {
		let mut out = vec![];
		if let NodeData::Geometry(ref mesh) = self.data {
			out.push((&self.id, mesh));
		}

		for child in self.children.iter() {
			out.extend(child.geometry());
		}

		out
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
	pub position: Vec3,
	pub normal: Option<Vec3>,
	/// Texture coordinates, one entry per UV set
	pub uvs: Vec<Vec2>,
	/// Vertex colors in the 0..1 range, one entry per color set
	pub colors: Vec<Vec4>,
}

impl Default for Vertex {
	fn default() -> Self {
		Vertex {
			position: Vec3::zero(),
			normal: None,
			uvs: vec![],
			colors: vec![],
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
	pub vertices: Vec<Vertex>,
	/// Triangle list, as authored
	pub indices: Vec<u32>,
}

impl Mesh {
	/// Returns every complete triangle in the index list.
	/// Trailing indices that don't form a full triangle are left out.
	pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
		self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
	}
}

/// Top level of the 3D environment
#[derive(Clone, Debug)]
pub struct Scene {
	pub root: Node,
	pub materials: Vec<Material>,
}

impl Scene {
	pub fn new(root: Node) -> Scene {
		Scene {
			root: root,
			materials: vec![],
		}
	}
}
