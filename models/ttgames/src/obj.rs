use log::warn;

use std::{
	fs::File,
	io::{
		BufWriter,
		Result,
		Write
	},
	path::Path
};

use ultraviolet::vec::{
	Vec2,
	Vec3
};

use rgk_core::scene::Scene;

/// Writes every geometry node of the scene as a Wavefront OBJ object.
///
/// Index lists are written as triangle lists. Vertex colors use the common
/// `v x y z r g b` extension and only carry the first color set.
pub fn write<W>(scene: &Scene, buf: &mut W) -> Result<()>
where
	W: Write,
{
	writeln!(buf, "# {}", scene.root.id.label())?;

	let mut base_v = 1u64;
	let mut base_vt = 1u64;
	let mut base_vn = 1u64;

	for (id, mesh) in scene.root.geometry() {
		writeln!(buf, "o {}", id.label())?;

		let has_uv = mesh.vertices.first().map_or(false, |v| !v.uvs.is_empty());
		let has_normal = mesh.vertices.first().map_or(false, |v| v.normal.is_some());

		for v in mesh.vertices.iter() {
			let p = v.position;
			match v.colors.first() {
				Some(c) => writeln!(buf, "v {} {} {} {} {} {}", p.x, p.y, p.z, c.x, c.y, c.z)?,
				None => writeln!(buf, "v {} {} {}", p.x, p.y, p.z)?,
			}
		}

		if has_uv {
			for v in mesh.vertices.iter() {
				let t = v.uvs.first().copied().unwrap_or_else(Vec2::zero);
				writeln!(buf, "vt {} {}", t.x, t.y)?;
			}
		}

		if has_normal {
			for v in mesh.vertices.iter() {
				let n = v.normal.unwrap_or_else(Vec3::zero);
				writeln!(buf, "vn {} {} {}", n.x, n.y, n.z)?;
			}
		}

		if mesh.indices.len() % 3 != 0 {
			warn!("{}: {} trailing indices don't form a triangle", id.label(), mesh.indices.len() % 3);
		}

		for tri in mesh.triangles() {
			write!(buf, "f")?;
			for i in tri.iter().map(|i| *i as u64) {
				match (has_uv, has_normal) {
					(true, true) => write!(buf, " {}/{}/{}", base_v + i, base_vt + i, base_vn + i)?,
					(true, false) => write!(buf, " {}/{}", base_v + i, base_vt + i)?,
					(false, true) => write!(buf, " {}//{}", base_v + i, base_vn + i)?,
					(false, false) => write!(buf, " {}", base_v + i)?,
				}
			}
			writeln!(buf)?;
		}

		let count = mesh.vertices.len() as u64;
		base_v += count;
		if has_uv {
			base_vt += count;
		}
		if has_normal {
			base_vn += count;
		}
	}

	Ok(())
}

/// Writes the scene to an OBJ file at `path`
pub fn save<P>(scene: &Scene, path: P) -> Result<()>
where
	P: AsRef<Path>,
{
	let mut buf = BufWriter::new(File::create(path)?);
	write(scene, &mut buf)?;
	buf.flush()
}
