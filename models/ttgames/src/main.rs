use clap::Parser;

use log::info;

use std::{
	fs::read,
	path::{
		Path,
		PathBuf
	},
	process
};

use rgk_models_ttgames::{
	ImportCfg,
	import::TTImportError,
	mesh::DecodedModel,
	obj,
	output_stem,
	to_scene
};

/// Converts a TT Games .model file into a Wavefront OBJ file
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
	/// Input .model file
	input: Option<PathBuf>,
}

fn is_model(path: &Path) -> bool {
	path.extension()
		.map(|e| e.to_string_lossy().eq_ignore_ascii_case("model"))
		.unwrap_or(false)
}

fn convert(input: &Path) -> Result<PathBuf, TTImportError> {
	let data = read(input)?;
	let model = DecodedModel::read(&data)?;
	info!("{:?}: {} meshes, {} materials", model.name, model.meshes.len(), model.materials.len());

	let scene = to_scene(&model, &ImportCfg::default());
	let output = PathBuf::from(format!("{}.obj", output_stem(&model.name, input)));
	obj::save(&scene, &output)?;

	Ok(output)
}

fn main() {
	env_logger::init();
	let args = Args::parse();

	let input = match args.input {
		Some(input) => input,
		None => {
			println!("Input .model required!");
			return;
		},
	};

	if !is_model(&input) {
		println!("Input file must be a .model.");
		return;
	}

	match convert(&input) {
		Ok(output) => println!("Wrote {}", output.display()),
		Err(e) => {
			eprintln!("{}", e);
			process::exit(1);
		},
	}
}
