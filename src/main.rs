use image::error::ImageError;

use quadtree_manip::Quadtree;

use std::fs::File;

use std::io::{Read, Write};

/// Helper function for `main`.
fn error_exit(msg: &str, code: i32) -> ! {
	eprintln!("{}", msg);
	std::process::exit(code)
}

/// `clap`-based CLI for manipulating images through their quadtrees.
///
/// May exit process with status code if there are errors:
///
/// 1: `clap` error
///
/// 2: invalid arguments
///
/// 3: file I/O issues
///
/// 4: invalid image data
///
/// 5: computation limits exceeded
///
/// 10: other, potentially unknown error
fn main() {
	let clap_matches = clap::App::new("quadtree_manip")
		.version("0.1.0")
		.about("Builds quadtrees from raster images for lossy pruning, flipping, rotation, and compact QTR storage.")
		.arg_from_usage("-d, --decode 'Read INPUT as QTR data rather than as a PNG or JFIF image'")
		.arg_from_usage("-e, --encode 'Write QTR data rather than a rendered PNG'")
		.arg_from_usage("-p, --prune=[T] 'Collapse subtrees whose leaves all lie within squared color distance T of the subtree average'")
		.arg_from_usage("-f, --flip 'Mirror the image across its vertical centerline'")
		.arg_from_usage("-r, --rotate=[N] 'Rotate the image 90 degrees counter-clockwise N times; defaults to 0'")
		.arg_from_usage("-s, --scale=[N] 'Integer upscale factor for rendered output; defaults to 1'")
		.arg_from_usage("<INPUT> 'Path to input file'")
		.arg_from_usage("[OUTPUT] 'Path to output file; defaults to INPUT with a modified file extension'")
		.get_matches();

	let input_path = clap_matches.value_of("INPUT").unwrap();

	// Numeric options up front, so bad values fail before any real work.
	let prune_tolerance = match clap_matches.value_of("prune") {
		Some(v) => match v.parse::<f64>() {
			Ok(t) => Some(t),
			Err(_) => error_exit("Non-numeric value for prune", 2)
		},
		None => None
	};
	let rotations = match clap_matches.value_of("rotate").unwrap_or("0").parse::<u32>() {
		Ok(n) => n,
		Err(_) => error_exit("Non-numeric value for rotate", 2)
	};
	let scale = match clap_matches.value_of("scale").unwrap_or("1").parse::<u32>() {
		Ok(0) => error_exit("Scale must be positive", 2),
		Ok(n) => n,
		Err(_) => error_exit("Non-numeric value for scale", 2)
	};

	// Grow the tree, from QTR data or from an ordinary image.
	let mut tree = if clap_matches.is_present("decode") {
		let mut source_data = Vec::new();
		let mut source_fh = match File::open(input_path) {
			Ok(f) => f,
			Err(_) => error_exit("File not found or could not be read", 3)
		};
		match source_fh.read_to_end(&mut source_data) {
			Ok(_) => (),
			Err(_) => error_exit("Could not read from input file", 3)
		}
		match Quadtree::from_qtr(&source_data) {
			Ok(t) => t,
			Err(_) => error_exit("Invalid image data", 4)
		}
	} else {
		let source = match image::open(input_path) {
			Ok(i) => i,
			Err(e) => {
				let (msg, code) = match e {
					ImageError::Decoding(_) => ("Invalid image data", 4),
					ImageError::Limits(_) => ("Computation limits exceeded", 5),
					ImageError::IoError(_) => ("File not found or could not be read", 3),
					_ => ("An error occurred", 10)
				};
				error_exit(msg, code)
			}
		}.into_rgba();
		Quadtree::from_image(&source)
	};

	// Prune before any transform: it judges against as-built averages.
	if let Some(tolerance) = prune_tolerance {
		tree.prune(tolerance);
	}
	if clap_matches.is_present("flip") {
		tree.flip_horizontal();
	}
	for _ in 0..rotations % 4 {
		tree.rotate_ccw();
	}

	if clap_matches.is_present("encode") {
		let qtr_data = match tree.to_qtr() {
			Ok(d) => d,
			Err(_) => error_exit("Flipped or rotated trees cannot be written as QTR; apply transforms when decoding instead", 2)
		};
		let mut out_fh = match File::create(clap_matches.value_of("OUTPUT")
			.unwrap_or(&(input_path.rsplitn(2, '.').last().unwrap().to_string() + ".qtr"))) {
			Ok(f) => f,
			Err(_) => error_exit("Could not open output file", 3)
		};
		match out_fh.write_all(&qtr_data) {
			Ok(_) => (),
			Err(_) => error_exit("Could not write to output file", 3)
		}
	} else {
		let output = tree.to_image(scale);
		match output.save(clap_matches.value_of("OUTPUT")
			.unwrap_or(&(input_path.rsplitn(2, '.').last().unwrap().to_string() + ".png"))) {
			Ok(_) => (),
			Err(_) => error_exit("Could not save output", 3)
		}
	}
}
