pub mod tree;

pub use tree::*;

impl Quadtree {
	/// "Prunes" the tree by collapsing near-uniform subtrees into leaves.
	///
	/// A subtree is collapsed, as high in the tree as possible, when every
	/// leaf under it is within `tolerance` (squared color distance, as
	/// measured by `color_distance`) of the average stored in the
	/// subtree's root.
	/// The collapsed root keeps that average and becomes a leaf; subtrees
	/// that don't qualify are descended into, so their children may still
	/// be collapsed individually.
	///
	/// Qualification is judged against the averages computed at build
	/// time, in a single pass. Pruning a tree twice, or pruning a copy of
	/// a pruned tree, would measure collapsed leaves against the wrong
	/// reference; the result of doing so is meaningless, though not
	/// dangerous. One prune per built tree.
	pub fn prune(&mut self, tolerance: f64) {
		if let Some(ref mut root) = self.root {
			root.prune_walk(tolerance);
		}
	}
}

impl QuadtreeNode {
	fn prune_walk(&mut self, tolerance: f64) {
		if self.is_leaf() {
			return;
		}
		let reference = self.avg;
		if self.can_prune(&reference, tolerance) {
			self.prune_subtree();
		} else {
			for child in self.children_mut().iter_mut() {
				if let Some(child) = child {
					child.prune_walk(tolerance);
				}
			}
		}
	}

	/// Whether every leaf of this subtree is within `tolerance` of
	/// `reference`. Short-circuits on the first leaf out of range.
	fn can_prune(&self, reference: &Color, tolerance: f64) -> bool {
		if self.is_leaf() {
			return color_distance(reference, &self.avg) <= tolerance;
		}
		self.children().iter().all(|child| match child {
			Some(child) => child.can_prune(reference, tolerance),
			None => true,
		})
	}

	/// Frees all four subtrees, children before parents, leaving this node
	/// a leaf.
	fn prune_subtree(&mut self) {
		self.nw = None;
		self.ne = None;
		self.sw = None;
		self.se = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use ::image::{Rgba, RgbaImage};

	fn varied(width: u32, height: u32) -> RgbaImage {
		RgbaImage::from_fn(width, height, |x, y| {
			Rgba([(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8, 255])
		})
	}

	#[test]
	fn zero_tolerance_collapses_a_uniform_image() {
		let img = RgbaImage::from_pixel(8, 8, Rgba([120, 130, 140, 255]));
		let mut tree = Quadtree::from_image(&img);
		assert!(tree.node_count() > 1);
		tree.prune(0.);
		assert_eq!(tree.node_count(), 1);
		assert_eq!(tree.to_image(1).as_raw(), img.as_raw());
	}

	#[test]
	fn prune_collapses_as_high_as_possible() {
		// Left half one flat color, right half eight wildly different
		// colors: the western subtrees collapse whole, the eastern ones
		// stay fully expanded.
		let east_colors = [
			Rgba([0, 0, 0, 255]),
			Rgba([255, 255, 255, 255]),
			Rgba([255, 0, 255, 255]),
			Rgba([0, 255, 0, 255]),
			Rgba([0, 0, 255, 255]),
			Rgba([255, 255, 0, 255]),
			Rgba([0, 255, 255, 255]),
			Rgba([255, 0, 0, 255]),
		];
		let img = RgbaImage::from_fn(4, 4, |x, y| {
			if x < 2 {
				Rgba([180, 40, 40, 255])
			} else {
				east_colors[((x - 2) + y * 2) as usize]
			}
		});
		let mut tree = Quadtree::from_image(&img);
		assert_eq!(tree.node_count(), 21);
		tree.prune(1.);
		// Root plus two collapsed western children plus two intact
		// five-node eastern subtrees.
		assert_eq!(tree.node_count(), 13);
		let root = tree.root.as_ref().unwrap();
		assert!(root.nw.as_ref().unwrap().is_leaf());
		assert!(root.sw.as_ref().unwrap().is_leaf());
		assert!(!root.ne.as_ref().unwrap().is_leaf());
		assert!(!root.se.as_ref().unwrap().is_leaf());
		assert_eq!(tree.to_image(1).as_raw(), img.as_raw());
	}

	#[test]
	fn looser_tolerance_never_keeps_more_nodes() {
		let img = varied(8, 8);
		let fresh = Quadtree::from_image(&img);
		let mut counts = Vec::new();
		for tolerance in &[0., 100., 1000., 100_000.] {
			let mut tree = fresh.clone();
			tree.prune(*tolerance);
			counts.push(tree.node_count());
		}
		for pair in counts.windows(2) {
			assert!(pair[1] <= pair[0], "node counts must fall as tolerance grows");
		}
	}

	#[test]
	fn huge_tolerance_leaves_a_single_blended_leaf() {
		let img = varied(4, 4);
		let mut tree = Quadtree::from_image(&img);
		let blended = tree.root.as_ref().unwrap().avg;
		tree.prune(1_000_000.);
		assert_eq!(tree.node_count(), 1);
		let out = tree.to_image(1);
		for pixel in out.pixels() {
			assert_eq!(pixel, &blended);
		}
	}

	#[test]
	fn pruning_a_copy_leaves_the_original_untouched() {
		let img = varied(8, 8);
		let tree = Quadtree::from_image(&img);
		let before = tree.node_count();
		let mut copy = tree.clone();
		copy.prune(1_000_000.);
		assert_eq!(copy.node_count(), 1);
		assert_eq!(tree.node_count(), before);
		assert_eq!(tree.to_image(1).as_raw(), img.as_raw());
	}

	#[test]
	fn pruning_the_empty_tree_is_a_no_op() {
		let mut tree = Quadtree::default();
		tree.prune(0.);
		assert!(tree.root.is_none());
	}
}
