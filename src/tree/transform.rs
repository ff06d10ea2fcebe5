use std::mem::swap;

use super::{Quadtree, QuadtreeNode};

impl Quadtree {
	/// Rearranges the tree in place so that its rendered image is mirrored
	/// across the vertical centerline. No nodes are allocated or freed;
	/// child slots are swapped and every node's rectangle is recomputed
	/// from its own old coordinates and the image width.
	///
	/// Flipping twice restores the original arrangement. May be called on
	/// pruned, flipped or rotated trees; afterwards, a `None` child slot
	/// says nothing about rectangle widths, only which subtrees exist.
	pub fn flip_horizontal(&mut self) {
		let width = self.width;
		if let Some(ref mut root) = self.root {
			root.flip_horizontal(width);
		}
	}

	/// Rearranges the tree in place so that its rendered image is rotated
	/// 90 degrees counter-clockwise, swapping the tree's width and height.
	///
	/// Each node's rectangle is recomputed from its own old coordinates
	/// and the pre-rotation image width alone; the child slots take one
	/// step of the `NW <- NE <- SE <- SW` cycle. Four rotations
	/// restore every rectangle and both dimensions exactly. May be called
	/// on pruned, flipped or rotated trees.
	pub fn rotate_ccw(&mut self) {
		let old_width = self.width;
		swap(&mut self.width, &mut self.height);
		if let Some(ref mut root) = self.root {
			root.rotate_ccw(old_width);
		}
	}
}

impl QuadtreeNode {
	fn flip_horizontal(&mut self, width: u32) {
		swap(&mut self.nw, &mut self.ne);
		swap(&mut self.sw, &mut self.se);

		let new_ul_x = width - 1 - self.low_right.0;
		let new_lr_x = width - 1 - self.up_left.0;
		self.up_left.0 = new_ul_x;
		self.low_right.0 = new_lr_x;

		for child in self.children_mut().iter_mut() {
			if let Some(child) = child {
				child.flip_horizontal(width);
			}
		}
	}

	fn rotate_ccw(&mut self, old_width: u32) {
		// One step of the child cycle: what rendered in the NE corner now
		// renders in the NW corner, and so on around.
		let nw = self.nw.take();
		self.nw = self.ne.take();
		self.ne = self.se.take();
		self.se = self.sw.take();
		self.sw = nw;

		let (ul, lr) = (self.up_left, self.low_right);
		self.up_left = (ul.1, old_width - 1 - lr.0);
		self.low_right = (lr.1, old_width - 1 - ul.0);

		for child in self.children_mut().iter_mut() {
			if let Some(child) = child {
				child.rotate_ccw(old_width);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::{Rgba, RgbaImage};

	fn gradient(width: u32, height: u32) -> RgbaImage {
		RgbaImage::from_fn(width, height, |x, y| {
			Rgba([(x * 30) as u8, (y * 30) as u8, ((x + y) * 15) as u8, 255])
		})
	}

	fn collect_rects(node: &QuadtreeNode, out: &mut Vec<((u32, u32), (u32, u32))>) {
		out.push((node.up_left, node.low_right));
		for child in node.children().iter() {
			if let Some(child) = child {
				collect_rects(child, out);
			}
		}
	}

	#[test]
	fn flip_renders_the_mirrored_image() {
		let img = gradient(5, 3);
		let mut tree = Quadtree::from_image(&img);
		tree.flip_horizontal();
		let mirrored = RgbaImage::from_fn(5, 3, |x, y| *img.get_pixel(4 - x, y));
		assert_eq!(tree.to_image(1).as_raw(), mirrored.as_raw());
		assert_eq!((tree.width, tree.height), (5, 3));
	}

	#[test]
	fn flip_twice_restores_the_render() {
		let img = gradient(6, 4);
		let mut tree = Quadtree::from_image(&img);
		let mut before = Vec::new();
		collect_rects(tree.root.as_ref().unwrap(), &mut before);
		tree.flip_horizontal();
		tree.flip_horizontal();
		let mut after = Vec::new();
		collect_rects(tree.root.as_ref().unwrap(), &mut after);
		assert_eq!(before, after, "a double flip must restore every rectangle");
		assert_eq!(tree.to_image(1).as_raw(), img.as_raw());
	}

	#[test]
	fn rotation_renders_the_rotated_image() {
		let img = gradient(4, 3);
		let mut tree = Quadtree::from_image(&img);
		tree.rotate_ccw();
		assert_eq!((tree.width, tree.height), (3, 4));
		// A pixel at (x, y) lands at (y, width - 1 - x).
		let rotated = RgbaImage::from_fn(3, 4, |x, y| *img.get_pixel(3 - y, x));
		assert_eq!(tree.to_image(1).as_raw(), rotated.as_raw());
	}

	#[test]
	fn four_rotations_restore_the_tree_exactly() {
		let img = gradient(5, 3);
		let mut tree = Quadtree::from_image(&img);
		let mut before = Vec::new();
		collect_rects(tree.root.as_ref().unwrap(), &mut before);
		for _ in 0..4 {
			tree.rotate_ccw();
		}
		assert_eq!((tree.width, tree.height), (5, 3));
		let mut after = Vec::new();
		collect_rects(tree.root.as_ref().unwrap(), &mut after);
		assert_eq!(before, after, "four rotations must restore every rectangle");
		assert_eq!(tree.to_image(1).as_raw(), img.as_raw());
	}

	#[test]
	fn transforms_compose_on_pruned_trees() {
		let mut img = gradient(4, 4);
		for y in 0..2 {
			for x in 0..2 {
				img.put_pixel(x, y, Rgba([200, 10, 10, 255]));
			}
		}
		let mut tree = Quadtree::from_image(&img);
		tree.prune(0.);
		let plain = tree.to_image(1);
		tree.flip_horizontal();
		tree.rotate_ccw();
		// Flip then rotate: (x, y) -> (w - 1 - x, y) -> (y, x).
		let expected = RgbaImage::from_fn(4, 4, |x, y| *plain.get_pixel(y, x));
		assert_eq!(tree.to_image(1).as_raw(), expected.as_raw());
	}

	#[test]
	fn transforms_on_the_empty_tree_are_no_ops() {
		let mut tree = Quadtree::default();
		tree.flip_horizontal();
		tree.rotate_ccw();
		assert!(tree.root.is_none());
	}
}
