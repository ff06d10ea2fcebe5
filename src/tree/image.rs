use image::RgbaImage;

use super::{split, Quadtree, QuadtreeNode};

impl Quadtree {
	/// Analyzes a traditional image into a quadtree.
	///
	/// Every leaf corresponds to one pixel of the image and carries that
	/// pixel's exact color; every branch covers a rectangle of pixels and
	/// carries the area-weighted blend of its children's averages. Blended
	/// averages accumulate a little truncation error relative to a true
	/// rescan of the covered pixels; that is the price of computing each
	/// one in constant time.
	///
	/// An image with either dimension zero produces the empty tree.
	pub fn from_image(img: &RgbaImage) -> Quadtree {
		let (width, height) = img.dimensions();
		if width == 0 || height == 0 {
			return Quadtree { root: None, width, height };
		}
		Quadtree {
			root: Some(Quadtree::build_node(img, (0, 0), (width - 1, height - 1))),
			width,
			height,
		}
	}

	fn build_node(
		img: &RgbaImage,
		ul: (u32, u32),
		lr: (u32, u32)
	) -> Box<QuadtreeNode> {
		// A single pixel is a leaf holding that pixel's exact color.
		if ul == lr {
			return Box::new(QuadtreeNode::new(ul, lr, *img.get_pixel(ul.0, ul.1)));
		}
		let mut node = QuadtreeNode::new(ul, lr, image::Rgba([0; 4]));
		let [nw_rect, ne_rect, sw_rect, se_rect] = split(ul, lr);
		if let Some((a, b)) = nw_rect {
			node.nw = Some(Quadtree::build_node(img, a, b));
		}
		if let Some((a, b)) = ne_rect {
			node.ne = Some(Quadtree::build_node(img, a, b));
		}
		if let Some((a, b)) = sw_rect {
			node.sw = Some(Quadtree::build_node(img, a, b));
		}
		if let Some((a, b)) = se_rect {
			node.se = Some(Quadtree::build_node(img, a, b));
		}
		node.avg = node.blended_avg();
		Box::new(node)
	}

	/// Generates an image from the tree, each leaf painted as a solid
	/// block of its average color. Works the same on pruned trees, whose
	/// leaves simply cover larger rectangles.
	///
	/// `scale` multiplies both dimensions; every covered pixel becomes a
	/// `scale`-by-`scale` block with no interpolation. Must be positive.
	pub fn to_image(&self, scale: u32) -> RgbaImage {
		debug_assert!(scale > 0, "scale must be positive");
		let mut img = RgbaImage::new(self.width * scale, self.height * scale);
		if let Some(ref root) = self.root {
			root.draw(&mut img, scale);
		}
		img
	}
}

impl QuadtreeNode {
	fn draw(&self, img: &mut RgbaImage, scale: u32) {
		if self.is_leaf() {
			let block_w = (self.low_right.0 - self.up_left.0 + 1) * scale;
			let block_h = (self.low_right.1 - self.up_left.1 + 1) * scale;
			image::imageops::replace(
				img,
				&RgbaImage::from_pixel(block_w, block_h, self.avg),
				self.up_left.0 * scale,
				self.up_left.1 * scale,
			);
		} else {
			for child in self.children().iter() {
				if let Some(child) = child {
					child.draw(img, scale);
				}
			}
		}
	}
}
