pub mod error;
pub mod image;
pub mod qtr;
pub mod transform;

use ::image::Rgba;

/// Color stored in tree nodes: direct RGBA, no palette indirection.
pub type Color = Rgba<u8>;

fn abs_sub(a: u8, b: u8) -> u8 {
	(a as i16 - b as i16).abs() as u8
}

fn vec3_len_squared(a: u8, b: u8, c: u8) -> u32 {
	(a as u32 * a as u32) +
	(b as u32 * b as u32) +
	(c as u32 * c as u32)
}

/// Squared Euclidean distance between two colors over the red, green and
/// blue channels. Symmetric and non-negative.
///
/// Alpha is carried through the tree but treated as opaque storage, so it
/// does not participate in distances.
pub fn color_distance(a: &Color, b: &Color) -> f64 {
	vec3_len_squared(
		abs_sub(a.0[0], b.0[0]),
		abs_sub(a.0[1], b.0[1]),
		abs_sub(a.0[2], b.0[2]),
	) as f64
}

/// Node in a quadtree for storing an image.
///
/// Covers the inclusive pixel rectangle from `up_left` to `low_right` and
/// holds the average color of every pixel under it, such that tree descent
/// can stop at any level and still paint something meaningful.
///
/// A node with all four children `None` is a leaf. As built, leaves are
/// single pixels and child slots are `None` exactly where the rectangle is
/// too narrow or too short to split; after pruning or a structural
/// transform, `None` slots reflect only the surviving tree shape.
#[derive(Clone, Debug)]
pub struct QuadtreeNode {
	pub up_left: (u32, u32),
	pub low_right: (u32, u32),
	pub avg: Color,
	pub nw: Option<Box<QuadtreeNode>>,
	pub ne: Option<Box<QuadtreeNode>>,
	pub sw: Option<Box<QuadtreeNode>>,
	pub se: Option<Box<QuadtreeNode>>,
}

impl QuadtreeNode {
	/// Makes a childless node over the given rectangle.
	pub fn new(up_left: (u32, u32), low_right: (u32, u32), avg: Color) -> QuadtreeNode {
		QuadtreeNode {
			up_left,
			low_right,
			avg,
			nw: None,
			ne: None,
			sw: None,
			se: None,
		}
	}

	pub fn is_leaf(&self) -> bool {
		self.nw.is_none() && self.ne.is_none() &&
		self.sw.is_none() && self.se.is_none()
	}

	/// Number of pixels in this node's rectangle.
	pub fn area(&self) -> u64 {
		(self.low_right.0 - self.up_left.0 + 1) as u64 *
		(self.low_right.1 - self.up_left.1 + 1) as u64
	}

	/// The four child slots in NW, NE, SW, SE order.
	pub fn children(&self) -> [Option<&QuadtreeNode>; 4] {
		[
			self.nw.as_deref(),
			self.ne.as_deref(),
			self.sw.as_deref(),
			self.se.as_deref(),
		]
	}

	pub(crate) fn children_mut(&mut self) -> [Option<&mut QuadtreeNode>; 4] {
		[
			self.nw.as_deref_mut(),
			self.ne.as_deref_mut(),
			self.sw.as_deref_mut(),
			self.se.as_deref_mut(),
		]
	}

	/// Number of nodes in this subtree, itself included.
	pub fn count(&self) -> usize {
		1 + self.children()
			.iter()
			.map(|child| child.map_or(0, QuadtreeNode::count))
			.sum::<usize>()
	}

	/// Blends the children's averages into this node's average, weighting
	/// each child by its rectangle area. Constant time: no descent below
	/// the immediate children, and no pixel rescanning.
	///
	/// Truncating integer division per channel. The divisor is the node's
	/// own area; the children tile it exactly, so absent children simply
	/// contribute nothing.
	pub(crate) fn blended_avg(&self) -> Color {
		let mut sums = [0u64; 4];
		for child in self.children().iter() {
			if let Some(child) = child {
				let area = child.area();
				for (sum, channel) in sums.iter_mut().zip(child.avg.0.iter()) {
					*sum += area * *channel as u64;
				}
			}
		}
		let total = self.area();
		Rgba([
			(sums[0] / total) as u8,
			(sums[1] / total) as u8,
			(sums[2] / total) as u8,
			(sums[3] / total) as u8,
		])
	}
}

/// Quadrant rectangles of the midpoint split of `[ul, lr]`, in NW, NE, SW,
/// SE order, as `(up_left, low_right)` pairs.
///
/// The split is as even as possible; an extra column goes to the west and
/// an extra row to the north. Quadrants that would fall outside a rectangle
/// only one column wide or one row tall are `None`.
pub(crate) fn split(
	ul: (u32, u32),
	lr: (u32, u32)
) -> [Option<((u32, u32), (u32, u32))>; 4] {
	let mid_x = (ul.0 + lr.0) / 2;
	let mid_y = (ul.1 + lr.1) / 2;
	let east = lr.0 > mid_x;
	let south = lr.1 > mid_y;
	[
		Some((ul, (mid_x, mid_y))),
		if east { Some(((mid_x + 1, ul.1), (lr.0, mid_y))) } else { None },
		if south { Some(((ul.0, mid_y + 1), (mid_x, lr.1))) } else { None },
		if east && south { Some(((mid_x + 1, mid_y + 1), lr)) } else { None },
	]
}

/// A quadtree over a raster image.
///
/// Owns its root node exclusively; an image with either dimension zero has
/// no root at all. Cloning is a deep copy sharing no nodes with the
/// original.
#[derive(Clone, Debug, Default)]
pub struct Quadtree {
	pub root: Option<Box<QuadtreeNode>>,
	pub width: u32,
	pub height: u32,
}

impl Quadtree {
	/// Discards every node, leaving the empty tree. Dimensions are kept.
	/// A no-op on an already-empty tree.
	pub fn clear(&mut self) {
		self.root = None;
	}

	/// Number of nodes in the whole tree.
	pub fn node_count(&self) -> usize {
		self.root.as_ref().map_or(0, |root| root.count())
	}
}
