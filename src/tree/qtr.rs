use bitvec::vec::BitVec;

use super::error::*;
use super::{split, Quadtree, QuadtreeNode};

/// A `BitVec` variant ideal for encoding and decoding quadtrees.
type QuadtreeEncodeBitVec = BitVec<bitvec::order::Msb0, u8>;

/// Bits per encoded node: one subdivision bit plus 32 bits of RGBA.
const NODE_BITS: usize = 33;

impl QuadtreeNode {
	/// Converts this node and its subtree into the QTR bit format.
	///
	/// Each node is one bit indicating subdivision followed by its color,
	/// bitwise big-endian; children follow their parent in NW, NE, SW, SE
	/// order. Rectangles are not written: the decoder regrows them from
	/// the image dimensions through the canonical midpoint split, which is
	/// why `ul`/`lr` are threaded through and checked here.
	fn encode(
		&self,
		buffer: &mut QuadtreeEncodeBitVec,
		ul: (u32, u32),
		lr: (u32, u32)
	) -> Result<(), EncodeError> {
		// Validate that the rectangle is the one a decoder will regrow.
		if self.up_left != ul || self.low_right != lr {
			return Err(EncodeError::NonCanonical);
		}
		// Bit to indicate subdivision
		buffer.push(!self.is_leaf());
		// Color channels
		for byte in self.avg.0.iter() {
			for bit_ind in 0..8 {
				buffer.push(byte & (1 << (7 - bit_ind)) != 0);
			}
		}
		// Recursion
		if self.is_leaf() {
			return Ok(());
		}
		let quadrants = split(ul, lr);
		for (child, quadrant) in self.children().iter().zip(quadrants.iter()) {
			match (child, quadrant) {
				(Some(child), Some((a, b))) => child.encode(buffer, *a, *b)?,
				(None, None) => (),
				_ => return Err(EncodeError::NonCanonical),
			}
		}
		Ok(())
	}

	/// Reads one node and its subtree back out of QTR bits, starting at
	/// `curr_ind`.
	///
	/// Successful return value carries the index to which the parser has
	/// progressed, to assist with the recursive algorithm.
	fn decode(
		buffer: &QuadtreeEncodeBitVec,
		ul: (u32, u32),
		lr: (u32, u32),
		mut curr_ind: usize
	) -> Result<(Box<QuadtreeNode>, usize), DecodeError> {
		// Validate data quantity
		if buffer.len() < curr_ind + NODE_BITS {
			return Err(DecodeError::InsufficientData);
		}
		let subdivided = buffer[curr_ind];
		curr_ind += 1;
		// Extract the color
		let mut channels = [0u8; 4];
		for channel in channels.iter_mut() {
			for bit_ind in 0..8 {
				*channel |= (buffer[curr_ind] as u8) << (7 - bit_ind);
				curr_ind += 1;
			}
		}
		let mut node = QuadtreeNode::new(ul, lr, image::Rgba(channels));
		// Recursion
		if subdivided {
			if ul == lr {
				return Err(DecodeError::DimensionMismatch);
			}
			let [nw_rect, ne_rect, sw_rect, se_rect] = split(ul, lr);
			if let Some((a, b)) = nw_rect {
				let (child, ind) = QuadtreeNode::decode(buffer, a, b, curr_ind)?;
				node.nw = Some(child);
				curr_ind = ind;
			}
			if let Some((a, b)) = ne_rect {
				let (child, ind) = QuadtreeNode::decode(buffer, a, b, curr_ind)?;
				node.ne = Some(child);
				curr_ind = ind;
			}
			if let Some((a, b)) = sw_rect {
				let (child, ind) = QuadtreeNode::decode(buffer, a, b, curr_ind)?;
				node.sw = Some(child);
				curr_ind = ind;
			}
			if let Some((a, b)) = se_rect {
				let (child, ind) = QuadtreeNode::decode(buffer, a, b, curr_ind)?;
				node.se = Some(child);
				curr_ind = ind;
			}
		}
		Ok((Box::new(node), curr_ind))
	}
}

impl Quadtree {
	/// Encodes the tree into QTR data: a header, both image dimensions,
	/// and the bit-packed node stream.
	///
	/// Only trees whose layout still matches the builder's midpoint split
	/// for their dimensions can be written; freshly built and pruned trees
	/// always qualify. A flip or rotation may leave child slots where the
	/// split would have none (it does whenever a dimension is odd), in
	/// which case this returns `EncodeError::NonCanonical` -- apply
	/// transforms after decoding instead.
	pub fn to_qtr(&self) -> Result<Vec<u8>, EncodeError> {
		let mut ret = Vec::new();
		// Header (version 1)
		ret.extend_from_slice(b"QuTrRa\x01");
		ret.extend_from_slice(&self.width.to_be_bytes());
		ret.extend_from_slice(&self.height.to_be_bytes());
		// Quadtree
		if let Some(ref root) = self.root {
			let mut bit_buf = QuadtreeEncodeBitVec::new();
			root.encode(&mut bit_buf, (0, 0), (self.width - 1, self.height - 1))?;
			ret.extend_from_slice(bit_buf.as_slice());
		}
		Ok(ret)
	}

	/// Derives a quadtree from the data of a QTR file.
	pub fn from_qtr(source: &[u8]) -> Result<Quadtree, DecodeError> {
		if source.len() < 15 {
			return Err(DecodeError::InsufficientData);
		}
		// Verify header
		if &source[..6] != b"QuTrRa" || source[6] != 1 {
			return Err(DecodeError::MissingHeader);
		}
		let width = u32::from_be_bytes([source[7], source[8], source[9], source[10]]);
		let height = u32::from_be_bytes([source[11], source[12], source[13], source[14]]);
		if width == 0 || height == 0 {
			return Ok(Quadtree { root: None, width, height });
		}
		// Decode tree
		let tree_bits = QuadtreeEncodeBitVec::from(&source[15..]);
		let (root, _) = QuadtreeNode::decode(
			&tree_bits,
			(0, 0),
			(width - 1, height - 1),
			0
		)?;
		Ok(Quadtree { root: Some(root), width, height })
	}
}
