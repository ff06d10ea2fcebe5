/// Reason why a quadtree couldn't be encoded to QTR data.
#[derive(Debug)]
pub enum EncodeError {
	/// The tree's layout no longer matches the canonical midpoint split
	/// for its dimensions (it has been flipped or rotated), so a decoder
	/// could not regrow its rectangles.
	NonCanonical,
}

/// Reason why QTR data couldn't be decoded.
#[derive(Debug)]
pub enum DecodeError {
	/// A node was expected but the data ran out.
	InsufficientData,
	/// There was no valid QTR file header.
	MissingHeader,
	/// The node stream subdivides below single pixels for the declared
	/// dimensions.
	DimensionMismatch,
}
