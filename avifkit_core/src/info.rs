/*!
# `AVIFKit` - Image Info
*/

use crate::{
	AvifError,
	avif::LibAvifDecoder,
};
use std::{
	fmt,
	num::NonZeroU32,
};



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # AVIF Image Info.
///
/// The dimensions and bit depth of an AVIF image, read from its container
/// without decoding any pixels.
///
/// Instantiation uses `TryFrom<&[u8]>`, which expects the raw file bytes.
///
/// ## Examples
///
/// ```no_run
/// use avifkit_core::AvifInfo;
///
/// let raw = std::fs::read("/path/to/my.avif").unwrap();
/// let info = AvifInfo::try_from(raw.as_slice()).unwrap();
/// println!("{}x{} @ {} bits", info.width(), info.height(), info.depth());
/// ```
pub struct AvifInfo {
	/// # Width.
	width: NonZeroU32,

	/// # Height.
	height: NonZeroU32,

	/// # Bit Depth.
	depth: u8,
}

impl fmt::Display for AvifInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}x{}, {}-bit", self.width, self.height, self.depth)
	}
}

impl TryFrom<&[u8]> for AvifInfo {
	type Error = AvifError;

	/// # From Raw Bytes.
	///
	/// ## Errors
	///
	/// This will return an error if the data is not a parseable AVIF, or if
	/// its reported dimensions are zero or absurd.
	fn try_from(raw: &[u8]) -> Result<Self, Self::Error> {
		let decoder = LibAvifDecoder::parse(raw)?;
		let (width, height, depth) = decoder.dimensions();
		Self::new(width, height, depth)
	}
}

impl AvifInfo {
	/// # New.
	pub(crate) fn new(width: u32, height: u32, depth: u32) -> Result<Self, AvifError> {
		let width = NonZeroU32::new(width).ok_or(AvifError::Overflow)?;
		let height = NonZeroU32::new(height).ok_or(AvifError::Overflow)?;
		if u64::from(width.get()) * u64::from(height.get()) > crate::frame::MAX_PIXELS {
			return Err(AvifError::Overflow);
		}

		// AV1 tops out at 12 bits.
		let depth = u8::try_from(depth).ok()
			.filter(|d| matches!(d, 8 | 10 | 12))
			.ok_or(AvifError::Parse)?;

		Ok(Self { width, height, depth })
	}

	#[inline]
	#[must_use]
	/// # Width.
	pub const fn width(&self) -> u32 { self.width.get() }

	#[inline]
	#[must_use]
	/// # Height.
	pub const fn height(&self) -> u32 { self.height.get() }

	#[inline]
	#[must_use]
	/// # Bit Depth.
	pub const fn depth(&self) -> u8 { self.depth }

	#[inline]
	#[must_use]
	/// # High Bit Depth?
	///
	/// Returns `true` if the image has more than 8 bits per channel, meaning
	/// it cannot be decoded into an 8-bit bitmap without loss.
	pub const fn is_high_depth(&self) -> bool { 8 < self.depth }
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_new() {
		let info = AvifInfo::new(4032, 3024, 8).expect("Info failed.");
		assert_eq!(info.width(), 4032);
		assert_eq!(info.height(), 3024);
		assert!(! info.is_high_depth());
		assert_eq!(info.to_string(), "4032x3024, 8-bit");

		assert!(AvifInfo::new(1, 1, 10).expect("Info failed.").is_high_depth());
		assert_eq!(AvifInfo::new(0, 1, 8), Err(AvifError::Overflow));
		assert_eq!(AvifInfo::new(1, 1, 9), Err(AvifError::Parse));
		assert_eq!(AvifInfo::new(1, 1, 256), Err(AvifError::Parse));
	}
}
