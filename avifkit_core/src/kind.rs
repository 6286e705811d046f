/*!
# `AVIFKit` - Image Kind
*/

use crate::AvifError;
use std::fmt;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Image Kind.
///
/// This is a cheap, header-only classification of raw file bytes. It is used
/// by the harness to route sources; for a proper AVIF check, see
/// [`is_avif`](crate::is_avif).
pub enum ImageKind {
	/// # AVIF.
	Avif,

	/// # JPEG.
	Jpeg,

	/// # PNG.
	Png,
}

impl AsRef<str> for ImageKind {
	#[inline]
	fn as_ref(&self) -> &str { self.as_str() }
}

impl fmt::Display for ImageKind {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl TryFrom<&[u8]> for ImageKind {
	type Error = AvifError;

	/// # From Raw Bytes.
	///
	/// This examines the first 12 bytes of the raw image file to see what
	/// magic its headers contain.
	fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
		// We need at least twelve bytes to hold header info!
		if src.len() > 12 {
			// PNG has just one way to be!
			if src[..8] == [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'] {
				return Ok(Self::Png);
			}

			// AVIF has a few ways to be, including sequences.
			if
				src[4..8] == *b"ftyp" &&
				matches!(&src[8..12], b"avif" | b"avis" | b"MA1B" | b"MA1A")
			{
				return Ok(Self::Avif);
			}

			// JPEG can look a few different ways, but always starts the same.
			if src[..3] == [0xFF, 0xD8, 0xFF] { return Ok(Self::Jpeg); }
		}

		Err(AvifError::Source)
	}
}

impl ImageKind {
	#[must_use]
	/// # As Str.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Avif => "AVIF",
			Self::Jpeg => "JPEG",
			Self::Png => "PNG",
		}
	}

	#[must_use]
	/// # Extension.
	///
	/// Return the canonical file extension, sans dot.
	pub const fn extension(self) -> &'static str {
		match self {
			Self::Avif => "avif",
			Self::Jpeg => "jpg",
			Self::Png => "png",
		}
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_magic() {
		let mut png = vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];
		png.resize(16, 0);
		assert_eq!(ImageKind::try_from(png.as_slice()), Ok(ImageKind::Png));

		let mut jpg = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01];
		jpg.resize(16, 0);
		assert_eq!(ImageKind::try_from(jpg.as_slice()), Ok(ImageKind::Jpeg));

		let mut avif = vec![0x00, 0x00, 0x00, 0x1C];
		avif.extend_from_slice(b"ftypavif");
		avif.resize(32, 0);
		assert_eq!(ImageKind::try_from(avif.as_slice()), Ok(ImageKind::Avif));

		// Too short.
		assert_eq!(ImageKind::try_from(&avif[..12]), Err(AvifError::Source));

		// Garbage.
		assert_eq!(ImageKind::try_from(&[0_u8; 32][..]), Err(AvifError::Source));
	}
}
