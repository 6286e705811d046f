/*!
# `AVIFKit` - Error
*/

use crate::PlaneKind;
use std::{
	error::Error,
	fmt,
};



#[cfg(feature = "bin")]
/// # Help Text.
const HELP: &str = concat!(r"
    .--------.
   /  .-.  .-\
  |  (AVIF)   |   ", "\x1b[38;5;199mAVIFKit\x1b[0;38;5;69m v", env!("CARGO_PKG_VERSION"), "\x1b[0m", r#"
   \  '-'  '-/    Decode, encode, and inspect AVIF
    '--------'    images with libavif.

USAGE:
    avifkit [FLAGS] [OPTIONS] <PATH(S)>...

FLAGS:
    -h, --help        Print help information and exit.
    -i, --info        Print AVIF metadata only; skip decoding and encoding.
    -v, --verbose     Print codec diagnostics to STDERR.
    -V, --version     Print version information and exit.

OPTIONS:
        --height <NUM> Frame height for raw .y420 sources.
    -l, --list <FILE> Read (absolute) image and/or directory paths from this
                      text file (or STDIN if "-"), one path per line, instead
                      of or in addition to those specified inline via
                      <PATH(S)>.
    -o, --out-dir <DIR>
                      Save results to this directory. [default: ./avif]
        --speed <NUM> Encoder speed, 0 (slowest) to 10 (fastest).
                      [default: 10]
        --width <NUM> Frame width for raw .y420 sources.

TRAILING ARGS:
    <PATH(S)>...      AVIF, JPEG, PNG, and/or Y420 paths to process.
                      Directories will be crawled recursively.

AVIF sources are decoded to PNG. JPEG and PNG sources are encoded to AVIF
from RGBA; Y420 sources (packed I420 planes) are encoded to AVIF from YUV.
"#);



#[derive(Debug, Copy, Clone, Eq, PartialEq)]
/// # Errors.
pub enum AvifError {
	/// # Bitmap dimensions do not match the image.
	Bitmap,

	/// # RGBA buffer length does not match the dimensions.
	BufferSize,

	/// # Unsupported color.
	Color,

	/// # Decoding failed.
	Decode,

	/// # Bit depth too deep for the output bitmap.
	Depth(u8),

	/// # Encoding failed.
	Encode,

	/// # Bitmap is not RGBA8888.
	Format,

	/// # Image dimensions are out of range.
	Overflow,

	/// # Not an AVIF, or the container is corrupt.
	Parse,

	/// # Plane size does not match 4:2:0 dimensions.
	Plane(PlaneKind),

	/// # Plane stride is too small for its row.
	Stride(PlaneKind),

	/// # Unsupported source image.
	Source,

	/// # Raw YUV sources need explicit dimensions.
	NoDimensions,

	/// # Nothing to do.
	NothingDoing,

	/// # I/O read error.
	Read,

	/// # I/O write error.
	Write,

	#[cfg(feature = "bin")]
	/// # Invalid Speed.
	Speed,

	#[cfg(feature = "bin")]
	/// # Worker Runtime.
	Runtime,

	#[cfg(feature = "bin")]
	/// # Print Help (Not an Error).
	PrintHelp,

	#[cfg(feature = "bin")]
	/// # Print Version (Not an Error).
	PrintVersion,
}

impl Error for AvifError {}

impl AsRef<str> for AvifError {
	#[inline]
	fn as_ref(&self) -> &str { self.as_str() }
}

impl fmt::Display for AvifError {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl AvifError {
	#[must_use]
	/// # As Str.
	///
	/// Return the error as an English string slice.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Bitmap => "The output bitmap dimensions do not match the image.",
			Self::BufferSize => "The RGBA buffer length must equal width × height × 4.",
			Self::Color => "Unsupported color encoding format.",
			Self::Decode => "The image could not be decoded.",
			Self::Depth(_) => "The image bit depth is too deep for an 8-bit bitmap; use a 16-bit bitmap instead.",
			Self::Encode => "The image could not be encoded.",
			Self::Format => "Only 8-bit RGBA bitmaps can be re-encoded.",
			Self::Overflow => "The image dimensions are out of range.",
			Self::Parse => "The data is not a valid AVIF image.",
			Self::Plane(k) => match k {
				PlaneKind::Y => "The Y plane size does not match the image dimensions.",
				PlaneKind::U => "The U plane size does not match 4:2:0 subsampling.",
				PlaneKind::V => "The V plane size does not match 4:2:0 subsampling.",
			},
			Self::Stride(k) => match k {
				PlaneKind::Y => "The Y plane stride is smaller than the image width.",
				PlaneKind::U => "The U plane stride is smaller than the chroma width.",
				PlaneKind::V => "The V plane stride is smaller than the chroma width.",
			},
			Self::Source => "Only AVIF, JPEG, PNG, and Y420 sources are supported.",
			Self::NoDimensions => "Y420 sources require --width and --height.",
			Self::NothingDoing => "There is nothing to do.",
			Self::Read => "Unable to read the source file.",
			Self::Write => "Unable to save the file.",
			#[cfg(feature = "bin")] Self::Speed => "The speed must be a number between 0 and 10.",
			#[cfg(feature = "bin")] Self::Runtime => "Unable to start the worker runtime.",
			#[cfg(feature = "bin")] Self::PrintHelp => HELP,
			#[cfg(feature = "bin")] Self::PrintVersion => concat!("AVIFKit v", env!("CARGO_PKG_VERSION")),
		}
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_display() {
		assert_eq!(AvifError::Parse.to_string(), AvifError::Parse.as_str());
		assert_ne!(
			AvifError::Plane(PlaneKind::U).as_str(),
			AvifError::Stride(PlaneKind::U).as_str(),
		);
		assert_eq!(AvifError::Depth(10), AvifError::Depth(10));
		assert_ne!(AvifError::Depth(10), AvifError::Depth(12));
		assert_ne!(AvifError::Depth(16).as_str(), AvifError::Format.as_str());
	}
}
