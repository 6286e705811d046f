/*!
# AVIFKit: Images
*/

use dowser::Extension;
use std::{
	fmt,
	path::Path,
};



// The E_AVIF, E_JPEG, E_JPG, E_PNG, and E_Y420 constants are generated by
// build.rs.
include!(concat!(env!("OUT_DIR"), "/avifkit-extensions.rs"));



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Source Kind.
///
/// What a path is, judging by its extension, and therefore what should be
/// done with it.
pub(super) enum SourceKind {
	/// # AVIF (Decode).
	Avif,

	/// # JPEG/PNG (Encode From RGBA).
	Rgba,

	/// # Raw I420 (Encode From YUV).
	Y420,
}

impl fmt::Display for SourceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Avif => "AVIF",
			Self::Rgba => "RGBA",
			Self::Y420 => "Y420",
		})
	}
}

impl SourceKind {
	/// # From Path.
	pub(super) fn from_path(path: &Path) -> Option<Self> {
		if let Some(e) = Extension::try_from3(path) {
			if e == E_JPG || e == E_PNG { Some(Self::Rgba) }
			else { None }
		}
		else {
			let e = Extension::try_from4(path)?;
			if e == E_AVIF { Some(Self::Avif) }
			else if e == E_JPEG { Some(Self::Rgba) }
			else if e == E_Y420 { Some(Self::Y420) }
			else { None }
		}
	}

	/// # Output Extension.
	pub(super) const fn output_extension(self) -> &'static str {
		match self {
			Self::Avif => "png",
			Self::Rgba | Self::Y420 => "avif",
		}
	}
}
