/*!
# `AVIFKit` - Library

Safe, self-contained AVIF operations backed by `libavif`:

| Operation | Entry Point |
| --------- | ----------- |
| Probe | [`is_avif`] |
| Get Info | [`AvifInfo::try_from`] |
| Decode | [`decode`], [`decode_into`] |
| Encode RGBA8888 | [`encode_rgba8888`] |
| Encode YUV 4:2:0 | [`encode_y420`] |

Raw pixel inputs are described by [`Rgba8888`] and [`Yuv420`], which verify
their buffer sizes, strides, and dimensions up front. Decoded output lands in
a caller-owned [`Bitmap`].
*/

#![warn(clippy::filetype_is_file)]
#![warn(clippy::integer_division)]
#![warn(clippy::needless_borrow)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::suboptimal_flops)]
#![warn(clippy::unneeded_field_pattern)]
#![warn(macro_use_extern_crate)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(non_ascii_idents)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused_crate_dependencies)]
#![warn(unused_extern_crates)]
#![warn(unused_import_braces)]

#![allow(clippy::module_name_repetitions)]



mod avif;
mod bitmap;
mod error;
mod frame;
mod info;
mod kind;
mod settings;
#[cfg(any(feature = "jpeg", feature = "png"))] mod source;

pub use avif::{
	decode,
	decode_into,
	encode_rgba8888,
	encode_y420,
	is_avif,
};
pub use bitmap::{
	Bitmap,
	BitmapFormat,
};
pub use error::AvifError;
pub use frame::{
	Plane,
	PlaneKind,
	Rgba8888,
	Yuv420,
};
pub use info::AvifInfo;
pub use kind::ImageKind;
pub use settings::{
	EncoderSettings,
	QUANTIZER_BEST,
	QUANTIZER_WORST,
	SPEED_FASTEST,
	SPEED_SLOWEST,
};
#[cfg(any(feature = "jpeg", feature = "png"))]
pub use source::RgbaImage;
