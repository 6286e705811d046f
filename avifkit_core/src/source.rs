/*!
# `AVIFKit` - Source Images

JPEG and PNG sources are decoded to RGBA8888 so they can be handed to
[`encode_rgba8888`](crate::encode_rgba8888).
*/

use crate::{
	AvifError,
	ImageKind,
	Rgba8888,
};
use std::{
	fmt,
	num::NonZeroU32,
};



#[derive(Clone)]
/// # RGBA Image.
///
/// An owned, tightly-packed RGBA8888 buffer decoded from a JPEG or PNG file.
///
/// ## Examples
///
/// ```no_run
/// use avifkit_core::{
///     EncoderSettings,
///     RgbaImage,
/// };
///
/// let raw = std::fs::read("/path/to/dog.jpg").unwrap();
/// let img = RgbaImage::try_from(raw.as_slice()).unwrap();
/// let avif = avifkit_core::encode_rgba8888(
///     &img.as_frame(),
///     &EncoderSettings::default(),
/// ).unwrap();
/// ```
pub struct RgbaImage {
	/// # Pixels.
	pixels: Vec<u8>,

	/// # Width.
	width: NonZeroU32,

	/// # Height.
	height: NonZeroU32,

	/// # Source Kind.
	kind: ImageKind,
}

impl fmt::Debug for RgbaImage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RgbaImage")
		.field("width", &self.width)
		.field("height", &self.height)
		.field("kind", &self.kind)
		.finish_non_exhaustive()
	}
}

impl TryFrom<&[u8]> for RgbaImage {
	type Error = AvifError;

	/// # From Raw Bytes.
	///
	/// ## Errors
	///
	/// This will return an error if the source is not a supported JPEG or PNG
	/// or cannot be decoded.
	fn try_from(raw: &[u8]) -> Result<Self, Self::Error> {
		let kind = ImageKind::try_from(raw)?;
		let (pixels, width, height) = match kind {
			#[cfg(feature = "jpeg")]
			ImageKind::Jpeg => decode_jpeg(raw)?,
			#[cfg(feature = "png")]
			ImageKind::Png => decode_png(raw)?,
			_ => return Err(AvifError::Source),
		};

		let (width, height) = source_dimensions(width, height)?;
		Ok(Self { pixels, width, height, kind })
	}
}

/// ## Getters.
impl RgbaImage {
	#[must_use]
	/// # As Frame.
	///
	/// Lend the pixels to the encoder.
	pub fn as_frame(&self) -> Rgba8888<'_> {
		// The buffer size was verified during decoding.
		Rgba8888::from_parts(self.pixels.as_slice(), self.width, self.height)
	}

	#[inline]
	#[must_use]
	/// # Source Kind.
	pub const fn kind(&self) -> ImageKind { self.kind }

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
	/// # Take Pixels.
	pub fn take_pixels(self) -> Vec<u8> { self.pixels }
}



/// # Source Dimensions.
///
/// Decoders report `usize` dimensions; these must fit the same bounds as any
/// other RGBA frame.
fn source_dimensions(width: usize, height: usize)
-> Result<(NonZeroU32, NonZeroU32), AvifError> {
	let width = u32::try_from(width).map_err(|_| AvifError::Overflow)?;
	let height = u32::try_from(height).map_err(|_| AvifError::Overflow)?;
	crate::frame::dimensions(width, height)
}

#[cfg(feature = "jpeg")]
/// # Decode JPEG.
fn decode_jpeg(mut raw: &[u8]) -> Result<(Vec<u8>, usize, usize), AvifError> {
	use jpeg_decoder::PixelFormat;
	use rgb::{
		ComponentSlice,
		FromSlice,
	};

	// Decode the image.
	let mut jecoder = jpeg_decoder::Decoder::new(&mut raw);
	let pixels = jecoder.decode()
		.map_err(|_| AvifError::Decode)?;
	let info = jecoder.info().ok_or(AvifError::Decode)?;

	let width: usize = info.width.into();
	let height: usize = info.height.into();
	let size = width.checked_mul(height).and_then(|x| x.checked_mul(4))
		.ok_or(AvifError::Overflow)?;

	// So many ways to be a JPEG...
	let raw: Vec<u8> = match info.pixel_format {
		// Upscale greyscale to RGBA.
		PixelFormat::L8 => pixels.iter()
			.fold(Vec::with_capacity(size), |mut acc, &px| {
				acc.extend_from_slice(&[px, px, px, 255]);
				acc
			}),
		// Upscale RGB to RGBA.
		PixelFormat::RGB24 => pixels.as_rgb()
			.iter()
			.fold(Vec::with_capacity(size), |mut acc, px| {
				acc.extend_from_slice(px.with_alpha(255).as_slice());
				acc
			}),
		// Lossless and CMYK aren't supported.
		PixelFormat::CMYK32 | PixelFormat::L16 => return Err(AvifError::Color),
	};

	// Make sure the buffer was actually filled to the right size.
	if raw.len() == size { Ok((raw, width, height)) }
	else { Err(AvifError::Overflow) }
}

#[cfg(feature = "png")]
/// # Decode PNG.
fn decode_png(raw: &[u8]) -> Result<(Vec<u8>, usize, usize), AvifError> {
	use rgb::ComponentBytes;

	let img = lodepng::decode32(raw).map_err(|_| AvifError::Decode)?;
	let size = img.width.checked_mul(img.height).and_then(|x| x.checked_mul(4))
		.ok_or(AvifError::Overflow)?;

	let out = img.buffer.as_bytes().to_vec();
	if out.len() == size { Ok((out, img.width, img.height)) }
	else { Err(AvifError::Decode) }
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_unsupported() {
		// Too short to tell.
		assert_eq!(
			RgbaImage::try_from(&[0xFF, 0xD8, 0xFF][..]).unwrap_err(),
			AvifError::Source,
		);

		// AVIF is a destination, not a source.
		let mut avif = vec![0x00, 0x00, 0x00, 0x1C];
		avif.extend_from_slice(b"ftypavif");
		avif.resize(32, 0);
		assert_eq!(RgbaImage::try_from(avif.as_slice()).unwrap_err(), AvifError::Source);
	}

	#[test]
	fn t_source_dimensions() {
		let (w, h) = source_dimensions(16_384, 16_384).expect("Dimensions failed.");
		assert_eq!((w.get(), h.get()), (16_384, 16_384));
		assert!(source_dimensions(1, 1).is_ok());

		// Too many pixels, even though each side fits.
		assert_eq!(source_dimensions(16_385, 16_384), Err(AvifError::Overflow));
		assert_eq!(source_dimensions(65_535, 65_535), Err(AvifError::Overflow));

		// Zero or unrepresentable.
		assert_eq!(source_dimensions(0, 10), Err(AvifError::Overflow));
		assert_eq!(source_dimensions(10, 0), Err(AvifError::Overflow));
		assert_eq!(source_dimensions(usize::MAX, 1), Err(AvifError::Overflow));
	}

	#[cfg(feature = "jpeg")]
	#[test]
	fn t_bad_jpeg() {
		let mut jpg = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01];
		jpg.resize(64, 0);
		assert_eq!(RgbaImage::try_from(jpg.as_slice()).unwrap_err(), AvifError::Decode);
	}

	#[cfg(feature = "png")]
	#[test]
	fn t_png() {
		// Build a 3x2 RGB PNG; it should come back as RGBA.
		let rgb = [
			10_u8, 20, 30,  40, 50, 60,  70, 80, 90,
			1, 2, 3,        4, 5, 6,     7, 8, 9,
		];
		let png = lodepng::encode_memory(&rgb, 3, 2, lodepng::ColorType::RGB, 8)
			.expect("PNG encode failed.");

		let img = RgbaImage::try_from(png.as_slice()).expect("PNG decode failed.");
		assert_eq!(img.kind(), ImageKind::Png);
		assert_eq!((img.width(), img.height()), (3, 2));

		let frame = img.as_frame();
		assert!(! frame.has_alpha());
		assert_eq!(&frame.pixels()[..8], &[10, 20, 30, 255, 40, 50, 60, 255]);
		assert_eq!(img.take_pixels().len(), 3 * 2 * 4);
	}
}
