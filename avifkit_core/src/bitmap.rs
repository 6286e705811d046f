/*!
# `AVIFKit` - Bitmap
*/

use crate::{
	AvifError,
	AvifInfo,
	Rgba8888,
};
use std::{
	fmt,
	num::NonZeroU32,
	ops::Deref,
};



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Bitmap Format.
pub enum BitmapFormat {
	/// # 8-bit RGBA.
	///
	/// Four bytes per pixel: R, G, B, A.
	Rgba8888,

	/// # 16-bit RGBA.
	///
	/// Eight bytes per pixel: four native-endian `u16` channels, scaled to the
	/// full `0..=65_535` range regardless of the source depth.
	Rgba16,
}

impl BitmapFormat {
	#[inline]
	#[must_use]
	/// # Bytes Per Pixel.
	pub const fn bytes_per_pixel(self) -> u32 {
		match self {
			Self::Rgba8888 => 4,
			Self::Rgba16 => 8,
		}
	}

	#[inline]
	#[must_use]
	/// # Channel Depth.
	pub const fn depth(self) -> u8 {
		match self {
			Self::Rgba8888 => 8,
			Self::Rgba16 => 16,
		}
	}
}



#[derive(Clone)]
/// # Bitmap.
///
/// This is the decoder's output target: a caller-owned, zero-initialized
/// pixel grid that [`decode_into`](crate::decode_into) fills in place.
///
/// The raw pixel bytes can be accessed through `Deref` as an `&[u8]`; rows are
/// tightly packed, so the stride is always `width × bytes-per-pixel`.
pub struct Bitmap {
	/// # Pixels.
	pixels: Vec<u8>,

	/// # Width.
	width: NonZeroU32,

	/// # Height.
	height: NonZeroU32,

	/// # Format.
	format: BitmapFormat,
}

impl fmt::Debug for Bitmap {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Bitmap")
		.field("width", &self.width)
		.field("height", &self.height)
		.field("format", &self.format)
		.finish_non_exhaustive()
	}
}

impl Deref for Bitmap {
	type Target = [u8];

	#[inline]
	fn deref(&self) -> &Self::Target { self.pixels.as_slice() }
}

impl Bitmap {
	/// # New.
	///
	/// Allocate a blank bitmap.
	///
	/// ## Errors
	///
	/// This will return an error if either dimension is zero or the buffer
	/// size would overflow.
	pub fn new(width: u32, height: u32, format: BitmapFormat) -> Result<Self, AvifError> {
		let width = NonZeroU32::new(width).ok_or(AvifError::Overflow)?;
		let height = NonZeroU32::new(height).ok_or(AvifError::Overflow)?;
		if u64::from(width.get()) * u64::from(height.get()) > crate::frame::MAX_PIXELS {
			return Err(AvifError::Overflow);
		}

		let size = usize::try_from(width.get()).ok()
			.zip(usize::try_from(height.get()).ok())
			.and_then(|(w, h)| w.checked_mul(h))
			.and_then(|x| x.checked_mul(format.bytes_per_pixel() as usize))
			.ok_or(AvifError::Overflow)?;

		let mut pixels = Vec::new();
		pixels.try_reserve_exact(size).map_err(|_| AvifError::Overflow)?;
		pixels.resize(size, 0);

		Ok(Self { pixels, width, height, format })
	}

	/// # For Info.
	///
	/// Allocate a bitmap sized for the image, choosing [`BitmapFormat::Rgba16`]
	/// for high bit depth sources so nothing gets clipped.
	///
	/// ## Errors
	///
	/// This will return an error if allocation would overflow.
	pub fn for_info(info: &AvifInfo) -> Result<Self, AvifError> {
		let format =
			if info.is_high_depth() { BitmapFormat::Rgba16 }
			else { BitmapFormat::Rgba8888 };
		Self::new(info.width(), info.height(), format)
	}
}

/// ## Getters.
impl Bitmap {
	#[inline]
	#[must_use]
	/// # Format.
	pub const fn format(&self) -> BitmapFormat { self.format }

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
	/// # Stride.
	///
	/// The number of bytes per row.
	pub const fn stride(&self) -> u32 {
		self.width.get() * self.format.bytes_per_pixel()
	}

	#[inline]
	#[must_use]
	/// # Take Pixels.
	///
	/// Consume the instance, stealing the pixels as an owned buffer.
	pub fn take_pixels(self) -> Vec<u8> { self.pixels }

	#[inline]
	/// # Mutable Pixels.
	pub(crate) fn pixels_mut(&mut self) -> &mut [u8] { self.pixels.as_mut_slice() }

	#[must_use]
	/// # ARGB Words.
	///
	/// Return the pixels as packed `0xAARRGGBB` words, or `None` if the bitmap
	/// is not [`BitmapFormat::Rgba8888`].
	pub fn argb(&self) -> Option<Vec<u32>> {
		if matches!(self.format, BitmapFormat::Rgba8888) {
			Some(
				self.pixels.chunks_exact(4)
					.map(|px| u32::from_be_bytes([px[3], px[0], px[1], px[2]]))
					.collect()
			)
		}
		else { None }
	}

	/// # As RGBA8888 Frame.
	///
	/// Lend an 8-bit bitmap to the encoder.
	///
	/// ## Errors
	///
	/// Sixteen-bit bitmaps cannot be lent and will return an error.
	pub fn as_rgba8888(&self) -> Result<Rgba8888<'_>, AvifError> {
		if matches!(self.format, BitmapFormat::Rgba8888) {
			Rgba8888::new(&self.pixels, self.width.get(), self.height.get())
		}
		else { Err(AvifError::Format) }
	}
}

#[cfg(feature = "png")]
/// ## PNG.
impl Bitmap {
	/// # To PNG.
	///
	/// Encode the bitmap as an 8- or 16-bit RGBA PNG, matching its format.
	///
	/// ## Errors
	///
	/// This will return an error if the PNG encoder fails.
	pub fn to_png(&self) -> Result<Vec<u8>, AvifError> {
		let width = usize::try_from(self.width.get()).map_err(|_| AvifError::Overflow)?;
		let height = usize::try_from(self.height.get()).map_err(|_| AvifError::Overflow)?;

		match self.format {
			BitmapFormat::Rgba8888 => lodepng::encode_memory(
				&self.pixels,
				width,
				height,
				lodepng::ColorType::RGBA,
				8,
			),
			// PNG wants big-endian samples.
			BitmapFormat::Rgba16 => {
				let be: Vec<u8> = self.pixels.chunks_exact(2)
					.flat_map(|px| u16::from_ne_bytes([px[0], px[1]]).to_be_bytes())
					.collect();
				lodepng::encode_memory(&be, width, height, lodepng::ColorType::RGBA, 16)
			},
		}
			.map_err(|_| AvifError::Write)
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_new() {
		let bmp = Bitmap::new(3, 2, BitmapFormat::Rgba8888).expect("Bitmap failed.");
		assert_eq!(bmp.len(), 3 * 2 * 4);
		assert_eq!(bmp.stride(), 12);
		assert!(bmp.iter().all(|&b| b == 0));

		let bmp = Bitmap::new(3, 2, BitmapFormat::Rgba16).expect("Bitmap failed.");
		assert_eq!(bmp.len(), 3 * 2 * 8);
		assert_eq!(bmp.stride(), 24);
		assert!(bmp.argb().is_none());
		assert_eq!(bmp.as_rgba8888().unwrap_err(), AvifError::Format);

		assert_eq!(Bitmap::new(0, 2, BitmapFormat::Rgba8888).unwrap_err(), AvifError::Overflow);
	}

	#[test]
	fn t_for_info() {
		let info = AvifInfo::new(4, 4, 8).unwrap();
		assert_eq!(Bitmap::for_info(&info).unwrap().format(), BitmapFormat::Rgba8888);

		let info = AvifInfo::new(4, 4, 10).unwrap();
		assert_eq!(Bitmap::for_info(&info).unwrap().format(), BitmapFormat::Rgba16);
	}

	#[test]
	fn t_argb() {
		let mut bmp = Bitmap::new(2, 1, BitmapFormat::Rgba8888).unwrap();
		bmp.pixels_mut().copy_from_slice(&[1, 2, 3, 4, 0x10, 0x20, 0x30, 0xFF]);
		assert_eq!(bmp.argb(), Some(vec![0x0401_0203, 0xFF10_2030]));

		let frame = bmp.as_rgba8888().expect("Frame failed.");
		assert_eq!(frame.width(), 2);
		assert!(frame.has_alpha());
	}

	#[cfg(feature = "png")]
	#[test]
	fn t_png() {
		let mut bmp = Bitmap::new(2, 2, BitmapFormat::Rgba8888).unwrap();
		bmp.pixels_mut().copy_from_slice(&[
			255, 0, 0, 255,   0, 255, 0, 255,
			0, 0, 255, 255,   9, 9, 9, 128,
		]);
		let png = bmp.to_png().expect("PNG failed.");
		let back = lodepng::decode32(&png).expect("PNG decode failed.");
		assert_eq!(back.width, 2);
		assert_eq!(back.height, 2);
		assert_eq!(back.buffer[3], rgb::RGBA8::new(9, 9, 9, 128));

		let bmp = Bitmap::new(2, 2, BitmapFormat::Rgba16).unwrap();
		assert!(bmp.to_png().is_ok());
	}
}
