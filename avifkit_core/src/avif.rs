/*!
# `AVIFKit`: `libavif` Binding

Every public call here stands alone: it creates its own `libavif` decoder or
encoder, uses it, and destroys it before returning. Nothing is shared, so
calls may run in parallel from any number of threads.
*/

use crate::{
	AvifError,
	AvifInfo,
	Bitmap,
	EncoderSettings,
	PlaneKind,
	Rgba8888,
	Yuv420,
};
use libavif_sys::{
	AVIF_ADD_IMAGE_FLAG_SINGLE,
	AVIF_CHAN_U,
	AVIF_CHAN_V,
	AVIF_CHAN_Y,
	AVIF_CODEC_CHOICE_AOM,
	AVIF_COLOR_PRIMARIES_BT709,
	AVIF_PIXEL_FORMAT_YUV420,
	AVIF_PIXEL_FORMAT_YUV444,
	AVIF_PLANES_YUV,
	AVIF_RANGE_FULL,
	AVIF_RESULT_OK,
	AVIF_RGB_FORMAT_RGBA,
	AVIF_TRANSFER_CHARACTERISTICS_SRGB,
	avifDecoder,
	avifDecoderCreate,
	avifDecoderDestroy,
	avifDecoderNextImage,
	avifDecoderParse,
	avifDecoderSetIOMemory,
	avifEncoder,
	avifEncoderAddImage,
	avifEncoderCreate,
	avifEncoderDestroy,
	avifEncoderFinish,
	avifImage,
	avifImageAllocatePlanes,
	avifImageCreate,
	avifImageDestroy,
	avifImageRGBToYUV,
	avifImageYUVToRGB,
	avifPeekCompatibleFileType,
	avifPixelFormat,
	avifResult,
	avifResultToString,
	avifRGBImage,
	avifRGBImageSetDefaults,
	avifROData,
	avifRWData,
	avifRWDataFree,
};
use std::{
	borrow::Cow,
	ffi::CStr,
	marker::PhantomData,
};



#[must_use]
/// # Is AVIF?
///
/// Returns `true` if the buffer begins with an AVIF-compatible `ftyp` box.
/// This is a header check only; it never fails, and anything unrecognized
/// (including buffers too short to hold a header) is simply `false`.
///
/// ## Examples
///
/// ```
/// // A JPEG signature is not an AVIF.
/// let jpg = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F', 0, 1, 1];
/// assert!(! avifkit_core::is_avif(&jpg));
/// ```
pub fn is_avif(raw: &[u8]) -> bool {
	// Size (4) + "ftyp" (4) + major brand (4).
	if raw.len() < 12 { return false; }

	let data = avifROData {
		data: raw.as_ptr(),
		size: raw.len(),
	};
	0 != unsafe { avifPeekCompatibleFileType(&data) }
}

/// # Decode.
///
/// Parse the image, allocate a bitmap to fit it (16-bit for high bit depth
/// sources, 8-bit otherwise), and decode into it.
///
/// ## Errors
///
/// This will return an error if the data cannot be parsed or decoded.
pub fn decode(raw: &[u8]) -> Result<Bitmap, AvifError> {
	let mut decoder = LibAvifDecoder::parse(raw)?;
	let (width, height, depth) = decoder.dimensions();
	let info = AvifInfo::new(width, height, depth)?;

	let mut bitmap = Bitmap::for_info(&info)?;
	decoder.decode_into(&mut bitmap)?;
	Ok(bitmap)
}

/// # Decode Into.
///
/// Decode the image into a caller-supplied bitmap, which must have the exact
/// same dimensions as the image.
///
/// Images with more than 8 bits per channel will not be squashed into an
/// 8-bit bitmap; use [`BitmapFormat::Rgba16`](crate::BitmapFormat::Rgba16)
/// (or [`Bitmap::for_info`]) for those.
///
/// The bitmap is left untouched if any precondition fails, but may be
/// partially written if the codec itself fails midway.
///
/// ## Errors
///
/// This will return an error if the data cannot be parsed or decoded, if the
/// bitmap dimensions do not match, or if the bitmap is too shallow.
pub fn decode_into(raw: &[u8], bitmap: &mut Bitmap) -> Result<(), AvifError> {
	LibAvifDecoder::parse(raw)?.decode_into(bitmap)
}

/// # Encode RGBA8888.
///
/// Encode an RGBA frame as an 8-bit 4:4:4 AVIF. The alpha channel is only
/// written if some pixel is not fully opaque.
///
/// ## Errors
///
/// This will return an error if the encoder fails.
pub fn encode_rgba8888(src: &Rgba8888<'_>, settings: &EncoderSettings)
-> Result<Vec<u8>, AvifError> {
	let image = LibAvifImage::try_from(src)?;
	let out = encode_image(&image, settings)?;
	log::debug!(
		"Encoded {}x{} RGBA8888 to {} AVIF bytes.",
		src.width(),
		src.height(),
		out.len(),
	);
	Ok(out)
}

/// # Encode YUV 4:2:0.
///
/// Encode three 8-bit planes as an 8-bit 4:2:0 AVIF, without alpha.
///
/// ## Errors
///
/// This will return an error if the encoder fails.
pub fn encode_y420(src: &Yuv420<'_>, settings: &EncoderSettings)
-> Result<Vec<u8>, AvifError> {
	let image = LibAvifImage::try_from(src)?;
	let out = encode_image(&image, settings)?;
	log::debug!(
		"Encoded {}x{} Y420 to {} AVIF bytes.",
		src.width(),
		src.height(),
		out.len(),
	);
	Ok(out)
}



/// # AVIF Decoder.
///
/// This wraps the AVIF decoder. It exists primarily for garbage cleanup, but
/// also pins the borrowed source for as long as `libavif` is reading from it.
pub(crate) struct LibAvifDecoder<'a> {
	/// # Decoder.
	ptr: *mut avifDecoder,

	/// # Source.
	_raw: PhantomData<&'a [u8]>,
}

impl<'a> LibAvifDecoder<'a> {
	/// # Create and Parse.
	///
	/// Set up a decoder for the raw bytes and parse the container. Pixel data
	/// is not touched yet, but the image dimensions and depth become
	/// available.
	pub(crate) fn parse(raw: &'a [u8]) -> Result<Self, AvifError> {
		if raw.is_empty() { return Err(AvifError::Parse); }

		let ptr = unsafe { avifDecoderCreate() };
		if ptr.is_null() {
			log::error!("Failed to create AVIF decoder.");
			return Err(AvifError::Decode);
		}
		let out = Self { ptr, _raw: PhantomData };

		unsafe {
			(*ptr).codecChoice = AVIF_CODEC_CHOICE_AOM;
			(*ptr).maxThreads = max_threads();
			(*ptr).ignoreExif = 1;
			(*ptr).ignoreXMP = 1;
		}

		maybe_die(
			unsafe { avifDecoderSetIOMemory(ptr, raw.as_ptr(), raw.len()) },
			AvifError::Parse,
		)
			.inspect_err(|_| log::error!("Failed to set AVIF IO to a memory reader."))?;

		let res = unsafe { avifDecoderParse(ptr) };
		if AVIF_RESULT_OK != res {
			log::warn!("Failed to parse AVIF image: {}.", result_str(res));
			return Err(AvifError::Parse);
		}

		if unsafe { (*ptr).image.is_null() } { Err(AvifError::Parse) }
		else { Ok(out) }
	}

	/// # Dimensions and Depth.
	pub(crate) fn dimensions(&self) -> (u32, u32, u32) {
		unsafe {
			let image = (*self.ptr).image;
			((*image).width, (*image).height, (*image).depth)
		}
	}

	/// # Decode Into.
	fn decode_into(&mut self, bitmap: &mut Bitmap) -> Result<(), AvifError> {
		let (width, height, depth) = self.dimensions();

		// Check the output before doing any real work.
		if width != bitmap.width() || height != bitmap.height() {
			log::warn!(
				"Bitmap is not the right size for the image. Bitmap {}x{} Image {}x{}.",
				bitmap.width(),
				bitmap.height(),
				width,
				height,
			);
			return Err(AvifError::Bitmap);
		}
		if depth > u32::from(bitmap.format().depth()) {
			log::warn!(
				"Bitmap is too shallow for the image. Bitmap {}-bit Image {}-bit.",
				bitmap.format().depth(),
				depth,
			);
			return Err(AvifError::Depth(u8::try_from(depth).unwrap_or(u8::MAX)));
		}

		let res = unsafe { avifDecoderNextImage(self.ptr) };
		if AVIF_RESULT_OK != res {
			log::warn!("Failed to decode AVIF image: {}.", result_str(res));
			return Err(AvifError::Decode);
		}

		// Point libavif's RGB conversion straight at the bitmap.
		let image = unsafe { (*self.ptr).image };
		let mut rgb = avifRGBImage::default();
		unsafe { avifRGBImageSetDefaults(&mut rgb, image); }
		rgb.format = AVIF_RGB_FORMAT_RGBA;
		rgb.depth = u32::from(bitmap.format().depth());
		rgb.rowBytes = bitmap.stride();
		rgb.pixels = bitmap.pixels_mut().as_mut_ptr();

		let res = unsafe { avifImageYUVToRGB(image, &mut rgb) };
		if AVIF_RESULT_OK == res {
			log::debug!("Decoded {width}x{height} {depth}-bit AVIF.");
			Ok(())
		}
		else {
			log::warn!("Failed to convert YUV pixels to RGB: {}.", result_str(res));
			Err(AvifError::Decode)
		}
	}
}

impl Drop for LibAvifDecoder<'_> {
	#[inline]
	fn drop(&mut self) { unsafe { avifDecoderDestroy(self.ptr); } }
}



/// # AVIF Encoder.
///
/// This wraps the AVIF encoder. It primarily exists to give us a way to free
/// resources on drop, but also handles setup.
struct LibAvifEncoder(*mut avifEncoder);

impl TryFrom<&EncoderSettings> for LibAvifEncoder {
	type Error = AvifError;

	/// # New Instance.
	fn try_from(settings: &EncoderSettings) -> Result<Self, AvifError> {
		let (min_q, max_q) = settings.quantizers();

		// Start up the encoder!
		let encoder = unsafe { avifEncoderCreate() };
		if encoder.is_null() {
			log::error!("Failed to create AVIF encoder.");
			return Err(AvifError::Encode);
		}

		unsafe {
			(*encoder).codecChoice = AVIF_CODEC_CHOICE_AOM;
			(*encoder).maxThreads = i32::from(settings.threads().get());
			(*encoder).speed = i32::from(settings.speed());
			(*encoder).minQuantizer = i32::from(min_q);
			(*encoder).maxQuantizer = i32::from(max_q);
		}

		Ok(Self(encoder))
	}
}

impl Drop for LibAvifEncoder {
	#[inline]
	fn drop(&mut self) { unsafe { avifEncoderDestroy(self.0); } }
}



/// # Avif Image.
///
/// This holds a YUV copy of the source frame. The struct includes
/// initialization helpers, but exists primarily for garbage cleanup.
struct LibAvifImage(*mut avifImage);

impl LibAvifImage {
	/// # New (Blank).
	fn new(width: u32, height: u32, depth: u32, format: avifPixelFormat)
	-> Result<Self, AvifError> {
		let image = unsafe { avifImageCreate(width, height, depth, format) };
		if image.is_null() { Err(AvifError::Encode) }
		else { Ok(Self(image)) }
	}
}

impl TryFrom<&Rgba8888<'_>> for LibAvifImage {
	type Error = AvifError;

	fn try_from(src: &Rgba8888<'_>) -> Result<Self, Self::Error> {
		let out = Self::new(src.width(), src.height(), 8, AVIF_PIXEL_FORMAT_YUV444)?;
		unsafe {
			(*out.0).yuvRange = AVIF_RANGE_FULL;
			(*out.0).colorPrimaries = AVIF_COLOR_PRIMARIES_BT709 as _;
			(*out.0).transferCharacteristics = AVIF_TRANSFER_CHARACTERISTICS_SRGB as _;
		}

		// Wrap our buffer in an "avifRGBImage". libavif only reads from it.
		let mut rgb = avifRGBImage::default();
		unsafe { avifRGBImageSetDefaults(&mut rgb, out.0); }
		rgb.format = AVIF_RGB_FORMAT_RGBA;
		rgb.depth = 8;
		rgb.ignoreAlpha = i32::from(! src.has_alpha());
		rgb.pixels = src.pixels().as_ptr().cast_mut();
		rgb.rowBytes = src.row_size();

		// And convert it to YUV.
		let res = unsafe { avifImageRGBToYUV(out.0, &rgb) };
		if AVIF_RESULT_OK == res { Ok(out) }
		else {
			log::warn!("Failed to convert to YUV(A): {}.", result_str(res));
			Err(AvifError::Encode)
		}
	}
}

impl TryFrom<&Yuv420<'_>> for LibAvifImage {
	type Error = AvifError;

	fn try_from(src: &Yuv420<'_>) -> Result<Self, Self::Error> {
		let out = Self::new(src.width(), src.height(), 8, AVIF_PIXEL_FORMAT_YUV420)?;
		unsafe { (*out.0).yuvRange = AVIF_RANGE_FULL; }
		maybe_die(
			unsafe { avifImageAllocatePlanes(out.0, AVIF_PLANES_YUV) },
			AvifError::Encode,
		)?;

		let luma = (src.width() as usize, src.height() as usize);
		let chroma = (src.chroma_width() as usize, src.chroma_height() as usize);
		for (kind, chan, (row_len, rows)) in [
			(PlaneKind::Y, AVIF_CHAN_Y, luma),
			(PlaneKind::U, AVIF_CHAN_U, chroma),
			(PlaneKind::V, AVIF_CHAN_V, chroma),
		] {
			let (ptr, stride) = unsafe {
				let chan = chan as usize;
				((*out.0).yuvPlanes[chan], (*out.0).yuvRowBytes[chan] as usize)
			};
			if ptr.is_null() || stride < row_len { return Err(AvifError::Encode); }

			// Copy row by row; the two strides need not agree.
			let dst = unsafe { std::slice::from_raw_parts_mut(ptr, stride * rows) };
			for (src_row, dst_row) in src.plane(kind).rows(row_len).zip(dst.chunks_exact_mut(stride)) {
				dst_row[..row_len].copy_from_slice(src_row);
			}
		}

		Ok(out)
	}
}

impl Drop for LibAvifImage {
	#[inline]
	fn drop(&mut self) { unsafe { avifImageDestroy(self.0); } }
}



/// # Data Struct.
///
/// This wrapper only exists to provide garbage cleanup.
struct LibAvifRwData(avifRWData);

impl Drop for LibAvifRwData {
	#[inline]
	fn drop(&mut self) { unsafe { avifRWDataFree(&mut self.0); } }
}



/// # Encode Image.
///
/// Run a prepared YUV image through a fresh encoder, returning an owned copy
/// of the output.
fn encode_image(image: &LibAvifImage, settings: &EncoderSettings)
-> Result<Vec<u8>, AvifError> {
	let encoder = LibAvifEncoder::try_from(settings)?;

	let res = unsafe {
		avifEncoderAddImage(encoder.0, image.0, 1, AVIF_ADD_IMAGE_FLAG_SINGLE)
	};
	if AVIF_RESULT_OK != res {
		log::warn!("Failed to add image to encoder: {}.", result_str(res));
		return Err(AvifError::Encode);
	}

	let mut data = LibAvifRwData(avifRWData::default());
	let res = unsafe { avifEncoderFinish(encoder.0, &mut data.0) };
	if AVIF_RESULT_OK != res {
		log::warn!("Failed to finish encode: {}.", result_str(res));
		return Err(AvifError::Encode);
	}

	if data.0.data.is_null() || 0 == data.0.size { return Err(AvifError::Encode); }
	Ok(unsafe { std::slice::from_raw_parts(data.0.data, data.0.size) }.to_vec())
}

/// # Max Threads.
fn max_threads() -> i32 {
	i32::try_from(num_cpus::get())
		.unwrap_or(1)
		.max(1)
}

#[inline]
/// # Verify Status.
///
/// This converts unsuccessful AVIF system function results into proper Rust
/// errors.
const fn maybe_die(res: avifResult, err: AvifError) -> Result<(), AvifError> {
	if AVIF_RESULT_OK == res { Ok(()) }
	else { Err(err) }
}

/// # Result String.
fn result_str(res: avifResult) -> Cow<'static, str> {
	let ptr = unsafe { avifResultToString(res) };
	if ptr.is_null() { Cow::Borrowed("unknown error") }
	else { unsafe { CStr::from_ptr(ptr) }.to_string_lossy() }
}
