/*!
# `AVIFKit` - Raw Frames

These are the encoder-side request types. Each one validates its buffer
against its declared layout at construction, so an instance that exists is
an instance the encoder can read without overrunning anything.
*/

use crate::AvifError;
use std::{
	fmt,
	num::{
		NonZeroU32,
		NonZeroUsize,
	},
};



/// # Maximum Pixels.
///
/// AVIF dimensions can't exceed this amount. We might as well bail as early as
/// possible.
pub(crate) const MAX_PIXELS: u64 = 16_384 * 16_384;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Plane Kind.
pub enum PlaneKind {
	/// # Luma.
	Y,

	/// # Blue-Difference Chroma.
	U,

	/// # Red-Difference Chroma.
	V,
}

impl fmt::Display for PlaneKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Y => "Y",
			Self::U => "U",
			Self::V => "V",
		})
	}
}



#[derive(Debug, Clone, Copy)]
/// # Plane.
///
/// A borrowed byte plane and the distance, in bytes, between the starts of
/// its rows.
pub struct Plane<'a> {
	/// # Data.
	data: &'a [u8],

	/// # Stride.
	stride: NonZeroUsize,
}

impl<'a> Plane<'a> {
	#[must_use]
	/// # New.
	///
	/// Pair a buffer with its stride. The stride is checked against the image
	/// dimensions later, when the plane is slotted into a [`Yuv420`].
	pub const fn new(data: &'a [u8], stride: NonZeroUsize) -> Self {
		Self { data, stride }
	}

	#[inline]
	#[must_use]
	/// # Data.
	pub const fn data(&self) -> &'a [u8] { self.data }

	#[inline]
	#[must_use]
	/// # Stride.
	pub const fn stride(&self) -> usize { self.stride.get() }

	/// # Rows.
	///
	/// Return an iterator over the meaningful `row_len` bytes of each row.
	pub(crate) fn rows(&self, row_len: usize) -> impl Iterator<Item=&'a [u8]> + 'a {
		let stride = self.stride.get();
		self.data.chunks(stride).map(move |row| &row[..row_len])
	}

	/// # Validate.
	///
	/// A plane of `rows` rows with `row_len` meaningful bytes each needs a
	/// stride at least as wide as the row, and enough data to reach the end of
	/// the last row. The final row may omit its padding, but nothing beyond a
	/// full `stride × rows` is accepted.
	fn validate(&self, kind: PlaneKind, row_len: usize, rows: usize)
	-> Result<(), AvifError> {
		let stride = self.stride.get();
		if stride < row_len { return Err(AvifError::Stride(kind)); }

		let min = stride.checked_mul(rows - 1)
			.and_then(|x| x.checked_add(row_len))
			.ok_or(AvifError::Overflow)?;
		let max = stride.checked_mul(rows).ok_or(AvifError::Overflow)?;

		let len = self.data.len();
		if min <= len && len <= max { Ok(()) }
		else { Err(AvifError::Plane(kind)) }
	}
}



#[derive(Clone, Copy)]
/// # RGBA8888 Frame.
///
/// A borrowed, tightly-packed buffer of interleaved 8-bit R, G, B, A values,
/// row-major, exactly `width × height × 4` bytes long.
///
/// ## Examples
///
/// ```
/// use avifkit_core::Rgba8888;
///
/// let px = vec![255_u8; 2 * 2 * 4];
/// assert!(Rgba8888::new(&px, 2, 2).is_ok());
/// assert!(Rgba8888::new(&px[1..], 2, 2).is_err());
/// ```
pub struct Rgba8888<'a> {
	/// # Pixels.
	pixels: &'a [u8],

	/// # Width.
	width: NonZeroU32,

	/// # Height.
	height: NonZeroU32,
}

impl fmt::Debug for Rgba8888<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Rgba8888")
		.field("width", &self.width)
		.field("height", &self.height)
		.field("len", &self.pixels.len())
		.finish()
	}
}

impl<'a> Rgba8888<'a> {
	/// # New.
	///
	/// ## Errors
	///
	/// This will return an error if either dimension is zero or too big, or
	/// if the buffer length is not exactly `width × height × 4`.
	pub fn new(pixels: &'a [u8], width: u32, height: u32) -> Result<Self, AvifError> {
		let (width, height) = dimensions(width, height)?;
		let size = usize::try_from(width.get()).ok()
			.zip(usize::try_from(height.get()).ok())
			.and_then(|(w, h)| w.checked_mul(h))
			.and_then(|x| x.checked_mul(4))
			.ok_or(AvifError::Overflow)?;

		if pixels.len() == size { Ok(Self { pixels, width, height }) }
		else { Err(AvifError::BufferSize) }
	}

	/// # From Parts.
	///
	/// The caller must have already checked the buffer length.
	pub(crate) const fn from_parts(pixels: &'a [u8], width: NonZeroU32, height: NonZeroU32)
	-> Self {
		Self { pixels, width, height }
	}

	#[inline]
	#[must_use]
	/// # Pixels.
	pub const fn pixels(&self) -> &'a [u8] { self.pixels }

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
	/// # Row Size.
	pub const fn row_size(&self) -> u32 { self.width.get() * 4 }

	#[must_use]
	/// # Has Alpha?
	///
	/// This returns true if any pixel has an alpha value other than `255`.
	pub fn has_alpha(&self) -> bool {
		self.pixels.chunks_exact(4).any(|px| px[3] != 255)
	}
}



#[derive(Debug, Clone, Copy)]
/// # YUV 4:2:0 Frame.
///
/// Three borrowed 8-bit planes. The Y plane covers every pixel; the U and V
/// planes cover `ceil(width / 2) × ceil(height / 2)` samples each.
pub struct Yuv420<'a> {
	/// # Luma.
	y: Plane<'a>,

	/// # Chroma (Blue).
	u: Plane<'a>,

	/// # Chroma (Red).
	v: Plane<'a>,

	/// # Width.
	width: NonZeroU32,

	/// # Height.
	height: NonZeroU32,
}

impl<'a> Yuv420<'a> {
	/// # New.
	///
	/// ## Errors
	///
	/// This will return an error if either dimension is zero or too big, if
	/// any stride is narrower than its plane's rows, or if any plane is too
	/// short (or too long) for its stride and row count.
	pub fn new(y: Plane<'a>, u: Plane<'a>, v: Plane<'a>, width: u32, height: u32)
	-> Result<Self, AvifError> {
		let (width, height) = dimensions(width, height)?;
		let (w, h) = usize_dimensions(width, height)?;
		let (cw, ch) = (w.div_ceil(2), h.div_ceil(2));

		y.validate(PlaneKind::Y, w, h)?;
		u.validate(PlaneKind::U, cw, ch)?;
		v.validate(PlaneKind::V, cw, ch)?;

		Ok(Self { y, u, v, width, height })
	}

	/// # From Packed I420.
	///
	/// Split a tightly packed I420 buffer (the full Y plane, then U, then V,
	/// no padding) into planes.
	///
	/// ## Errors
	///
	/// This will return an error if the buffer length is not exactly
	/// `w × h + 2 × ceil(w/2) × ceil(h/2)`, or if the dimensions are invalid.
	pub fn from_i420(raw: &'a [u8], width: u32, height: u32) -> Result<Self, AvifError> {
		let (nz_width, nz_height) = dimensions(width, height)?;
		let (w, h) = usize_dimensions(nz_width, nz_height)?;
		let (cw, ch) = (w.div_ceil(2), h.div_ceil(2));

		let y_len = w * h;
		let c_len = cw * ch;
		if raw.len() < y_len { return Err(AvifError::Plane(PlaneKind::Y)); }
		if raw.len() < y_len + c_len { return Err(AvifError::Plane(PlaneKind::U)); }
		if raw.len() != y_len + c_len * 2 { return Err(AvifError::Plane(PlaneKind::V)); }

		let (y, rest) = raw.split_at(y_len);
		let (u, v) = rest.split_at(c_len);

		// Both widths are non-zero here.
		let y_stride = NonZeroUsize::new(w).ok_or(AvifError::Overflow)?;
		let c_stride = NonZeroUsize::new(cw).ok_or(AvifError::Overflow)?;

		Self::new(
			Plane::new(y, y_stride),
			Plane::new(u, c_stride),
			Plane::new(v, c_stride),
			width,
			height,
		)
	}

	#[inline]
	#[must_use]
	/// # Plane.
	pub const fn plane(&self, kind: PlaneKind) -> &Plane<'a> {
		match kind {
			PlaneKind::Y => &self.y,
			PlaneKind::U => &self.u,
			PlaneKind::V => &self.v,
		}
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
	/// # Chroma Width.
	pub const fn chroma_width(&self) -> u32 { self.width.get().div_ceil(2) }

	#[inline]
	#[must_use]
	/// # Chroma Height.
	pub const fn chroma_height(&self) -> u32 { self.height.get().div_ceil(2) }
}



/// # Validate Dimensions.
///
/// Both must be non-zero, and their product may not exceed the pixel cap.
pub(crate) fn dimensions(width: u32, height: u32) -> Result<(NonZeroU32, NonZeroU32), AvifError> {
	let width = NonZeroU32::new(width).ok_or(AvifError::Overflow)?;
	let height = NonZeroU32::new(height).ok_or(AvifError::Overflow)?;
	if u64::from(width.get()) * u64::from(height.get()) > MAX_PIXELS {
		Err(AvifError::Overflow)
	}
	else { Ok((width, height)) }
}

/// # Dimensions as `usize`.
fn usize_dimensions(width: NonZeroU32, height: NonZeroU32)
-> Result<(usize, usize), AvifError> {
	let w = usize::try_from(width.get()).map_err(|_| AvifError::Overflow)?;
	let h = usize::try_from(height.get()).map_err(|_| AvifError::Overflow)?;
	Ok((w, h))
}



#[cfg(test)]
mod tests {
	use super::*;

	fn nz(n: usize) -> NonZeroUsize { NonZeroUsize::new(n).unwrap() }

	#[test]
	fn t_rgba_size() {
		let px = vec![0_u8; 3 * 2 * 4];
		let frame = Rgba8888::new(&px, 3, 2).expect("Frame failed.");
		assert_eq!(frame.width(), 3);
		assert_eq!(frame.height(), 2);
		assert_eq!(frame.row_size(), 12);
		assert!(frame.has_alpha());

		// Off by one in either direction.
		assert_eq!(Rgba8888::new(&px[1..], 3, 2).unwrap_err(), AvifError::BufferSize);
		let mut long = px.clone();
		long.push(0);
		assert_eq!(Rgba8888::new(&long, 3, 2).unwrap_err(), AvifError::BufferSize);

		// Swapped dimensions are the same size, so that's fine.
		assert!(Rgba8888::new(&px, 2, 3).is_ok());

		// Zero and huge.
		assert_eq!(Rgba8888::new(&[], 0, 2).unwrap_err(), AvifError::Overflow);
		assert_eq!(Rgba8888::new(&px, 16_385, 16_384).unwrap_err(), AvifError::Overflow);
	}

	#[test]
	fn t_yuv_even() {
		let y = vec![16_u8; 8 * 4];
		let c = vec![128_u8; 4 * 2];
		let frame = Yuv420::new(
			Plane::new(&y, nz(8)),
			Plane::new(&c, nz(4)),
			Plane::new(&c, nz(4)),
			8,
			4,
		).expect("Frame failed.");
		assert_eq!(frame.chroma_width(), 4);
		assert_eq!(frame.chroma_height(), 2);

		// Full-resolution chroma is not 4:2:0.
		assert_eq!(
			Yuv420::new(
				Plane::new(&y, nz(8)),
				Plane::new(&y, nz(8)),
				Plane::new(&c, nz(4)),
				8,
				4,
			).unwrap_err(),
			AvifError::Plane(PlaneKind::U),
		);

		// Short V.
		assert_eq!(
			Yuv420::new(
				Plane::new(&y, nz(8)),
				Plane::new(&c, nz(4)),
				Plane::new(&c[1..], nz(4)),
				8,
				4,
			).unwrap_err(),
			AvifError::Plane(PlaneKind::V),
		);

		// Stride narrower than the row.
		assert_eq!(
			Yuv420::new(
				Plane::new(&y, nz(4)),
				Plane::new(&c, nz(4)),
				Plane::new(&c, nz(4)),
				8,
				4,
			).unwrap_err(),
			AvifError::Stride(PlaneKind::Y),
		);
	}

	#[test]
	fn t_yuv_padded() {
		// A 5x3 image with rows padded out to 8 bytes. Chroma is 3x2, padded
		// to 4, and the final row of each plane is left unpadded.
		let y = vec![0_u8; 8 * 2 + 5];
		let c = vec![0_u8; 4 + 3];
		let frame = Yuv420::new(
			Plane::new(&y, nz(8)),
			Plane::new(&c, nz(4)),
			Plane::new(&c, nz(4)),
			5,
			3,
		).expect("Frame failed.");

		let rows: Vec<&[u8]> = frame.plane(PlaneKind::Y).rows(5).collect();
		assert_eq!(rows.len(), 3);
		assert!(rows.iter().all(|r| r.len() == 5));

		let rows: Vec<&[u8]> = frame.plane(PlaneKind::V).rows(3).collect();
		assert_eq!(rows.len(), 2);
	}

	#[test]
	fn t_i420() {
		// 5x3 => Y 15, U/V 3x2 = 6 each.
		let raw = vec![0_u8; 15 + 6 + 6];
		let frame = Yuv420::from_i420(&raw, 5, 3).expect("I420 failed.");
		assert_eq!(frame.plane(PlaneKind::Y).stride(), 5);
		assert_eq!(frame.plane(PlaneKind::U).stride(), 3);
		assert_eq!(frame.plane(PlaneKind::V).data().len(), 6);

		assert_eq!(
			Yuv420::from_i420(&raw[..26], 5, 3).unwrap_err(),
			AvifError::Plane(PlaneKind::V),
		);
		assert_eq!(
			Yuv420::from_i420(&raw[..10], 5, 3).unwrap_err(),
			AvifError::Plane(PlaneKind::Y),
		);
	}
}
