/*!
# `AVIFKit` - Encoder Settings
*/

use std::num::NonZeroU8;



/// # Best Quantizer.
pub const QUANTIZER_BEST: u8 = 0;

/// # Worst Quantizer.
pub const QUANTIZER_WORST: u8 = 63;

/// # Slowest Speed.
pub const SPEED_SLOWEST: u8 = 0;

/// # Fastest Speed.
pub const SPEED_FASTEST: u8 = 10;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Encoder Settings.
///
/// The knobs handed to `libavif` for each encode. The defaults favor speed:
/// the fastest preset, with the color quantizer pinned to a narrow, visually
/// lossless-ish `22..=24` band.
///
/// ## Examples
///
/// ```
/// use avifkit_core::EncoderSettings;
///
/// let settings = EncoderSettings::default()
///     .with_speed(6)
///     .with_quantizers(40, 10);
///
/// assert_eq!(settings.speed(), 6);
/// assert_eq!(settings.quantizers(), (10, 40));
/// ```
pub struct EncoderSettings {
	/// # Speed.
	speed: u8,

	/// # Minimum Quantizer.
	min_quantizer: u8,

	/// # Maximum Quantizer.
	max_quantizer: u8,

	/// # Threads.
	threads: NonZeroU8,
}

impl Default for EncoderSettings {
	fn default() -> Self {
		let threads = u8::try_from(num_cpus::get()).ok()
			.and_then(NonZeroU8::new)
			.unwrap_or(NonZeroU8::MAX);

		Self {
			speed: SPEED_FASTEST,
			min_quantizer: 22,
			max_quantizer: 24,
			threads,
		}
	}
}

/// ## Setters.
impl EncoderSettings {
	#[must_use]
	/// # With Speed.
	///
	/// Values above [`SPEED_FASTEST`] are clamped.
	pub const fn with_speed(mut self, speed: u8) -> Self {
		self.speed =
			if speed > SPEED_FASTEST { SPEED_FASTEST }
			else { speed };
		self
	}

	#[must_use]
	/// # With Quantizers.
	///
	/// Set the color quantizer range. Values above [`QUANTIZER_WORST`] are
	/// clamped, and the pair is reordered if backwards.
	pub const fn with_quantizers(mut self, a: u8, b: u8) -> Self {
		let a = if a > QUANTIZER_WORST { QUANTIZER_WORST } else { a };
		let b = if b > QUANTIZER_WORST { QUANTIZER_WORST } else { b };
		if a <= b {
			self.min_quantizer = a;
			self.max_quantizer = b;
		}
		else {
			self.min_quantizer = b;
			self.max_quantizer = a;
		}
		self
	}

	#[must_use]
	/// # With Threads.
	pub const fn with_threads(mut self, threads: NonZeroU8) -> Self {
		self.threads = threads;
		self
	}
}

/// ## Getters.
impl EncoderSettings {
	#[inline]
	#[must_use]
	/// # Speed.
	pub const fn speed(&self) -> u8 { self.speed }

	#[inline]
	#[must_use]
	/// # Quantizers (Min, Max).
	pub const fn quantizers(&self) -> (u8, u8) {
		(self.min_quantizer, self.max_quantizer)
	}

	#[inline]
	#[must_use]
	/// # Threads.
	pub const fn threads(&self) -> NonZeroU8 { self.threads }
}
