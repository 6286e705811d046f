/*!
# AVIFKit: Jobs
*/

use avifkit_core::{
	AvifError,
	AvifInfo,
	Bitmap,
	EncoderSettings,
	RgbaImage,
	Yuv420,
};
use crate::SourceKind;
use std::{
	num::NonZeroU32,
	path::{
		Path,
		PathBuf,
	},
	time::Duration,
};
use tokio::time::Instant;



#[derive(Debug, Clone, Copy)]
/// # Job Settings.
///
/// The parts of the CLI configuration each worker needs.
pub(super) struct JobSettings {
	/// # Info Only.
	pub(super) info_only: bool,

	/// # Raw YUV Dimensions.
	pub(super) dimensions: Option<(NonZeroU32, NonZeroU32)>,

	/// # Encoder Settings.
	pub(super) encoder: EncoderSettings,
}



#[derive(Debug)]
/// # Job.
pub(super) struct Job {
	/// # Source Path.
	path: PathBuf,

	/// # Source Kind.
	kind: SourceKind,
}

impl Job {
	/// # New.
	///
	/// Return `None` if the path is not a supported source.
	pub(super) fn new(path: PathBuf) -> Option<Self> {
		let kind = SourceKind::from_path(&path)?;
		Some(Self { path, kind })
	}

	/// # Source Path.
	pub(super) fn path(&self) -> &Path { &self.path }

	/// # Run.
	///
	/// Read the source and do whatever needs doing with it. This blocks, so
	/// should be sent to a worker thread.
	pub(super) fn run(self, settings: JobSettings) -> Result<Done, AvifError> {
		let now = Instant::now();
		log::debug!("Processing {} as {}.", self.path.display(), self.kind);

		let raw = std::fs::read(&self.path).map_err(|_| AvifError::Read)?;
		let src_len = raw.len();

		let outcome =
			if settings.info_only { Self::info(&raw)? }
			else {
				match self.kind {
					SourceKind::Avif => Self::decode(&raw)?,
					SourceKind::Rgba => Self::encode_rgba(&raw, &settings.encoder)?,
					SourceKind::Y420 => {
						let (w, h) = settings.dimensions.ok_or(AvifError::NoDimensions)?;
						Self::encode_y420(&raw, w, h, &settings.encoder)?
					},
				}
			};

		Ok(Done {
			src: self.path,
			kind: self.kind,
			src_len,
			outcome,
			elapsed: now.elapsed(),
		})
	}
}

impl Job {
	/// # Probe and Describe.
	fn info(raw: &[u8]) -> Result<Outcome, AvifError> {
		if avifkit_core::is_avif(raw) {
			AvifInfo::try_from(raw).map(Outcome::Info)
		}
		else { Err(AvifError::Parse) }
	}

	/// # Decode to PNG.
	fn decode(raw: &[u8]) -> Result<Outcome, AvifError> {
		if ! avifkit_core::is_avif(raw) { return Err(AvifError::Parse); }

		let info = AvifInfo::try_from(raw)?;
		let mut bitmap = Bitmap::for_info(&info)?;
		avifkit_core::decode_into(raw, &mut bitmap)?;
		let data = bitmap.to_png()?;

		Ok(Outcome::Decoded { info, data })
	}

	/// # Encode JPEG/PNG.
	fn encode_rgba(raw: &[u8], settings: &EncoderSettings)
	-> Result<Outcome, AvifError> {
		let img = RgbaImage::try_from(raw)?;
		let data = avifkit_core::encode_rgba8888(&img.as_frame(), settings)?;
		let info = AvifInfo::try_from(data.as_slice())?;
		Ok(Outcome::Encoded { info, data })
	}

	/// # Encode Raw I420.
	fn encode_y420(
		raw: &[u8],
		width: NonZeroU32,
		height: NonZeroU32,
		settings: &EncoderSettings,
	) -> Result<Outcome, AvifError> {
		let yuv = Yuv420::from_i420(raw, width.get(), height.get())?;
		let data = avifkit_core::encode_y420(&yuv, settings)?;
		let info = AvifInfo::try_from(data.as_slice())?;
		Ok(Outcome::Encoded { info, data })
	}
}



#[derive(Debug)]
/// # Finished Job.
pub(super) struct Done {
	/// # Source Path.
	pub(super) src: PathBuf,

	/// # Source Kind.
	pub(super) kind: SourceKind,

	/// # Source Size.
	pub(super) src_len: usize,

	/// # Result.
	pub(super) outcome: Outcome,

	/// # Computation Time.
	pub(super) elapsed: Duration,
}

#[derive(Debug)]
/// # Job Outcome.
pub(super) enum Outcome {
	/// # Metadata Only.
	Info(AvifInfo),

	/// # Decoded (PNG).
	Decoded {
		/// # Source Details.
		info: AvifInfo,

		/// # PNG Bytes.
		data: Vec<u8>,
	},

	/// # Encoded (AVIF).
	Encoded {
		/// # Result Details.
		info: AvifInfo,

		/// # AVIF Bytes.
		data: Vec<u8>,
	},
}

impl Outcome {
	/// # Output Data.
	pub(super) fn data(&self) -> Option<&[u8]> {
		match self {
			Self::Info(_) => None,
			Self::Decoded { data, .. } | Self::Encoded { data, .. } => Some(data.as_slice()),
		}
	}

	/// # Image Details.
	pub(super) const fn info(&self) -> &AvifInfo {
		match self {
			Self::Info(info) |
			Self::Decoded { info, .. } |
			Self::Encoded { info, .. } => info,
		}
	}
}



#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	/// # Temporary Source File.
	fn tmp_file(name: &str, data: &[u8]) -> PathBuf {
		let dir = std::env::temp_dir().join(format!("avifkit-job-{}", std::process::id()));
		fs::create_dir_all(&dir).expect("Unable to create temp dir.");
		let path = dir.join(name);
		fs::write(&path, data).expect("Unable to write temp file.");
		path
	}

	/// # Settings.
	fn settings(dims: Option<(u32, u32)>) -> JobSettings {
		JobSettings {
			info_only: false,
			dimensions: dims.and_then(|(w, h)| NonZeroU32::new(w).zip(NonZeroU32::new(h))),
			encoder: EncoderSettings::default(),
		}
	}

	#[test]
	fn t_unsupported() {
		assert!(Job::new(PathBuf::from("/tmp/foo.gif")).is_none());
		assert!(Job::new(PathBuf::from("/tmp/foo.png")).is_some());
	}

	#[test]
	fn t_y420() {
		// A flat grey 16x8 I420 frame.
		let mut raw = vec![128_u8; 16 * 8];
		raw.resize(16 * 8 + 8 * 4 * 2, 128);
		let path = tmp_file("flat.y420", &raw);

		// Dimensions are required.
		let job = Job::new(path.clone()).expect("Job failed.");
		assert_eq!(job.run(settings(None)).unwrap_err(), AvifError::NoDimensions);

		// Wrong dimensions fail too.
		let job = Job::new(path.clone()).expect("Job failed.");
		assert!(job.run(settings(Some((16, 16)))).is_err());

		// Right dimensions work.
		let job = Job::new(path.clone()).expect("Job failed.");
		let done = job.run(settings(Some((16, 8)))).expect("Encode failed.");
		assert_eq!(done.kind, SourceKind::Y420);
		assert_eq!(done.src_len, raw.len());
		assert!(matches!(done.outcome, Outcome::Encoded { .. }));
		assert_eq!(
			(done.outcome.info().width(), done.outcome.info().height()),
			(16, 8),
		);

		// And round-trip through the decoder.
		let avif = done.outcome.data().expect("Missing data.").to_vec();
		let path = tmp_file("flat.avif", &avif);
		let job = Job::new(path.clone()).expect("Job failed.");
		let done = job.run(settings(None)).expect("Decode failed.");
		assert!(matches!(done.outcome, Outcome::Decoded { .. }));
		assert!(done.outcome.data().is_some_and(|d| d.starts_with(b"\x89PNG")));

		// Info only.
		let job = Job::new(path).expect("Job failed.");
		let mut opts = settings(None);
		opts.info_only = true;
		let done = job.run(opts).expect("Info failed.");
		assert!(matches!(done.outcome, Outcome::Info(_)));
		assert!(done.outcome.data().is_none());
		assert_eq!(done.outcome.info().depth(), 8);
	}

	#[test]
	fn t_bad_sources() {
		// Not actually an AVIF.
		let path = tmp_file("fake.avif", b"definitely not an avif image");
		let job = Job::new(path).expect("Job failed.");
		assert_eq!(job.run(settings(None)).unwrap_err(), AvifError::Parse);

		// Missing.
		let job = Job::new(PathBuf::from("/this/does/not/exist.png")).expect("Job failed.");
		assert_eq!(job.run(settings(None)).unwrap_err(), AvifError::Read);
	}
}
