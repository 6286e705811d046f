/*!
# AVIFKit: Utility
*/

use avifkit_core::AvifError;
use crate::{
	Done,
	Outcome,
};
use dactyl::{
	NiceElapsed,
	NiceU64,
};
use fyi_msg::Msg;
use std::{
	borrow::Cow,
	ffi::OsStr,
	path::{
		Path,
		PathBuf,
	},
	time::{
		Duration,
		SystemTime,
		UNIX_EPOCH,
	},
};
use utc2k::Utc2k;



#[must_use]
/// # File Name.
///
/// This extracts the file name from a path. If for some reason it doesn't have
/// one, "?" is returned so that _something_ can be printed.
pub(super) fn file_name(path: &Path) -> Cow<'_, str> {
	path.file_name().map_or_else(|| Cow::Borrowed("?"), OsStr::to_string_lossy)
}

/// # Print Path Title.
///
/// This prints the source image path with a nice ANSI-colored border, like:
///
/// ```ignore
/// +---------------------+
/// | /path/to/source.png |
/// +---------------------+
/// ```
pub(super) fn print_header_path(path: &Path) {
	let txt = path.to_string_lossy();
	let dashes = "-".repeat(txt.len() + 2);

	println!(
		"\x1b[38;5;199m+{dashes}+\n| \x1b[0m{txt} \x1b[38;5;199m|\n+{dashes}+\x1b[0m",
	);
}

/// # Print Computation Time.
pub(super) fn print_computation_time(time: Duration) {
	Msg::plain(format!(
		"\x1b[2mComputation time: {}.\x1b[0m\n",
		NiceElapsed::from(time).as_str(),
	))
		.with_indent(1)
		.print();
}

/// # Print Error.
pub(super) fn print_error(err: AvifError) {
	Msg::warning(err.as_str())
		.with_indent(1)
		.print();
}

/// # Print Result.
///
/// Describe a finished job. If it produced output, `dst` is where it was
/// saved.
pub(super) fn print_done(done: &Done, dst: Option<&Path>) {
	let info = done.outcome.info();
	let src_len = NiceU64::from(done.src_len as u64);

	match (&done.outcome, dst) {
		(Outcome::Info(_), _) => {
			Msg::info(format!("{} AVIF, {info}.", done.kind))
				.with_indent(1)
				.with_suffix(format!(" \x1b[2m({} bytes.)\x1b[0m", src_len.as_str()))
				.print();
		},
		(Outcome::Decoded { data, .. }, Some(dst)) => {
			Msg::success(format!(
				"Decoded \x1b[1m{}\x1b[0m ({info}).",
				file_name(dst),
			))
				.with_indent(1)
				.with_suffix(format!(
					" \x1b[2m({} bytes to {} bytes.)\x1b[0m",
					src_len.as_str(),
					NiceU64::from(data.len() as u64).as_str(),
				))
				.print();
		},
		(Outcome::Encoded { data, .. }, Some(dst)) => {
			Msg::success(format!(
				"Encoded \x1b[1m{}\x1b[0m from {} ({info}).",
				file_name(dst),
				done.kind,
			))
				.with_indent(1)
				.with_suffix(format!(
					" \x1b[2m({} bytes to {} bytes.)\x1b[0m",
					src_len.as_str(),
					NiceU64::from(data.len() as u64).as_str(),
				))
				.print();
		},
		_ => {},
	}

	print_computation_time(done.elapsed);
}

#[must_use]
/// # Timestamp Stem.
///
/// Return an `IMG_YYYY_MM_DD_hh_mm_ss_mmm` file stem for the current (UTC)
/// time.
pub(super) fn timestamp_stem() -> String {
	let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
	stem_for(now)
}

#[must_use]
/// # Stem for Unix Time.
///
/// The date and milliseconds both come from the same reading.
fn stem_for(unixtime: Duration) -> String {
	let date = Utc2k::from_unixtime(u32::try_from(unixtime.as_secs()).unwrap_or(u32::MAX));

	let mut out = String::with_capacity(27);
	out.push_str("IMG_");
	out.extend(date.to_string().chars().map(|c| if c.is_ascii_digit() { c } else { '_' }));
	out.push_str(&format!("_{:03}", unixtime.subsec_millis()));
	out
}

#[must_use]
/// # Output Path.
///
/// Find an unused path within `dir` for the given stem and extension,
/// appending `_1`, `_2`, etc., to the stem as needed.
pub(super) fn output_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
	let mut path = dir.join(format!("{stem}.{ext}"));
	let mut n: u32 = 1;
	while path.exists() {
		path = dir.join(format!("{stem}_{n}.{ext}"));
		n += 1;
	}
	path
}

/// # Save Output.
///
/// Write the data to a fresh timestamped path inside `dir`, returning the
/// path chosen.
pub(super) fn save(dir: &Path, ext: &str, data: &[u8]) -> Result<PathBuf, AvifError> {
	let dst = output_path(dir, &timestamp_stem(), ext);
	write_atomic::write_file(&dst, data).map_err(|_| AvifError::Write)?;
	Ok(dst)
}
