/*!
# `AVIFKit`

Decode, encode, and inspect AVIF images from the command line.
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



mod img;
mod job;
mod utility;

use img::SourceKind;
use job::{
	Done,
	Job,
	JobSettings,
	Outcome,
};

use argyle::Argument;
use avifkit_core::{
	AvifError,
	EncoderSettings,
};
use dactyl::{
	NiceElapsed,
	NiceU64,
};
use dowser::Dowser;
use fyi_msg::Msg;
use std::{
	collections::VecDeque,
	num::NonZeroU32,
	path::{
		Path,
		PathBuf,
	},
};
use tokio::{
	runtime::Builder,
	task::JoinHandle,
	time::Instant,
};



/// # Main.
///
/// This lets us bubble up startup errors so they can be pretty-printed.
fn main() {
	match _main() {
		Ok(()) => {},
		Err(e @ (AvifError::PrintHelp | AvifError::PrintVersion)) => {
			println!("{e}");
		},
		Err(e) => { Msg::error(e.as_str()).die(1); },
	}
}

#[inline]
/// # Actual Main.
fn _main() -> Result<(), AvifError> {
	let (opts, paths) = parse_args()?;

	// Set up logging.
	env_logger::Builder::from_env(
		env_logger::Env::default()
			.default_filter_or(if opts.verbose { "debug" } else { "warn" })
	).init();

	// Find the jobs.
	let jobs: Vec<Job> = paths.filter_map(Job::new).collect();
	if jobs.is_empty() { return Err(AvifError::NothingDoing); }

	// Make sure there's somewhere to put the results.
	if ! opts.settings.info_only {
		std::fs::create_dir_all(&opts.out_dir).map_err(|_| AvifError::Write)?;
	}

	// Crunch!
	let rt = Builder::new_multi_thread()
		.enable_time()
		.build()
		.map_err(|_| AvifError::Runtime)?;
	let (ok, total, elapsed) = rt.block_on(crunch(jobs, opts.settings, &opts.out_dir));

	// Summarize.
	let msg = format!(
		"Processed {}/{} image{} in {}.",
		NiceU64::from(ok).as_str(),
		NiceU64::from(total).as_str(),
		if total == 1 { "" } else { "s" },
		NiceElapsed::from(elapsed).as_str(),
	);
	if ok == total { Msg::success(msg).print(); }
	else { Msg::warning(msg).print(); }

	Ok(())
}



#[derive(Debug)]
/// # Options.
struct Opts {
	/// # Job Settings.
	settings: JobSettings,

	/// # Output Directory.
	out_dir: PathBuf,

	/// # Verbose Logging.
	verbose: bool,
}

/// # Parse Arguments.
///
/// Return the runtime options and source paths, unless `--help` or
/// `--version` were requested instead.
fn parse_args() -> Result<(Opts, Dowser), AvifError> {
	let mut paths = Dowser::default();
	let mut info_only = false;
	let mut verbose = false;
	let mut out_dir = PathBuf::from("./avif");
	let mut width = None;
	let mut height = None;
	let mut encoder = EncoderSettings::default();

	let args = argyle::args()
		.with_keywords(include!(concat!(env!("OUT_DIR"), "/argyle.rs")));
	for arg in args {
		match arg {
			Argument::Key("-h" | "--help") => return Err(AvifError::PrintHelp),
			Argument::Key("-i" | "--info") => { info_only = true; },
			Argument::Key("-v" | "--verbose") => { verbose = true; },
			Argument::Key("-V" | "--version") => return Err(AvifError::PrintVersion),

			Argument::KeyWithValue("--height", s) => {
				height.replace(parse_dimension(&s)?);
			},
			Argument::KeyWithValue("-l" | "--list", s) => {
				let _res = paths.read_paths_from_file(s);
			},
			Argument::KeyWithValue("-o" | "--out-dir", s) => { out_dir = PathBuf::from(s); },
			Argument::KeyWithValue("--speed", s) => {
				let speed = s.trim().parse::<u8>().map_err(|_| AvifError::Speed)?;
				encoder = encoder.with_speed(speed);
			},
			Argument::KeyWithValue("--width", s) => {
				width.replace(parse_dimension(&s)?);
			},

			// Assume paths.
			Argument::Other(s) => { paths = paths.with_path(s); },
			Argument::InvalidUtf8(s) => { paths = paths.with_path(s); },

			// Nothing else is relevant.
			_ => {},
		}
	}

	let opts = Opts {
		settings: JobSettings {
			info_only,
			dimensions: width.zip(height),
			encoder,
		},
		out_dir,
		verbose,
	};

	Ok((opts, paths))
}

/// # Parse Dimension.
fn parse_dimension(s: &str) -> Result<NonZeroU32, AvifError> {
	s.trim().parse::<NonZeroU32>().map_err(|_| AvifError::NoDimensions)
}



/// # Crunch.
///
/// Run the jobs on the blocking pool, a few at a time, reporting and saving
/// the results in order. Returns the number of successes, the total, and
/// the elapsed time.
async fn crunch(jobs: Vec<Job>, settings: JobSettings, out_dir: &Path)
-> (u64, u64, std::time::Duration) {
	let now = Instant::now();
	let total = jobs.len() as u64;
	let mut ok = 0_u64;

	let max = num_cpus::get().max(1);
	let mut queue: VecDeque<(PathBuf, JoinHandle<Result<Done, AvifError>>)> =
		VecDeque::with_capacity(max);
	let mut jobs = jobs.into_iter();
	loop {
		// Top up the queue.
		while queue.len() < max {
			let Some(job) = jobs.next() else { break; };
			let src = job.path().to_path_buf();
			queue.push_back((src, tokio::task::spawn_blocking(move || job.run(settings))));
		}

		// Report the oldest.
		let Some((src, handle)) = queue.pop_front() else { break; };
		match handle.await {
			Ok(Ok(done)) => if report(&done, out_dir) { ok += 1; },
			Ok(Err(e)) => {
				utility::print_header_path(&src);
				utility::print_error(e);
				println!();
			},
			Err(_) => {
				utility::print_header_path(&src);
				Msg::error("The worker thread panicked.").with_indent(1).print();
				println!();
			},
		}
	}

	(ok, total, now.elapsed())
}

/// # Report (and Save).
///
/// Print the result of a finished job, saving its output first if it has
/// any. Returns `true` if everything went according to plan.
fn report(done: &Done, out_dir: &Path) -> bool {
	utility::print_header_path(&done.src);

	match done.outcome.data() {
		Some(data) => match utility::save(out_dir, done.kind.output_extension(), data) {
			Ok(dst) => {
				utility::print_done(done, Some(&dst));
				true
			},
			Err(e) => {
				utility::print_error(e);
				println!();
				false
			},
		},
		None => {
			utility::print_done(done, None);
			true
		},
	}
}
