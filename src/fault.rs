use log::{error, warn};
use std::{backtrace::Backtrace, fs, panic, path::Path};

pub const ERROR_LOG: &str = "error.log";

/// The error and all of its causes, one per line.
pub fn describe(err: &anyhow::Error) -> String {
	let mut chain = err.chain();
	let mut text = chain.next().map(|e| e.to_string()).unwrap_or_default();
	for source in chain {
		text.push_str(&format!("\n  Caused by: {source}"));
	}
	text
}

/// Logs the whole chain and writes it to `error.log`. Writing is best-effort.
pub fn report(context: &str, err: &anyhow::Error) {
	report_to(Path::new(ERROR_LOG), context, err);
}

fn report_to(path: &Path, context: &str, err: &anyhow::Error) {
	let text = format!("{context}: {}", describe(err));
	for line in text.lines() {
		error!("{line}");
	}
	write_log(path, &format!("{text}\n\n{err:?}\n"));
}

fn write_log(path: &Path, text: &str) {
	if let Err(e) = fs::write(path, text) {
		warn!("Could not write {}: {e}", path.display());
	}
}

/// Panics go through the same log file before the default hook prints them.
pub fn install_panic_hook() {
	let default_hook = panic::take_hook();
	panic::set_hook(Box::new(move |info| {
		let backtrace = Backtrace::force_capture();
		error!("{info}");
		write_log(Path::new(ERROR_LOG), &format!("{info}\n\n{backtrace}\n"));
		default_hook(info);
	}));
}

#[cfg(test)]
mod tests {
	use super::*;
	use anyhow::Context;
	use std::io;

	fn temp_log(name: &str) -> std::path::PathBuf {
		std::env::temp_dir().join(format!("runner-{name}-{}.log", std::process::id()))
	}

	fn font_failure() -> anyhow::Error {
		let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "truncated");
		Err::<(), _>(io_err)
			.context("png stream ended early")
			.context("could not decode the font sheet")
			.unwrap_err()
	}

	#[test]
	fn describe_lists_every_cause() {
		let text = describe(&font_failure());
		let lines: Vec<_> = text.lines().collect();
		assert_eq!(
			lines,
			vec![
				"could not decode the font sheet",
				"  Caused by: png stream ended early",
				"  Caused by: truncated",
			]
		);
	}

	#[test]
	fn report_writes_context_and_chain() {
		let path = temp_log("report");
		report_to(&path, "Unexpected fault", &font_failure());
		let written = fs::read_to_string(&path).expect("log written");
		let _ = fs::remove_file(&path);
		assert!(written.starts_with("Unexpected fault: could not decode the font sheet\n"));
		assert!(written.contains("Caused by: png stream ended early"));
		assert!(written.contains("Caused by: truncated"));
	}

	#[test]
	fn write_log_replaces_previous_contents() {
		let path = temp_log("replace");
		write_log(&path, "first");
		write_log(&path, "second fault");
		assert_eq!(fs::read_to_string(&path).ok().as_deref(), Some("second fault"));
		let _ = fs::remove_file(&path);
	}

	#[test]
	fn unwritable_log_is_ignored() {
		write_log(Path::new("/this/directory/does/not/exist/error.log"), "lost");
	}
}
