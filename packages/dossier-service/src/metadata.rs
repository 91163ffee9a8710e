use std::{fs, path::Path};

use serde::Serialize;
use time::{PrimitiveDateTime, macros::format_description};

use crate::{Result, folder};

const PROMPT_FILE: &str = "prompt.md";
const LOGS_DIR: &str = "logs";
const SESSION_PREFIX: &str = "session_";
const SESSION_SUFFIX: &str = ".log";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchMetadata {
	pub folder_name: String,
	pub folder_path: String,
	pub title: String,
	pub session_count: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub last_session: Option<String>,
}

pub fn search_metadata(folder: &Path) -> Result<SearchMetadata> {
	let folder_name = folder::file_name(folder);
	let title = read_title(folder).unwrap_or_else(|| folder_name.clone());
	let sessions = session_logs(folder)?;
	let last_session = sessions.last().map(|stamp| format_session_stamp(stamp));

	Ok(SearchMetadata {
		folder_path: folder.display().to_string(),
		folder_name,
		title,
		session_count: sessions.len(),
		last_session,
	})
}

/// First line of `prompt.md` without its heading markers.
fn read_title(folder: &Path) -> Option<String> {
	let path = folder.join(PROMPT_FILE);

	if !path.exists() {
		return None;
	}

	match fs::read_to_string(&path) {
		Ok(raw) => {
			let first_line = raw.lines().next().unwrap_or_default();

			Some(first_line.trim_start_matches(['#', ' ']).trim().to_string())
		},
		Err(err) => {
			tracing::warn!(path = %path.display(), error = %err, "Failed to read search prompt.");

			None
		},
	}
}

/// Timestamps of `logs/session_<stamp>.log` files, oldest first.
fn session_logs(folder: &Path) -> Result<Vec<String>> {
	let logs = folder.join(LOGS_DIR);

	if !logs.is_dir() {
		return Ok(Vec::new());
	}

	Ok(folder::sorted_entries(&logs)?
		.iter()
		.map(|path| folder::file_name(path))
		.filter_map(|name| {
			name.strip_prefix(SESSION_PREFIX)
				.and_then(|rest| rest.strip_suffix(SESSION_SUFFIX))
				.map(str::to_string)
		})
		.collect())
}

/// Renders `YYYYMMDD_HHMMSS` as `YYYY-MM-DD HH:MM`, passing anything else through.
pub fn format_session_stamp(stamp: &str) -> String {
	let input = format_description!("[year][month][day]_[hour][minute][second]");
	let output = format_description!("[year]-[month]-[day] [hour]:[minute]");

	PrimitiveDateTime::parse(stamp, input)
		.ok()
		.and_then(|parsed| parsed.format(output).ok())
		.unwrap_or_else(|| stamp.to_string())
}
