use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub dossiers: Dossiers,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Dossiers {
	/// Search folder; the dossier directory is detected underneath it.
	pub folder: PathBuf,
	/// Sub-directory names never considered as the dossier directory.
	#[serde(default = "default_excluded_dirs")]
	pub excluded_dirs: Vec<String>,
	/// Case-insensitive fragments that exclude a sub-directory, e.g. "backup".
	#[serde(default = "default_excluded_substrings")]
	pub excluded_substrings: Vec<String>,
	/// Markdown files whose name starts with one of these are not dossiers.
	#[serde(default = "default_skip_prefixes")]
	pub skip_prefixes: Vec<String>,
}
impl Dossiers {
	pub fn new(folder: impl Into<PathBuf>) -> Self {
		Self {
			folder: folder.into(),
			excluded_dirs: default_excluded_dirs(),
			excluded_substrings: default_excluded_substrings(),
			skip_prefixes: default_skip_prefixes(),
		}
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_excluded_dirs() -> Vec<String> {
	vec!["logs".to_string(), "docs".to_string(), "dashboard".to_string()]
}

fn default_excluded_substrings() -> Vec<String> {
	vec!["backup".to_string()]
}

fn default_skip_prefixes() -> Vec<String> {
	vec!["DOSSIER_TEMPLATE".to_string(), "_".to_string()]
}
