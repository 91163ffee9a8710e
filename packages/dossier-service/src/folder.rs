use std::{
	fs,
	path::{Path, PathBuf},
};

use dossier_config::Dossiers;

use crate::{Error, Result};

pub const DOSSIER_DIR_NAME: &str = "dossiers";
pub const MARKDOWN_EXTENSION: &str = "md";

/// Locates the directory holding dossiers inside a search folder.
///
/// A sub-directory named `dossiers` wins outright. Otherwise the sub-directory with the most
/// markdown files is chosen, falling back to the first eligible one when none has any.
pub fn detect_dossier_dir(folder: &Path, cfg: &Dossiers) -> Result<Option<PathBuf>> {
	if !folder.is_dir() {
		return Ok(None);
	}

	let candidates: Vec<PathBuf> = sorted_entries(folder)?
		.into_iter()
		.filter(|path| path.is_dir() && !is_excluded(path, cfg))
		.collect();
	let detected = choose_dossier_dir(&candidates, markdown_files);

	tracing::debug!(folder = %folder.display(), ?detected, "Detected dossier directory.");

	Ok(detected)
}

/// Picks among sorted candidate directories using `list` to find each one's markdown files.
///
/// A candidate that cannot be listed counts as holding none; it never fails the search.
fn choose_dossier_dir<F>(candidates: &[PathBuf], list: F) -> Option<PathBuf>
where
	F: Fn(&Path) -> Result<Vec<PathBuf>>,
{
	let mut best: Option<(&PathBuf, usize)> = None;

	for dir in candidates {
		if dir.file_name().is_some_and(|name| name == DOSSIER_DIR_NAME) {
			return Some(dir.clone());
		}

		let count = match list(dir) {
			Ok(files) => files.len(),
			Err(err) => {
				tracing::warn!(dir = %dir.display(), error = %err, "Skipping unreadable directory.");

				0
			},
		};

		if count > best.map(|(_, count)| count).unwrap_or(0) {
			best = Some((dir, count));
		}
	}

	best.map(|(dir, _)| dir).or_else(|| candidates.first()).cloned()
}

/// Markdown files directly inside `dir`, sorted by name. Hidden files are ignored.
pub fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
	Ok(sorted_entries(dir)?
		.into_iter()
		.filter(|path| {
			path.is_file()
				&& path.extension().is_some_and(|ext| ext == MARKDOWN_EXTENSION)
				&& !file_name(path).starts_with('.')
		})
		.collect())
}

pub(crate) fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
	let read_dir_error = |err| Error::ReadDir { path: dir.to_path_buf(), source: err };
	let mut entries = Vec::new();

	for entry in fs::read_dir(dir).map_err(read_dir_error)? {
		entries.push(entry.map_err(read_dir_error)?.path());
	}

	entries.sort();

	Ok(entries)
}

pub(crate) fn file_name(path: &Path) -> String {
	path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default()
}

fn is_excluded(dir: &Path, cfg: &Dossiers) -> bool {
	let name = file_name(dir);
	let lowered = name.to_lowercase();

	cfg.excluded_dirs.iter().any(|excluded| *excluded == name)
		|| cfg
			.excluded_substrings
			.iter()
			.any(|fragment| lowered.contains(&fragment.to_lowercase()))
}
