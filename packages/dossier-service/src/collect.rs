use std::path::Path;

use dossier_extract::Dossier;

use crate::{Result, folder};

/// Parses every dossier in `dir`, highest priority first.
///
/// Files named with one of `skip_prefixes` are templates or drafts and are not read. A
/// dossier that cannot be read is logged and left out; the rest of the batch still loads.
pub fn collect_dossiers(dir: &Path, skip_prefixes: &[String]) -> Result<Vec<Dossier>> {
	let mut dossiers = Vec::new();

	for path in folder::markdown_files(dir)? {
		let name = folder::file_name(&path);

		if skip_prefixes.iter().any(|prefix| name.starts_with(prefix.as_str())) {
			continue;
		}

		match dossier_extract::parse_dossier(&path) {
			Ok(dossier) => dossiers.push(dossier),
			Err(err) => {
				tracing::warn!(path = %path.display(), error = %err, "Skipping unreadable dossier.");
			},
		}
	}

	sort_by_priority(&mut dossiers);

	Ok(dossiers)
}

/// Stable sort on `priority_score`, descending; a missing score counts as zero.
pub fn sort_by_priority(dossiers: &mut [Dossier]) {
	dossiers.sort_by(|a, b| b.priority().cmp(&a.priority()));
}

/// Distinct criterion names in first-seen order, without the `OVERALL` summary row.
pub fn collect_all_criteria(dossiers: &[Dossier]) -> Vec<String> {
	let mut criteria: Vec<String> = Vec::new();

	for entry in dossiers.iter().flat_map(Dossier::scores) {
		if entry.is_overall() || criteria.contains(&entry.criterion) {
			continue;
		}

		criteria.push(entry.criterion.clone());
	}

	criteria
}

#[cfg(test)]
mod tests {
	use super::*;

	fn dossier(filename: &str, content: &str) -> Dossier {
		dossier_extract::parse_content(filename, content)
	}

	#[test]
	fn sorts_descending_with_missing_scores_last_and_ties_stable() {
		let mut dossiers = vec![
			dossier("a.md", "**Priority Score:** 5/10"),
			dossier("b.md", "no score"),
			dossier("c.md", "**Priority Score:** 9/10"),
			dossier("d.md", "**Priority Score:** 5/10"),
		];

		sort_by_priority(&mut dossiers);

		let order: Vec<&str> = dossiers.iter().map(|d| d.filename.as_str()).collect();

		assert_eq!(order, vec!["c.md", "a.md", "d.md", "b.md"]);
	}

	#[test]
	fn criteria_are_distinct_ordered_and_skip_overall() {
		let dossiers = vec![
			dossier(
				"a.md",
				"## Assessment\n| Price | 7/10 | ok |\n| **OVERALL** | **7/10** | ok |\n| Heat | 8/10 | ok |\n",
			),
			dossier("b.md", "## Assessment\n| Heat | 6/10 | ok |\n| Size | 4/10 | small |\n"),
		];

		assert_eq!(collect_all_criteria(&dossiers), vec!["Price", "Heat", "Size"]);
		assert!(dossiers[0].scores().iter().any(|entry| entry.criterion == "OVERALL"));
	}
}
