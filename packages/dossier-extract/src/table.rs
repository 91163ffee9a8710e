//! Score-table scanning for the assessment section of legacy dossiers.
//!
//! Rows look like `| Criterion | 8/10 | Comment |`; the summary row is usually bolded,
//! e.g. `| **OVERALL** | **9/10** | **Strong** |`.

use std::sync::LazyLock;

use regex::Regex;

use crate::record::ScoreEntry;

const CELL_DELIMITER: char = '|';

static RE_ASSESSMENT_SECTION: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?s)##\s+(?:Suitability )?Assessment\s*\n(.*?)(?:\n---|\n##|\z)")
		.expect("valid assessment section regex")
});
static RE_SCORE_CELL: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^([0-9]+)\s*/\s*10").expect("valid score cell regex"));

/// Criterion labels that only ever appear in header rows.
const HEADER_LABELS: [&str; 2] = ["criterion", "score (0-10)"];

/// Scans the first assessment section of `content` for score rows, in source order.
pub fn scan_scores(content: &str) -> Vec<ScoreEntry> {
	let Some(section) = RE_ASSESSMENT_SECTION.captures(content).and_then(|caps| caps.get(1))
	else {
		return Vec::new();
	};

	section.as_str().lines().filter_map(parse_score_row).collect()
}

/// Parses a single table row; anything that is not a scored criterion row yields `None`.
pub fn parse_score_row(line: &str) -> Option<ScoreEntry> {
	let line = line.trim();

	if !line.starts_with(CELL_DELIMITER) {
		return None;
	}

	let cells: Vec<&str> =
		line.split(CELL_DELIMITER).map(str::trim).filter(|cell| !cell.is_empty()).collect();
	let [criterion, score, comment, ..] = cells.as_slice() else {
		return None;
	};
	let score = RE_SCORE_CELL
		.captures(strip_emphasis(score))
		.and_then(|caps| caps.get(1))
		.and_then(|digits| digits.as_str().parse::<i64>().ok())?;
	let criterion = strip_emphasis(criterion);

	if is_header_or_separator(criterion) {
		return None;
	}

	Some(ScoreEntry {
		criterion: criterion.to_string(),
		score,
		comment: strip_emphasis(comment).to_string(),
	})
}

fn strip_emphasis(cell: &str) -> &str {
	cell.trim_matches(|ch: char| ch == '*' || ch.is_whitespace())
}

fn is_header_or_separator(criterion: &str) -> bool {
	let lowered = criterion.to_lowercase();

	criterion.is_empty()
		|| HEADER_LABELS.contains(&lowered.as_str())
		|| criterion.chars().all(|ch| matches!(ch, '-' | ':'))
}
