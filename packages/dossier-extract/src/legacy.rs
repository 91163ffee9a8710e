//! Pattern extraction for free-form dossiers that carry no structured block.
//!
//! Every field has its own matcher; a matcher that finds nothing leaves its field unset and
//! never affects the others.

use std::sync::LazyLock;

use regex::Regex;

use crate::{record::DossierFields, table};

static RE_NAME: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?m)^#\s+.*?Dossier:\s*(.+)$").expect("valid name regex"));
static RE_DATE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\*\*Research Date:\*\*\s*(\S+)").expect("valid research date regex")
});
static RE_PRIORITY_SCORE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\*\*Priority Score:\*\*\s*([0-9]+)\s*/\s*10").expect("valid priority regex")
});
static RE_RECOMMENDATION: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\*\*Recommendation:\*\*\s*(.+)").expect("valid recommendation regex")
});
static RE_SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?s)##\s+Summary\s*\n+(.+?)(?:\n##|(?m:^)---|\z)").expect("valid summary regex")
});

pub fn extract_legacy(content: &str) -> DossierFields {
	let scores = table::scan_scores(content);
	let fields = DossierFields {
		name: extract_name(content),
		date: extract_date(content),
		priority_score: extract_priority_score(content),
		recommendation: extract_recommendation(content),
		summary: extract_summary(content),
		scores: (!scores.is_empty()).then_some(scores),
		..Default::default()
	};

	tracing::debug!(
		name = fields.name.is_some(),
		date = fields.date.is_some(),
		priority_score = fields.priority_score.is_some(),
		recommendation = fields.recommendation.is_some(),
		summary = fields.summary.is_some(),
		scores = fields.scores.as_ref().map(Vec::len).unwrap_or(0),
		"Legacy extraction finished."
	);

	fields
}

pub fn extract_name(content: &str) -> Option<String> {
	first_capture(&RE_NAME, content).map(str::trim).map(str::to_string)
}

pub fn extract_date(content: &str) -> Option<String> {
	first_capture(&RE_DATE, content).map(str::to_string)
}

/// Reads `**Priority Score:** N/10`; a different denominator means no score.
pub fn extract_priority_score(content: &str) -> Option<i64> {
	first_capture(&RE_PRIORITY_SCORE, content).and_then(|digits| digits.parse().ok())
}

pub fn extract_recommendation(content: &str) -> Option<String> {
	first_capture(&RE_RECOMMENDATION, content).map(str::trim).map(str::to_string)
}

/// Text of the `## Summary` section up to the next `##` heading or horizontal rule.
pub fn extract_summary(content: &str) -> Option<String> {
	let captured = first_capture(&RE_SUMMARY, content)?;

	// A rule directly under the heading closes an empty section.
	if captured.starts_with("---") {
		return None;
	}

	let summary = captured.trim();

	(!summary.is_empty()).then(|| summary.to_string())
}

fn first_capture<'a>(re: &Regex, content: &'a str) -> Option<&'a str> {
	re.captures(content).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}
