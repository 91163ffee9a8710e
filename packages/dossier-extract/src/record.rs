use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Criterion name that summarizes a score table rather than naming a criterion.
pub const OVERALL_CRITERION: &str = "OVERALL";

/// Which extraction path produced a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
	Structured,
	Legacy,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreEntry {
	pub criterion: String,
	pub score: i64,
	pub comment: String,
}
impl ScoreEntry {
	pub fn is_overall(&self) -> bool {
		self.criterion.eq_ignore_ascii_case(OVERALL_CRITERION)
	}
}

/// Fields recovered by either extraction path, before post-processing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DossierFields {
	pub name: Option<String>,
	pub date: Option<String>,
	pub priority_score: Option<i64>,
	pub recommendation: Option<String>,
	pub summary: Option<String>,
	pub scores: Option<Vec<ScoreEntry>>,
	/// Structured-block keys outside the known schema. A known key whose value had an
	/// unexpected shape is kept under its `_raw_` prefixed name, never its own.
	pub extra: BTreeMap<String, Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Extraction {
	Structured { fields: DossierFields, body: String },
	Legacy { fields: DossierFields },
}
impl Extraction {
	pub fn source(&self) -> Source {
		match self {
			Self::Structured { .. } => Source::Structured,
			Self::Legacy { .. } => Source::Legacy,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dossier {
	pub name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub date: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub priority_score: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub recommendation: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub summary: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub scores: Option<Vec<ScoreEntry>>,
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
	#[serde(rename = "_source")]
	pub source: Source,
	#[serde(rename = "_filename")]
	pub filename: String,
	#[serde(rename = "_body")]
	pub body: String,
}
impl Dossier {
	/// Sort key for collections; a missing score ranks as zero.
	pub fn priority(&self) -> i64 {
		self.priority_score.unwrap_or(0)
	}

	pub fn scores(&self) -> &[ScoreEntry] {
		self.scores.as_deref().unwrap_or_default()
	}
}
