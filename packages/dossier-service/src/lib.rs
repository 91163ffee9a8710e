pub mod collect;
pub mod display;
pub mod folder;
pub mod metadata;
pub mod time_serde;

mod error;

pub use collect::{collect_all_criteria, collect_dossiers, sort_by_priority};
pub use display::{DossierDisplay, recommendation_class, score_color};
pub use error::{Error, Result};
pub use folder::{detect_dossier_dir, markdown_files};
pub use metadata::{SearchMetadata, search_metadata};

use std::{collections::BTreeMap, path::PathBuf};

use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

use dossier_config::Dossiers;
use dossier_extract::{Dossier, ScoreEntry, Source};

/// A dossier as listed in a collection: every field except the body.
#[derive(Clone, Debug, Serialize)]
pub struct DossierSummary {
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
	#[serde(rename = "_display")]
	pub display: DossierDisplay,
}
impl From<Dossier> for DossierSummary {
	fn from(dossier: Dossier) -> Self {
		let display = DossierDisplay::for_dossier(&dossier);

		Self {
			name: dossier.name,
			date: dossier.date,
			priority_score: dossier.priority_score,
			recommendation: dossier.recommendation,
			summary: dossier.summary,
			scores: dossier.scores,
			extra: dossier.extra,
			source: dossier.source,
			filename: dossier.filename,
			display,
		}
	}
}

#[derive(Clone, Debug, Serialize)]
pub struct ListResponse {
	pub meta: SearchMetadata,
	pub dossiers: Vec<DossierSummary>,
	pub criteria: Vec<String>,
	#[serde(with = "crate::time_serde")]
	pub timestamp: OffsetDateTime,
}

#[derive(Clone, Debug, Serialize)]
pub struct DetailResponse {
	pub dossier: Dossier,
	pub display: DossierDisplay,
	pub meta: SearchMetadata,
}

pub struct DossierService {
	pub cfg: Dossiers,
}
impl DossierService {
	pub fn new(cfg: Dossiers) -> Self {
		Self { cfg }
	}

	pub fn folder(&self) -> &std::path::Path {
		&self.cfg.folder
	}

	pub fn dossier_dir(&self) -> Result<Option<PathBuf>> {
		detect_dossier_dir(&self.cfg.folder, &self.cfg)
	}

	/// All dossiers in the search folder, highest priority first.
	pub fn dossiers(&self) -> Result<Vec<Dossier>> {
		match self.dossier_dir()? {
			Some(dir) => collect_dossiers(&dir, &self.cfg.skip_prefixes),
			None => Ok(Vec::new()),
		}
	}

	pub fn list(&self) -> Result<ListResponse> {
		let meta = search_metadata(&self.cfg.folder)?;
		let dossiers = self.dossiers()?;
		let criteria = collect_all_criteria(&dossiers);

		tracing::debug!(count = dossiers.len(), criteria = criteria.len(), "Listed dossiers.");

		Ok(ListResponse {
			meta,
			dossiers: dossiers.into_iter().map(DossierSummary::from).collect(),
			criteria,
			timestamp: OffsetDateTime::now_utc(),
		})
	}

	pub fn get(&self, filename: &str) -> Result<DetailResponse> {
		let path = self.find_dossier(filename)?;
		let dossier = dossier_extract::parse_dossier(&path)?;
		let display = DossierDisplay::for_dossier(&dossier);
		let meta = search_metadata(&self.cfg.folder)?;

		Ok(DetailResponse { dossier, display, meta })
	}

	/// Resolves `filename` to a markdown file directly inside the dossier directory.
	pub fn find_dossier(&self, filename: &str) -> Result<PathBuf> {
		if !is_plain_markdown_name(filename) {
			return Err(Error::NotFound { message: format!("{filename} is not a dossier name.") });
		}

		let dir = self.dossier_dir()?.ok_or_else(|| Error::NotFound {
			message: "The search folder has no dossier directory.".to_string(),
		})?;
		let path = dir.join(filename);

		if !path.is_file() {
			return Err(Error::NotFound { message: format!("{filename} does not exist.") });
		}

		Ok(path)
	}
}

fn is_plain_markdown_name(filename: &str) -> bool {
	!filename.is_empty()
		&& !filename.contains(['/', '\\'])
		&& filename != ".."
		&& filename
			.rsplit_once('.')
			.is_some_and(|(stem, ext)| !stem.is_empty() && ext == folder::MARKDOWN_EXTENSION)
}
