//! Metadata extraction for markdown research dossiers.
//!
//! A dossier either opens with a `---` delimited YAML block or is free-form markdown. The
//! structured block is tried first; legacy pattern matching takes over when it is absent or
//! unusable. Both paths produce the same [`Dossier`] shape.

pub mod legacy;
pub mod record;
pub mod structured;
pub mod table;

mod error;

pub use error::{Error, Result};
pub use legacy::extract_legacy;
pub use record::{Dossier, DossierFields, Extraction, OVERALL_CRITERION, ScoreEntry, Source};
pub use structured::extract_structured;

use std::{fs, path::Path};

/// Reads and parses one dossier file.
///
/// Only I/O failures are errors; malformed content degrades to whatever fields can be
/// recovered.
pub fn parse_dossier(path: &Path) -> Result<Dossier> {
	let content = fs::read_to_string(path)
		.map_err(|err| Error::ReadDossier { path: path.to_path_buf(), source: err })?;
	let filename =
		path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();

	Ok(parse_content(&filename, &content))
}

/// Parses dossier text that has already been read, naming it after `filename`.
pub fn parse_content(filename: &str, content: &str) -> Dossier {
	finish(extract(content), filename, content)
}

/// Runs the structured extractor, falling back to legacy patterns.
pub fn extract(content: &str) -> Extraction {
	match extract_structured(content) {
		(Some(fields), body) => Extraction::Structured { fields, body: body.to_string() },
		(None, _) => {
			tracing::debug!("No structured block; using legacy patterns.");

			Extraction::Legacy { fields: extract_legacy(content) }
		},
	}
}

fn finish(extraction: Extraction, filename: &str, content: &str) -> Dossier {
	let source = extraction.source();
	let (fields, body) = match extraction {
		Extraction::Structured { fields, body } => (fields, body),
		Extraction::Legacy { fields } => (fields, content.to_string()),
	};
	let name = fields
		.name
		.filter(|name| !name.trim().is_empty())
		.unwrap_or_else(|| name_from_filename(filename));

	Dossier {
		name,
		date: fields.date,
		priority_score: fields.priority_score,
		recommendation: fields.recommendation,
		summary: fields.summary,
		scores: fields.scores,
		extra: fields.extra,
		source,
		filename: filename.to_string(),
		body,
	}
}

/// Derives a display name from a file name: `acme_pizza_co.md` becomes `Acme Pizza Co`.
pub fn name_from_filename(filename: &str) -> String {
	let stem = Path::new(filename)
		.file_stem()
		.map(|stem| stem.to_string_lossy().into_owned())
		.unwrap_or_default();

	title_case(&stem.replace('_', " "))
}

/// Upper-cases the first letter of every run of letters and lower-cases the rest.
fn title_case(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut in_word = false;

	for ch in text.chars() {
		if in_word {
			out.extend(ch.to_lowercase());
		} else {
			out.extend(ch.to_uppercase());
		}

		in_word = ch.is_alphabetic();
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn title_cases_like_a_heading() {
		assert_eq!(name_from_filename("acme_pizza_co.md"), "Acme Pizza Co");
		assert_eq!(name_from_filename("GOZNEY-dome_v2.md"), "Gozney-Dome V2");
		assert_eq!(name_from_filename("co2x_unit.md"), "Co2X Unit");
	}

	#[test]
	fn blank_structured_name_falls_back_to_filename() {
		let dossier = parse_content("roccbox_gozney.md", "---\nname: '  '\ndate: 2025\n---\nBody");

		assert_eq!(dossier.source, Source::Structured);
		assert_eq!(dossier.name, "Roccbox Gozney");
		assert_eq!(dossier.date.as_deref(), Some("2025"));
		assert_eq!(dossier.body, "\nBody");
	}

	#[test]
	fn legacy_body_is_the_full_document() {
		let content = "# Oven Dossier: Acme\n\n**Priority Score:** 6/10\n";
		let dossier = parse_content("acme.md", content);

		assert_eq!(dossier.source, Source::Legacy);
		assert_eq!(dossier.name, "Acme");
		assert_eq!(dossier.priority_score, Some(6));
		assert_eq!(dossier.body, content);
		assert_eq!(dossier.filename, "acme.md");
	}

	#[test]
	fn malformed_block_falls_back_to_legacy() {
		let content = "---\nname: [broken\n---\n# Oven Dossier: Fallback\n";
		let dossier = parse_content("x.md", content);

		assert_eq!(dossier.source, Source::Legacy);
		assert_eq!(dossier.name, "Fallback");
		assert_eq!(dossier.body, content);
	}

	#[test]
	fn serializes_with_underscore_keys_and_omits_missing_fields() {
		let dossier = parse_content("plain_notes.md", "nothing to see");
		let json = serde_json::to_value(&dossier).expect("Dossier must serialize.");

		assert_eq!(
			json,
			serde_json::json!({
				"name": "Plain Notes",
				"_source": "legacy",
				"_filename": "plain_notes.md",
				"_body": "nothing to see",
			})
		);
	}

	#[test]
	fn uncoercible_known_fields_never_shadow_typed_fields() {
		let dossier =
			parse_content("acme_ovens.md", "---\nname: [Acme, Ovens]\npriority_score: 8.5\n---\nBody");
		let json = serde_json::to_value(&dossier).expect("Dossier must serialize.");
		let text = serde_json::to_string(&dossier).expect("Dossier must serialize.");

		assert_eq!(dossier.source, Source::Structured);
		assert_eq!(dossier.name, "Acme Ovens");
		assert_eq!(dossier.priority(), 0);
		assert_eq!(json["name"], "Acme Ovens");
		assert!(json.get("priority_score").is_none());
		assert_eq!(json["_raw_name"], serde_json::json!(["Acme", "Ovens"]));
		assert_eq!(json["_raw_priority_score"], serde_json::json!(8.5));
		assert_eq!(text.matches("\"name\"").count(), 1);
	}

	#[test]
	fn repeated_structured_key_stays_structured() {
		let dossier = parse_content(
			"x.md",
			"---\nname: Acme\npriority_score: 6\npriority_score: 8\n---\nBody",
		);

		assert_eq!(dossier.source, Source::Structured);
		assert_eq!(dossier.name, "Acme");
		assert_eq!(dossier.priority_score, Some(8));
		assert_eq!(dossier.body, "\nBody");
	}
}
