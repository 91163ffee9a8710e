use std::fmt;

use serde::de::{self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde_yaml::{
	Mapping, Value as YamlValue,
	value::{Tag, TaggedValue},
};

use crate::record::{DossierFields, ScoreEntry};

pub const BLOCK_DELIMITER: &str = "---";
/// Prefix for the verbatim copy of a known key whose value has the wrong shape.
pub const RAW_PREFIX: &str = "_raw_";

/// Keys attached during post-processing; a structured block cannot supply them.
const RESERVED_KEYS: [&str; 4] = ["_source", "_filename", "_body", "_display"];
const SCORE_ENTRY_KEYS: [&str; 3] = ["criterion", "score", "comment"];

/// Splits a leading `---` delimited YAML block from `content`.
///
/// Returns the parsed fields and the text after the closing delimiter, or `None` and the
/// untouched content when the document does not open with a usable block.
pub fn extract_structured(content: &str) -> (Option<DossierFields>, &str) {
	if !content.starts_with(BLOCK_DELIMITER) {
		return (None, content);
	}

	let mut segments = content.splitn(3, BLOCK_DELIMITER);
	let (Some(_), Some(block), Some(rest)) = (segments.next(), segments.next(), segments.next())
	else {
		tracing::debug!("Structured block has no closing delimiter.");

		return (None, content);
	};
	let mapping = match serde_yaml::from_str::<LastKeyWins>(block) {
		Ok(LastKeyWins(YamlValue::Mapping(mapping))) if !mapping.is_empty() => mapping,
		Ok(_) => {
			tracing::debug!("Structured block is not a non-empty mapping.");

			return (None, content);
		},
		Err(err) => {
			tracing::debug!(error = %err, "Structured block failed to parse.");

			return (None, content);
		},
	};

	(Some(fields_from_mapping(mapping)), rest)
}

/// A YAML value whose mappings keep the last entry for a repeated key instead of rejecting it.
struct LastKeyWins(YamlValue);
impl<'de> Deserialize<'de> for LastKeyWins {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		deserializer.deserialize_any(LastKeyWinsVisitor)
	}
}

struct LastKeyWinsVisitor;
impl<'de> Visitor<'de> for LastKeyWinsVisitor {
	type Value = LastKeyWins;

	fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		formatter.write_str("any YAML value")
	}

	fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
		Ok(LastKeyWins(YamlValue::Bool(value)))
	}

	fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
		Ok(LastKeyWins(YamlValue::Number(value.into())))
	}

	fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
		Ok(LastKeyWins(YamlValue::Number(value.into())))
	}

	fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
		Ok(LastKeyWins(YamlValue::Number(value.into())))
	}

	fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
		Ok(LastKeyWins(YamlValue::String(value.to_string())))
	}

	fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
		Ok(LastKeyWins(YamlValue::String(value)))
	}

	fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
		Ok(LastKeyWins(YamlValue::Null))
	}

	fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
		Ok(LastKeyWins(YamlValue::Null))
	}

	fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
	where
		D: Deserializer<'de>,
	{
		LastKeyWins::deserialize(deserializer)
	}

	fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
	where
		A: SeqAccess<'de>,
	{
		let mut items = Vec::with_capacity(seq.size_hint().unwrap_or_default());

		while let Some(LastKeyWins(item)) = seq.next_element()? {
			items.push(item);
		}

		Ok(LastKeyWins(YamlValue::Sequence(items)))
	}

	fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
	where
		A: MapAccess<'de>,
	{
		let mut mapping = Mapping::new();

		while let Some((LastKeyWins(key), LastKeyWins(value))) = map.next_entry()? {
			if mapping.insert(key, value).is_some() {
				tracing::debug!("Repeated structured key; keeping the later value.");
			}
		}

		Ok(LastKeyWins(YamlValue::Mapping(mapping)))
	}

	fn visit_enum<A>(self, data: A) -> Result<Self::Value, A::Error>
	where
		A: EnumAccess<'de>,
	{
		let (tag, variant) = data.variant::<String>()?;
		let LastKeyWins(value) = variant.newtype_variant()?;

		Ok(LastKeyWins(YamlValue::Tagged(Box::new(TaggedValue { tag: Tag::new(tag), value }))))
	}
}

fn fields_from_mapping(mapping: Mapping) -> DossierFields {
	let mut fields = DossierFields::default();

	for (key, value) in mapping {
		let Some(key) = key_to_string(&key) else {
			tracing::debug!(?key, "Skipping structured key that is not a scalar.");

			continue;
		};

		if RESERVED_KEYS.contains(&key.as_str()) {
			continue;
		}

		let unused = match key.as_str() {
			"name" => assign(&mut fields.name, value, as_text),
			"date" => assign(&mut fields.date, value, as_text),
			"recommendation" => assign(&mut fields.recommendation, value, as_text),
			"summary" => assign(&mut fields.summary, value, as_text),
			"priority_score" => assign(&mut fields.priority_score, value, as_integer),
			"scores" => {
				if has_unlisted_score_keys(&value) {
					insert_extra(&mut fields, raw_key(&key), value.clone());
				}

				assign(&mut fields.scores, value, as_scores)
			},
			_ => {
				insert_extra(&mut fields, key, value);

				continue;
			},
		};

		// A known key never lands in `extra` under its own name.
		if let Some(value) = unused {
			insert_extra(&mut fields, raw_key(&key), value);
		}
	}

	fields
}

/// Stores the coerced value in `slot`, handing the raw value back when it has the wrong shape.
fn assign<T>(
	slot: &mut Option<T>,
	value: YamlValue,
	coerce: fn(&YamlValue) -> Option<T>,
) -> Option<YamlValue> {
	if value.is_null() {
		return None;
	}

	match coerce(&value) {
		Some(coerced) => {
			*slot = Some(coerced);

			None
		},
		None => Some(value),
	}
}

fn insert_extra(fields: &mut DossierFields, key: String, value: YamlValue) {
	match serde_json::to_value(&value) {
		Ok(json) => {
			fields.extra.insert(key, json);
		},
		Err(err) => {
			tracing::debug!(%key, error = %err, "Dropping structured value with no JSON form.");
		},
	}
}

fn raw_key(key: &str) -> String {
	format!("{RAW_PREFIX}{key}")
}

fn key_to_string(key: &YamlValue) -> Option<String> {
	match key {
		YamlValue::String(text) => Some(text.clone()),
		YamlValue::Number(number) => Some(number.to_string()),
		YamlValue::Bool(flag) => Some(flag.to_string()),
		_ => None,
	}
}

fn as_text(value: &YamlValue) -> Option<String> {
	match value {
		YamlValue::String(text) => Some(text.trim().to_string()),
		YamlValue::Number(number) => Some(number.to_string()),
		YamlValue::Bool(flag) => Some(flag.to_string()),
		YamlValue::Tagged(tagged) => as_text(&tagged.value),
		_ => None,
	}
}

fn as_integer(value: &YamlValue) -> Option<i64> {
	match value {
		YamlValue::Number(number) => number.as_i64(),
		YamlValue::String(text) => text.trim().parse().ok(),
		YamlValue::Tagged(tagged) => as_integer(&tagged.value),
		_ => None,
	}
}

fn as_scores(value: &YamlValue) -> Option<Vec<ScoreEntry>> {
	let YamlValue::Sequence(items) = value else {
		return None;
	};

	items.iter().map(as_score_entry).collect()
}

fn has_unlisted_score_keys(value: &YamlValue) -> bool {
	let Some(items) = value.as_sequence() else {
		return false;
	};

	items.iter().filter_map(YamlValue::as_mapping).any(|entry| {
		entry.keys().any(|key| !key.as_str().is_some_and(|key| SCORE_ENTRY_KEYS.contains(&key)))
	})
}

fn as_score_entry(value: &YamlValue) -> Option<ScoreEntry> {
	let entry = value.as_mapping()?;
	let criterion = entry.get("criterion").and_then(as_text)?;
	let score = entry.get("score").and_then(as_integer)?;
	let comment = entry.get("comment").and_then(as_text).unwrap_or_default();

	Some(ScoreEntry { criterion, score, comment })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_delimiter_returns_full_content() {
		let content = "# Dossier: Acme\n\nBody.";
		let (fields, rest) = extract_structured(content);

		assert!(fields.is_none());
		assert_eq!(rest, content);
	}

	#[test]
	fn unterminated_block_is_absent() {
		let content = "---\nname: Acme\n";
		let (fields, rest) = extract_structured(content);

		assert!(fields.is_none());
		assert_eq!(rest, content);
	}

	#[test]
	fn malformed_yaml_is_absent() {
		let content = "---\nname: [unclosed\n---\nBody";
		let (fields, rest) = extract_structured(content);

		assert!(fields.is_none());
		assert_eq!(rest, content);
	}

	#[test]
	fn scalar_block_is_absent() {
		let (fields, _) = extract_structured("---\njust text\n---\nBody");

		assert!(fields.is_none());
	}

	#[test]
	fn empty_mapping_is_absent() {
		let (fields, _) = extract_structured("---\n{}\n---\nBody");

		assert!(fields.is_none());
	}

	#[test]
	fn parses_known_fields_and_keeps_the_rest() {
		let content = "---\nname: Acme Ovens\ndate: 2025-03-01\npriority_score: 8\nrecommendation: Good fit\nregion: EU\nscores:\n  - criterion: Price\n    score: 7\n    comment: Fair\n  - criterion: OVERALL\n    score: 8\n---\n# Body\n";
		let (fields, rest) = extract_structured(content);
		let fields = fields.expect("Expected structured fields.");

		assert_eq!(rest, "\n# Body\n");
		assert_eq!(fields.name.as_deref(), Some("Acme Ovens"));
		assert_eq!(fields.date.as_deref(), Some("2025-03-01"));
		assert_eq!(fields.priority_score, Some(8));
		assert_eq!(fields.recommendation.as_deref(), Some("Good fit"));
		assert_eq!(fields.extra.get("region"), Some(&serde_json::json!("EU")));

		let scores = fields.scores.expect("Expected scores.");

		assert_eq!(scores.len(), 2);
		assert_eq!(scores[0], ScoreEntry {
			criterion: "Price".to_string(),
			score: 7,
			comment: "Fair".to_string(),
		});
		assert!(scores[1].is_overall());
		assert_eq!(scores[1].comment, "");
	}

	#[test]
	fn uncoercible_known_field_moves_to_raw_key() {
		let content = "---\npriority_score: high\nscores: {Price: 7}\n---\n";
		let (fields, _) = extract_structured(content);
		let fields = fields.expect("Expected structured fields.");

		assert_eq!(fields.priority_score, None);
		assert_eq!(fields.scores, None);
		assert!(!fields.extra.contains_key("priority_score"));
		assert!(!fields.extra.contains_key("scores"));
		assert_eq!(fields.extra.get("_raw_priority_score"), Some(&serde_json::json!("high")));
		assert_eq!(fields.extra.get("_raw_scores"), Some(&serde_json::json!({ "Price": 7 })));
	}

	#[test]
	fn repeated_key_keeps_the_later_value() {
		let content = "---\nname: Acme\npriority_score: 6\npriority_score: 8\n---\nBody";
		let (fields, rest) = extract_structured(content);
		let fields = fields.expect("Expected structured fields.");

		assert_eq!(rest, "\nBody");
		assert_eq!(fields.name.as_deref(), Some("Acme"));
		assert_eq!(fields.priority_score, Some(8));
		assert!(fields.extra.is_empty());
	}

	#[test]
	fn repeated_key_inside_a_score_entry_keeps_the_later_value() {
		let content = "---\nscores:\n  - criterion: Price\n    score: 3\n    score: 7\n---\n";
		let (fields, _) = extract_structured(content);
		let scores = fields.and_then(|fields| fields.scores).expect("Expected scores.");

		assert_eq!(scores[0].score, 7);
	}

	#[test]
	fn tagged_values_are_unwrapped() {
		let (fields, _) = extract_structured("---\nname: !brand Acme\npriority_score: !int 7\n---\n");
		let fields = fields.expect("Expected structured fields.");

		assert_eq!(fields.name.as_deref(), Some("Acme"));
		assert_eq!(fields.priority_score, Some(7));
	}

	#[test]
	fn score_entries_with_other_keys_keep_the_raw_sequence() {
		let content = "---\nscores:\n  - criterion: Price\n    score: 7\n    comment: ok\n    weight: 2\n---\n";
		let (fields, _) = extract_structured(content);
		let fields = fields.expect("Expected structured fields.");

		assert_eq!(fields.scores, Some(vec![ScoreEntry {
			criterion: "Price".to_string(),
			score: 7,
			comment: "ok".to_string(),
		}]));
		assert_eq!(
			fields.extra.get("_raw_scores"),
			Some(&serde_json::json!([
				{ "criterion": "Price", "score": 7, "comment": "ok", "weight": 2 }
			]))
		);
	}

	#[test]
	fn plain_score_entries_leave_no_raw_copy() {
		let content = "---\nscores:\n  - criterion: Price\n    score: 7\n---\n";
		let (fields, _) = extract_structured(content);
		let fields = fields.expect("Expected structured fields.");

		assert!(fields.extra.is_empty());
	}

	#[test]
	fn reserved_keys_are_ignored() {
		let (fields, _) =
			extract_structured("---\nname: Acme\n_source: forged\n_display: forged\n---\n");
		let fields = fields.expect("Expected structured fields.");

		assert!(fields.extra.is_empty());
	}
}
