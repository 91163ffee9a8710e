use serde::Serialize;

use dossier_extract::Dossier;

pub const MISSING_SCORE_COLOR: &str = "hsl(0, 0%, 75%)";

/// Presentation hints for one dossier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DossierDisplay {
	pub priority_color: String,
	pub recommendation_class: &'static str,
}
impl DossierDisplay {
	pub fn for_dossier(dossier: &Dossier) -> Self {
		Self {
			priority_color: score_color(dossier.priority_score),
			recommendation_class: recommendation_class(dossier.recommendation.as_deref()),
		}
	}
}

/// Red-to-green hue for a 0-10 score; out-of-range scores are clamped.
pub fn score_color(score: Option<i64>) -> String {
	let Some(score) = score else {
		return MISSING_SCORE_COLOR.to_string();
	};
	let hue = score.clamp(0, 10) * 12;

	format!("hsl({hue}, 70%, 42%)")
}

pub fn recommendation_class(recommendation: Option<&str>) -> &'static str {
	let Some(recommendation) = recommendation.filter(|rec| !rec.is_empty()) else {
		return "rec-unknown";
	};
	let lowered = recommendation.to_lowercase();

	[
		("excellent", "rec-excellent"),
		("good", "rec-good"),
		("decent", "rec-decent"),
		("weak", "rec-weak"),
		("not suitable", "rec-unsuitable"),
	]
	.into_iter()
	.find(|(needle, _)| lowered.contains(needle))
	.map(|(_, class)| class)
	.unwrap_or("rec-unknown")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn colors_scale_and_clamp() {
		assert_eq!(score_color(None), MISSING_SCORE_COLOR);
		assert_eq!(score_color(Some(0)), "hsl(0, 70%, 42%)");
		assert_eq!(score_color(Some(7)), "hsl(84, 70%, 42%)");
		assert_eq!(score_color(Some(42)), "hsl(120, 70%, 42%)");
		assert_eq!(score_color(Some(-3)), "hsl(0, 70%, 42%)");
	}

	#[test]
	fn classes_follow_tier_keywords_in_order() {
		assert_eq!(recommendation_class(Some("EXCELLENT choice")), "rec-excellent");
		assert_eq!(recommendation_class(Some("Good, but pricey")), "rec-good");
		assert_eq!(recommendation_class(Some("Not suitable for home use")), "rec-unsuitable");
		assert_eq!(recommendation_class(Some("Not good")), "rec-good");
		assert_eq!(recommendation_class(Some("Maybe")), "rec-unknown");
		assert_eq!(recommendation_class(Some("")), "rec-unknown");
		assert_eq!(recommendation_class(None), "rec-unknown");
	}
}
