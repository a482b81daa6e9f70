use qa_domain::{ServedFrom, combined_score, rouge_l_f1, semantic_score};

const SAMPLES: [&str; 8] = [
	"",
	"4",
	"The answer is 4.",
	"2 + 2 equals four",
	"What is 2+2?",
	"ñandú über straße",
	"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
	"Rust guarantees memory safety without a garbage collector.",
];

#[test]
fn semantic_score_stays_in_unit_range() {
	for a in SAMPLES {
		for b in SAMPLES {
			let score = semantic_score(a, b);

			assert!((0.0..=1.0).contains(&score), "semantic_score({a:?}, {b:?}) = {score}");
		}
	}
}

#[test]
fn semantic_score_of_identical_text_is_one() {
	for text in SAMPLES.iter().filter(|text| !text.is_empty()) {
		assert_eq!(semantic_score(text, text), 1.0);
	}
}

#[test]
fn rouge_stays_in_unit_range() {
	for a in SAMPLES {
		for b in SAMPLES {
			let score = rouge_l_f1(a, b);

			assert!((0.0..=1.0).contains(&score), "rouge_l_f1({a:?}, {b:?}) = {score}");
		}
	}
}

#[test]
fn rouge_is_not_symmetric_in_general() {
	assert_ne!(rouge_l_f1("tide", "diet"), rouge_l_f1("diet", "tide"));
}

#[test]
fn combined_score_reduces_to_each_metric_at_the_extremes() {
	for a in SAMPLES {
		for b in SAMPLES {
			let semantic_only = combined_score(a, b, 1.0);
			let rouge_only = combined_score(a, b, 0.0);

			assert!((semantic_only.combined - semantic_score(a, b)).abs() < 1e-12);
			assert!((rouge_only.combined - rouge_l_f1(a, b)).abs() < 1e-12);
		}
	}
}

#[test]
fn combined_score_reports_both_components() {
	let score = combined_score("The answer is 4.", "4", 0.7);

	assert_eq!(score.semantic, semantic_score("The answer is 4.", "4"));
	assert_eq!(score.rouge, rouge_l_f1("The answer is 4.", "4"));
	assert!((score.combined - (0.7 * score.semantic + 0.3 * score.rouge)).abs() < 1e-12);
}

#[test]
fn served_from_serializes_as_snake_case() {
	assert_eq!(serde_json::to_value(ServedFrom::Cache).expect("serialize"), "cache");
	assert_eq!(serde_json::to_value(ServedFrom::Llm).expect("serialize"), "llm");
	assert_eq!(ServedFrom::parse("llm"), Some(ServedFrom::Llm));
	assert_eq!(ServedFrom::parse("disk"), None);
}
