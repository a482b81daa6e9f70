pub mod scoring;
pub mod served_from;

pub use scoring::{
	CombinedScore, DEFAULT_ALPHA, MatchingBlock, combined_score, matching_blocks, rouge_l_f1,
	semantic_score,
};
pub use served_from::ServedFrom;
