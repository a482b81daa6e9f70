//! Cheap textual similarity between a generated answer and a reference answer.
//!
//! Both metrics are built on the same matching-block decomposition: find the longest common run,
//! then recurse on the unmatched regions to its left and right. Strings are compared as sequences
//! of Unicode scalar values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Sequences at least this long have their most frequent characters excluded as match anchors.
const AUTOJUNK_MIN_LEN: usize = 200;

pub const DEFAULT_ALPHA: f64 = 0.7;

/// A maximal run where `a[a..a + size] == b[b..b + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingBlock {
	pub a: usize,
	pub b: usize,
	pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinedScore {
	pub combined: f64,
	pub semantic: f64,
	pub rouge: f64,
}

/// Alignment ratio `2 * M / (len(a) + len(b))` in `[0, 1]`.
///
/// Two empty strings are considered identical and score `1.0`.
pub fn semantic_score(a: &str, b: &str) -> f64 {
	let a = chars(a);
	let b = chars(b);
	let total = a.len() + b.len();

	if total == 0 {
		return 1.0;
	}

	2.0 * matched_len(&a, &b) as f64 / total as f64
}

/// ROUGE-L style F1 using the matched length as the common-subsequence proxy.
///
/// Precision is normalized by `a`, recall by `b`.
pub fn rouge_l_f1(a: &str, b: &str) -> f64 {
	let a = chars(a);
	let b = chars(b);
	let matched = matched_len(&a, &b);

	if matched == 0 {
		return 0.0;
	}

	let precision = matched as f64 / a.len().max(1) as f64;
	let recall = matched as f64 / b.len().max(1) as f64;

	if precision + recall == 0.0 {
		return 0.0;
	}

	2.0 * precision * recall / (precision + recall)
}

/// Convex combination `alpha * semantic + (1 - alpha) * rouge`.
pub fn combined_score(a: &str, b: &str, alpha: f64) -> CombinedScore {
	let semantic = semantic_score(a, b);
	let rouge = rouge_l_f1(a, b);

	CombinedScore { combined: alpha * semantic + (1.0 - alpha) * rouge, semantic, rouge }
}

/// Matching blocks in ascending order, with adjacent runs merged. No sentinel block is appended.
pub fn matching_blocks(a: &str, b: &str) -> Vec<MatchingBlock> {
	let a = chars(a);
	let b = chars(b);

	Matcher::new(&a, &b).blocks()
}

fn chars(text: &str) -> Vec<char> {
	text.chars().collect()
}

fn matched_len(a: &[char], b: &[char]) -> usize {
	Matcher::new(a, b).blocks().iter().map(|block| block.size).sum()
}

struct Matcher<'a> {
	a: &'a [char],
	b: &'a [char],
	b2j: HashMap<char, Vec<usize>>,
}
impl<'a> Matcher<'a> {
	fn new(a: &'a [char], b: &'a [char]) -> Self {
		let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();

		for (j, ch) in b.iter().enumerate() {
			b2j.entry(*ch).or_default().push(j);
		}

		if b.len() >= AUTOJUNK_MIN_LEN {
			let limit = b.len() / 100 + 1;

			b2j.retain(|_, positions| positions.len() <= limit);
		}

		Self { a, b, b2j }
	}

	fn blocks(&self) -> Vec<MatchingBlock> {
		let mut pending = vec![(0, self.a.len(), 0, self.b.len())];
		let mut found = Vec::new();

		while let Some((alo, ahi, blo, bhi)) = pending.pop() {
			let block = self.longest_match(alo, ahi, blo, bhi);

			if block.size == 0 {
				continue;
			}
			if alo < block.a && blo < block.b {
				pending.push((alo, block.a, blo, block.b));
			}
			if block.a + block.size < ahi && block.b + block.size < bhi {
				pending.push((block.a + block.size, ahi, block.b + block.size, bhi));
			}

			found.push(block);
		}

		found.sort_by_key(|block| (block.a, block.b));

		let mut merged: Vec<MatchingBlock> = Vec::with_capacity(found.len());

		for block in found {
			match merged.last_mut() {
				Some(last) if last.a + last.size == block.a && last.b + last.size == block.b =>
					last.size += block.size,
				_ => merged.push(block),
			}
		}

		merged
	}

	fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchingBlock {
		let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
		let mut run_ending_at: HashMap<usize, usize> = HashMap::new();

		for i in alo..ahi {
			let mut next_runs = HashMap::new();

			if let Some(positions) = self.b2j.get(&self.a[i]) {
				for &j in positions {
					if j < blo {
						continue;
					}
					if j >= bhi {
						break;
					}

					let run = j
						.checked_sub(1)
						.and_then(|prev| run_ending_at.get(&prev))
						.copied()
						.unwrap_or(0) + 1;

					next_runs.insert(j, run);

					if run > best_size {
						best_i = i + 1 - run;
						best_j = j + 1 - run;
						best_size = run;
					}
				}
			}

			run_ending_at = next_runs;
		}

		// Anchors skip frequent characters; grow the run through them on both sides.
		while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
			best_i -= 1;
			best_j -= 1;
			best_size += 1;
		}
		while best_i + best_size < ahi
			&& best_j + best_size < bhi
			&& self.a[best_i + best_size] == self.b[best_j + best_size]
		{
			best_size += 1;
		}

		MatchingBlock { a: best_i, b: best_j, size: best_size }
	}
}
