//! core::fuzzy
//!
//! Approximate substring matching with a bounded distance score.
//!
//! # Scoring
//!
//! A pattern is searched in a text with the bitap algorithm, allowing up to
//! `len(pattern)` errors. Each candidate match is scored as
//!
//! ```text
//! errors / len(pattern) + |location - expected| / distance
//! ```
//!
//! where 0.0 is an exact match at the expected location and 1.0 or more is
//! "anything". A candidate is accepted only while its score stays at or
//! under the threshold. Matching is case-insensitive.
//!
//! Patterns longer than [`MAX_BITS`] are split into chunks that are searched
//! independently; the result matches if any chunk matches and the score is
//! the mean over chunks.
//!
//! # Example
//!
//! ```
//! use shopify_partner::core::fuzzy::{BitapMatcher, MatchOptions};
//!
//! let matcher = BitapMatcher::new("acme", MatchOptions::default());
//!
//! let exact = matcher.search("acme").unwrap();
//! assert_eq!(exact, 0.0);
//!
//! let typo = matcher.search("acne co").unwrap();
//! assert!(typo > 0.0 && typo <= 0.4);
//!
//! assert!(matcher.search("beta shop").is_none());
//! ```

use std::collections::HashMap;

/// Longest pattern searched in a single bitap pass.
pub const MAX_BITS: usize = 32;

/// Smallest score reported for a non-exact match.
const MIN_SCORE: f64 = 0.001;

/// Tuning knobs for [`BitapMatcher`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    /// Where in the text a match is expected to start.
    pub location: usize,
    /// How far from `location` a match may drift before it scores 1.0.
    pub distance: usize,
    /// Highest acceptable score (0.0 exact, 1.0 anything).
    pub threshold: f64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            location: 0,
            distance: 100,
            threshold: 0.4,
        }
    }
}

/// One pattern chunk and its character bitmasks.
#[derive(Debug, Clone)]
struct Chunk {
    pattern: Vec<char>,
    alphabet: HashMap<char, u64>,
    start: usize,
}

impl Chunk {
    fn new(pattern: Vec<char>, start: usize) -> Self {
        let len = pattern.len();
        let mut alphabet = HashMap::new();
        for (i, c) in pattern.iter().enumerate() {
            *alphabet.entry(*c).or_insert(0u64) |= 1u64 << (len - i - 1);
        }
        Self {
            pattern,
            alphabet,
            start,
        }
    }
}

/// A compiled, case-insensitive fuzzy pattern.
#[derive(Debug, Clone)]
pub struct BitapMatcher {
    pattern: Vec<char>,
    chunks: Vec<Chunk>,
    options: MatchOptions,
}

impl BitapMatcher {
    /// Compile `pattern` for repeated searches.
    pub fn new(pattern: &str, options: MatchOptions) -> Self {
        let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
        let len = pattern.len();

        let mut chunks = Vec::new();
        if len <= MAX_BITS {
            chunks.push(Chunk::new(pattern.clone(), 0));
        } else {
            let remainder = len % MAX_BITS;
            let end = len - remainder;
            let mut i = 0;
            while i < end {
                chunks.push(Chunk::new(pattern[i..i + MAX_BITS].to_vec(), i));
                i += MAX_BITS;
            }
            if remainder > 0 {
                let start = len - MAX_BITS;
                chunks.push(Chunk::new(pattern[start..].to_vec(), start));
            }
        }

        Self {
            pattern,
            chunks,
            options,
        }
    }

    /// Search `text`, returning the match score if it is within threshold.
    pub fn search(&self, text: &str) -> Option<f64> {
        if self.pattern.is_empty() {
            return None;
        }

        let text: Vec<char> = text.to_lowercase().chars().collect();
        if text == self.pattern {
            return Some(0.0);
        }

        let mut matched = false;
        let mut total = 0.0;
        for chunk in &self.chunks {
            let location = self.options.location + chunk.start;
            let (is_match, score) = search_chunk(&text, chunk, location, &self.options);
            matched |= is_match;
            total += score;
        }

        matched.then(|| total / self.chunks.len() as f64)
    }
}

fn compute_score(
    pattern_len: usize,
    errors: usize,
    current: usize,
    expected: usize,
    distance: usize,
) -> f64 {
    let accuracy = errors as f64 / pattern_len as f64;
    let proximity = current.abs_diff(expected);

    if distance == 0 {
        return if proximity > 0 { 1.0 } else { accuracy };
    }

    accuracy + proximity as f64 / distance as f64
}

/// Run bitap for one chunk. Returns whether it matched and its score.
fn search_chunk(text: &[char], chunk: &Chunk, location: usize, options: &MatchOptions) -> (bool, f64) {
    let pattern = &chunk.pattern;
    let pattern_len = pattern.len();
    let text_len = text.len();
    let expected = location.min(text_len);
    let distance = options.distance;

    let mut threshold = options.threshold;
    let mut best_location: Option<usize> = None;

    // Exact occurrences tighten the threshold before the fuzzy pass.
    let mut from = expected;
    while let Some(index) = find(text, pattern, from) {
        let score = compute_score(pattern_len, 0, index, expected, distance);
        threshold = threshold.min(score);
        from = index + pattern_len;
    }

    let mask = 1u64 << (pattern_len - 1);
    let mut bin_max = pattern_len + text_len;
    let mut last_bits: Vec<u64> = Vec::new();
    let mut final_score = 1.0;

    for errors in 0..pattern_len {
        // Binary search for how far from `expected` this error level can reach.
        let mut bin_min = 0;
        let mut bin_mid = bin_max;
        while bin_min < bin_mid {
            let score = compute_score(pattern_len, errors, expected + bin_mid, expected, distance);
            if score <= threshold {
                bin_min = bin_mid;
            } else {
                bin_max = bin_mid;
            }
            bin_mid = (bin_max - bin_min) / 2 + bin_min;
        }
        bin_max = bin_mid;

        let mut start = (expected + 1).saturating_sub(bin_mid).max(1);
        let finish = (expected + bin_mid).min(text_len) + pattern_len;

        let mut bits = vec![0u64; finish + 2];
        bits[finish + 1] = (1u64 << errors) - 1;

        let mut j = finish;
        while j >= start {
            let current = j - 1;
            let char_match = text
                .get(current)
                .and_then(|c| chunk.alphabet.get(c))
                .copied()
                .unwrap_or(0);

            bits[j] = ((bits[j + 1] << 1) | 1) & char_match;

            if errors > 0 {
                let prev_next = last_bits.get(j + 1).copied().unwrap_or(0);
                let prev = last_bits.get(j).copied().unwrap_or(0);
                bits[j] |= ((prev_next | prev) << 1) | 1 | prev_next;
            }

            if bits[j] & mask != 0 {
                final_score = compute_score(pattern_len, errors, current, expected, distance);

                if final_score <= threshold {
                    threshold = final_score;
                    best_location = Some(current);

                    if current <= expected {
                        break;
                    }

                    start = (2 * expected).saturating_sub(current).max(1);
                }
            }

            j -= 1;
        }

        let next_level = compute_score(pattern_len, errors + 1, expected, expected, distance);
        if next_level > threshold {
            break;
        }

        last_bits = bits;
    }

    (best_location.is_some(), final_score.max(MIN_SCORE))
}

fn find(text: &[char], pattern: &[char], from: usize) -> Option<usize> {
    if pattern.len() > text.len() {
        return None;
    }
    (from..=text.len() - pattern.len()).find(|&i| text[i..i + pattern.len()] == *pattern)
}

/// Score applied to a token count so longer values weigh less.
///
/// `1 / sqrt(tokens)`, rounded to three decimals. Tokens are runs of
/// non-space characters.
pub fn field_norm(value: &str) -> f64 {
    let tokens = value.split(' ').filter(|t| !t.is_empty()).count().max(1);
    let norm = 1.0 / (tokens as f64).sqrt();
    (norm * 1000.0).round() / 1000.0
}
