//! Choice scoring

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use kiosk_dialog_flow::Choice;

use crate::normalize::normalize;
use crate::variants::voice_variants;

/// Quantity-shaped keywords: digits (either width) or kanji numerals,
/// optionally suffixed with a counter
static NUMERAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9一二三四五六七八九十１２３４５６７８９０]+(番|ばん)?$")
        .expect("numeral pattern is valid")
});

/// Which signal produced the winning confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Utterance equals the display text after normalization
    Exact,
    /// Keyword containment
    Keyword,
    /// Substring containment against the display text
    Partial,
    /// Edit-distance or grapheme-set similarity
    Similarity,
}

/// A scored candidate for one choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// The choice that was scored
    pub choice: Choice,
    /// Confidence in [0, 1]
    pub confidence: f32,
    /// Keywords (or display text) that contributed
    pub matched_keywords: Vec<String>,
    /// Winning signal
    pub match_type: MatchType,
}

/// Matcher thresholds and signal toggles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// At or above this confidence the engine transitions directly
    #[serde(default = "default_high_confidence")]
    pub high_confidence_threshold: f32,
    /// At or above this confidence the engine asks for confirmation
    #[serde(default = "default_medium_confidence")]
    pub medium_confidence_threshold: f32,
    /// Evaluate edit-distance similarity below 0.7 confidence
    #[serde(default = "default_true")]
    pub enable_fuzzy_matching: bool,
    /// Evaluate grapheme-set similarity below 0.5 confidence
    #[serde(default = "default_true")]
    pub enable_similarity_matching: bool,
}

fn default_high_confidence() -> f32 {
    0.8
}

fn default_medium_confidence() -> f32 {
    0.5
}

fn default_true() -> bool {
    true
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            high_confidence_threshold: default_high_confidence(),
            medium_confidence_threshold: default_medium_confidence(),
            enable_fuzzy_matching: true,
            enable_similarity_matching: true,
        }
    }
}

/// Scores utterances against a node's choices
#[derive(Debug, Clone, Default)]
pub struct IntentMatcher {
    config: MatcherConfig,
}

impl IntentMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Score one utterance against one choice
    pub fn score(&self, utterance: &str, choice: &Choice) -> MatchResult {
        let input = normalize(utterance);
        let choice_text = normalize(&choice.text);

        // Exact equality short-circuits everything else.
        if input == choice_text {
            return MatchResult {
                choice: choice.clone(),
                confidence: 1.0,
                matched_keywords: vec![choice.text.clone()],
                match_type: MatchType::Exact,
            };
        }

        let mut confidence: f32 = 0.0;
        let mut matched_keywords: Vec<String> = Vec::new();
        let mut match_type = MatchType::Partial;

        // Bidirectional containment against the display text.
        if input.contains(&choice_text) || choice_text.contains(&input) {
            confidence = confidence.max(0.9);
            matched_keywords.push(choice.text.clone());
        }

        // Keyword containment.
        if !choice.keywords.is_empty() {
            let (keyword_confidence, keywords_hit) = score_keywords(&input, &choice.keywords);
            if keyword_confidence > confidence {
                confidence = keyword_confidence;
                matched_keywords = keywords_hit;
                match_type = MatchType::Keyword;
            }
        }

        // Exclude keywords damp the score hard but do not veto: an
        // overwhelming positive signal can still clear the medium threshold.
        let excluded = choice
            .exclude_keywords
            .iter()
            .map(|k| normalize(k))
            .any(|k| !k.is_empty() && input.contains(&k));
        if excluded {
            confidence *= 0.1;
        }

        // Edit-distance similarity, only worth consulting when the lexical
        // signals were weak.
        if self.config.enable_fuzzy_matching && confidence < 0.7 {
            let fuzzy = fuzzy_similarity(&input, &choice_text);
            if fuzzy > confidence {
                confidence = fuzzy;
                match_type = MatchType::Similarity;
            }
        }

        // Grapheme-set similarity as a last resort.
        if self.config.enable_similarity_matching && confidence < 0.5 {
            let similarity = grapheme_jaccard(&input, &choice_text);
            if similarity > confidence {
                confidence = similarity;
                match_type = MatchType::Similarity;
            }
        }

        MatchResult {
            choice: choice.clone(),
            confidence: confidence.clamp(0.0, 1.0),
            matched_keywords,
            match_type,
        }
    }

    /// Score all choices, dropping zero scores, strongest first
    ///
    /// The sort is stable, so equal confidences keep catalog order.
    pub fn find_best_matches(&self, utterance: &str, choices: &[Choice]) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = choices
            .iter()
            .map(|choice| self.score(utterance, choice))
            .filter(|result| result.confidence > 0.0)
            .collect();

        results.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        results
    }

    /// The strongest candidate, if anything scored above zero
    pub fn get_best_match(&self, utterance: &str, choices: &[Choice]) -> Option<MatchResult> {
        self.find_best_matches(utterance, choices).into_iter().next()
    }
}

/// Whether a keyword is quantity-shaped
fn is_numeral_keyword(normalized_keyword: &str) -> bool {
    NUMERAL_PATTERN.is_match(normalized_keyword)
}

/// Accumulate keyword points and normalize to a confidence
///
/// Numeral keywords score 15 for a whole-utterance match and 12 for
/// containment; plain keywords 10 / 7 (3+ characters) / 3. A voice variant
/// is consulted only when the keyword itself missed, scores 10 (numeral) or
/// 5, and counts once per keyword. The ceiling is 15 when any keyword is
/// numeral-shaped, else 10.
fn score_keywords(input: &str, keywords: &[String]) -> (f32, Vec<String>) {
    let mut total: f32 = 0.0;
    let mut matched: Vec<String> = Vec::new();

    for keyword in keywords {
        let normalized = normalize(keyword);
        if normalized.is_empty() {
            continue;
        }

        let numeral = is_numeral_keyword(&normalized);

        if input.contains(&normalized) {
            matched.push(keyword.clone());
            total += if numeral {
                if input == normalized {
                    15.0
                } else {
                    12.0
                }
            } else if input == normalized {
                10.0
            } else if normalized.chars().count() >= 3 {
                7.0
            } else {
                3.0
            };
            continue;
        }

        for variant in voice_variants(&normalized) {
            if input.contains(variant) {
                matched.push(keyword.clone());
                total += if numeral { 10.0 } else { 5.0 };
                break;
            }
        }
    }

    let ceiling = if keywords
        .iter()
        .any(|k| is_numeral_keyword(&normalize(k)))
    {
        15.0
    } else {
        10.0
    };

    ((total / ceiling).min(1.0), matched)
}

/// Edit-distance similarity with a flat bias against cheap generic scores
fn fuzzy_similarity(a: &str, b: &str) -> f32 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let similarity = 1.0 - levenshtein(a, b) as f32 / max_len as f32;
    (similarity - 0.3).max(0.0)
}

/// Levenshtein distance over characters, two-row DP
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=a.len()).collect();
    let mut current = vec![0usize; a.len() + 1];

    for (j, bc) in b.iter().enumerate() {
        current[0] = j + 1;
        for (i, ac) in a.iter().enumerate() {
            let substitution = previous[i] + usize::from(ac != bc);
            current[i + 1] = substitution
                .min(previous[i + 1] + 1)
                .min(current[i] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[a.len()]
}

/// Jaccard coefficient over the grapheme sets of both strings
fn grapheme_jaccard(a: &str, b: &str) -> f32 {
    let set_a: HashSet<&str> = a.graphemes(true).collect();
    let set_b: HashSet<&str> = b.graphemes(true).collect();

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }

    set_a.intersection(&set_b).count() as f32 / union as f32
}
