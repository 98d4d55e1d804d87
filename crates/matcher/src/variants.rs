//! Voice misrecognition variants
//!
//! Recognizers frequently return alternate phonetic spellings for digits and
//! clip or blur a handful of common banking words. Each table maps a
//! normalized keyword to the strings a recognizer is known to produce for
//! it. Variant hits score lower than direct keyword hits and are counted at
//! most once per keyword.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Phonetic readings per digit
static NUMBER_READINGS: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    HashMap::from([
        ("1", &["いち", "ひとつ", "わん"][..]),
        ("2", &["に", "ふたつ", "つー"][..]),
        ("3", &["さん", "みっつ", "すりー"][..]),
        ("4", &["よん", "し", "よっつ", "ふぉー"][..]),
        ("5", &["ご", "いつつ", "ふぁいぶ"][..]),
        ("6", &["ろく", "むっつ", "しっくす"][..]),
        ("7", &["なな", "しち", "ななつ", "せぶん"][..]),
        ("8", &["はち", "やっつ", "えいと"][..]),
        ("9", &["きゅう", "く", "ここのつ", "ないん"][..]),
    ])
});

/// Known misrecognitions of banking vocabulary
static MISRECOGNITIONS: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    HashMap::from([
        ("よにゅう", &["にゅうきん", "よきん"][..]),
        ("ひきだし", &["ひきだ", "だし"][..]),
        ("ふりこみ", &["ふりく", "りこみ"][..]),
        ("みずほ", &["みず", "ほう"][..]),
        ("mitsubishi", &["みつび", "つびし"][..]),
    ])
});

/// Variant spellings a recognizer may produce for a normalized keyword
pub fn voice_variants(keyword: &str) -> Vec<&'static str> {
    let mut variants = Vec::new();
    if let Some(readings) = NUMBER_READINGS.get(keyword) {
        variants.extend_from_slice(readings);
    }
    if let Some(heard) = MISRECOGNITIONS.get(keyword) {
        variants.extend_from_slice(heard);
    }
    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_have_readings() {
        assert!(voice_variants("1").contains(&"いち"));
        assert!(voice_variants("9").contains(&"ないん"));
    }

    #[test]
    fn known_misrecognitions_resolve() {
        assert!(voice_variants("ひきだし").contains(&"だし"));
    }

    #[test]
    fn unknown_keywords_have_no_variants() {
        assert!(voice_variants("預け入れ").is_empty());
        assert!(voice_variants("10").is_empty());
    }
}
