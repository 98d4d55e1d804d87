//! Utterance and keyword normalization
//!
//! Applied to both sides before any comparison: lowercase, katakana folded
//! to hiragana, full-width alphanumerics folded to half-width, and all
//! whitespace removed. Speech recognizers disagree on script and spacing for
//! the same audio; comparisons happen in this folded space.

/// Normalize text for matching
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(fold_char)
        .collect()
}

/// Fold a single character into the comparison space
fn fold_char(c: char) -> char {
    match c {
        // Katakana ァ..ヶ sits 0x60 above the matching hiragana block
        'ァ'..='ヶ' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
        // Full-width alphanumerics sit 0xFEE0 above ASCII
        'ａ'..='ｚ' | 'Ａ'..='Ｚ' | '０'..='９' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_whitespace() {
        assert_eq!(normalize("  Put In  "), "putin");
        assert_eq!(normalize("Put\tIn\nMoney"), "putinmoney");
    }

    #[test]
    fn folds_katakana_to_hiragana() {
        assert_eq!(normalize("アズケイレ"), "あずけいれ");
        assert_eq!(normalize("ヒキダシ"), "ひきだし");
    }

    #[test]
    fn folds_full_width_alphanumerics() {
        assert_eq!(normalize("１２３"), "123");
        assert_eq!(normalize("ＡＢＣａｂｃ"), "abcabc");
    }

    #[test]
    fn leaves_kanji_untouched() {
        assert_eq!(normalize("預け入れ"), "預け入れ");
    }
}
