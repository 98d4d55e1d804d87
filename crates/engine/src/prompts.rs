//! Bot prompt texts per language

use kiosk_dialog_core::Language;

/// Ask the user to confirm the best free-text candidate
pub fn confirm_question(language: Language, choice_text: &str) -> String {
    match language {
        Language::Ja => format!("「{choice_text}」についてのご質問でしょうか？"),
        Language::En => format!("Are you asking about \"{choice_text}\"?"),
    }
}

/// Offer the top ranked alternatives
pub fn alternatives(language: Language, texts: &[String]) -> String {
    let listing = texts
        .iter()
        .map(|t| format!("・{t}"))
        .collect::<Vec<_>>()
        .join("\n");

    match language {
        Language::Ja => format!(
            "以下のいずれかでしょうか？\n\n{listing}\n\n該当するものをお選びください。"
        ),
        Language::En => format!(
            "Did you mean one of these?\n\n{listing}\n\nPlease select the appropriate option."
        ),
    }
}

/// Generic reprompt when nothing matched
pub fn fallback(language: Language) -> &'static str {
    match language {
        Language::Ja => {
            "すみません、よく聞き取れませんでした。選択肢からお選びいただくか、もう一度お聞かせください。"
        },
        Language::En => "Sorry, I didn't understand. Please select from the options or try again.",
    }
}

/// Apology after the user declines a pending confirmation
pub fn apology(language: Language) -> &'static str {
    match language {
        Language::Ja => "失礼いたしました。改めてご用件をお聞かせください。",
        Language::En => "I apologize. Please let me know how I can help you.",
    }
}

/// Reprompt while a pending confirmation awaits a yes/no
pub fn yes_no_reprompt(language: Language) -> &'static str {
    match language {
        Language::Ja => "恐れ入ります、「はい」か「いいえ」でお答えください。",
        Language::En => "Sorry, please answer yes or no.",
    }
}

/// User-visible label for an affirmative answer
pub fn yes_label(language: Language) -> &'static str {
    match language {
        Language::Ja => "はい",
        Language::En => "Yes",
    }
}

/// User-visible label for a negative answer
pub fn no_label(language: Language) -> &'static str {
    match language {
        Language::Ja => "いいえ",
        Language::En => "No",
    }
}

/// Words accepted as "yes" while a confirmation is pending (normalized form)
const AFFIRMATIVES: &[&str] = &[
    "はい", "ええ", "うん", "そうです", "そう", "おねがいします", "yes", "yeah", "yep", "ok",
    "okay", "sure", "correct",
];

/// Words accepted as "no" while a confirmation is pending (normalized form)
const NEGATIVES: &[&str] = &[
    "いいえ", "いや", "ちがう", "ちがいます", "やめる", "だめ", "no", "nope", "cancel", "wrong",
];

/// Whether a normalized utterance is an affirmative answer
pub fn is_affirmative(normalized: &str) -> bool {
    AFFIRMATIVES.contains(&normalized)
}

/// Whether a normalized utterance is a negative answer
pub fn is_negative(normalized: &str) -> bool {
    NEGATIVES.contains(&normalized)
}
