//! Built-in sample banking flow
//!
//! A complete ja/en ATM-style flow used by tests and demo hosts when no
//! deployed flow file is available. Node ids here (`transaction_type`,
//! `staff_assistance_amount`, `end`) are the defaults the engine is
//! configured with.

use kiosk_dialog_core::Language;

use crate::flow::{ChatFlow, LanguageFlow};
use crate::node::{Choice, Node, NodeKind};

fn message(id: &str, content: &str, next: Option<&str>) -> Node {
    Node {
        id: id.to_string(),
        content: content.to_string(),
        reading: None,
        voice_file: Some(id.to_string()),
        kind: NodeKind::Message {
            next: next.map(str::to_string),
        },
    }
}

fn choice_node(id: &str, content: &str, choices: Vec<Choice>) -> Node {
    Node {
        id: id.to_string(),
        content: content.to_string(),
        reading: None,
        voice_file: Some(id.to_string()),
        kind: NodeKind::Choice { choices },
    }
}

fn input(id: &str, content: &str, field: &str, label: &str, next: &str) -> Node {
    Node {
        id: id.to_string(),
        content: content.to_string(),
        reading: None,
        voice_file: None,
        kind: NodeKind::Input {
            field: Some(field.to_string()),
            label: Some(label.to_string()),
            next: Some(next.to_string()),
        },
    }
}

fn confirmation(id: &str, content: &str, field: &str, label: &str, next: &str) -> Node {
    Node {
        id: id.to_string(),
        content: content.to_string(),
        reading: None,
        voice_file: None,
        kind: NodeKind::Confirmation {
            field: Some(field.to_string()),
            label: Some(label.to_string()),
            next: Some(next.to_string()),
        },
    }
}

fn japanese_nodes() -> Vec<Node> {
    vec![
        message(
            "start",
            "いらっしゃいませ。こちらの画面でお手続きをご案内いたします。",
            Some("transaction_type"),
        ),
        choice_node(
            "transaction_type",
            "ご希望のお取引をお選びください。",
            vec![
                Choice::new("deposit", "預け入れ", "deposit_amount")
                    .with_keywords(["預け入れ", "入金", "預ける", "あずける", "にゅうきん"])
                    .with_exclude_keywords(["引き出し", "出金"]),
                Choice::new("withdrawal", "引き出し", "withdrawal_amount")
                    .with_keywords(["引き出し", "出金", "おろす", "ひきだし"])
                    .with_exclude_keywords(["預け入れ", "入金"]),
                Choice::new("transfer", "振り込み", "transfer_notice")
                    .with_keywords(["振り込み", "送金", "ふりこみ"]),
            ],
        ),
        input(
            "deposit_amount",
            "お預け入れ金額を入力してください。",
            "depositAmount",
            "金額（円）",
            "deposit_confirm",
        ),
        confirmation(
            "deposit_confirm",
            "こちらの金額でよろしいですか？",
            "depositAmount",
            "お預け入れ金額",
            "deposit_complete",
        ),
        message("deposit_complete", "お預け入れを受け付けました。", Some("final")),
        input(
            "withdrawal_amount",
            "お引き出し金額を入力してください。",
            "withdrawalAmount",
            "金額（円）",
            "withdrawal_confirm",
        ),
        confirmation(
            "withdrawal_confirm",
            "こちらの金額でよろしいですか？",
            "withdrawalAmount",
            "お引き出し金額",
            "withdrawal_complete",
        ),
        message("withdrawal_complete", "お引き出しを受け付けました。", Some("final")),
        message(
            "transfer_notice",
            "お振り込みは窓口でのお手続きとなります。番号札をお取りになってお待ちください。",
            Some("final"),
        ),
        message(
            "staff_assistance_amount",
            "恐れ入りますが、200,000円を超えるお取引は係員がご案内いたします。お近くの係員にお声がけください。",
            None,
        ),
        choice_node(
            "final",
            "他にご用件はございますか？",
            vec![
                Choice::new("restart", "最初に戻る", "transaction_type")
                    .with_keywords(["最初", "戻る", "もう一度"]),
                Choice::new("finish", "終了する", "thank_you")
                    .with_keywords(["終了", "おわり", "ない"]),
            ],
        ),
        message("thank_you", "ご利用ありがとうございました。", None),
        message("end", "お手続きは以上です。ありがとうございました。", None),
    ]
}

fn english_nodes() -> Vec<Node> {
    vec![
        message(
            "start",
            "Welcome. This screen will guide you through your transaction.",
            Some("transaction_type"),
        ),
        choice_node(
            "transaction_type",
            "Please select a transaction.",
            vec![
                Choice::new("deposit", "Deposit", "deposit_amount")
                    .with_keywords(["deposit", "put in", "pay in"])
                    .with_exclude_keywords(["withdraw"]),
                Choice::new("withdrawal", "Withdrawal", "withdrawal_amount")
                    .with_keywords(["withdraw", "withdrawal", "take out"])
                    .with_exclude_keywords(["deposit"]),
                Choice::new("transfer", "Transfer", "transfer_notice")
                    .with_keywords(["transfer", "send money", "wire"]),
            ],
        ),
        input(
            "deposit_amount",
            "Please enter the amount to deposit.",
            "depositAmount",
            "Amount (yen)",
            "deposit_confirm",
        ),
        confirmation(
            "deposit_confirm",
            "Is this amount correct?",
            "depositAmount",
            "Deposit amount",
            "deposit_complete",
        ),
        message("deposit_complete", "Your deposit has been accepted.", Some("final")),
        input(
            "withdrawal_amount",
            "Please enter the amount to withdraw.",
            "withdrawalAmount",
            "Amount (yen)",
            "withdrawal_confirm",
        ),
        confirmation(
            "withdrawal_confirm",
            "Is this amount correct?",
            "withdrawalAmount",
            "Withdrawal amount",
            "withdrawal_complete",
        ),
        message("withdrawal_complete", "Your withdrawal has been accepted.", Some("final")),
        message(
            "transfer_notice",
            "Transfers are handled at the counter. Please take a ticket and wait to be called.",
            Some("final"),
        ),
        message(
            "staff_assistance_amount",
            "Transactions over 200,000 yen are handled by our staff. Please ask a staff member nearby.",
            None,
        ),
        choice_node(
            "final",
            "Is there anything else we can help you with?",
            vec![
                Choice::new("restart", "Start over", "transaction_type")
                    .with_keywords(["start over", "again", "back"]),
                Choice::new("finish", "Finish", "thank_you")
                    .with_keywords(["finish", "done", "no"]),
            ],
        ),
        message("thank_you", "Thank you for using our service.", None),
        message("end", "That completes your transaction. Thank you.", None),
    ]
}

/// The sample flow with both language catalogs
pub fn sample_flow() -> ChatFlow {
    ChatFlow {
        version: "1.0".to_string(),
        store_name: "サンプル支店".to_string(),
        languages: [
            (Language::Ja, LanguageFlow::from_nodes(japanese_nodes())),
            (Language::En, LanguageFlow::from_nodes(english_nodes())),
        ]
        .into_iter()
        .collect(),
    }
}
