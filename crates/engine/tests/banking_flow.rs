//! End-to-end walk of the sample banking flow

use std::sync::Arc;
use std::time::Duration;

use kiosk_dialog_core::{Language, MessageRole};
use kiosk_dialog_engine::{DialogEngine, EngineConfig, EngineCondition, EngineEvent};
use kiosk_dialog_flow::sample::sample_flow;

fn engine_for(language: Language) -> Arc<DialogEngine> {
    let flow = sample_flow()
        .languages
        .remove(&language)
        .expect("sample flow has the language");
    let config = EngineConfig {
        response_delay_ms: 0,
        ..EngineConfig::default()
    };
    DialogEngine::new(Arc::new(flow), language, config)
}

async fn let_dwell_elapse() {
    tokio::time::sleep(Duration::from_millis(2_100)).await;
    tokio::task::yield_now().await;
}

#[tokio::test(start_paused = true)]
async fn deposit_journey_by_taps() {
    let engine = engine_for(Language::Ja);
    engine.start();

    // Greeting, then auto-advance to the transaction menu.
    let_dwell_elapse().await;
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.node.as_ref().unwrap().id, "transaction_type");
    assert_eq!(snapshot.choices.len(), 3);

    engine.select_choice("deposit").unwrap();
    engine.submit_input("50000").unwrap();

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.node.as_ref().unwrap().id, "deposit_confirm");
    assert_eq!(snapshot.review_value.as_deref(), Some("50000"));

    engine.submit_confirmation(true).unwrap();
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.node.as_ref().unwrap().id, "deposit_complete");

    // Completion message dwells, then lands on the final menu.
    let_dwell_elapse().await;
    assert_eq!(engine.snapshot().node.unwrap().id, "final");
}

#[tokio::test(start_paused = true)]
async fn spoken_journey_with_confirmation_and_backtrack() {
    let engine = engine_for(Language::En);
    engine.start();
    let_dwell_elapse().await;

    // Medium-confidence utterance: the engine asks before acting.
    engine
        .submit_text("I'd like to put in some money")
        .await
        .unwrap();
    let snapshot = engine.snapshot();
    assert!(snapshot.pending_confirmation.is_some());
    assert_eq!(snapshot.node.as_ref().unwrap().id, "transaction_type");

    engine.resolve_pending_confirmation(true).unwrap();
    assert_eq!(engine.snapshot().node.unwrap().id, "deposit_amount");

    engine.submit_input("120000").unwrap();
    assert_eq!(engine.snapshot().node.unwrap().id, "deposit_confirm");

    // Changing their mind returns to transaction selection, not to the
    // confirmation's declared successor.
    engine.submit_confirmation(false).unwrap();
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.node.as_ref().unwrap().id, "transaction_type");

    // The collected value survives the backtrack until overwritten.
    assert_eq!(
        snapshot.field_values.get("depositAmount").map(String::as_str),
        Some("120000")
    );
}

#[tokio::test(start_paused = true)]
async fn over_ceiling_amount_is_escorted_to_staff() {
    let engine = engine_for(Language::Ja);
    engine.start();
    let_dwell_elapse().await;

    engine.select_choice("withdrawal").unwrap();
    assert_eq!(engine.snapshot().node.unwrap().id, "withdrawal_amount");

    engine.submit_input("300000").unwrap();

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.node.as_ref().unwrap().id, "staff_assistance_amount");
    assert!(snapshot.field_values.is_empty());

    // The staff message has no successor; nothing advances from here.
    let_dwell_elapse().await;
    assert_eq!(
        engine.snapshot().node.unwrap().id,
        "staff_assistance_amount"
    );
}

#[tokio::test(start_paused = true)]
async fn unmatched_utterance_reprompts_in_place() {
    let engine = engine_for(Language::En);
    engine.start();
    let_dwell_elapse().await;

    engine.submit_text("qqqq zzzz xxxx").await.unwrap();

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.node.as_ref().unwrap().id, "transaction_type");
    assert_eq!(snapshot.condition, EngineCondition::Ready);

    let last_bot = snapshot
        .history
        .iter()
        .rev()
        .find(|m| m.role == MessageRole::Bot)
        .unwrap();
    assert!(last_bot.content.contains("didn't understand"));
}

#[tokio::test(start_paused = true)]
async fn restart_choice_loops_back_to_the_menu() {
    let engine = engine_for(Language::Ja);
    engine.start();
    let_dwell_elapse().await;

    engine.select_choice("transfer").unwrap();
    assert_eq!(engine.snapshot().node.unwrap().id, "transfer_notice");
    let_dwell_elapse().await;
    assert_eq!(engine.snapshot().node.unwrap().id, "final");

    // Cycles in the graph are ordinary edges.
    engine.select_choice("restart").unwrap();
    assert_eq!(engine.snapshot().node.unwrap().id, "transaction_type");
}

#[tokio::test(start_paused = true)]
async fn every_bot_entry_is_announced_for_voice_output() {
    let engine = engine_for(Language::Ja);
    let mut events = engine.subscribe();
    engine.start();
    let_dwell_elapse().await;
    engine.select_choice("deposit").unwrap();

    let mut announced = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let EngineEvent::BotUtterance { message_id, .. } = event {
            announced.push(message_id);
        }
    }

    let snapshot = engine.snapshot();
    let bot_ids: Vec<_> = snapshot
        .history
        .iter()
        .filter(|m| m.role == MessageRole::Bot)
        .map(|m| m.id)
        .collect();
    assert_eq!(announced, bot_ids);

    // The host acknowledges playback per entry.
    for id in bot_ids {
        engine.mark_spoken(id);
    }
    assert!(engine
        .snapshot()
        .history
        .iter()
        .filter(|m| m.role == MessageRole::Bot)
        .all(|m| m.has_been_spoken));
}
