//! The dialog engine
//!
//! Single-threaded, event-driven: every state change originates from an
//! explicit operation, a resolved utterance, or the dwell timer. State is
//! replaced atomically, so a timer that fires after the engine has already
//! moved on detects the stale node id and no-ops.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

use kiosk_dialog_core::{ChatMessage, Language};
use kiosk_dialog_flow::{Choice, LanguageFlow, Node, NodeKind};
use kiosk_dialog_matcher::{normalize, IntentMatcher, ResponseAction, ResponseStrategy};

use crate::config::EngineConfig;
use crate::prompts;
use crate::state::{DialogState, EngineCondition, EngineSnapshot, PendingConfirmation};
use crate::EngineError;

/// Events emitted after state changes
///
/// `BotUtterance` is the "speak this" directive: the text of a freshly
/// appended bot entry plus the voice asset key of the node that produced it,
/// for the host's voice-output adapter.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// A bot history entry was appended
    BotUtterance {
        message_id: Uuid,
        text: String,
        voice_key: Option<String>,
    },
    /// The current node changed
    Transitioned { from: String, to: String },
    /// A free-text match awaits confirmation
    ConfirmationRequested { choice_id: String, choice_text: String },
    /// The current node id is missing from the catalog
    Idle { missing: String },
    /// The session was reset to the start node
    Reset,
}

/// Dwell timer bookkeeping, keyed to the node that scheduled it
struct ScheduledAdvance {
    node_id: String,
    handle: JoinHandle<()>,
}

/// Node-graph dialog engine
///
/// Construct with [`DialogEngine::new`], then call [`start`](Self::start)
/// once the host has subscribed to events. All operations take `&self`; the
/// engine is shared as an `Arc`.
pub struct DialogEngine {
    config: EngineConfig,
    language: Language,
    matcher: IntentMatcher,
    flow: RwLock<Arc<LanguageFlow>>,
    state: RwLock<Arc<DialogState>>,
    auto_advance: Mutex<Option<ScheduledAdvance>>,
    event_tx: broadcast::Sender<EngineEvent>,
    me: Weak<DialogEngine>,
}

impl DialogEngine {
    /// Create an engine positioned on the start node (nothing rendered yet)
    pub fn new(flow: Arc<LanguageFlow>, language: Language, config: EngineConfig) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(64);
        let matcher = IntentMatcher::new(config.matcher.clone());
        let state = DialogState::new(&config.start_node);

        Arc::new_cyclic(|me| Self {
            config,
            language,
            matcher,
            flow: RwLock::new(flow),
            state: RwLock::new(Arc::new(state)),
            auto_advance: Mutex::new(None),
            event_tx,
            me: me.clone(),
        })
    }

    /// Subscribe to engine events
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Catalog language this engine was built for
    pub fn language(&self) -> Language {
        self.language
    }

    /// Render the start node (greeting, first dwell timer)
    pub fn start(&self) {
        self.enter_current_node();
    }

    /// Immutable view of the full state
    pub fn snapshot(&self) -> EngineSnapshot {
        let flow = self.flow.read().clone();
        let state = self.current_state();

        let node = match state.condition {
            EngineCondition::Ready => flow.node(&state.current_node_id).cloned(),
            EngineCondition::Idle { .. } => None,
        };
        let choices = node.as_ref().map(|n| n.choices().to_vec()).unwrap_or_default();
        let review_value = node.as_ref().and_then(|n| match &n.kind {
            NodeKind::Confirmation { .. } => state.field_values.get(n.field_or_id()).cloned(),
            _ => None,
        });

        EngineSnapshot {
            node,
            choices,
            history: state.history.clone(),
            field_values: state.field_values.clone(),
            pending_confirmation: state.pending_confirmation.clone(),
            condition: state.condition.clone(),
            review_value,
        }
    }

    /// Select a choice on the current node by id
    pub fn select_choice(&self, choice_id: &str) -> Result<(), EngineError> {
        let flow = self.flow.read().clone();
        let state = self.current_state();

        let choice = flow
            .node(&state.current_node_id)
            .and_then(|node| node.choice(choice_id))
            .cloned()
            .ok_or_else(|| EngineError::UnknownChoice(choice_id.to_string()))?;

        self.take_choice(&choice);
        Ok(())
    }

    /// Feed a free-text utterance to the current choice node
    ///
    /// While a confirmation is pending the utterance resolves the overlay
    /// instead of being matched against the node's choices. On a node
    /// without choices this is a no-op.
    pub async fn submit_text(&self, text: &str) -> Result<(), EngineError> {
        if self.current_state().pending_confirmation.is_some() {
            return self.resolve_pending_text(text);
        }

        let flow = self.flow.read().clone();
        let state = self.current_state();
        let Some(node) = flow.node(&state.current_node_id).cloned() else {
            return Ok(());
        };
        let choices: Vec<Choice> = node.choices().to_vec();
        if choices.is_empty() {
            tracing::debug!(node = %node.id, "free text ignored: node has no choices");
            return Ok(());
        }

        self.update_state(|s| s.history.push(ChatMessage::user(text)));

        // Optional pause so the reply feels conversational. Keyed to the
        // node that was current when the utterance arrived; if the dialog
        // moved on meanwhile, the reply is stale and dropped.
        if self.config.response_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.response_delay_ms)).await;
            let now = self.current_state();
            if now.current_node_id != node.id || now.pending_confirmation.is_some() {
                tracing::trace!(node = %node.id, "stale utterance reply dropped");
                return Ok(());
            }
        }

        let ranked = self.matcher.find_best_matches(text, &choices);
        let action = ResponseStrategy::determine(ranked.first(), self.matcher.config());
        tracing::debug!(
            node = %node.id,
            candidates = ranked.len(),
            ?action,
            "free text resolved"
        );

        match action {
            ResponseAction::Direct => {
                if let Some(best) = ranked.into_iter().next() {
                    self.take_choice(&best.choice);
                }
            },
            ResponseAction::Confirmation => {
                if let Some(best) = ranked.into_iter().next() {
                    let question = prompts::confirm_question(self.language, &best.choice.text);
                    let _ = self.event_tx.send(EngineEvent::ConfirmationRequested {
                        choice_id: best.choice.id.clone(),
                        choice_text: best.choice.text.clone(),
                    });
                    let pending = PendingConfirmation {
                        choice: best.choice.clone(),
                        match_result: best,
                    };
                    self.update_state(|s| s.pending_confirmation = Some(pending));
                    self.append_bot_text(question);
                }
            },
            ResponseAction::Choices => {
                let texts: Vec<String> = ranked
                    .iter()
                    .take(3)
                    .map(|r| r.choice.text.clone())
                    .collect();
                self.append_bot_text(prompts::alternatives(self.language, &texts));
            },
            ResponseAction::Fallback => {
                self.append_bot_text(prompts::fallback(self.language).to_string());
            },
        }

        Ok(())
    }

    /// Resolve the pending free-text confirmation
    pub fn resolve_pending_confirmation(&self, confirmed: bool) -> Result<(), EngineError> {
        let state = self.current_state();
        let pending = state
            .pending_confirmation
            .clone()
            .ok_or(EngineError::NoPendingConfirmation)?;

        if confirmed {
            self.take_choice(&pending.choice);
        } else {
            self.update_state(|s| s.pending_confirmation = None);
            self.append_bot_text(prompts::apology(self.language).to_string());
        }

        Ok(())
    }

    /// Submit a value for the current input node
    ///
    /// Validation failures leave history and field values untouched. An
    /// amount above the ceiling overrides the node's `next` and routes to
    /// the staff-assistance node.
    pub fn submit_input(&self, value: &str) -> Result<(), EngineError> {
        let flow = self.flow.read().clone();
        let state = self.current_state();
        let Some(node) = flow.node(&state.current_node_id).cloned() else {
            return Ok(());
        };
        let NodeKind::Input { field, next, .. } = &node.kind else {
            tracing::debug!(node = %node.id, "input ignored: not an input node");
            return Ok(());
        };

        let field_name = node.field_or_id().to_string();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(EngineError::EmptyInput { field: field_name });
        }

        let amount_field = field.as_deref().is_some_and(|f| f.contains("Amount"))
            || node.id.contains("amount");
        if amount_field {
            let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
            let amount: u64 = digits
                .parse()
                .map_err(|_| EngineError::InvalidAmount { field: field_name.clone() })?;
            if amount == 0 {
                return Err(EngineError::InvalidAmount { field: field_name });
            }
            if amount > self.config.amount_ceiling {
                tracing::info!(
                    amount,
                    ceiling = self.config.amount_ceiling,
                    "amount above ceiling, routing to staff assistance"
                );
                let entry = ChatMessage::user(value);
                self.update_state(|s| s.history.push(entry));
                self.transition_to(self.config.staff_assistance_node.clone());
                return Ok(());
            }
        }

        let next_id = next.clone().unwrap_or_else(|| self.config.end_node.clone());
        let entry = ChatMessage::user(value);
        let stored = value.to_string();
        self.update_state(|s| {
            s.field_values.insert(field_name, stored);
            s.history.push(entry);
        });
        self.transition_to(next_id);
        Ok(())
    }

    /// Answer the current confirmation node
    ///
    /// A "no" backtracks to the transaction-selection node regardless of the
    /// node's declared `next`.
    pub fn submit_confirmation(&self, confirmed: bool) -> Result<(), EngineError> {
        let flow = self.flow.read().clone();
        let state = self.current_state();
        let Some(node) = flow.node(&state.current_node_id).cloned() else {
            return Ok(());
        };
        let NodeKind::Confirmation { next, .. } = &node.kind else {
            tracing::debug!(node = %node.id, "confirmation ignored: not a confirmation node");
            return Ok(());
        };

        let label = if confirmed {
            prompts::yes_label(self.language)
        } else {
            prompts::no_label(self.language)
        };
        self.update_state(|s| s.history.push(ChatMessage::user(label)));

        if confirmed {
            let next_id = next.clone().unwrap_or_else(|| self.config.end_node.clone());
            self.transition_to(next_id);
        } else {
            self.transition_to(self.config.restart_node.clone());
        }

        Ok(())
    }

    /// Record that a bot entry has been played by the voice adapter
    pub fn mark_spoken(&self, message_id: Uuid) {
        self.update_state(|s| {
            if let Some(message) = s.history.iter_mut().find(|m| m.id == message_id) {
                message.has_been_spoken = true;
            }
        });
    }

    /// Hand the engine a freshly deployed catalog
    ///
    /// If the current node id still exists the dialog continues from it
    /// (rescheduling the dwell timer where applicable); otherwise the engine
    /// idles until reset.
    pub fn swap_flow(&self, flow: Arc<LanguageFlow>) {
        self.cancel_auto_advance();
        *self.flow.write() = flow.clone();

        let state = self.current_state();
        if flow.contains(&state.current_node_id) {
            tracing::debug!(node = %state.current_node_id, "catalog swapped, current node retained");
            if state.condition != EngineCondition::Ready {
                self.update_state(|s| s.condition = EngineCondition::Ready);
            }
            if let Some(node) = flow.node(&state.current_node_id) {
                if let NodeKind::Message { next: Some(_) } = &node.kind {
                    self.schedule_auto_advance(node.id.clone());
                }
            }
        } else {
            let missing = state.current_node_id.clone();
            tracing::warn!(node = %missing, "catalog swapped, current node gone");
            self.update_state(|s| {
                s.condition = EngineCondition::Idle { missing: missing.clone() };
            });
            let _ = self.event_tx.send(EngineEvent::Idle { missing });
        }
    }

    /// Discard the session and return to the start node
    pub fn reset(&self) {
        self.cancel_auto_advance();
        *self.state.write() = Arc::new(DialogState::new(&self.config.start_node));
        let _ = self.event_tx.send(EngineEvent::Reset);
        tracing::debug!("session reset");
        self.enter_current_node();
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn current_state(&self) -> Arc<DialogState> {
        self.state.read().clone()
    }

    /// Clone-modify-swap; readers only ever see complete states
    fn update_state<F: FnOnce(&mut DialogState)>(&self, apply: F) {
        let mut guard = self.state.write();
        let mut next = (**guard).clone();
        apply(&mut next);
        *guard = Arc::new(next);
    }

    /// Append the user entry for a selected choice and follow its edge
    fn take_choice(&self, choice: &Choice) {
        let entry = ChatMessage::user(&choice.text);
        self.update_state(|s| {
            s.history.push(entry);
            s.pending_confirmation = None;
        });
        self.transition_to(choice.next.clone());
    }

    /// Move the current-node pointer and render the target
    fn transition_to(&self, next_id: String) {
        self.cancel_auto_advance();

        let from = self.current_state().current_node_id.clone();
        self.update_state(|s| {
            s.current_node_id = next_id.clone();
            s.condition = EngineCondition::Ready;
        });
        tracing::debug!(%from, to = %next_id, "transition");
        let _ = self.event_tx.send(EngineEvent::Transitioned { from, to: next_id });

        self.enter_current_node();
    }

    /// Render the node the state points at
    ///
    /// Message and choice nodes append their content as a bot entry
    /// (idempotently); message nodes with a successor schedule the single
    /// auto-advance timer. Input, confirmation and QR nodes render from the
    /// snapshot without touching history.
    fn enter_current_node(&self) {
        let flow = self.flow.read().clone();
        let state = self.current_state();
        let node_id = state.current_node_id.clone();

        let Some(node) = flow.node(&node_id).cloned() else {
            tracing::warn!(node = %node_id, "current node missing from catalog");
            self.update_state(|s| {
                s.condition = EngineCondition::Idle { missing: node_id.clone() };
            });
            let _ = self.event_tx.send(EngineEvent::Idle { missing: node_id });
            return;
        };

        match &node.kind {
            NodeKind::Message { next } => {
                self.append_node_entry(&node);
                if next.is_some() {
                    self.schedule_auto_advance(node.id.clone());
                }
            },
            NodeKind::Choice { .. } => {
                self.append_node_entry(&node);
            },
            NodeKind::Input { .. } | NodeKind::Confirmation { .. } | NodeKind::QrDisplay { .. } => {},
        }
    }

    /// Append a node's content as a bot entry unless the immediately
    /// preceding entry already rendered this node
    fn append_node_entry(&self, node: &Node) {
        let state = self.current_state();
        let duplicate = state.history.last().is_some_and(|last| {
            last.content == node.content || last.node_id.as_deref() == Some(node.id.as_str())
        });
        if duplicate {
            tracing::trace!(node = %node.id, "bot entry already rendered");
            return;
        }

        let message = ChatMessage::bot(&node.content).with_node_id(&node.id);
        let _ = self.event_tx.send(EngineEvent::BotUtterance {
            message_id: message.id,
            text: message.content.clone(),
            voice_key: node.voice_file.clone(),
        });
        self.update_state(|s| s.history.push(message));
    }

    /// Append a strategy-generated bot entry (no node association)
    fn append_bot_text(&self, text: String) {
        let message = ChatMessage::bot(text);
        let _ = self.event_tx.send(EngineEvent::BotUtterance {
            message_id: message.id,
            text: message.content.clone(),
            voice_key: None,
        });
        self.update_state(|s| s.history.push(message));
    }

    /// Interpret free text as the answer to the pending confirmation
    fn resolve_pending_text(&self, text: &str) -> Result<(), EngineError> {
        self.update_state(|s| s.history.push(ChatMessage::user(text)));

        let normalized = normalize(text);
        if prompts::is_affirmative(&normalized) {
            self.resolve_pending_confirmation(true)
        } else if prompts::is_negative(&normalized) {
            self.resolve_pending_confirmation(false)
        } else {
            self.append_bot_text(prompts::yes_no_reprompt(self.language).to_string());
            Ok(())
        }
    }

    /// Arm the dwell timer for a message node
    fn schedule_auto_advance(&self, node_id: String) {
        let Some(engine) = self.me.upgrade() else {
            return;
        };
        let delay = Duration::from_millis(self.config.auto_advance_ms);
        let scheduled_for = node_id.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            engine.fire_auto_advance(&scheduled_for);
        });

        let mut guard = self.auto_advance.lock();
        if let Some(previous) = guard.take() {
            previous.handle.abort();
        }
        *guard = Some(ScheduledAdvance { node_id, handle });
    }

    /// Dwell timer fired; advance only if the dialog is still on the node
    /// the timer was scheduled for
    fn fire_auto_advance(&self, scheduled_for: &str) {
        {
            let mut guard = self.auto_advance.lock();
            match guard.as_ref() {
                Some(armed) if armed.node_id == scheduled_for => {
                    *guard = None;
                },
                _ => {
                    tracing::trace!(node = %scheduled_for, "stale dwell timer ignored");
                    return;
                },
            }
        }

        let state = self.current_state();
        if state.current_node_id != scheduled_for || state.condition != EngineCondition::Ready {
            tracing::trace!(node = %scheduled_for, "stale dwell timer ignored");
            return;
        }

        let flow = self.flow.read().clone();
        let Some(node) = flow.node(scheduled_for) else {
            return;
        };
        if let NodeKind::Message { next: Some(next) } = &node.kind {
            tracing::debug!(node = %scheduled_for, "auto-advancing");
            self.transition_to(next.clone());
        }
    }

    /// Disarm any scheduled dwell timer
    fn cancel_auto_advance(&self) {
        if let Some(armed) = self.auto_advance.lock().take() {
            armed.handle.abort();
        }
    }
}

impl Drop for DialogEngine {
    fn drop(&mut self) {
        self.cancel_auto_advance();
    }
}
