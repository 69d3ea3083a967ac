use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::export::ConversationExport;
use crate::core::message::{Message, Role};
use crate::core::models::{self, ModelSpec};
use crate::core::persona::{self, Persona};

/// Snapshot of a conversation taken by an explicit save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSession {
    pub timestamp: DateTime<FixedOffset>,
    #[serde(rename = "personality")]
    pub persona_name: String,
    #[serde(rename = "model")]
    pub model_name: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A snapshot was appended at this position of the saved-session log.
    Saved { index: usize },
    NothingToSave,
}

/// The live conversation plus the selection it belongs to.
#[derive(Debug, Clone)]
pub struct ConversationState {
    messages: Vec<Message>,
    message_count: usize,
    active_persona: &'static Persona,
    active_model: &'static ModelSpec,
}

/// Everything one interactive session owns. A host serving several users
/// keeps one of these per user.
#[derive(Debug, Clone)]
pub struct SessionState {
    conversation: ConversationState,
    saved_sessions: Vec<SavedSession>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Fresh session: empty history, first persona and first model selected.
    pub fn new() -> Self {
        Self {
            conversation: ConversationState {
                messages: Vec::new(),
                message_count: 0,
                active_persona: persona::default_persona(),
                active_model: models::default_model(),
            },
            saved_sessions: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.conversation.messages
    }

    pub fn message_count(&self) -> usize {
        self.conversation.message_count
    }

    pub fn is_empty(&self) -> bool {
        self.conversation.messages.is_empty()
    }

    pub fn active_persona(&self) -> &'static Persona {
        self.conversation.active_persona
    }

    pub fn active_model(&self) -> &'static ModelSpec {
        self.conversation.active_model
    }

    pub fn saved_sessions(&self) -> &[SavedSession] {
        &self.saved_sessions
    }

    pub fn reset_conversation(&mut self) {
        self.conversation.messages.clear();
        self.conversation.message_count = 0;
    }

    /// Content is stored as given; rejecting blank input is the caller's job.
    pub fn append_message(&mut self, role: Role, content: impl Into<String>) {
        self.conversation.messages.push(Message::new(role, content));
        self.conversation.message_count += 1;
    }

    /// Switch persona. Any change discards the current history.
    /// Returns whether the selection changed.
    pub fn select_persona(&mut self, persona: &'static Persona) -> bool {
        if self.conversation.active_persona.name == persona.name {
            return false;
        }
        self.reset_conversation();
        self.conversation.active_persona = persona;
        info!(persona = persona.name, "persona changed; conversation reset");
        true
    }

    /// Switch model. Any change discards the current history.
    pub fn select_model(&mut self, model: &'static ModelSpec) -> bool {
        if self.conversation.active_model.display_name == model.display_name {
            return false;
        }
        self.reset_conversation();
        self.conversation.active_model = model;
        info!(model = model.display_name, "model changed; conversation reset");
        true
    }

    pub fn save_current_session(&mut self, persona: &Persona, model: &ModelSpec) -> SaveOutcome {
        if self.conversation.messages.is_empty() {
            return SaveOutcome::NothingToSave;
        }

        self.saved_sessions.push(SavedSession {
            timestamp: Local::now().fixed_offset(),
            persona_name: persona.name.to_string(),
            model_name: model.display_name.to_string(),
            messages: self.conversation.messages.clone(),
        });
        SaveOutcome::Saved {
            index: self.saved_sessions.len() - 1,
        }
    }

    pub fn export_conversation(&self, persona: &Persona, model: &ModelSpec) -> ConversationExport {
        ConversationExport {
            personality: persona.name.to_string(),
            model: model.display_name.to_string(),
            messages: self.conversation.messages.clone(),
            exported: Local::now().fixed_offset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::find_model;
    use crate::core::persona::find_persona;

    fn session_with_turns(turns: usize) -> SessionState {
        let mut session = SessionState::new();
        for turn in 0..turns {
            session.append_message(Role::User, format!("question {turn}"));
            session.append_message(Role::Assistant, format!("answer {turn}"));
        }
        session
    }

    #[test]
    fn new_session_uses_registry_defaults() {
        let session = SessionState::new();
        assert!(session.messages().is_empty());
        assert_eq!(session.message_count(), 0);
        assert_eq!(session.active_persona().name, "Mathematician");
        assert_eq!(session.active_model().display_name, "Llama 3.3 70B");
        assert!(session.saved_sessions().is_empty());
    }

    #[test]
    fn append_keeps_count_in_step_with_messages() {
        let mut session = SessionState::new();
        session.append_message(Role::User, "");
        session.append_message(Role::Assistant, "x".repeat(10_000));
        assert_eq!(session.message_count(), 2);
        assert_eq!(session.message_count(), session.messages().len());
    }

    #[test]
    fn reset_clears_messages_and_count() {
        let mut session = session_with_turns(3);
        session.reset_conversation();
        assert!(session.is_empty());
        assert_eq!(session.message_count(), 0);
    }

    #[test]
    fn switching_persona_discards_history() {
        let mut session = session_with_turns(4);
        let historian = find_persona("Historian").unwrap();

        assert!(session.select_persona(historian));
        assert!(session.is_empty());
        assert_eq!(session.message_count(), 0);
        assert_eq!(session.active_persona().name, "Historian");
    }

    #[test]
    fn switching_model_discards_history() {
        let mut session = session_with_turns(1);
        assert!(session.select_model(find_model("Gemma 2 9B").unwrap()));
        assert!(session.is_empty());
        assert_eq!(session.active_model().backend_id, "gemma2-9b-it");
    }

    #[test]
    fn reselecting_the_active_entry_keeps_history() {
        let mut session = session_with_turns(2);
        assert!(!session.select_persona(persona::default_persona()));
        assert!(!session.select_model(models::default_model()));
        assert_eq!(session.message_count(), 4);
    }

    #[test]
    fn saving_an_empty_conversation_is_a_no_op() {
        let mut session = SessionState::new();
        let outcome =
            session.save_current_session(session.active_persona(), session.active_model());
        assert_eq!(outcome, SaveOutcome::NothingToSave);
        assert!(session.saved_sessions().is_empty());
    }

    #[test]
    fn saved_snapshot_is_independent_of_live_history() {
        let mut session = session_with_turns(1);
        let persona = session.active_persona();
        let model = session.active_model();

        let outcome = session.save_current_session(persona, model);
        assert_eq!(outcome, SaveOutcome::Saved { index: 0 });

        let expected = session.messages().to_vec();
        session.append_message(Role::User, "after save");
        session.reset_conversation();

        let saved = &session.saved_sessions()[0];
        assert_eq!(saved.messages, expected);
        assert_eq!(saved.persona_name, "Mathematician");
        assert_eq!(saved.model_name, "Llama 3.3 70B");
    }

    #[test]
    fn saved_sessions_accumulate() {
        let mut session = session_with_turns(1);
        let (persona, model) = (session.active_persona(), session.active_model());
        session.save_current_session(persona, model);
        session.append_message(Role::User, "more");
        assert_eq!(
            session.save_current_session(persona, model),
            SaveOutcome::Saved { index: 1 }
        );
        assert_eq!(session.saved_sessions()[1].messages.len(), 3);
    }

    #[test]
    fn export_round_trips_the_live_history() {
        let session = session_with_turns(2);
        let export =
            session.export_conversation(session.active_persona(), session.active_model());
        let json = export.to_json_pretty().unwrap();

        let parsed: ConversationExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.messages, session.messages());
        assert_eq!(parsed.personality, "Mathematician");
        assert_eq!(parsed.model, "Llama 3.3 70B");
        assert_eq!(session.message_count(), 4);
    }

    #[test]
    fn saved_session_serializes_with_personality_key() {
        let mut session = session_with_turns(1);
        let (persona, model) = (session.active_persona(), session.active_model());
        session.save_current_session(persona, model);

        let value = serde_json::to_value(&session.saved_sessions()[0]).unwrap();
        assert_eq!(value["personality"], "Mathematician");
        assert_eq!(value["model"], "Llama 3.3 70B");
        assert!(value["timestamp"].is_string());
        assert_eq!(value["messages"][0]["role"], "user");
    }
}
