//! Turn-taking for one session.
//!
//! A turn moves `Idle -> UserSubmitted -> Streaming -> Idle`. Blank input never
//! leaves `Idle`. A failed completion still commits an assistant turn carrying
//! [`GENERATION_ERROR`], so user and assistant turns keep alternating.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::StreamExt;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::chat_stream::CompletionClient;
use crate::core::export::{ConversationExport, ExportError};
use crate::core::message::Role;
use crate::core::models::{self, ModelSpec};
use crate::core::persona::{self, Persona};
use crate::core::session::{SaveOutcome, SessionState};

/// Assistant content committed when the completion could not be started.
pub const GENERATION_ERROR: &str = "Error: Could not generate response.";
/// Appended to partial text while a response is still arriving.
pub const STREAMING_CURSOR: char = '▌';
pub const EMPTY_MESSAGE_WARNING: &str = "Message cannot be empty.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    UserSubmitted,
    Streaming,
}

/// Render-layer hooks invoked while a turn runs.
pub trait TurnView {
    /// The user message has been appended and should be echoed.
    fn user_submitted(&mut self, session: &SessionState);
    /// Transient assistant text. Carries [`STREAMING_CURSOR`] until the last
    /// call of the turn.
    fn streaming(&mut self, session: &SessionState, visible: &str);
    /// The assistant message has been committed; redraw everything.
    fn committed(&mut self, session: &SessionState);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing was appended.
    Rejected,
    Answered { content: String },
    /// The completion could not be started and the error text was committed.
    Failed,
}

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("Unknown persona '{name}'. Available personas: {available}")]
    UnknownPersona { name: String, available: String },
    #[error("Unknown model '{name}'. Available models: {available}")]
    UnknownModel { name: String, available: String },
}

pub struct ConversationController {
    session: SessionState,
    client: Arc<dyn CompletionClient>,
    phase: TurnPhase,
}

impl ConversationController {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self::with_session(SessionState::new(), client)
    }

    pub fn with_session(session: SessionState, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            session,
            client,
            phase: TurnPhase::Idle,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Run one full turn for `prompt`.
    pub async fn submit(&mut self, prompt: &str, view: &mut dyn TurnView) -> SubmitOutcome {
        if prompt.trim().is_empty() {
            debug!("rejected blank message");
            return SubmitOutcome::Rejected;
        }

        self.session.append_message(Role::User, prompt);
        self.phase = TurnPhase::UserSubmitted;
        view.user_submitted(&self.session);

        self.phase = TurnPhase::Streaming;
        let persona = self.session.active_persona();
        let model = self.session.active_model();
        let fragments = self
            .client
            .stream_completion(
                persona.system_prompt,
                model.backend_id,
                self.session.messages(),
            )
            .await;

        let (content, failed) = match fragments {
            Some(mut fragments) => {
                let mut accumulated = String::new();
                while let Some(fragment) = fragments.next().await {
                    accumulated.push_str(&fragment);
                    let mut visible = String::with_capacity(accumulated.len() + 3);
                    visible.push_str(&accumulated);
                    visible.push(STREAMING_CURSOR);
                    view.streaming(&self.session, &visible);
                }
                view.streaming(&self.session, &accumulated);
                (accumulated, false)
            }
            None => {
                view.streaming(&self.session, GENERATION_ERROR);
                (GENERATION_ERROR.to_string(), true)
            }
        };

        self.session.append_message(Role::Assistant, content.clone());
        self.phase = TurnPhase::Idle;
        debug!(
            messages = self.session.message_count(),
            failed, "turn committed"
        );
        view.committed(&self.session);

        if failed {
            SubmitOutcome::Failed
        } else {
            SubmitOutcome::Answered { content }
        }
    }

    /// Select a persona by name. Returns whether the selection changed; a
    /// change discards the conversation.
    pub fn select_persona(&mut self, name: &str) -> Result<bool, SelectionError> {
        let persona =
            persona::find_persona(name).ok_or_else(|| SelectionError::UnknownPersona {
                name: name.trim().to_string(),
                available: persona::persona_names().join(", "),
            })?;
        Ok(self.session.select_persona(persona))
    }

    pub fn select_model(&mut self, name: &str) -> Result<bool, SelectionError> {
        let model = models::find_model(name).ok_or_else(|| SelectionError::UnknownModel {
            name: name.trim().to_string(),
            available: models::model_names().join(", "),
        })?;
        Ok(self.session.select_model(model))
    }

    pub fn cycle_persona(&mut self) -> &'static Persona {
        let next = persona::next_persona(self.session.active_persona());
        self.session.select_persona(next);
        next
    }

    pub fn cycle_model(&mut self) -> &'static ModelSpec {
        let next = models::next_model(self.session.active_model());
        self.session.select_model(next);
        next
    }

    pub fn clear(&mut self) {
        self.session.reset_conversation();
        info!("conversation cleared");
    }

    pub fn save(&mut self) -> SaveOutcome {
        let persona = self.session.active_persona();
        let model = self.session.active_model();
        let outcome = self.session.save_current_session(persona, model);
        if let SaveOutcome::Saved { index } = outcome {
            info!(index, "session saved");
        }
        outcome
    }

    pub fn export(&self) -> ConversationExport {
        self.session
            .export_conversation(self.session.active_persona(), self.session.active_model())
    }

    /// Write the live conversation as JSON into `dir`. Refuses an empty one.
    pub fn export_to_dir(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = self.export().write_to_dir(dir)?;
        info!(path = %path.display(), "conversation exported");
        Ok(path)
    }
}
