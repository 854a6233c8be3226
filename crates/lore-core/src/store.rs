//! Application state store.
//!
//! The original client kept all of this in ad hoc component state; here every
//! mutation is an explicit [`StudioAction`] applied through [`StudioState::apply`]
//! so the same store serves the tool executor, tests, and any future surface.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::brief::ProjectBrief;
use crate::character::Character;
use crate::chat::ChatMessage;
use crate::codex::{GameCodex, GameElement, GameIteration};
use crate::note::{FeedbackNote, StoryNote};
use crate::task::{Task, TaskStatus};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("iteration not found: {0}")]
    IterationNotFound(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),
}

/// Discrete state mutations. Everything the tool executor or an editing
/// surface can do to the project goes through one of these.
#[derive(Debug, Clone)]
pub enum StudioAction {
    SetBrief(ProjectBrief),
    /// All-or-nothing codex replacement. The previous codex is snapshotted
    /// into the iteration log first, so revert-by-copy always has a target.
    ReplaceCodex {
        elements: Vec<GameElement>,
        change_description: String,
    },
    RevertToIteration {
        iteration_id: String,
    },
    AddTask(Task),
    SetTaskStatus {
        task_id: String,
        status: TaskStatus,
    },
    DeleteTask {
        task_id: String,
    },
    AddStoryNote(StoryNote),
    DeleteStoryNote {
        note_id: String,
    },
    AddCharacter(Character),
    SetCharacterImage {
        character_id: String,
        image_url: Option<String>,
    },
    DeleteCharacter {
        character_id: String,
    },
    AddFeedback(FeedbackNote),
    DeleteFeedback {
        feedback_id: String,
    },
    PushMessage(ChatMessage),
}

/// The whole page-session state of one project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioState {
    pub brief: ProjectBrief,
    pub codex: GameCodex,
    pub iterations: Vec<GameIteration>,
    pub tasks: Vec<Task>,
    pub notes: Vec<StoryNote>,
    pub characters: Vec<Character>,
    pub feedback: Vec<FeedbackNote>,
    pub transcript: Vec<ChatMessage>,
}

impl StudioState {
    pub fn apply(&mut self, action: StudioAction) -> Result<(), StoreError> {
        match action {
            StudioAction::SetBrief(brief) => {
                self.brief = brief;
            }
            StudioAction::ReplaceCodex {
                elements,
                change_description,
            } => {
                // The very first compile has nothing worth snapshotting.
                if !self.codex.is_empty() {
                    self.iterations.push(GameIteration::new(
                        change_description.clone(),
                        self.codex.clone(),
                    ));
                }
                self.codex = GameCodex::new(elements);
                log::debug!(
                    "codex replaced ({} elements): {}",
                    self.codex.elements.len(),
                    change_description
                );
            }
            StudioAction::RevertToIteration { iteration_id } => {
                let snapshot = self
                    .iterations
                    .iter()
                    .find(|iteration| iteration.id == iteration_id)
                    .cloned()
                    .ok_or(StoreError::IterationNotFound(iteration_id))?;
                self.iterations.push(GameIteration::new(
                    format!("Reverted to \"{}\"", snapshot.change_description),
                    self.codex.clone(),
                ));
                self.codex = snapshot.codex;
            }
            StudioAction::AddTask(task) => self.tasks.push(task),
            StudioAction::SetTaskStatus { task_id, status } => {
                let task = self
                    .tasks
                    .iter_mut()
                    .find(|task| task.id == task_id)
                    .ok_or(StoreError::TaskNotFound(task_id))?;
                task.status = status;
            }
            StudioAction::DeleteTask { task_id } => {
                self.tasks.retain(|task| task.id != task_id);
            }
            StudioAction::AddStoryNote(note) => self.notes.push(note),
            StudioAction::DeleteStoryNote { note_id } => {
                self.notes.retain(|note| note.id != note_id);
            }
            StudioAction::AddCharacter(character) => self.characters.push(character),
            StudioAction::SetCharacterImage {
                character_id,
                image_url,
            } => {
                if let Some(character) = self
                    .characters
                    .iter_mut()
                    .find(|character| character.id == character_id)
                {
                    character.image_url = image_url;
                }
            }
            StudioAction::DeleteCharacter { character_id } => {
                // Feedback pointing at the character is left in place; it is
                // a weak reference resolved at display time.
                self.characters
                    .retain(|character| character.id != character_id);
            }
            StudioAction::AddFeedback(feedback) => self.feedback.push(feedback),
            StudioAction::DeleteFeedback { feedback_id } => {
                self.feedback.retain(|note| note.id != feedback_id);
            }
            StudioAction::PushMessage(message) => self.transcript.push(message),
        }
        Ok(())
    }

    /// Resolve a feedback note's target title, falling back to a "(removed)"
    /// marker when the target no longer exists.
    pub fn resolve_feedback_target(&self, feedback: &FeedbackNote) -> String {
        use crate::note::FeedbackTarget;

        let live = match feedback.target_type {
            FeedbackTarget::Codex => self
                .codex
                .elements
                .iter()
                .find(|element| element.id == feedback.target_id)
                .map(|element| element.title.clone()),
            FeedbackTarget::Character => self
                .characters
                .iter()
                .find(|character| character.id == feedback.target_id)
                .map(|character| character.name.clone()),
            FeedbackTarget::Task => self
                .tasks
                .iter()
                .find(|task| task.id == feedback.target_id)
                .map(|task| task.title.clone()),
            FeedbackTarget::General => Some(feedback.target_title.clone()),
        };

        live.unwrap_or_else(|| format!("{} (removed)", feedback.target_title))
    }

    /// The most recent `window` transcript entries, oldest first.
    pub fn recent_messages(&self, window: usize) -> &[ChatMessage] {
        let start = self.transcript.len().saturating_sub(window);
        &self.transcript[start..]
    }
}
