pub mod brief;
pub mod character;
pub mod chat;
pub mod codex;
pub mod id;
pub mod note;
pub mod store;
pub mod task;
pub mod tool_call;

pub use brief::ProjectBrief;
pub use character::Character;
pub use chat::{ChatMessage, ChatRole};
pub use codex::{ElementCategory, GameCodex, GameElement, GameIteration};
pub use id::generate_id;
pub use note::{FeedbackNote, FeedbackTarget, StoryNote};
pub use store::{StoreError, StudioAction, StudioState};
pub use task::{Task, TaskStatus};
pub use tool_call::ToolCall;
