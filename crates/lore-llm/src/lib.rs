pub mod gemini;
pub mod openai;
pub mod provider;
pub mod recover;

pub use gemini::GeminiProvider;
pub use openai::OpenAIProvider;
pub use provider::{
    AspectRatio, GenerationError, GenerationProvider, PromptTurn, Result, TextRequest, TurnRole,
};
pub use recover::parse_json_lenient;
