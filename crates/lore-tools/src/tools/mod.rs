mod add_character;
mod add_story_note;
mod add_task;
mod generate_image;

pub use add_character::AddCharacterTool;
pub use add_story_note::AddStoryNoteTool;
pub use add_task::AddTaskTool;
pub use generate_image::GenerateImageTool;
