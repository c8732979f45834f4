pub mod chat;
pub mod handlers;
pub mod pitch;
pub mod prompts;
pub mod voice;
