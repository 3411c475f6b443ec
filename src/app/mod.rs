mod actions;
mod keymap;
mod state;
mod types;

pub use types::{App, InputMode, LoginField, Prompt, PromptKind};
