// User input handling module

use crate::session::chat_helper::CommandHelper;
use anyhow::Result;
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config as RustylineConfig, EditMode, Editor};

pub type ChatEditor = Editor<CommandHelper, DefaultHistory>;

/// One read from the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
	Line(String),
	/// Ctrl+C at the prompt
	Interrupted,
	/// Ctrl+D or closed stdin
	Eof,
}

// Create the line editor shared by every prompt of the session
pub fn create_editor() -> Result<ChatEditor> {
	let config = RustylineConfig::builder()
		.completion_type(CompletionType::List)
		.edit_mode(EditMode::Emacs)
		.auto_add_history(true) // Automatically add lines to history
		.bell_style(rustyline::config::BellStyle::None) // No bell
		.build();

	let mut editor: ChatEditor = Editor::with_config(config)?;
	editor.set_helper(Some(CommandHelper::new()));
	Ok(editor)
}

// Read one line with command completion and history hints
pub fn read_user_input(editor: &mut ChatEditor, prompt: &str) -> Result<UserInput> {
	let prompt = prompt.bright_blue().to_string();

	match editor.readline(&prompt) {
		Ok(line) => Ok(UserInput::Line(line)),
		Err(ReadlineError::Interrupted) => Ok(UserInput::Interrupted),
		Err(ReadlineError::Eof) => Ok(UserInput::Eof),
		Err(err) => Err(err.into()),
	}
}
