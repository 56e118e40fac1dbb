// Chat session module
mod animation;
pub mod commands;
mod core;
mod display;
mod input;
mod runner;

// Re-export main structures and functions
pub use commands::{COMMANDS, EXIT_COMMAND, QUIT_COMMAND, RESET_COMMAND};
pub use self::core::{
	punctuate_question, Action, ChatSession, Greeting, PreparedTurn, SessionState,
};
pub use runner::run_interactive_session;
