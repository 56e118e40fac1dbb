// Session display functionality

use super::core::{Action, Greeting};
use crate::session::CompletionError;
use colored::*;

pub fn print_welcome() {
	println!("{}", "🌟 Welcome to safechat! 🌟".bright_yellow());
}

pub fn print_greeting(greeting: &Greeting) {
	match greeting {
		Greeting::Default(name) => {
			println!("{}", format!("😊 No worries! I'll just call you '{}'", name).bright_cyan());
		}
		Greeting::Named(name) => {
			println!("{}", format!("\n✨ Nice to meet you, {}! 🎉", name).bright_cyan());
		}
	}
}

pub fn first_prompt(display_name: &str) -> String {
	format!(
		"\n💬 {}, how can I help you today? (type 'exit', 'quit' or 'reset') ",
		display_name
	)
}

pub fn next_prompt() -> String {
	"\n✍️  How can I help you? ".to_string()
}

// Print the user-visible result of one round
pub fn print_action(action: &Action, display_name: &str) {
	match action {
		Action::Terminate => {
			println!(
				"{}",
				format!("\n👋 Goodbye, {}! Have a nice day! 🌟", display_name).bright_yellow()
			);
		}
		Action::Retry => {
			println!("{}", "❓ Please ask me something!".yellow());
		}
		Action::Reset => {
			println!("{}", "🧹 Conversation history cleared".bright_cyan());
		}
		Action::Rejected => {
			println!("{}", "❌ Your input violated the moderation policy".bright_red());
		}
		Action::Failed(error) => print_failure(error),
		Action::Delivered {
			content,
			was_filtered,
		} => {
			if *was_filtered {
				println!(
					"{}",
					"⚠️  Output contained unaccepted content. Filtered version:".bright_yellow()
				);
			}
			println!("\n{}\n{}", "🤖 AI Response:".bright_white(), content.bright_green());
		}
	}
}

fn print_failure(error: &CompletionError) {
	match error {
		CompletionError::EmptyResponse => {
			println!("{}", "❌ ERROR: AI returned an empty response!".bright_red());
			println!(
				"{}",
				"💡 TIP: Try asking a more specific question or check your API credits".yellow()
			);
		}
		CompletionError::MalformedResponse(_) => {
			println!("{}", "❌ ERROR: Unexpected response structure!".bright_red());
			println!("{}", format!("Error message: {}", error).red());
		}
		CompletionError::TransportFailure(_) => {
			println!("{}", "❌ ERROR: Something went wrong!".bright_red());
			println!("{}", format!("Error message: {}", error).red());
		}
	}
}
