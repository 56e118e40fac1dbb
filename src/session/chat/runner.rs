// Copyright 2025 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Interactive session runner

use super::animation::show_loading_animation;
use super::commands::EXIT_COMMAND;
use super::core::{Action, ChatSession, PreparedTurn, SessionState};
use super::display::{first_prompt, next_prompt, print_action, print_greeting, print_welcome};
use super::input::{create_editor, read_user_input, UserInput};
use crate::config::Config;
use crate::session::OpenRouterProvider;
use crate::{log_debug, log_info};
use anyhow::Result;
use colored::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Run an interactive session until exit/quit or end of input
pub async fn run_interactive_session(name: Option<String>, config: &Config) -> Result<()> {
	// Set the thread-local config for logging macros
	crate::config::set_thread_config(config);

	let provider = OpenRouterProvider::from_config(config)?;
	let mut chat = ChatSession::new(config, Box::new(provider))?;
	if let Some(path) = config.config_path() {
		log_info!("Configuration: {}", path.display());
	}
	log_info!("Using {} model {}", chat.provider_name(), chat.model());

	let mut editor = create_editor()?;

	print_welcome();
	if !config.has_api_key() {
		println!(
			"{}",
			"⚠️  OPENROUTER_API_KEY is not set, requests will be rejected".bright_yellow()
		);
	}

	// AwaitingName
	let name = match name {
		Some(name) => Some(name),
		None => match read_user_input(&mut editor, "\n👋 Hello! What may I call you? ")? {
			UserInput::Line(line) => Some(line),
			UserInput::Interrupted | UserInput::Eof => None,
		},
	};
	let greeting = chat.start(name.as_deref());
	print_greeting(&greeting);

	// AwaitingInput until Terminated
	let mut prompt = first_prompt(chat.session().display_name());
	while chat.state() != SessionState::Terminated {
		let line = match read_user_input(&mut editor, &prompt)? {
			UserInput::Line(line) => line,
			UserInput::Interrupted | UserInput::Eof => EXIT_COMMAND.to_string(),
		};
		prompt = next_prompt();

		let action = match chat.prepare_turn(&line) {
			PreparedTurn::Immediate(action) => action,
			PreparedTurn::Send(text) => {
				log_debug!("Sending: {}", text);
				send_with_animation(&mut chat, text).await
			}
		};

		print_action(&action, chat.session().display_name());
	}

	Ok(())
}

// Complete the turn while the loading animation runs
async fn send_with_animation(chat: &mut ChatSession, text: String) -> Action {
	let cancel_flag = Arc::new(AtomicBool::new(false));
	let animation = tokio::spawn(show_loading_animation(cancel_flag.clone()));

	let action = chat.complete_turn(text).await;

	cancel_flag.store(true, Ordering::SeqCst);
	match animation.await {
		Ok(Ok(())) => {}
		Ok(Err(e)) => log_debug!("Loading animation failed: {}", e),
		Err(e) => log_debug!("Loading animation task failed: {}", e),
	}

	action
}
