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

// Chat session implementation

use super::commands::{is_exit_command, is_reset_command};
use crate::config::Config;
use crate::log_debug;
use crate::session::{
	CompletionClient, CompletionError, ModerationFilter, ModerationOutcome, Session, Turn,
	DEFAULT_DISPLAY_NAME,
};
use anyhow::{Context, Result};

// Lead words that mark a line as a question
const QUESTION_WORDS: [&str; 19] = [
	"what", "why", "how", "when", "where", "who", "which", "can", "could", "would", "should",
	"will", "did", "does", "is", "are", "was", "were", "do",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
	AwaitingName,
	AwaitingInput,
	Terminated,
}

/// How the user was greeted by `start`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Greeting {
	/// No usable name was given, the default name is used
	Default(String),
	Named(String),
}

impl Greeting {
	pub fn display_name(&self) -> &str {
		match self {
			Greeting::Default(name) | Greeting::Named(name) => name,
		}
	}
}

/// Outcome of one round of the chat loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
	/// exit/quit was entered
	Terminate,
	/// Blank input, ask again
	Retry,
	/// Transcript was cleared on request
	Reset,
	/// Input failed moderation and was not sent
	Rejected,
	/// Completion call failed, the user turn was rolled back
	Failed(CompletionError),
	Delivered { content: String, was_filtered: bool },
}

/// First half of a turn: either an answer that needs no model call,
/// or the text that will be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparedTurn {
	Immediate(Action),
	Send(String),
}

/// Append `?` to lines that start with a question word and have no closing
/// punctuation.
pub fn punctuate_question(text: &str) -> String {
	let lowered = text.to_lowercase();
	let starts_with_question = QUESTION_WORDS
		.iter()
		.any(|word| lowered.starts_with(&format!("{} ", word)));
	let has_terminal_punctuation = text.ends_with(['?', '!', '.']);

	if starts_with_question && !has_terminal_punctuation {
		format!("{}?", text)
	} else {
		text.to_string()
	}
}

// Chat session manager: owns the conversation and drives each turn
pub struct ChatSession {
	session: Session,
	state: SessionState,
	client: Box<dyn CompletionClient>,
	filter: ModerationFilter,
	model: String,
	config: Config,
}

impl ChatSession {
	pub fn new(config: &Config, client: Box<dyn CompletionClient>) -> Result<Self> {
		let filter = ModerationFilter::from_config(&config.moderation)
			.context("Failed to build moderation filter")?;

		Ok(Self {
			session: Session::default(),
			state: SessionState::AwaitingName,
			client,
			filter,
			model: config.model.clone(),
			config: config.clone(),
		})
	}

	pub fn session(&self) -> &Session {
		&self.session
	}

	pub fn state(&self) -> SessionState {
		self.state
	}

	pub fn model(&self) -> &str {
		&self.model
	}

	pub fn provider_name(&self) -> &str {
		self.client.name()
	}

	/// Set the display name (blank or absent means the default) and start
	/// accepting input.
	pub fn start(&mut self, name: Option<&str>) -> Greeting {
		let name = name.map(str::trim).unwrap_or_default();
		let greeting = if name.is_empty() {
			Greeting::Default(DEFAULT_DISPLAY_NAME.to_string())
		} else {
			Greeting::Named(name.to_string())
		};

		self.session.set_display_name(greeting.display_name());
		self.state = SessionState::AwaitingInput;
		greeting
	}

	/// Run one full round: commands, punctuation, moderation, completion.
	/// Either leaves the transcript untouched or appends exactly one user
	/// turn and one assistant turn.
	pub async fn process_turn(&mut self, raw_input: &str) -> Action {
		match self.prepare_turn(raw_input) {
			PreparedTurn::Immediate(action) => action,
			PreparedTurn::Send(text) => self.complete_turn(text).await,
		}
	}

	/// Everything that happens before the model is called
	pub fn prepare_turn(&mut self, raw_input: &str) -> PreparedTurn {
		if self.state == SessionState::Terminated {
			return PreparedTurn::Immediate(Action::Terminate);
		}

		let input = raw_input.trim();

		if is_exit_command(input) {
			self.state = SessionState::Terminated;
			return PreparedTurn::Immediate(Action::Terminate);
		}

		if input.is_empty() {
			return PreparedTurn::Immediate(Action::Retry);
		}

		if is_reset_command(input) {
			self.session.transcript_mut().clear();
			return PreparedTurn::Immediate(Action::Reset);
		}

		let text = punctuate_question(input);

		if self.filter.check(&text) {
			log_debug!("Input rejected by moderation: {}", text);
			return PreparedTurn::Immediate(Action::Rejected);
		}

		PreparedTurn::Send(text)
	}

	/// Append the user turn, call the model, and either roll back or append
	/// the (possibly redacted) reply.
	pub async fn complete_turn(&mut self, text: String) -> Action {
		self.session.transcript_mut().push(Turn::user(text));

		let system_instruction = self.config.system_instruction(self.session.display_name());
		let result = self
			.client
			.complete(&system_instruction, self.session.transcript(), &self.model)
			.await;

		let reply = match result {
			Ok(reply) => reply,
			Err(error) => {
				// Rollback: the model never answered this turn
				self.session.transcript_mut().rollback();
				log_debug!("Completion failed ({}), user turn rolled back", error.kind());
				return Action::Failed(error);
			}
		};

		let (content, was_filtered) = match self.filter.moderate(&reply) {
			ModerationOutcome::Clean => (reply, false),
			ModerationOutcome::Flagged(redacted) => (redacted, true),
		};

		self.session
			.transcript_mut()
			.push(Turn::assistant(content.clone()));

		Action::Delivered {
			content,
			was_filtered,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::session::{Role, Transcript};
	use std::collections::VecDeque;
	use std::sync::{Arc, Mutex};

	#[derive(Default)]
	struct FakeState {
		replies: Mutex<VecDeque<Result<String, CompletionError>>>,
		calls: Mutex<Vec<(String, Vec<Turn>, String)>>,
	}

	struct FakeClient(Arc<FakeState>);

	#[async_trait::async_trait]
	impl CompletionClient for FakeClient {
		fn name(&self) -> &str {
			"fake"
		}

		async fn complete(
			&self,
			system_instruction: &str,
			transcript: &Transcript,
			model: &str,
		) -> Result<String, CompletionError> {
			self.0.calls.lock().unwrap().push((
				system_instruction.to_string(),
				transcript.turns().to_vec(),
				model.to_string(),
			));
			self.0
				.replies
				.lock()
				.unwrap()
				.pop_front()
				.unwrap_or_else(|| Ok("ok".to_string()))
		}
	}

	fn chat_with(replies: Vec<Result<String, CompletionError>>) -> (ChatSession, Arc<FakeState>) {
		let state = Arc::new(FakeState {
			replies: Mutex::new(replies.into()),
			..Default::default()
		});
		let mut chat =
			ChatSession::new(&Config::default(), Box::new(FakeClient(state.clone()))).unwrap();
		chat.start(Some("Ada"));
		(chat, state)
	}

	fn assert_balanced(chat: &ChatSession) {
		let transcript = chat.session().transcript();
		assert_eq!(transcript.count_role(Role::User), transcript.count_role(Role::Assistant));
		assert_eq!(transcript.count_role(Role::System), 0);
	}

	#[test]
	fn test_start_sets_display_name() {
		let (mut chat, _) = chat_with(vec![]);
		assert_eq!(chat.start(Some("  Grace ")), Greeting::Named("Grace".to_string()));
		assert_eq!(chat.session().display_name(), "Grace");
		assert_eq!(chat.state(), SessionState::AwaitingInput);

		assert_eq!(chat.start(Some("   ")), Greeting::Default("Friend".to_string()));
		assert_eq!(chat.start(None).display_name(), "Friend");
	}

	#[test]
	fn test_punctuate_question() {
		assert_eq!(punctuate_question("what is the weather"), "what is the weather?");
		assert_eq!(punctuate_question("How are you"), "How are you?");
		assert_eq!(punctuate_question("is it done."), "is it done.");
		assert_eq!(punctuate_question("do it now!"), "do it now!");
		assert_eq!(punctuate_question("why?"), "why?");
		// Lead word must be followed by a space
		assert_eq!(punctuate_question("whatever works"), "whatever works");
		assert_eq!(punctuate_question("tell me a joke"), "tell me a joke");
	}

	#[tokio::test]
	async fn test_exit_and_quit_terminate() {
		let (mut chat, state) = chat_with(vec![]);
		assert_eq!(chat.process_turn("  EXIT ").await, Action::Terminate);
		assert_eq!(chat.state(), SessionState::Terminated);
		// Stays terminated
		assert_eq!(chat.process_turn("hello").await, Action::Terminate);
		assert!(state.calls.lock().unwrap().is_empty());

		let (mut chat, _) = chat_with(vec![]);
		assert_eq!(chat.process_turn("Quit").await, Action::Terminate);
	}

	#[tokio::test]
	async fn test_blank_input_retries() {
		let (mut chat, state) = chat_with(vec![]);
		assert_eq!(chat.process_turn("").await, Action::Retry);
		assert_eq!(chat.process_turn(" \t\n").await, Action::Retry);
		assert!(chat.session().transcript().is_empty());
		assert!(state.calls.lock().unwrap().is_empty());
		assert_eq!(chat.state(), SessionState::AwaitingInput);
	}

	#[tokio::test]
	async fn test_banned_input_is_rejected() {
		let (mut chat, state) = chat_with(vec![]);
		assert_eq!(chat.process_turn("kill the process").await, Action::Rejected);
		assert_eq!(chat.process_turn("who is the attacker").await, Action::Rejected);
		assert_eq!(chat.session().transcript().len(), 0);
		assert!(state.calls.lock().unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_question_is_punctuated_before_sending() {
		let (mut chat, state) = chat_with(vec![Ok("Sunny.".to_string())]);
		let action = chat.process_turn("what is the weather").await;

		assert_eq!(
			action,
			Action::Delivered {
				content: "Sunny.".to_string(),
				was_filtered: false
			}
		);

		let calls = state.calls.lock().unwrap();
		assert_eq!(calls.len(), 1);
		let (system, turns, model) = &calls[0];
		assert!(system.contains("Ada"));
		assert_eq!(model, "mistralai/mistral-7b-instruct");
		assert_eq!(turns, &vec![Turn::user("what is the weather?")]);
	}

	#[tokio::test]
	async fn test_transport_failure_rolls_back() {
		let (mut chat, _) = chat_with(vec![
			Ok("first answer".to_string()),
			Err(CompletionError::TransportFailure("connection refused".to_string())),
		]);

		chat.process_turn("hello").await;
		let before = chat.session().transcript().clone();

		let action = chat.process_turn("are you there").await;
		assert_eq!(
			action,
			Action::Failed(CompletionError::TransportFailure("connection refused".to_string()))
		);
		assert_eq!(chat.session().transcript(), &before);
		assert_balanced(&chat);
	}

	#[tokio::test]
	async fn test_every_failure_kind_rolls_back() {
		let (mut chat, _) = chat_with(vec![
			Err(CompletionError::MalformedResponse("no choices".to_string())),
			Err(CompletionError::EmptyResponse),
		]);

		assert!(matches!(
			chat.process_turn("hello").await,
			Action::Failed(CompletionError::MalformedResponse(_))
		));
		assert_eq!(
			chat.process_turn("hello").await,
			Action::Failed(CompletionError::EmptyResponse)
		);
		assert!(chat.session().transcript().is_empty());
	}

	#[tokio::test]
	async fn test_reply_is_redacted() {
		let (mut chat, _) = chat_with(vec![Ok("I will not hack your system".to_string())]);
		let action = chat.process_turn("please help me").await;

		assert_eq!(
			action,
			Action::Delivered {
				content: "I will not [REDACTED] your system".to_string(),
				was_filtered: true
			}
		);
		assert_eq!(
			chat.session().transcript().last(),
			Some(&Turn::assistant("I will not [REDACTED] your system"))
		);
	}

	#[tokio::test]
	async fn test_embedded_word_in_reply_is_flagged_but_unchanged() {
		let (mut chat, _) = chat_with(vec![Ok("Attackers are people too".to_string())]);
		let action = chat.process_turn("tell me something").await;

		assert_eq!(
			action,
			Action::Delivered {
				content: "Attackers are people too".to_string(),
				was_filtered: true
			}
		);
	}

	#[tokio::test]
	async fn test_history_is_sent_with_each_call() {
		let (mut chat, state) = chat_with(vec![Ok("one".to_string()), Ok("two".to_string())]);
		chat.process_turn("first").await;
		chat.process_turn("second").await;

		let calls = state.calls.lock().unwrap();
		assert_eq!(
			calls[1].1,
			vec![Turn::user("first"), Turn::assistant("one"), Turn::user("second")]
		);
	}

	#[tokio::test]
	async fn test_reset_clears_transcript() {
		let (mut chat, state) = chat_with(vec![]);
		chat.process_turn("hello").await;
		assert_eq!(chat.session().transcript().len(), 2);

		assert_eq!(chat.process_turn("RESET").await, Action::Reset);
		assert!(chat.session().transcript().is_empty());
		assert_eq!(state.calls.lock().unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_transcript_stays_balanced_across_mixed_rounds() {
		let (mut chat, _) = chat_with(vec![
			Ok("a".to_string()),
			Err(CompletionError::TransportFailure("down".to_string())),
			Ok("the bomb squad".to_string()),
			Err(CompletionError::EmptyResponse),
			Ok("b".to_string()),
		]);

		let inputs = [
			"hello", "", "kill it", "how are you", "tell me", "  ", "why not", "bye",
		];
		for input in inputs {
			chat.process_turn(input).await;
			assert_balanced(&chat);
		}

		assert_eq!(chat.session().transcript().len(), 6);
	}
}
