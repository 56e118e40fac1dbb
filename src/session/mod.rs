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

// Session module: conversation state, moderation and the completion client

pub mod chat; // Chat session logic
mod chat_helper; // Chat command completion
pub mod moderation; // Banned word check and redaction
pub mod providers; // Completion client abstraction

pub use moderation::{ModerationFilter, ModerationOutcome};
pub use providers::{CompletionClient, CompletionError, OpenRouterProvider};

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_DISPLAY_NAME: &str = "Friend";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	User,
	Assistant,
	System,
}

impl Role {
	pub fn as_str(&self) -> &'static str {
		match self {
			Role::User => "user",
			Role::Assistant => "assistant",
			Role::System => "system",
		}
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One message of the conversation. Fields are read-only once created.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Turn {
	role: Role,
	content: String,
}

impl Turn {
	pub fn new(role: Role, content: impl Into<String>) -> Self {
		Self {
			role,
			content: content.into(),
		}
	}

	pub fn user(content: impl Into<String>) -> Self {
		Self::new(Role::User, content)
	}

	pub fn assistant(content: impl Into<String>) -> Self {
		Self::new(Role::Assistant, content)
	}

	pub fn role(&self) -> Role {
		self.role
	}

	pub fn content(&self) -> &str {
		&self.content
	}
}

/// Chronological list of turns. Only the session manager appends to it, and it
/// only shrinks through rollback of the most recent turn or a full reset.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
	turns: Vec<Turn>,
}

impl Transcript {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn turns(&self) -> &[Turn] {
		&self.turns
	}

	pub fn len(&self) -> usize {
		self.turns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.turns.is_empty()
	}

	pub fn last(&self) -> Option<&Turn> {
		self.turns.last()
	}

	/// Most recent user turn, if any
	pub fn last_user_turn(&self) -> Option<&Turn> {
		self.turns.iter().rev().find(|t| t.role == Role::User)
	}

	pub fn count_role(&self, role: Role) -> usize {
		self.turns.iter().filter(|t| t.role == role).count()
	}

	pub(crate) fn push(&mut self, turn: Turn) {
		self.turns.push(turn);
	}

	pub(crate) fn rollback(&mut self) -> Option<Turn> {
		self.turns.pop()
	}

	pub(crate) fn clear(&mut self) {
		self.turns.clear();
	}
}

/// Per-process conversation: who we are talking to and what was said.
/// Never persisted.
#[derive(Debug, Clone)]
pub struct Session {
	display_name: String,
	transcript: Transcript,
}

impl Default for Session {
	fn default() -> Self {
		Self::new(DEFAULT_DISPLAY_NAME)
	}
}

impl Session {
	pub fn new(display_name: impl Into<String>) -> Self {
		Self {
			display_name: display_name.into(),
			transcript: Transcript::new(),
		}
	}

	pub fn display_name(&self) -> &str {
		&self.display_name
	}

	pub fn transcript(&self) -> &Transcript {
		&self.transcript
	}

	pub(crate) fn set_display_name(&mut self, name: impl Into<String>) {
		self.display_name = name.into();
	}

	pub(crate) fn transcript_mut(&mut self) -> &mut Transcript {
		&mut self.transcript
	}
}
