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

// Completion client abstraction
//
// The session manager only sees reply text or a `CompletionError`; everything
// transport specific stays inside the provider implementations.

use crate::session::Transcript;
use thiserror::Error;

pub mod openrouter;

pub use openrouter::OpenRouterProvider;

/// Failure kinds of a completion call. The session manager treats all of them
/// the same way: roll back the user turn and tell the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
	/// Network error, timeout, missing credential or a non-success status
	#[error("transport failure: {0}")]
	TransportFailure(String),
	/// Response body is not JSON or has no reply text where expected
	#[error("malformed response: {0}")]
	MalformedResponse(String),
	/// Reply text is empty or whitespace only
	#[error("empty response from the model")]
	EmptyResponse,
}

impl CompletionError {
	pub fn kind(&self) -> &'static str {
		match self {
			CompletionError::TransportFailure(_) => "TransportFailure",
			CompletionError::MalformedResponse(_) => "MalformedResponse",
			CompletionError::EmptyResponse => "EmptyResponse",
		}
	}
}

/// Trait that completion backends must implement
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
	/// Get the provider name (e.g., "openrouter")
	fn name(&self) -> &str;

	/// Send the system instruction followed by the transcript and return the reply text
	async fn complete(
		&self,
		system_instruction: &str,
		transcript: &Transcript,
		model: &str,
	) -> Result<String, CompletionError>;
}
