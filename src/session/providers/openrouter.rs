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

// OpenRouter provider implementation

use super::{CompletionClient, CompletionError};
use crate::config::{Config, RequestMode};
use crate::session::{Role, Transcript, Turn};
use crate::{log_debug, log_error, log_info};
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Message format for the OpenRouter API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenRouterMessage {
	pub role: String,
	pub content: String,
}

impl From<&Turn> for OpenRouterMessage {
	fn from(turn: &Turn) -> Self {
		Self {
			role: turn.role().as_str().to_string(),
			content: turn.content().to_string(),
		}
	}
}

/// OpenRouter chat completion client
pub struct OpenRouterProvider {
	client: Client,
	api_url: String,
	api_key: Option<String>,
	request_mode: RequestMode,
	temperature: f32,
	max_tokens: u32,
	min_tokens: u32,
}

impl OpenRouterProvider {
	pub fn from_config(config: &Config) -> Result<Self> {
		let mut builder = Client::builder()
			.pool_max_idle_per_host(10)
			.pool_idle_timeout(Duration::from_secs(90));
		if config.request_timeout_seconds > 0 {
			builder = builder.timeout(Duration::from_secs(config.request_timeout_seconds));
		}
		let client = builder.build().context("Failed to create HTTP client")?;

		Ok(Self {
			client,
			api_url: config.api_url.clone(),
			api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
			request_mode: config.request_mode,
			temperature: config.temperature,
			max_tokens: config.max_tokens,
			min_tokens: config.min_tokens,
		})
	}

	/// Build the JSON body: system message first, then the transcript
	/// (or just the latest user turn in minimal mode).
	pub fn build_request_body(
		&self,
		system_instruction: &str,
		transcript: &Transcript,
		model: &str,
	) -> serde_json::Value {
		let mut messages = vec![OpenRouterMessage {
			role: Role::System.as_str().to_string(),
			content: system_instruction.to_string(),
		}];

		match self.request_mode {
			RequestMode::Full => {
				messages.extend(transcript.turns().iter().map(OpenRouterMessage::from));

				serde_json::json!({
					"model": model,
					"messages": messages,
					"temperature": self.temperature,
					"max_tokens": self.max_tokens,
					"min_tokens": self.min_tokens,
				})
			}
			RequestMode::Minimal => {
				if let Some(turn) = transcript.last_user_turn() {
					messages.push(OpenRouterMessage::from(turn));
				}

				serde_json::json!({
					"model": model,
					"messages": messages,
				})
			}
		}
	}
}

#[async_trait::async_trait]
impl CompletionClient for OpenRouterProvider {
	fn name(&self) -> &str {
		"openrouter"
	}

	async fn complete(
		&self,
		system_instruction: &str,
		transcript: &Transcript,
		model: &str,
	) -> Result<String, CompletionError> {
		let Some(api_key) = self.api_key.as_deref() else {
			return Err(CompletionError::TransportFailure(
				"authorization rejected: OPENROUTER_API_KEY is not set".to_string(),
			));
		};

		let request_body = self.build_request_body(system_instruction, transcript, model);
		if let Ok(request_str) = serde_json::to_string_pretty(&request_body) {
			log_debug!("OpenRouter request body: {}", request_str);
		}

		// Track API request time
		let api_start = std::time::Instant::now();

		let response = self
			.client
			.post(&self.api_url)
			.header("Authorization", format!("Bearer {}", api_key))
			.header("Content-Type", "application/json")
			.header("HTTP-Referer", "http://localhost")
			.header("X-Title", "safechat")
			.json(&request_body)
			.send()
			.await
			.map_err(|e| {
				let reason = if e.is_timeout() {
					format!("request timed out: {}", e)
				} else {
					format!("request failed: {}", e)
				};
				log_error!("OpenRouter {}", reason);
				CompletionError::TransportFailure(reason)
			})?;

		let status = response.status();
		let response_text = response.text().await.map_err(|e| {
			CompletionError::TransportFailure(format!("failed to read response body: {}", e))
		})?;

		log_info!(
			"OpenRouter {} ({}) answered {} in {} ms",
			model,
			match self.request_mode {
				RequestMode::Full => "full",
				RequestMode::Minimal => "minimal",
			},
			status,
			api_start.elapsed().as_millis()
		);
		log_debug!("OpenRouter raw response: {}", response_text);

		parse_response(status, &response_text, model)
	}
}

/// Map an HTTP status and body to reply text or a typed failure
pub fn parse_response(
	status: StatusCode,
	response_text: &str,
	model: &str,
) -> Result<String, CompletionError> {
	let response_json = serde_json::from_str::<serde_json::Value>(response_text);

	if !status.is_success() {
		let mut error_details = vec![format!("HTTP {}", status), format!("Model: {}", model)];
		if let Some(msg) = response_json
			.as_ref()
			.ok()
			.and_then(|json| json.pointer("/error/message"))
			.and_then(|m| m.as_str())
		{
			error_details.push(format!("Message: {}", msg));
		}

		let full_error = error_details.join(" | ");
		log_error!("OpenRouter API HTTP error: {}", full_error);
		return Err(CompletionError::TransportFailure(full_error));
	}

	let response_json = response_json.map_err(|e| {
		CompletionError::MalformedResponse(format!("failed to parse response JSON: {}", e))
	})?;

	// Errors can also arrive inside a 200 body
	if let Some(error_obj) = response_json.get("error") {
		let error_message = error_obj
			.get("message")
			.and_then(|m| m.as_str())
			.unwrap_or("Unknown error");
		log_error!("OpenRouter API response error: {}", error_message);
		return Err(CompletionError::TransportFailure(format!(
			"HTTP 200 but error in response | Model: {} | Message: {}",
			model, error_message
		)));
	}

	let message = response_json
		.pointer("/choices/0/message")
		.and_then(|m| m.as_object())
		.ok_or_else(|| {
			CompletionError::MalformedResponse("unexpected response structure".to_string())
		})?;

	// A message without content counts as an empty answer
	let content = match message.get("content") {
		None | Some(serde_json::Value::Null) => return Err(CompletionError::EmptyResponse),
		Some(serde_json::Value::String(content)) => content,
		Some(other) => {
			return Err(CompletionError::MalformedResponse(format!(
				"message content is not text: {}",
				other
			)));
		}
	};

	if content.trim().is_empty() {
		return Err(CompletionError::EmptyResponse);
	}

	Ok(content.clone())
}
