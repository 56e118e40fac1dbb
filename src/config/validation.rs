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

use anyhow::{anyhow, Result};

use super::Config;
use crate::session::moderation::ModerationFilter;
use regex::Regex;

impl Config {
	/// Validate the configuration for common issues
	pub fn validate(&self) -> Result<()> {
		self.validate_model()?;
		self.validate_generation_params()?;
		self.validate_moderation()?;
		Ok(())
	}

	pub fn validate_model(&self) -> Result<()> {
		if self.model.trim().is_empty() {
			return Err(anyhow!("Model identifier must not be empty"));
		}
		if self.api_url.trim().is_empty() {
			return Err(anyhow!("Completion endpoint URL must not be empty"));
		}
		Ok(())
	}

	pub fn validate_generation_params(&self) -> Result<()> {
		if !(0.0..=2.0).contains(&self.temperature) {
			return Err(anyhow!(
				"Temperature out of range: {}. Allowed range: 0.0 to 2.0",
				self.temperature
			));
		}

		if self.max_tokens == 0 {
			return Err(anyhow!("max_tokens must be greater than 0"));
		}

		if self.min_tokens > self.max_tokens {
			return Err(anyhow!(
				"min_tokens ({}) cannot be greater than max_tokens ({})",
				self.min_tokens,
				self.max_tokens
			));
		}

		Ok(())
	}

	/// Banned words must be single word-character tokens and the placeholder must
	/// survive redaction, otherwise redacting twice would not give the same text.
	pub fn validate_moderation(&self) -> Result<()> {
		let moderation = &self.moderation;

		// Whole-word redaction can only remove tokens made of word characters
		let token = Regex::new(r"^\w+$")?;
		if let Some(word) = moderation
			.banned_words
			.iter()
			.find(|w| !token.is_match(w))
		{
			return Err(anyhow!(
				"Invalid banned word '{}': words must be a single token of letters, digits or '_'",
				word
			));
		}

		if moderation.placeholder.is_empty() {
			return Err(anyhow!("Moderation placeholder must not be empty"));
		}

		let filter = ModerationFilter::new(&moderation.banned_words, &moderation.placeholder)?;
		if filter.redact(&moderation.placeholder) != moderation.placeholder {
			return Err(anyhow!(
				"Moderation placeholder '{}' contains a banned word",
				moderation.placeholder
			));
		}

		Ok(())
	}
}
