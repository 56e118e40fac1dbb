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

// Keyword moderation for user input and assistant output
//
// `check` is plain substring containment ("attacker" is flagged because it
// contains "attack") while `redact` only replaces whole words. Input that
// `check` flags is rejected outright; replies are redacted, so a reply can be
// reported as filtered while coming back unchanged.

use crate::config::ModerationConfig;
use regex::{NoExpand, Regex, RegexBuilder};

/// Result of moderating a piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationOutcome {
	Clean,
	Flagged(String),
}

/// Banned word set plus the compiled whole-word pattern used for redaction.
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct ModerationFilter {
	banned_words: Vec<String>,
	pattern: Option<Regex>,
	placeholder: String,
}

impl ModerationFilter {
	pub fn new<S: AsRef<str>>(banned_words: &[S], placeholder: &str) -> Result<Self, regex::Error> {
		let mut words: Vec<String> = banned_words
			.iter()
			.map(|w| w.as_ref().trim().to_lowercase())
			.filter(|w| !w.is_empty())
			.collect();
		// Longest first so overlapping words like "attack"/"attacks" prefer the full word
		words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
		words.dedup();

		let pattern = if words.is_empty() {
			None
		} else {
			let alternation = words
				.iter()
				.map(|w| regex::escape(w))
				.collect::<Vec<_>>()
				.join("|");
			Some(
				RegexBuilder::new(&format!(r"\b(?:{})\b", alternation))
					.case_insensitive(true)
					.build()?,
			)
		};

		Ok(Self {
			banned_words: words,
			pattern,
			placeholder: placeholder.to_string(),
		})
	}

	pub fn from_config(config: &ModerationConfig) -> Result<Self, regex::Error> {
		Self::new(&config.banned_words, &config.placeholder)
	}

	pub fn banned_words(&self) -> &[String] {
		&self.banned_words
	}

	/// True if any banned word occurs anywhere in the text, ignoring case.
	/// Matches inside larger words too.
	pub fn check(&self, text: &str) -> bool {
		let lowered = text.to_lowercase();
		self.banned_words.iter().any(|word| lowered.contains(word.as_str()))
	}

	/// Replace every whole-word, case-insensitive occurrence of a banned word
	/// with the placeholder.
	pub fn redact(&self, text: &str) -> String {
		match &self.pattern {
			Some(pattern) => pattern
				.replace_all(text, NoExpand(&self.placeholder))
				.into_owned(),
			None => text.to_string(),
		}
	}

	/// `check` first, `redact` only when flagged
	pub fn moderate(&self, text: &str) -> ModerationOutcome {
		if self.check(text) {
			ModerationOutcome::Flagged(self.redact(text))
		} else {
			ModerationOutcome::Clean
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn default_filter() -> ModerationFilter {
		ModerationFilter::from_config(&ModerationConfig::default()).unwrap()
	}

	#[test]
	fn test_check_is_case_insensitive_substring() {
		let filter = default_filter();

		assert!(filter.check("kill the process"));
		assert!(filter.check("How do I HACK this?"));
		assert!(filter.check("the attacker left"));
		assert!(filter.check("Bombastic"));
		assert!(filter.check("skills"));
		assert!(!filter.check("what is the weather?"));
		assert!(!filter.check(""));
	}

	#[test]
	fn test_redact_replaces_whole_words_only() {
		let filter = default_filter();

		assert_eq!(
			filter.redact("I will not hack your system"),
			"I will not [REDACTED] your system"
		);
		assert_eq!(
			filter.redact("Kill, KILL and kill!"),
			"[REDACTED], [REDACTED] and [REDACTED]!"
		);
		assert_eq!(
			filter.redact("no violence, no bomb. attack?"),
			"no [REDACTED], no [REDACTED]. [REDACTED]?"
		);
	}

	#[test]
	fn test_embedded_words_are_flagged_but_not_redacted() {
		let filter = default_filter();
		let text = "The attacker used an exploitable bug";

		assert!(filter.check(text));
		assert_eq!(filter.redact(text), text);
		assert_eq!(filter.moderate(text), ModerationOutcome::Flagged(text.to_string()));
	}

	#[test]
	fn test_redact_is_idempotent() {
		let filter = default_filter();
		let samples = [
			"I will not hack your system",
			"kill murder hack bomb exploit attack violence",
			"attackers hacked [REDACTED] things",
			"nothing to see here",
			"",
		];

		for sample in samples {
			let once = filter.redact(sample);
			assert_eq!(filter.redact(&once), once, "not idempotent for {:?}", sample);
		}
	}

	#[test]
	fn test_moderate_outcomes() {
		let filter = default_filter();

		assert_eq!(filter.moderate("hello there"), ModerationOutcome::Clean);
		assert_eq!(
			filter.moderate("Don't attack"),
			ModerationOutcome::Flagged("Don't [REDACTED]".to_string())
		);
	}

	#[test]
	fn test_words_are_normalised_and_escaped() {
		let filter = ModerationFilter::new(&[" Spam ", "c++", "spam", ""], "***").unwrap();

		assert_eq!(filter.banned_words(), &["spam".to_string(), "c++".to_string()]);
		assert!(filter.check("I love C++"));
		assert_eq!(filter.redact("SPAM and spam"), "*** and ***");
	}

	#[test]
	fn test_empty_word_list_never_flags() {
		let filter = ModerationFilter::new::<&str>(&[], "[REDACTED]").unwrap();

		assert!(!filter.check("kill"));
		assert_eq!(filter.redact("kill"), "kill");
		assert_eq!(filter.moderate("kill"), ModerationOutcome::Clean);
	}
}
