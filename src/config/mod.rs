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

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::PathBuf;

pub mod loading;
pub mod validation;


#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
	#[serde(rename = "none")]
	None,
	#[serde(rename = "info")]
	Info,
	#[serde(rename = "debug")]
	Debug,
}

impl Default for LogLevel {
	fn default() -> Self {
		Self::None
	}
}

impl LogLevel {
	/// Check if info logging is enabled
	pub fn is_info_enabled(&self) -> bool {
		matches!(self, LogLevel::Info | LogLevel::Debug)
	}

	/// Check if debug logging is enabled
	pub fn is_debug_enabled(&self) -> bool {
		matches!(self, LogLevel::Debug)
	}
}

/// Shape of the chat completion request body
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RequestMode {
	/// System message, the whole transcript and generation parameters
	#[default]
	Full,
	/// System message and the latest user message only, no generation parameters
	Minimal,
}

// Default functions
fn default_model() -> String {
	"mistralai/mistral-7b-instruct".to_string()
}

fn default_api_url() -> String {
	"https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_temperature() -> f32 {
	0.7
}

fn default_max_tokens() -> u32 {
	500
}

fn default_min_tokens() -> u32 {
	20
}

fn default_request_timeout_seconds() -> u64 {
	300 // 5 min, 0 disables the timeout
}

fn default_banned_words() -> Vec<String> {
	["kill", "murder", "hack", "bomb", "exploit", "attack", "violence"]
		.iter()
		.map(|w| w.to_string())
		.collect()
}

fn default_placeholder() -> String {
	"[REDACTED]".to_string()
}

pub const USER_NAME_PLACEHOLDER: &str = "%{USER_NAME}";

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful and safe AI assistant talking to a user named %{USER_NAME}.

IMPORTANT INSTRUCTIONS:
- Address the user as %{USER_NAME} naturally in your responses when appropriate
- Don't overuse their name - use it naturally like in normal conversation
- Respond to ALL user inputs whether they have punctuation or not
- Treat inputs as questions even without question marks if they seem like questions
- Understand commands, greetings, statements, and questions equally well
- Always provide complete, detailed, and helpful responses
- Never respond with just a single word or empty response
- Be conversational and friendly

SAFETY RULES:
- Refuse to provide harmful, dangerous, or illegal information
- Avoid discussing violence, hacking, or harmful activities
- Maintain a respectful and constructive tone";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ModerationConfig {
	/// Tokens matched case-insensitively against input and output
	#[serde(default = "default_banned_words")]
	pub banned_words: Vec<String>,
	/// Marker written in place of banned whole words in replies
	#[serde(default = "default_placeholder")]
	pub placeholder: String,
}

impl Default for ModerationConfig {
	fn default() -> Self {
		Self {
			banned_words: default_banned_words(),
			placeholder: default_placeholder(),
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
	#[serde(default)]
	pub log_level: LogLevel,

	// Fixed model identifier sent with every request
	#[serde(default = "default_model")]
	pub model: String,

	#[serde(default = "default_api_url")]
	pub api_url: String,

	// OPENROUTER_API_KEY takes precedence when set
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub api_key: Option<String>,

	#[serde(default)]
	pub request_mode: RequestMode,

	// Generation parameters, only sent in full request mode
	#[serde(default = "default_temperature")]
	pub temperature: f32,
	#[serde(default = "default_max_tokens")]
	pub max_tokens: u32,
	#[serde(default = "default_min_tokens")]
	pub min_tokens: u32,

	#[serde(default = "default_request_timeout_seconds")]
	pub request_timeout_seconds: u64,

	// Custom system prompt, %{USER_NAME} is replaced with the display name
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub system: Option<String>,

	#[serde(default)]
	pub moderation: ModerationConfig,

	#[serde(skip)]
	config_path: Option<PathBuf>,

	#[serde(skip)]
	api_key_from_env: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			log_level: LogLevel::default(),
			model: default_model(),
			api_url: default_api_url(),
			api_key: None,
			request_mode: RequestMode::default(),
			temperature: default_temperature(),
			max_tokens: default_max_tokens(),
			min_tokens: default_min_tokens(),
			request_timeout_seconds: default_request_timeout_seconds(),
			system: None,
			moderation: ModerationConfig::default(),
			config_path: None,
			api_key_from_env: false,
		}
	}
}

impl Config {
	/// Get the global log level (system-wide setting)
	pub fn get_log_level(&self) -> LogLevel {
		self.log_level
	}

	/// Path this config was loaded from or will be saved to
	pub fn config_path(&self) -> Option<&std::path::Path> {
		self.config_path.as_deref()
	}

	/// Build the system instruction sent ahead of the transcript
	pub fn system_instruction(&self, display_name: &str) -> String {
		let template = self.system.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT);
		template.replace(USER_NAME_PLACEHOLDER, display_name)
	}

	pub fn has_api_key(&self) -> bool {
		self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
	}
}

// Logging macros for different log levels
// These macros automatically check the current log level and only print if appropriate

thread_local! {
	static CURRENT_CONFIG: RefCell<Option<Config>> = const { RefCell::new(None) };
}

/// Set the current config for the thread (to be used by logging macros)
pub fn set_thread_config(config: &Config) {
	CURRENT_CONFIG.with(|c| {
		*c.borrow_mut() = Some(config.clone());
	});
}

/// Get the current config for the thread
pub fn with_thread_config<F, R>(f: F) -> Option<R>
where
	F: FnOnce(&Config) -> R,
{
	CURRENT_CONFIG.with(|c| (*c.borrow()).as_ref().map(f))
}

/// Info logging macro with automatic cyan coloring
/// Shows info messages when log level is Info OR Debug
#[macro_export]
macro_rules! log_info {
	($fmt:expr) => {
		if let Some(true) = $crate::config::with_thread_config(|config| config.get_log_level().is_info_enabled()) {
			use colored::Colorize;
			println!("{}", $fmt.cyan());
		}
	};
	($fmt:expr, $($arg:expr),*) => {
		if let Some(true) = $crate::config::with_thread_config(|config| config.get_log_level().is_info_enabled()) {
			use colored::Colorize;
			println!("{}", format!($fmt, $($arg),*).cyan());
		}
	};
}

/// Debug logging macro with automatic bright blue coloring
#[macro_export]
macro_rules! log_debug {
	($fmt:expr) => {
		if let Some(true) = $crate::config::with_thread_config(|config| config.get_log_level().is_debug_enabled()) {
			use colored::Colorize;
			println!("{}", $fmt.bright_blue());
		}
	};
	($fmt:expr, $($arg:expr),*) => {
		if let Some(true) = $crate::config::with_thread_config(|config| config.get_log_level().is_debug_enabled()) {
			use colored::Colorize;
			println!("{}", format!($fmt, $($arg),*).bright_blue());
		}
	};
}

/// Error logging macro with automatic bright red coloring
/// Always visible regardless of log level (errors should always be shown)
#[macro_export]
macro_rules! log_error {
	($fmt:expr) => {{
		use colored::Colorize;
		eprintln!("{}", $fmt.bright_red());
	}};
	($fmt:expr, $($arg:expr),*) => {{
		use colored::Colorize;
		eprintln!("{}", format!($fmt, $($arg),*).bright_red());
	}};
}
