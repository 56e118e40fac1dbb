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

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;

pub const OPENROUTER_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

impl Config {
	/// Load configuration from the system-wide config file
	pub fn load() -> Result<Self> {
		let config_path = crate::directories::get_config_file_path()?;
		Self::load_or_default(config_path)
	}

	/// Load configuration from `path` if it exists, otherwise start from defaults.
	/// The credential is always read from the environment afterwards.
	pub fn load_or_default(config_path: PathBuf) -> Result<Self> {
		let mut config = if config_path.exists() {
			let config_str = fs::read_to_string(&config_path).context(format!(
				"Failed to read config from {}",
				config_path.display()
			))?;
			toml::from_str::<Config>(&config_str).context("Failed to parse TOML configuration")?
		} else {
			Self::default()
		};

		// Remember where the configuration came from
		config.config_path = Some(config_path);

		// Environment variables take precedence over config file values
		config.apply_env_api_key(std::env::var(OPENROUTER_API_KEY_ENV).ok());

		// Validate the loaded configuration
		config.validate()?;

		Ok(config)
	}

	/// Load configuration from a specific file path, failing if it is missing
	pub fn load_from_path(path: &Path) -> Result<Self> {
		let config_str = fs::read_to_string(path)
			.context(format!("Failed to read config from {}", path.display()))?;
		let mut config: Config =
			toml::from_str(&config_str).context("Failed to parse TOML configuration")?;

		config.config_path = Some(path.to_path_buf());
		config.apply_env_api_key(std::env::var(OPENROUTER_API_KEY_ENV).ok());
		config.validate()?;

		Ok(config)
	}

	fn apply_env_api_key(&mut self, env_key: Option<String>) {
		if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
			self.api_key = Some(key);
			self.api_key_from_env = true;
		}
	}

	/// Save configuration to a specific file path
	pub fn save_to_path(&self, path: &Path) -> Result<()> {
		// Validate before saving
		self.validate()?;

		// Ensure the parent directory exists
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).context(format!(
				"Failed to create config directory: {}",
				parent.display()
			))?;
		}

		let config_str = toml::to_string_pretty(&self.create_clean_copy_for_saving())
			.context("Failed to serialize configuration to TOML")?;

		fs::write(path, config_str)
			.context(format!("Failed to write config to {}", path.display()))?;

		Ok(())
	}

	/// Create a clean copy of the config for saving (removes runtime-only fields)
	pub fn create_clean_copy_for_saving(&self) -> Self {
		let mut clean_config = self.clone();

		// Never persist a credential that came from the environment
		if clean_config.api_key_from_env {
			clean_config.api_key = None;
			clean_config.api_key_from_env = false;
		}

		clean_config
	}

	/// Write a default configuration file, keeping an existing one untouched
	pub fn create_default_config(path: Option<&Path>) -> Result<PathBuf> {
		let config_path = match path {
			Some(path) => path.to_path_buf(),
			None => crate::directories::get_config_file_path()?,
		};

		if !config_path.exists() {
			Self::default().save_to_path(&config_path)?;
		}

		Ok(config_path)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::{LogLevel, RequestMode};

	#[test]
	fn test_missing_file_falls_back_to_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.toml");

		let config = Config::load_or_default(path.clone()).unwrap();
		assert_eq!(config.model, "mistralai/mistral-7b-instruct");
		assert_eq!(config.config_path(), Some(path.as_path()));
	}

	#[test]
	fn test_save_and_load_from_path() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested").join("config.toml");

		let config = Config {
			log_level: LogLevel::Info,
			request_mode: RequestMode::Minimal,
			model: "google/gemma-2-9b-it:free".to_string(),
			..Default::default()
		};
		config.save_to_path(&path).unwrap();

		let loaded = Config::load_from_path(&path).unwrap();
		assert_eq!(loaded.log_level, LogLevel::Info);
		assert_eq!(loaded.request_mode, RequestMode::Minimal);
		assert_eq!(loaded.model, "google/gemma-2-9b-it:free");
	}

	#[test]
	fn test_invalid_toml_is_reported() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.toml");
		fs::write(&path, "temperature = \"hot\"").unwrap();

		let err = Config::load_from_path(&path).unwrap_err();
		assert!(err.to_string().contains("Failed to parse TOML configuration"));
	}

	#[test]
	fn test_env_key_overrides_file_key() {
		let mut config = Config {
			api_key: Some("from-file".to_string()),
			..Default::default()
		};

		config.apply_env_api_key(Some("   ".to_string()));
		assert_eq!(config.api_key.as_deref(), Some("from-file"));

		config.apply_env_api_key(Some("from-env".to_string()));
		assert_eq!(config.api_key.as_deref(), Some("from-env"));
		assert!(config.api_key_from_env);
	}

	#[test]
	fn test_create_default_config_keeps_existing_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.toml");
		fs::write(&path, "model = \"custom/model\"\n").unwrap();

		let written = Config::create_default_config(Some(&path)).unwrap();
		assert_eq!(written, path);
		assert_eq!(fs::read_to_string(&path).unwrap(), "model = \"custom/model\"\n");
	}
}
