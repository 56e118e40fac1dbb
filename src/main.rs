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

use clap::{Parser, Subcommand};
use safechat::config::{Config, LogLevel};
use safechat::session::chat::run_interactive_session;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "safechat")]
#[command(version = "0.1.0")]
#[command(about = "Chat with a hosted language model through a keyword moderation filter")]
struct SafechatArgs {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Name to be addressed by (skips the name prompt)
	#[arg(long, short)]
	name: Option<String>,

	/// Path to a configuration file instead of the system-wide one
	#[arg(long, short)]
	config: Option<PathBuf>,

	/// Override the configured log level
	#[arg(long, value_enum)]
	log_level: Option<LogLevel>,
}

#[derive(Subcommand)]
enum Commands {
	/// Generate a default configuration file
	Config,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
	let args = SafechatArgs::parse();

	if let Some(Commands::Config) = &args.command {
		let config_path = Config::create_default_config(args.config.as_deref())?;
		println!("Configuration file: {}", config_path.display());
		return Ok(());
	}

	let mut config = match &args.config {
		Some(path) => Config::load_from_path(path)?,
		None => Config::load()?,
	};

	if let Some(log_level) = args.log_level {
		config.log_level = log_level;
	}

	run_interactive_session(args.name, &config).await
}
