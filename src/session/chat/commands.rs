// Chat commands module
//
// Commands are plain words matched case-insensitively against the trimmed input.

pub const EXIT_COMMAND: &str = "exit";
pub const QUIT_COMMAND: &str = "quit";
pub const RESET_COMMAND: &str = "reset";

// List of all available commands for autocomplete
pub const COMMANDS: [&str; 3] = [EXIT_COMMAND, QUIT_COMMAND, RESET_COMMAND];

pub fn is_exit_command(input: &str) -> bool {
	input.eq_ignore_ascii_case(EXIT_COMMAND) || input.eq_ignore_ascii_case(QUIT_COMMAND)
}

pub fn is_reset_command(input: &str) -> bool {
	input.eq_ignore_ascii_case(RESET_COMMAND)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_command_matching() {
		assert!(is_exit_command("exit"));
		assert!(is_exit_command("QUIT"));
		assert!(is_exit_command("Exit"));
		assert!(!is_exit_command("exit now"));
		assert!(is_reset_command("Reset"));
		assert!(!is_reset_command("resets"));
	}
}
