//! Tag vocabulary embedded in user text by bash-mode local commands

use lazy_static::lazy_static;
use regex::Regex;

pub const CAVEAT_OPEN: &str = "<local-command-caveat>";
pub const BASH_INPUT_OPEN: &str = "<bash-input>";
pub const BASH_INPUT_CLOSE: &str = "</bash-input>";

const CAVEAT: &str = r"<local-command-caveat>.*?</local-command-caveat>";
const BASH_INPUT: &str = r"<bash-input>.*?</bash-input>";

lazy_static! {
    /// A field that is nothing but one command echo. Bodies are greedy so the
    /// match runs to the last stdout/stderr close tag.
    pub static ref COMMAND_ECHO_WHOLE: Regex = Regex::new(&format!(
        r"(?s)\A(?:{CAVEAT}\s*)?(?:{BASH_INPUT}\s*)?<bash-stdout>.*</bash-stdout>\s*<bash-stderr>.*</bash-stderr>\z"
    ))
    .unwrap();

    /// A command echo embedded in longer text.
    pub static ref COMMAND_ECHO_SPAN: Regex = Regex::new(&format!(
        r"(?s)(?:{CAVEAT}\s*)?(?:{BASH_INPUT}\s*)?<bash-stdout>.*?</bash-stdout>\s*<bash-stderr>.*?</bash-stderr>"
    ))
    .unwrap();

    pub static ref MARKED_SPAN: Regex = Regex::new(r"(?s)<clean>.*?</clean>").unwrap();
}

/// Text is only a `<bash-input>` command line, with no captured output.
pub fn is_bare_command(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.starts_with(BASH_INPUT_OPEN) && trimmed.ends_with(BASH_INPUT_CLOSE)
}

/// Text carries a caveat without the command it would introduce.
pub fn is_unpaired_caveat(text: &str) -> bool {
    text.contains(CAVEAT_OPEN) && !text.contains(BASH_INPUT_OPEN)
}

pub fn has_command_input(text: &str) -> bool {
    text.contains(BASH_INPUT_OPEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_command() {
        assert!(is_bare_command("<bash-input>ls -la</bash-input>"));
        assert!(is_bare_command("  <bash-input>cargo build</bash-input>\n"));
        assert!(!is_bare_command(
            "<bash-input>ls</bash-input><bash-stdout>a.rs</bash-stdout><bash-stderr></bash-stderr>"
        ));
        assert!(!is_bare_command("please run <bash-input>ls</bash-input>"));
    }

    #[test]
    fn test_unpaired_caveat() {
        assert!(is_unpaired_caveat(
            "<local-command-caveat>Caveat: generated by local commands</local-command-caveat>"
        ));
        assert!(!is_unpaired_caveat(
            "<local-command-caveat>c</local-command-caveat><bash-input>ls</bash-input>"
        ));
    }

    #[test]
    fn test_whole_echo_is_greedy() {
        let text = "<bash-stdout>a</bash-stdout><bash-stderr></bash-stderr> middle <bash-stdout>b</bash-stdout><bash-stderr></bash-stderr>";
        assert!(COMMAND_ECHO_WHOLE.is_match(text));
        let first = COMMAND_ECHO_SPAN.find(text).unwrap();
        assert!(first.as_str().starts_with("<bash-stdout>a</bash-stdout>"));
        assert!(!first.as_str().contains("middle"));
    }

    #[test]
    fn test_echo_requires_stderr() {
        assert!(!COMMAND_ECHO_SPAN.is_match("<bash-stdout>out</bash-stdout> no stderr"));
        assert!(COMMAND_ECHO_SPAN.is_match("<bash-stdout>out</bash-stdout>\n<bash-stderr>err</bash-stderr>"));
    }

    #[test]
    fn test_echo_with_caveat_and_input() {
        let text = "<local-command-caveat>Caveat</local-command-caveat>\n<bash-input>ls</bash-input>\n<bash-stdout>a.rs</bash-stdout><bash-stderr></bash-stderr>";
        let found = COMMAND_ECHO_SPAN.find(text).unwrap();
        assert_eq!(found.as_str(), text);
    }

    #[test]
    fn test_command_input() {
        assert!(has_command_input("<bash-input>ls -la</bash-input>"));
        assert!(!has_command_input("ls -la"));
    }
}
