//! Tag scrubbing inside free-form text fields
//!
//! Runs over `message.content` when it is a plain string, and over the `text`
//! of every content item otherwise. Only the tagged sub-spans change; the
//! rest of the text is kept as written.

use effacer_core::{Category, Ledger, Record};
use serde_json::Value;

use crate::tags::{COMMAND_ECHO_SPAN, COMMAND_ECHO_WHOLE, MARKED_SPAN};

#[derive(Debug, Clone, Copy, Default)]
pub struct Scrubber;

impl Scrubber {
    pub fn new() -> Self {
        Self
    }

    pub fn scrub(&self, record: &mut Record, ledger: &mut Ledger) {
        let Some(content) = record.value.pointer_mut("/message/content") else {
            return;
        };
        match content {
            Value::String(text) => {
                if let Some(scrubbed) = self.scrub_text(text, ledger) {
                    *text = scrubbed;
                }
            }
            Value::Array(items) => {
                for item in items {
                    if let Some(Value::String(text)) = item.get_mut("text") {
                        if let Some(scrubbed) = self.scrub_text(text, ledger) {
                            *text = scrubbed;
                        }
                    }
                }
            }
            _ => {}
        }
    }

    /// Scrubbed copy of `text`, or `None` when nothing matched.
    pub fn scrub_text(&self, text: &str, ledger: &mut Ledger) -> Option<String> {
        let echo = Category::CommandEcho.placeholder();
        let trimmed = text.trim();

        let after_echo = if COMMAND_ECHO_WHOLE.is_match(trimmed) {
            ledger.record(Category::CommandEcho, text.len(), echo.len());
            Some(echo.to_string())
        } else {
            replace_each(text, &COMMAND_ECHO_SPAN, Category::CommandEcho, ledger)
        };

        let current = after_echo.as_deref().unwrap_or(text);
        match replace_each(current, &MARKED_SPAN, Category::MarkedSpan, ledger) {
            Some(scrubbed) => Some(scrubbed),
            None => after_echo,
        }
    }
}

/// Replace every match independently, one ledger entry per span.
fn replace_each(
    text: &str,
    pattern: &regex::Regex,
    category: Category,
    ledger: &mut Ledger,
) -> Option<String> {
    let placeholder = category.placeholder();
    let mut matched = false;
    let replaced = pattern.replace_all(text, |caps: &regex::Captures<'_>| {
        matched = true;
        ledger.record(category, caps[0].len(), placeholder.len());
        placeholder.to_string()
    });
    matched.then(|| replaced.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_whole_field_echo() {
        let scrubber = Scrubber::new();
        let mut ledger = Ledger::new();
        let text = "  <local-command-caveat>Caveat</local-command-caveat>\n<bash-input>cat notes</bash-input>\n<bash-stdout>x</bash-stdout><bash-stderr></bash-stderr> <bash-stdout>y</bash-stdout><bash-stderr></bash-stderr>\n";

        let scrubbed = scrubber.scrub_text(text, &mut ledger).unwrap();
        assert_eq!(scrubbed, Category::CommandEcho.placeholder());
        assert_eq!(ledger.get(Category::CommandEcho).count, 1);
    }

    #[test]
    fn test_embedded_echo() {
        let scrubber = Scrubber::new();
        let mut ledger = Ledger::new();
        let text = "before <bash-stdout>out</bash-stdout><bash-stderr>err</bash-stderr> after";

        let scrubbed = scrubber.scrub_text(text, &mut ledger).unwrap();
        assert_eq!(scrubbed, "before [local command effaced] after");
    }

    #[test]
    fn test_marked_spans_replaced_independently() {
        let scrubber = Scrubber::new();
        let mut ledger = Ledger::new();
        let text = "keep <clean>secret one</clean> middle\n<clean>secret\ntwo</clean> tail";

        let scrubbed = scrubber.scrub_text(text, &mut ledger).unwrap();
        assert_eq!(
            scrubbed,
            "keep [marked text effaced] middle\n[marked text effaced] tail"
        );
        assert_eq!(ledger.get(Category::MarkedSpan).count, 2);
    }

    #[test]
    fn test_stdout_without_stderr_untouched() {
        let scrubber = Scrubber::new();
        let mut ledger = Ledger::new();

        assert!(
            scrubber
                .scrub_text("<bash-stdout>out</bash-stdout>", &mut ledger)
                .is_none()
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_echo_in_content_item() {
        let scrubber = Scrubber::new();
        let mut ledger = Ledger::new();
        let mut record = Record::from_value(json!({
            "type": "user",
            "message": {"role": "user", "content": [
                {"type": "text", "text": "ran <bash-stdout>a.rs\nb.rs</bash-stdout><bash-stderr></bash-stderr> then"}
            ]}
        }));

        scrubber.scrub(&mut record, &mut ledger);
        assert_eq!(
            record.value.pointer("/message/content/0/text"),
            Some(&json!("ran [local command effaced] then"))
        );
        assert_eq!(ledger.get(Category::CommandEcho).count, 1);
    }

    #[test]
    fn test_plain_text_untouched() {
        let scrubber = Scrubber::new();
        let mut ledger = Ledger::new();

        assert!(scrubber.scrub_text("nothing tagged", &mut ledger).is_none());
        assert!(
            scrubber
                .scrub_text(Category::CommandEcho.placeholder(), &mut ledger)
                .is_none()
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_scrub_content_items() {
        let scrubber = Scrubber::new();
        let mut ledger = Ledger::new();
        let mut record = Record::from_value(json!({
            "type": "user",
            "message": {"role": "user", "content": [
                {"type": "text", "text": "a <clean>b</clean> c"},
                {"type": "tool_result", "content": "<clean>untouched</clean>"}
            ]}
        }));

        scrubber.scrub(&mut record, &mut ledger);
        assert_eq!(
            record.value.pointer("/message/content/0/text"),
            Some(&json!("a [marked text effaced] c"))
        );
        assert_eq!(
            record.value.pointer("/message/content/1/content"),
            Some(&json!("<clean>untouched</clean>"))
        );
    }
}
