//! Built-in redaction rules
//!
//! Each rule touches one known shape of the transcript and rewrites leaf
//! values only. Keys are never added or removed, and a string stays a string,
//! a list stays a list.

use effacer_core::placeholder::IMAGE_MEDIA_TYPE;
use effacer_core::{Category, Ledger};
use serde_json::{Map, Value};

use crate::redactor::{RedactionRule, Rule};

pub fn builtin() -> Vec<Box<dyn RedactionRule>> {
    let rules = [
        Rule { name: "thinking", matches: is_thinking, apply: efface_thinking },
        Rule { name: "file_read", matches: is_file_read, apply: efface_file_read },
        Rule { name: "write_input", matches: is_write_input, apply: efface_write_input },
        Rule { name: "write_result", matches: is_write_result, apply: efface_write_result },
        Rule { name: "edit_input", matches: is_edit_input, apply: efface_edit_input },
        Rule { name: "edit_result", matches: is_edit_result, apply: efface_edit_result },
        Rule { name: "command_input", matches: is_command_input, apply: efface_command_input },
        Rule { name: "command_result", matches: is_command_result, apply: efface_command_result },
        Rule { name: "search_result", matches: is_search_result, apply: efface_search_result },
        Rule { name: "plan_input", matches: is_plan_input, apply: efface_plan_input },
        Rule { name: "tool_result", matches: has_tool_result_item, apply: efface_tool_result_items },
        Rule { name: "list_tool_result", matches: is_list_tool_result, apply: efface_list_tool_result },
        Rule { name: "task_output", matches: is_task_output, apply: efface_task_output },
        Rule { name: "task_content", matches: is_task_content, apply: efface_task_content },
        Rule { name: "bash_progress", matches: is_bash_progress, apply: efface_bash_progress },
        Rule { name: "agent_progress", matches: is_agent_progress, apply: efface_agent_progress },
        Rule { name: "file_path", matches: has_file_path_input, apply: shorten_file_path_input },
        Rule { name: "meta_text", matches: is_meta, apply: efface_meta_text },
        Rule { name: "inline_image", matches: has_image, apply: efface_images },
    ];
    rules
        .into_iter()
        .map(|rule| Box::new(rule) as Box<dyn RedactionRule>)
        .collect()
}

// ----------------------------------------------------------------------------
// Shape helpers
// ----------------------------------------------------------------------------

fn item_type(item: &Value) -> Option<&str> {
    item.get("type").and_then(Value::as_str)
}

fn content_items(record: &Value) -> &[Value] {
    record
        .pointer("/message/content")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn content_items_mut(record: &mut Value) -> Option<&mut Vec<Value>> {
    record.pointer_mut("/message/content")?.as_array_mut()
}

fn tool_use_result(record: &Value) -> Option<&Map<String, Value>> {
    record.get("toolUseResult")?.as_object()
}

fn tool_use_result_mut(record: &mut Value) -> Option<&mut Map<String, Value>> {
    record.get_mut("toolUseResult")?.as_object_mut()
}

fn is_tool_use(item: &Value, names: &[&str]) -> bool {
    item_type(item) == Some("tool_use")
        && item
            .get("name")
            .and_then(Value::as_str)
            .is_some_and(|name| names.contains(&name))
}

fn has_tool_use(record: &Value, names: &[&str]) -> bool {
    content_items(record).iter().any(|item| is_tool_use(item, names))
}

/// Run `f` on the `input` mapping of every matching tool invocation.
fn for_each_tool_input(
    record: &mut Value,
    names: &[&str],
    mut f: impl FnMut(&mut Map<String, Value>) -> Option<()>,
) -> Option<()> {
    for item in content_items_mut(record)? {
        if !is_tool_use(item, names) {
            continue;
        }
        if let Some(input) = item.get_mut("input") {
            f(input.as_object_mut()?)?;
        }
    }
    Some(())
}

fn efface_key(
    obj: &mut Map<String, Value>,
    key: &str,
    category: Category,
    ledger: &mut Ledger,
) -> Option<()> {
    match obj.get_mut(key) {
        Some(slot) => ledger.efface_str(slot, category),
        None => Some(()),
    }
}

fn shorten_path_key(
    obj: &mut Map<String, Value>,
    key: &str,
    category: Category,
    ledger: &mut Ledger,
) -> Option<()> {
    match obj.get_mut(key) {
        Some(slot) => ledger.efface_path(slot, category),
        None => Some(()),
    }
}

fn clear_list_key(
    obj: &mut Map<String, Value>,
    key: &str,
    category: Category,
    ledger: &mut Ledger,
) -> Option<()> {
    match obj.get_mut(key) {
        Some(slot) => ledger.efface_list(slot, category, Vec::new()),
        None => Some(()),
    }
}

/// Efface the `text` of every mapping in a list, skipping items without one.
fn efface_item_texts(list: &mut Value, category: Category, ledger: &mut Ledger) -> Option<()> {
    for item in list.as_array_mut()? {
        if let Some(obj) = item.as_object_mut() {
            efface_key(obj, "text", category, ledger)?;
        }
    }
    Some(())
}

/// A string is effaced whole; a list has each item's `text` effaced.
fn efface_text_or_items(slot: &mut Value, category: Category, ledger: &mut Ledger) -> Option<()> {
    match slot {
        Value::Null => Some(()),
        Value::String(_) => ledger.efface_str(slot, category),
        Value::Array(_) => efface_item_texts(slot, category, ledger),
        _ => None,
    }
}

fn is_progress(record: &Value, data_type: &str) -> bool {
    record.get("type").and_then(Value::as_str) == Some("progress")
        && record.pointer("/data/type").and_then(Value::as_str) == Some(data_type)
}

fn is_write_result_shape(result: &Map<String, Value>) -> bool {
    result.contains_key("content")
        && matches!(
            result.get("type").and_then(Value::as_str),
            Some("create" | "update")
        )
}

// ----------------------------------------------------------------------------
// Reasoning
// ----------------------------------------------------------------------------

fn is_thinking(record: &Value) -> bool {
    content_items(record).first().and_then(item_type) == Some("thinking")
}

fn efface_thinking(record: &mut Value, ledger: &mut Ledger) -> Option<()> {
    let item = content_items_mut(record)?.first_mut()?.as_object_mut()?;
    efface_key(item, "thinking", Category::Thinking, ledger)
}

// ----------------------------------------------------------------------------
// File tools
// ----------------------------------------------------------------------------

fn is_file_read(record: &Value) -> bool {
    tool_use_result(record)
        .and_then(|r| r.get("file"))
        .is_some_and(Value::is_object)
}

fn efface_file_read(record: &mut Value, ledger: &mut Ledger) -> Option<()> {
    let file = tool_use_result_mut(record)?.get_mut("file")?.as_object_mut()?;
    efface_key(file, "content", Category::FileRead, ledger)?;
    shorten_path_key(file, "filePath", Category::FileRead, ledger)?;
    // image reads carry their bytes here instead of in `content`
    efface_key(file, "base64", Category::Image, ledger)
}

fn is_write_input(record: &Value) -> bool {
    has_tool_use(record, &["Write"])
}

fn efface_write_input(record: &mut Value, ledger: &mut Ledger) -> Option<()> {
    for_each_tool_input(record, &["Write"], |input| {
        efface_key(input, "content", Category::WriteInput, ledger)
    })
}

fn is_write_result(record: &Value) -> bool {
    tool_use_result(record).is_some_and(is_write_result_shape)
}

fn efface_write_result(record: &mut Value, ledger: &mut Ledger) -> Option<()> {
    let result = tool_use_result_mut(record)?;
    efface_key(result, "content", Category::WriteResult, ledger)?;
    efface_key(result, "originalFile", Category::WriteResult, ledger)?;
    shorten_path_key(result, "filePath", Category::WriteResult, ledger)?;
    clear_list_key(result, "structuredPatch", Category::WriteResult, ledger)
}

fn is_edit_input(record: &Value) -> bool {
    has_tool_use(record, &["Edit", "MultiEdit"])
}

fn efface_edit_input(record: &mut Value, ledger: &mut Ledger) -> Option<()> {
    for_each_tool_input(record, &["Edit", "MultiEdit"], |input| {
        efface_key(input, "old_string", Category::EditInput, ledger)?;
        efface_key(input, "new_string", Category::EditInput, ledger)?;
        if let Some(edits) = input.get_mut("edits") {
            for edit in edits.as_array_mut()? {
                let edit = edit.as_object_mut()?;
                efface_key(edit, "old_string", Category::EditInput, ledger)?;
                efface_key(edit, "new_string", Category::EditInput, ledger)?;
            }
        }
        Some(())
    })
}

fn is_edit_result(record: &Value) -> bool {
    tool_use_result(record).is_some_and(|r| r.contains_key("oldString"))
}

fn efface_edit_result(record: &mut Value, ledger: &mut Ledger) -> Option<()> {
    let result = tool_use_result_mut(record)?;
    efface_key(result, "oldString", Category::EditResult, ledger)?;
    efface_key(result, "newString", Category::EditResult, ledger)?;
    efface_key(result, "originalFile", Category::EditResult, ledger)?;
    shorten_path_key(result, "filePath", Category::EditResult, ledger)?;
    clear_list_key(result, "structuredPatch", Category::EditResult, ledger)
}

fn has_file_path_input(record: &Value) -> bool {
    content_items(record).iter().any(|item| {
        item_type(item) == Some("tool_use") && item.pointer("/input/file_path").is_some()
    })
}

fn shorten_file_path_input(record: &mut Value, ledger: &mut Ledger) -> Option<()> {
    for item in content_items_mut(record)? {
        if item_type(item) != Some("tool_use") {
            continue;
        }
        if let Some(path) = item.pointer_mut("/input/file_path") {
            ledger.efface_path(path, Category::FilePath)?;
        }
    }
    Some(())
}

// ----------------------------------------------------------------------------
// Shell and search
// ----------------------------------------------------------------------------

fn is_command_input(record: &Value) -> bool {
    has_tool_use(record, &["Bash"])
}

fn efface_command_input(record: &mut Value, ledger: &mut Ledger) -> Option<()> {
    for_each_tool_input(record, &["Bash"], |input| {
        efface_key(input, "command", Category::CommandInput, ledger)
    })
}

fn is_command_result(record: &Value) -> bool {
    tool_use_result(record).is_some_and(|r| r.contains_key("stdout") || r.contains_key("stderr"))
}

fn efface_command_result(record: &mut Value, ledger: &mut Ledger) -> Option<()> {
    let result = tool_use_result_mut(record)?;
    efface_key(result, "stdout", Category::CommandResult, ledger)?;
    efface_key(result, "stderr", Category::CommandResult, ledger)
}

fn is_search_result(record: &Value) -> bool {
    tool_use_result(record)
        .and_then(|r| r.get("filenames"))
        .and_then(Value::as_array)
        .is_some_and(|names| !names.is_empty())
}

fn efface_search_result(record: &mut Value, ledger: &mut Ledger) -> Option<()> {
    let filenames = tool_use_result_mut(record)?.get_mut("filenames")?;
    ledger.efface_list(filenames, Category::SearchResult, vec![Value::String(String::new())])
}

fn is_plan_input(record: &Value) -> bool {
    has_tool_use(record, &["ExitPlanMode"])
}

fn efface_plan_input(record: &mut Value, ledger: &mut Ledger) -> Option<()> {
    for_each_tool_input(record, &["ExitPlanMode"], |input| {
        efface_key(input, "plan", Category::PlanInput, ledger)
    })
}

// ----------------------------------------------------------------------------
// Tool results
// ----------------------------------------------------------------------------

fn has_tool_result_item(record: &Value) -> bool {
    content_items(record)
        .iter()
        .any(|item| item_type(item) == Some("tool_result"))
}

fn efface_tool_result_items(record: &mut Value, ledger: &mut Ledger) -> Option<()> {
    for item in content_items_mut(record)? {
        if item_type(item) != Some("tool_result") {
            continue;
        }
        if let Some(content) = item.get_mut("content") {
            efface_text_or_items(content, Category::ToolResult, ledger)?;
        }
    }
    Some(())
}

fn is_list_tool_result(record: &Value) -> bool {
    record.get("toolUseResult").is_some_and(Value::is_array)
}

fn efface_list_tool_result(record: &mut Value, ledger: &mut Ledger) -> Option<()> {
    efface_item_texts(record.get_mut("toolUseResult")?, Category::ToolResult, ledger)
}

fn is_task_output(record: &Value) -> bool {
    tool_use_result(record)
        .and_then(|r| r.get("task"))
        .is_some_and(Value::is_object)
}

fn efface_task_output(record: &mut Value, ledger: &mut Ledger) -> Option<()> {
    let task = tool_use_result_mut(record)?.get_mut("task")?.as_object_mut()?;
    efface_key(task, "output", Category::TaskOutput, ledger)
}

fn is_task_content(record: &Value) -> bool {
    tool_use_result(record).is_some_and(|r| {
        r.get("content").is_some_and(Value::is_array)
            && !is_write_result_shape(r)
            && !r.get("task").is_some_and(Value::is_object)
    })
}

fn efface_task_content(record: &mut Value, ledger: &mut Ledger) -> Option<()> {
    let result = tool_use_result_mut(record)?;
    efface_item_texts(result.get_mut("content")?, Category::TaskContent, ledger)?;
    efface_key(result, "prompt", Category::TaskPrompt, ledger)
}

// ----------------------------------------------------------------------------
// Progress records
// ----------------------------------------------------------------------------

fn is_bash_progress(record: &Value) -> bool {
    is_progress(record, "bash_progress")
}

fn efface_bash_progress(record: &mut Value, ledger: &mut Ledger) -> Option<()> {
    let data = record.get_mut("data")?.as_object_mut()?;
    efface_key(data, "output", Category::BashProgress, ledger)?;
    efface_key(data, "fullOutput", Category::BashProgress, ledger)
}

fn is_agent_progress(record: &Value) -> bool {
    is_progress(record, "agent_progress")
}

fn efface_agent_progress(record: &mut Value, ledger: &mut Ledger) -> Option<()> {
    let data = record.get_mut("data")?.as_object_mut()?;
    efface_key(data, "prompt", Category::AgentProgress, ledger)?;

    let Some(items) = data
        .get_mut("message")
        .and_then(|m| m.pointer_mut("/message/content"))
        .and_then(Value::as_array_mut)
    else {
        return Some(());
    };
    for item in items {
        let Some(item) = item.as_object_mut() else {
            continue;
        };
        if let Some(content) = item.get_mut("content") {
            efface_text_or_items(content, Category::AgentProgress, ledger)?;
        }
        if let Some(input) = item.get_mut("input") {
            efface_key(input.as_object_mut()?, "command", Category::AgentProgress, ledger)?;
        }
    }
    Some(())
}

// ----------------------------------------------------------------------------
// Injected context and images
// ----------------------------------------------------------------------------

fn is_meta(record: &Value) -> bool {
    record.get("isMeta").and_then(Value::as_bool) == Some(true)
}

/// Only list content is effaced. String content on a meta record is a
/// local-command caveat, which the compactor has to see verbatim.
fn efface_meta_text(record: &mut Value, ledger: &mut Ledger) -> Option<()> {
    let content = record.pointer_mut("/message/content")?;
    match content {
        Value::String(_) => Some(()),
        Value::Array(items) => match items.first_mut() {
            Some(first) => efface_key(first.as_object_mut()?, "text", Category::MetaText, ledger),
            None => Some(()),
        },
        _ => None,
    }
}

fn is_image(item: &Value) -> bool {
    item_type(item) == Some("image")
}

fn has_image(record: &Value) -> bool {
    content_items(record).iter().any(|item| {
        is_image(item)
            || item
                .get("content")
                .and_then(Value::as_array)
                .is_some_and(|nested| nested.iter().any(is_image))
    })
}

fn efface_image(item: &mut Value, ledger: &mut Ledger) -> Option<()> {
    let source = item.get_mut("source")?.as_object_mut()?;
    efface_key(source, "data", Category::Image, ledger)?;
    let replaced = source.get("data").and_then(Value::as_str) == Some(Category::Image.placeholder());
    if replaced {
        if let Some(media_type) = source.get_mut("media_type") {
            if media_type.is_string() {
                *media_type = Value::String(IMAGE_MEDIA_TYPE.to_string());
            }
        }
    }
    Some(())
}

fn efface_images(record: &mut Value, ledger: &mut Ledger) -> Option<()> {
    for item in content_items_mut(record)? {
        if is_image(item) {
            efface_image(item, ledger)?;
            continue;
        }
        if let Some(nested) = item.get_mut("content").and_then(Value::as_array_mut) {
            for inner in nested.iter_mut().filter(|inner| is_image(inner)) {
                efface_image(inner, ledger)?;
            }
        }
    }
    Some(())
}
