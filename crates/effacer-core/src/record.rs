//! Transcript line model
//!
//! Records are kept as raw `serde_json::Value` trees. The fields the engine
//! reads get typed accessors here, and everything else passes through
//! untouched.

use std::borrow::Cow;

use serde_json::Value;

use crate::Result;

/// One line of a transcript.
#[derive(Debug, Clone)]
pub enum Line {
    Record(Record),
    /// Unparseable or non-object bytes, written back unchanged.
    Malformed(Vec<u8>),
}

impl Line {
    pub fn parse(raw: &[u8]) -> Self {
        let Ok(text) = std::str::from_utf8(raw) else {
            return Line::Malformed(raw.to_vec());
        };
        match serde_json::from_str::<Value>(text) {
            Ok(value) if value.is_object() => Line::Record(Record::new(value, text.to_string())),
            _ => Line::Malformed(raw.to_vec()),
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Line::Record(record) => Some(record),
            Line::Malformed(_) => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Line::Record(record) => Some(record),
            Line::Malformed(_) => None,
        }
    }

    /// Bytes for the output file, without the trailing newline.
    pub fn render(&self) -> Result<Cow<'_, [u8]>> {
        match self {
            Line::Record(record) => Ok(match record.render()? {
                Cow::Borrowed(text) => Cow::Borrowed(text.as_bytes()),
                Cow::Owned(text) => Cow::Owned(text.into_bytes()),
            }),
            Line::Malformed(raw) => Ok(Cow::Borrowed(raw)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Record {
    pub value: Value,
    original: Value,
    raw: String,
}

impl Record {
    pub fn new(value: Value, raw: String) -> Self {
        Self {
            original: value.clone(),
            value,
            raw,
        }
    }

    pub fn from_value(value: Value) -> Self {
        let raw = value.to_string();
        Self::new(value, raw)
    }

    pub fn uuid(&self) -> Option<&str> {
        self.value.get("uuid").and_then(Value::as_str)
    }

    /// Parent reference; `None` for roots (absent or `null`).
    pub fn parent_uuid(&self) -> Option<&str> {
        self.value.get("parentUuid").and_then(Value::as_str)
    }

    /// Point the record at a new parent, or make it a root with `null`.
    pub fn set_parent_uuid(&mut self, parent: Option<&str>) {
        if let Some(obj) = self.value.as_object_mut() {
            let parent = parent.map_or(Value::Null, |p| Value::String(p.to_string()));
            obj.insert("parentUuid".to_string(), parent);
        }
    }

    pub fn remove_parent_uuid(&mut self) {
        if let Some(obj) = self.value.as_object_mut() {
            obj.remove("parentUuid");
        }
    }

    pub fn record_type(&self) -> Option<&str> {
        self.value.get("type").and_then(Value::as_str)
    }

    /// Discriminator of a progress record's `data` payload.
    pub fn data_type(&self) -> Option<&str> {
        self.value.pointer("/data/type").and_then(Value::as_str)
    }

    pub fn is_meta(&self) -> bool {
        self.value
            .get("isMeta")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn is_user(&self) -> bool {
        self.record_type() == Some("user")
    }

    pub fn content(&self) -> Option<&Value> {
        self.value.pointer("/message/content")
    }

    /// `message.content` when it is a plain string. List content is
    /// structured turn data, never a local-command marker.
    pub fn content_str(&self) -> Option<&str> {
        self.content()?.as_str()
    }

    pub fn is_modified(&self) -> bool {
        self.value != self.original
    }

    /// Untouched records keep their original bytes.
    pub fn render(&self) -> Result<Cow<'_, str>> {
        if self.is_modified() {
            Ok(Cow::Owned(serde_json::to_string(&self.value)?))
        } else {
            Ok(Cow::Borrowed(&self.raw))
        }
    }
}

/// Final component of a slash or backslash separated path.
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        return path;
    }
    trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(trimmed)
}
