use effacer_core::Record;
use serde_json::Value;

/// Rewrites every `sessionId` to one externally derived value.
#[derive(Debug, Clone)]
pub struct IdentityUnifier {
    session_id: String,
}

impl IdentityUnifier {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Returns true when the record's value changed.
    pub fn apply(&self, record: &mut Record) -> bool {
        let Some(slot) = record.value.get_mut("sessionId") else {
            return false;
        };
        if slot.as_str() == Some(self.session_id.as_str()) {
            return false;
        }
        *slot = Value::String(self.session_id.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rewrites_present_session_id() {
        let unifier = IdentityUnifier::new("abc-00effaced001");
        let mut record = Record::from_value(json!({"uuid": "a", "sessionId": "abc-239d2e110282"}));

        assert!(unifier.apply(&mut record));
        assert_eq!(record.value["sessionId"], json!("abc-00effaced001"));
        assert!(!unifier.apply(&mut record));
    }

    #[test]
    fn test_absent_session_id_not_added() {
        let unifier = IdentityUnifier::new("abc-00effaced001");
        let mut record = Record::from_value(json!({"type": "summary", "summary": "s"}));

        assert!(!unifier.apply(&mut record));
        assert!(record.value.get("sessionId").is_none());
    }
}
