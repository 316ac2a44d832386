//! Conversation tracker types and the user-message collector
//!
//! The host dialogue server sends the full conversation history with every
//! action call. Only the pieces the actions read are modelled here; unknown
//! keys are ignored so newer hosts stay compatible.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Event kind emitted by the host for user-authored messages.
pub const USER_EVENT: &str = "user";

/// One entry in the conversation history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerEvent {
    /// Event kind, e.g. `user`, `bot`, `action`, `slot`
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

impl TrackerEvent {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            event: USER_EVENT.to_string(),
            text: Some(text.into()),
            timestamp: None,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            event: "bot".to_string(),
            text: Some(text.into()),
            timestamp: None,
        }
    }

    pub fn is_user(&self) -> bool {
        self.event == USER_EVENT
    }
}

/// Per-conversation state snapshot supplied by the host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tracker {
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub slots: HashMap<String, Value>,
    #[serde(default)]
    pub latest_message: Option<Value>,
    #[serde(default)]
    pub events: Vec<TrackerEvent>,
}

impl Tracker {
    pub fn new(sender_id: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            ..Default::default()
        }
    }

    pub fn with_events(mut self, events: Vec<TrackerEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn with_slot(mut self, name: impl Into<String>, value: Value) -> Self {
        self.slots.insert(name.into(), value);
        self
    }

    /// String value of a slot, if set and non-blank.
    pub fn slot_str(&self, name: &str) -> Option<&str> {
        self.slots
            .get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Text payloads of user events, in conversation order.
    ///
    /// User events without text (attachments, button payloads with no
    /// rendered text) are skipped rather than kept as empty placeholders.
    pub fn user_messages(&self) -> Vec<String> {
        let mut skipped = 0usize;
        let messages: Vec<String> = self
            .events
            .iter()
            .filter(|event| event.is_user())
            .filter_map(|event| {
                if event.text.is_none() {
                    skipped += 1;
                }
                event.text.clone()
            })
            .collect();

        if skipped > 0 {
            debug!(
                sender_id = %self.sender_id,
                skipped,
                "Skipped user events without text"
            );
        }
        messages
    }
}

/// A message sent back to the conversation
///
/// Serialized with the full set of keys the host expects in a response,
/// even though only `text` is ever filled in here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotMessage {
    pub text: String,
    #[serde(default)]
    pub buttons: Vec<Value>,
    #[serde(default)]
    pub elements: Vec<Value>,
    #[serde(default)]
    pub custom: serde_json::Map<String, Value>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub attachment: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
}

impl BotMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
            elements: Vec::new(),
            custom: serde_json::Map::new(),
            image: None,
            attachment: None,
            response: None,
        }
    }
}

/// Collects messages dispatched by an action during one invocation
#[derive(Debug, Default)]
pub struct CollectingDispatcher {
    messages: Vec<BotMessage>,
}

impl CollectingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn utter_message(&mut self, text: impl Into<String>) {
        self.messages.push(BotMessage::text(text));
    }

    pub fn messages(&self) -> &[BotMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<BotMessage> {
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_history_yields_no_messages() {
        let tracker = Tracker::new("u1");
        assert!(tracker.user_messages().is_empty());
    }

    #[test]
    fn test_collects_only_user_text_in_order() {
        let tracker = Tracker::new("u1").with_events(vec![
            TrackerEvent::user("hi"),
            TrackerEvent::bot("hello"),
            TrackerEvent {
                event: "action".to_string(),
                text: None,
                timestamp: None,
            },
            TrackerEvent::user("I feel great"),
        ]);
        assert_eq!(tracker.user_messages(), vec!["hi", "I feel great"]);
    }

    #[test]
    fn test_user_events_without_text_are_skipped() {
        let tracker = Tracker::new("u1").with_events(vec![
            TrackerEvent {
                event: USER_EVENT.to_string(),
                text: None,
                timestamp: Some(1.0),
            },
            TrackerEvent::user("still here"),
        ]);
        assert_eq!(tracker.user_messages(), vec!["still here"]);
    }

    #[test]
    fn test_tracker_deserializes_host_payload() {
        let payload = json!({
            "sender_id": "abc",
            "slots": {"name": "Ada"},
            "latest_message": {"text": "bye"},
            "events": [
                {"event": "action", "name": "action_listen", "timestamp": 1.5},
                {"event": "user", "text": "I love this!", "parse_data": {"intent": {"name": "mood_great"}}},
                {"event": "user"}
            ],
            "paused": false
        });
        let tracker: Tracker = serde_json::from_value(payload).unwrap();
        assert_eq!(tracker.sender_id, "abc");
        assert_eq!(tracker.slot_str("name"), Some("Ada"));
        assert_eq!(tracker.events.len(), 3);
        assert_eq!(tracker.user_messages(), vec!["I love this!"]);
    }

    #[test]
    fn test_slot_str_ignores_blank_and_non_string() {
        let tracker = Tracker::new("u1")
            .with_slot("blank", json!("  "))
            .with_slot("number", json!(3));
        assert_eq!(tracker.slot_str("blank"), None);
        assert_eq!(tracker.slot_str("number"), None);
        assert_eq!(tracker.slot_str("missing"), None);
    }

    #[test]
    fn test_dispatcher_collects_in_order() {
        let mut dispatcher = CollectingDispatcher::new();
        dispatcher.utter_message("one");
        dispatcher.utter_message(String::from("two"));
        let texts: Vec<_> = dispatcher
            .into_messages()
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn test_bot_message_serializes_full_shape() {
        let value = serde_json::to_value(BotMessage::text("hey")).unwrap();
        assert_eq!(value["text"], "hey");
        assert_eq!(value["buttons"], json!([]));
        assert_eq!(value["custom"], json!({}));
        assert!(value["image"].is_null());
    }
}
