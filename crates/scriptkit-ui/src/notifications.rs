//! Local notifications.

use crate::UiResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

/// A notification to schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    pub subtitle: Option<String>,
    pub body: String,
    pub sound: Option<String>,
    pub open_url: Option<String>,
    /// Merged into the payload verbatim, overriding the named fields.
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl NotificationRequest {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// Flatten into the payload handed to a [`Notifier`].
    pub fn into_payload(self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("title".into(), Value::String(self.title));
        if let Some(subtitle) = self.subtitle {
            payload.insert("subtitle".into(), Value::String(subtitle));
        }
        payload.insert("body".into(), Value::String(self.body));
        if let Some(sound) = self.sound {
            payload.insert("sound".into(), Value::String(sound));
        }
        if let Some(open_url) = self.open_url {
            payload.insert("openURL".into(), Value::String(open_url));
        }
        payload.extend(self.extra);
        payload
    }
}

/// Delivers notification payloads.
pub trait Notifier {
    fn schedule(&self, payload: &Map<String, Value>) -> UiResult<()>;
}

/// [`Notifier`] that writes each payload to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn schedule(&self, payload: &Map<String, Value>) -> UiResult<()> {
        let title = payload.get("title").and_then(Value::as_str).unwrap_or_default();
        info!(title, payload = %serde_json::to_string(payload)?, "notification scheduled");
        Ok(())
    }
}

/// Build the payload for `request` and schedule it. Returns the payload sent.
pub fn notify<N: Notifier + ?Sized>(
    notifier: &N,
    request: NotificationRequest,
) -> UiResult<Map<String, Value>> {
    let payload = request.into_payload();
    notifier.schedule(&payload)?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: RefCell<Vec<Map<String, Value>>>,
    }

    impl Notifier for RecordingNotifier {
        fn schedule(&self, payload: &Map<String, Value>) -> UiResult<()> {
            self.sent.borrow_mut().push(payload.clone());
            Ok(())
        }
    }

    #[test]
    fn test_payload_omits_unset_fields() {
        let payload = NotificationRequest::new("Done", "Backup finished").into_payload();
        assert_eq!(
            Value::Object(payload),
            json!({"title": "Done", "body": "Backup finished"})
        );
    }

    #[test]
    fn test_extra_fields_override() {
        let mut request = NotificationRequest::new("Rain", "Bring an umbrella");
        request.sound = Some("default".into());
        request.open_url = Some("https://example.com/forecast".into());
        request.extra.insert("threadIdentifier".into(), json!("weather"));
        request.extra.insert("sound".into(), json!("alert"));

        let payload = request.into_payload();
        assert_eq!(payload["openURL"], json!("https://example.com/forecast"));
        assert_eq!(payload["threadIdentifier"], json!("weather"));
        assert_eq!(payload["sound"], json!("alert"));
    }

    #[test]
    fn test_notify_schedules_payload() {
        let notifier = RecordingNotifier::default();
        let sent = notify(&notifier, NotificationRequest::new("Hi", "there")).unwrap();
        assert_eq!(notifier.sent.borrow().as_slice(), &[sent]);
    }

    #[test]
    fn test_log_notifier_accepts_payload() {
        assert!(notify(&LogNotifier, NotificationRequest::new("Hi", "there")).is_ok());
    }
}
