//! Core call domain types shared by the bridge services

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Session identifier correlating a call initiation with its stored record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outbound call request as posted by the client.
///
/// The whole JSON object is kept as sent, nulls and unknown fields
/// included, so the stored session record matches the request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallRequest(serde_json::Map<String, serde_json::Value>);

/// Required call request field that was absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    AgentId,
    RecipientPhoneNumber,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AgentId => write!(f, "Agent not provided"),
            Self::RecipientPhoneNumber => write!(f, "Recipient phone number not provided"),
        }
    }
}

impl std::error::Error for MissingField {}

/// Borrowed view of a call request whose required fields are present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedCall<'a> {
    pub agent_id: &'a str,
    pub recipient_phone_number: &'a str,
    /// Status callback target, empty when the client sent none
    pub webhook_url: &'a str,
}

impl CallRequest {
    /// Check required fields, agent first. Absent, null, empty and
    /// non-string values count as missing.
    pub fn validate(&self) -> std::result::Result<ValidatedCall<'_>, MissingField> {
        let agent_id = self.non_empty("agent_id").ok_or(MissingField::AgentId)?;
        let recipient_phone_number = self
            .non_empty("recipient_phone_number")
            .ok_or(MissingField::RecipientPhoneNumber)?;

        Ok(ValidatedCall {
            agent_id,
            recipient_phone_number,
            webhook_url: self.non_empty("webhook_url").unwrap_or(""),
        })
    }

    fn non_empty(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(serde_json::Value::as_str)
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> CallRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_validate_ok_defaults_webhook() {
        let req = request(json!({"agent_id": "a1", "recipient_phone_number": "+15550100"}));
        let call = req.validate().unwrap();
        assert_eq!(call.agent_id, "a1");
        assert_eq!(call.recipient_phone_number, "+15550100");
        assert_eq!(call.webhook_url, "");
    }

    #[test]
    fn test_validate_missing_agent_checked_first() {
        let req = request(json!({}));
        assert_eq!(req.validate(), Err(MissingField::AgentId));

        let req = request(json!({"agent_id": "", "recipient_phone_number": "+1"}));
        assert_eq!(req.validate(), Err(MissingField::AgentId));
    }

    #[test]
    fn test_validate_missing_recipient() {
        let req = request(json!({"agent_id": "a1", "recipient_phone_number": null}));
        let err = req.validate().unwrap_err();
        assert_eq!(err, MissingField::RecipientPhoneNumber);
        assert_eq!(err.to_string(), "Recipient phone number not provided");
    }

    #[test]
    fn test_non_string_agent_is_missing() {
        let req = request(json!({"agent_id": 42, "recipient_phone_number": "+1"}));
        assert_eq!(req.validate(), Err(MissingField::AgentId));
    }

    #[test]
    fn test_null_webhook_defaults_to_empty() {
        let req = request(json!({"agent_id": "a1", "recipient_phone_number": "+1", "webhook_url": null}));
        assert_eq!(req.validate().unwrap().webhook_url, "");
    }

    #[test]
    fn test_serialization_keeps_nulls_and_extra_fields() {
        let sent = json!({
            "agent_id": "a1",
            "recipient_phone_number": "+1",
            "webhook_url": null,
            "campaign": {"name": "spring"}
        });
        let stored = serde_json::to_string(&request(sent.clone())).unwrap();
        let back: serde_json::Value = serde_json::from_str(&stored).unwrap();
        assert_eq!(back, sent);
        assert!(back.get("webhook_url").unwrap().is_null());
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(serde_json::from_value::<CallRequest>(json!(["a1"])).is_err());
    }
}
