use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// JMAP session resource, as returned by the discovery endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub capabilities: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub accounts: HashMap<String, Account>,
    #[serde(default)]
    pub primary_accounts: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub api_url: String,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub upload_url: Option<String>,
    #[serde(default)]
    pub event_source_url: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl Session {
    /// URL that method-call batches are POSTed to.
    pub fn api_endpoint(&self) -> Result<&str> {
        if self.api_url.is_empty() {
            return Err(Error::MalformedResponse("session has no apiUrl".into()));
        }
        Ok(&self.api_url)
    }

    /// An account has a capability iff the URI is a key of its
    /// `accountCapabilities`; the value is ignored.
    pub fn account_has_capability(&self, account_id: &str, capability: &str) -> bool {
        self.accounts
            .get(account_id)
            .is_some_and(|acc| acc.account_capabilities.contains_key(capability))
    }

    pub fn default_account_for_capability(&self, capability: &str) -> Option<&str> {
        self.primary_accounts
            .get(capability)
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }

    /// Resolve the account to operate on: an explicit, non-empty ID wins,
    /// otherwise the primary account for `capability`.
    pub fn account_or_default(&self, explicit: Option<&str>, capability: &str) -> Result<String> {
        if let Some(id) = explicit.filter(|id| !id.is_empty()) {
            return Ok(id.to_string());
        }

        self.default_account_for_capability(capability)
            .map(str::to_string)
            .ok_or(Error::NoAccount)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub is_personal: bool,
    #[serde(default)]
    pub is_read_only: bool,
    #[serde(default)]
    pub account_capabilities: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskedEmailState {
    #[default]
    Pending,
    Enabled,
    Disabled,
    Deleted,
    /// Any state this client does not know about.
    #[serde(other)]
    Unknown,
}

impl MaskedEmailState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaskedEmailState::Pending => "pending",
            MaskedEmailState::Enabled => "enabled",
            MaskedEmailState::Disabled => "disabled",
            MaskedEmailState::Deleted => "deleted",
            MaskedEmailState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MaskedEmailState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A masked email address. Deleting one only moves it to
/// [`MaskedEmailState::Deleted`]; the server keeps the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskedEmail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub for_domain: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: MaskedEmailState,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_by: String,
    #[serde(default)]
    pub last_message_at: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl MaskedEmail {
    pub fn is_deleted(&self) -> bool {
        self.state == MaskedEmailState::Deleted
    }
}

/// Treats an explicit JSON `null` the same as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> Output<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn success_msg(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            message: Some(message.into()),
        }
    }

    pub fn error(err: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.into()),
            message: None,
        }
    }

    pub fn print(&self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("failed to render output: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jmap::MASKED_EMAIL_CAPABILITY;
    use serde_json::json;

    fn session() -> Session {
        serde_json::from_value(json!({
            "capabilities": {
                "urn:ietf:params:jmap:core": {"maxCallsInRequest": 16},
                "https://www.fastmail.com/dev/maskedemail": {}
            },
            "accounts": {
                "A1": {
                    "name": "me@example.com",
                    "isPersonal": true,
                    "accountCapabilities": {
                        "https://www.fastmail.com/dev/maskedemail": {}
                    }
                },
                "B2": {
                    "name": "shared",
                    "accountCapabilities": {
                        "urn:ietf:params:jmap:mail": {}
                    }
                }
            },
            "primaryAccounts": {
                "https://www.fastmail.com/dev/maskedemail": "A1"
            },
            "username": "me@example.com",
            "apiUrl": "https://api.example.com/jmap/api/"
        }))
        .unwrap()
    }

    #[test]
    fn test_session_deserialize() {
        let session = session();
        assert_eq!(session.username, "me@example.com");
        assert_eq!(session.api_endpoint().unwrap(), "https://api.example.com/jmap/api/");
        assert_eq!(session.accounts.len(), 2);
        assert!(session.download_url.is_none());
    }

    #[test]
    fn test_api_endpoint_missing_is_malformed() {
        let session = Session::default();
        assert!(matches!(
            session.api_endpoint(),
            Err(Error::MalformedResponse(msg)) if msg.contains("apiUrl")
        ));
    }

    #[test]
    fn test_account_has_capability() {
        let session = session();
        assert!(session.account_has_capability("A1", MASKED_EMAIL_CAPABILITY));
        assert!(!session.account_has_capability("B2", MASKED_EMAIL_CAPABILITY));
        assert!(!session.account_has_capability("missing", MASKED_EMAIL_CAPABILITY));
    }

    #[test]
    fn test_default_account_for_capability() {
        let session = session();
        assert_eq!(
            session.default_account_for_capability(MASKED_EMAIL_CAPABILITY),
            Some("A1")
        );
        assert_eq!(
            session.default_account_for_capability("urn:ietf:params:jmap:mail"),
            None
        );
    }

    #[test]
    fn test_account_or_default_prefers_explicit() {
        let session = session();
        let id = session
            .account_or_default(Some("B2"), MASKED_EMAIL_CAPABILITY)
            .unwrap();
        assert_eq!(id, "B2");
    }

    #[test]
    fn test_account_or_default_falls_back_to_primary() {
        let session = session();
        assert_eq!(
            session
                .account_or_default(Some(""), MASKED_EMAIL_CAPABILITY)
                .unwrap(),
            "A1"
        );
        assert_eq!(
            session
                .account_or_default(None, MASKED_EMAIL_CAPABILITY)
                .unwrap(),
            "A1"
        );
    }

    #[test]
    fn test_account_or_default_without_primary() {
        let session = session();
        let err = session
            .account_or_default(Some(""), "urn:ietf:params:jmap:mail")
            .unwrap_err();
        assert!(matches!(err, Error::NoAccount));
    }

    #[test]
    fn test_masked_email_tolerates_nulls_and_extra_keys() {
        let email: MaskedEmail = serde_json::from_value(json!({
            "id": "me1",
            "email": "abc.xyz@mask.example",
            "forDomain": null,
            "description": "shop",
            "state": "disabled",
            "createdAt": "2021-09-29T23:02:05Z",
            "createdBy": null,
            "lastMessageAt": null,
            "url": null,
            "somethingNew": [1, 2, 3]
        }))
        .unwrap();
        assert_eq!(email.id, "me1");
        assert_eq!(email.for_domain, "");
        assert_eq!(email.created_by, "");
        assert_eq!(email.state, MaskedEmailState::Disabled);
        assert!(email.last_message_at.is_none());
    }

    #[test]
    fn test_masked_email_missing_keys_default() {
        let email: MaskedEmail = serde_json::from_value(json!({"id": "me2"})).unwrap();
        assert_eq!(email.id, "me2");
        assert_eq!(email.email, "");
        assert_eq!(email.state, MaskedEmailState::Pending);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(MaskedEmailState::Deleted.to_string(), "deleted");
        assert_eq!(
            serde_json::to_value(MaskedEmailState::Enabled).unwrap(),
            json!("enabled")
        );
    }

    #[test]
    fn test_unrecognised_state_is_unknown() {
        let email: MaskedEmail =
            serde_json::from_value(json!({"id": "me3", "state": "archived"})).unwrap();
        assert_eq!(email.state, MaskedEmailState::Unknown);
        assert!(!email.is_deleted());
        assert_eq!(email.state.to_string(), "unknown");
    }

    #[test]
    fn test_output_error() {
        let output: Output<()> = Output::error("something broke");
        assert!(!output.success);
        assert!(output.data.is_none());
        assert_eq!(output.error, Some("something broke".to_string()));
    }
}
