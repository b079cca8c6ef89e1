//! Typed views over the untyped arguments of a method response.

use crate::error::{Error, Result};
use crate::jmap::envelope::Invocation;
use crate::models::{MaskedEmail, null_as_default};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// Coerce response arguments into `T`. Missing keys and `null`s fall back to
/// defaults where the target type allows it; a wrong type fails with
/// [`Error::Decode`] naming the path of the offending key.
pub fn decode<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    Ok(serde_path_to_error::deserialize(arguments)?)
}

/// Check that `invocation` answers `method` and decode its arguments.
/// A JMAP `error` response becomes [`Error::Jmap`].
pub fn expect<T: DeserializeOwned>(invocation: Invocation, method: &str) -> Result<T> {
    if invocation.name == "error" {
        let err: SetError = decode(invocation.arguments)?;
        return Err(err.into_error(method));
    }

    if invocation.name != method {
        return Err(Error::MalformedResponse(format!(
            "expected {} response, got {}",
            method, invocation.name
        )));
    }

    decode(invocation.arguments)
}

/// Error object used both for method-level errors and for per-item entries
/// of `notCreated`/`notUpdated`/`notDestroyed`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetError {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub error_type: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl SetError {
    pub fn into_error(self, method: &str) -> Error {
        Error::Jmap {
            method: method.into(),
            error_type: if self.error_type.is_empty() {
                "unknown".into()
            } else {
                self.error_type
            },
            description: self
                .description
                .unwrap_or_else(|| "No description".into()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: HashMap<String, MaskedEmail>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated: HashMap<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub destroyed: Vec<String>,
    #[serde(default)]
    pub new_state: Option<String>,
    #[serde(default)]
    pub old_state: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub not_created: HashMap<String, SetError>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub not_updated: HashMap<String, SetError>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub not_destroyed: HashMap<String, SetError>,
}

impl SetResponse {
    /// The single created item, whatever creation label the server echoed.
    pub fn created_item(&self) -> Result<&MaskedEmail> {
        self.created.values().next().ok_or(Error::NoItemsReturned)
    }

    pub fn into_created_item(self) -> Result<MaskedEmail> {
        self.created
            .into_values()
            .next()
            .ok_or(Error::NoItemsReturned)
    }

    pub fn update_error(&self, id: &str, method: &str) -> Option<Error> {
        self.not_updated
            .get(id)
            .map(|err| err.clone().into_error(method))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub not_found: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub list: Vec<MaskedEmail>,
}

impl GetResponse {
    pub fn into_list(self, include_deleted: bool) -> Vec<MaskedEmail> {
        if include_deleted {
            return self.list;
        }
        self.list.into_iter().filter(|m| !m.is_deleted()).collect()
    }
}

/// Linear scan for an exact address match.
pub fn find_id_by_address(list: &[MaskedEmail], address: &str) -> Result<String> {
    list.iter()
        .find(|m| m.email == address)
        .map(|m| m.id.clone())
        .ok_or_else(|| Error::NotFound(address.into()))
}
