//! Argument objects for the `MaskedEmail/*` methods.

use crate::models::MaskedEmailState;
use serde::Serialize;
use std::collections::BTreeMap;

pub const MASKED_EMAIL_GET: &str = "MaskedEmail/get";
pub const MASKED_EMAIL_SET: &str = "MaskedEmail/set";

/// Sent in place of an empty string when a field is cleared. The server is
/// known to store this as a blank value; an empty string is not relied upon.
pub const CLEARED_FIELD: &str = " ";

/// One entry of a `MaskedEmail/set` `create` map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskedEmailCreate {
    pub for_domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<MaskedEmailState>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_prefix: Option<String>,
}

impl MaskedEmailCreate {
    /// Without [`enabled`](Self::enabled) the server creates a pending
    /// address that has to be confirmed before it receives mail.
    pub fn new(for_domain: impl Into<String>) -> Self {
        Self {
            for_domain: for_domain.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn email_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.email_prefix = (!prefix.is_empty()).then_some(prefix);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.state = enabled.then_some(MaskedEmailState::Enabled);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCreateArgs {
    pub account_id: String,
    pub create: BTreeMap<String, MaskedEmailCreate>,
}

impl SetCreateArgs {
    /// `creator` is only a map key used to find the item in `created`.
    pub fn new(
        account_id: impl Into<String>,
        creator: impl Into<String>,
        item: MaskedEmailCreate,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            create: BTreeMap::from([(creator.into(), item)]),
        }
    }
}

/// Sparse patch for an existing masked email. Fields left as `None` are not
/// sent and keep their server-side value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskedEmailUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<MaskedEmailState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    for_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl MaskedEmailUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(mut self, state: MaskedEmailState) -> Self {
        self.state = Some(state);
        self
    }

    /// An empty `domain` clears the field.
    pub fn for_domain(mut self, domain: impl Into<String>) -> Self {
        self.for_domain = Some(clearable(domain.into()));
        self
    }

    /// An empty `description` clears the field.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(clearable(description.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.for_domain.is_none() && self.description.is_none()
    }
}

fn clearable(value: String) -> String {
    if value.is_empty() {
        CLEARED_FIELD.to_string()
    } else {
        value
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetUpdateArgs {
    pub account_id: String,
    pub update: BTreeMap<String, MaskedEmailUpdate>,
}

impl SetUpdateArgs {
    pub fn new(
        account_id: impl Into<String>,
        id: impl Into<String>,
        patch: MaskedEmailUpdate,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            update: BTreeMap::from([(id.into(), patch)]),
        }
    }
}

/// `MaskedEmail/get` without `ids`: the server returns every masked email,
/// deleted ones included.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAllArgs {
    pub account_id: String,
}

impl GetAllArgs {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
        }
    }
}
