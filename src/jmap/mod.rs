pub mod envelope;
pub mod methods;
pub mod response;

use crate::error::{Error, Result};
use crate::models::{MaskedEmail, MaskedEmailState, Session};
use envelope::{Invocation, Request, Response};
use methods::{
    GetAllArgs, MASKED_EMAIL_GET, MASKED_EMAIL_SET, MaskedEmailCreate, MaskedEmailUpdate,
    SetCreateArgs, SetUpdateArgs,
};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use response::{GetResponse, SetResponse};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const SESSION_URL: &str = "https://api.fastmail.com/jmap/session";
pub const JMAP_CORE_CAPABILITY: &str = "urn:ietf:params:jmap:core";
pub const MASKED_EMAIL_CAPABILITY: &str = "https://www.fastmail.com/dev/maskedemail";
pub const DEFAULT_APP_NAME: &str = "maskedemail-cli";

const TIMEOUT: Duration = Duration::from_secs(30);

/// Capabilities declared on every method-call batch, in this order.
const USING: &[&str] = &[JMAP_CORE_CAPABILITY, MASKED_EMAIL_CAPABILITY];

/// Everything a client needs; fixed for the client's lifetime.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub token: String,
    /// Label used as the key of the `create` map.
    pub app_name: String,
    pub session_url: String,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            app_name: DEFAULT_APP_NAME.into(),
            session_url: SESSION_URL.into(),
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn with_session_url(mut self, session_url: impl Into<String>) -> Self {
        self.session_url = session_url.into();
        self
    }
}

pub struct JmapClient {
    client: Client,
    config: ClientConfig,
    session: Option<Session>,
}

impl JmapClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(TIMEOUT).build()?;

        Ok(Self {
            client,
            config,
            session: None,
        })
    }

    /// Fetch the session resource from the discovery URL.
    #[instrument(skip(self))]
    pub async fn authenticate(&mut self) -> Result<&Session> {
        debug!(url = %self.config.session_url, "Fetching JMAP session");
        let resp = self
            .client
            .get(&self.config.session_url)
            .bearer_auth(&self.config.token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let resp = ensure_success(resp, "Authentication failed").await?;

        let session: Session = resp.json().await?;
        debug!(username = %session.username, "Session established");
        Ok(&*self.session.insert(session))
    }

    pub fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(Error::NotAuthenticated)
    }

    fn account_id(&self, explicit: Option<&str>) -> Result<String> {
        self.session()?
            .account_or_default(explicit, MASKED_EMAIL_CAPABILITY)
    }

    /// POST one batch and decode the envelope.
    #[instrument(skip(self, request))]
    async fn request<A: Serialize>(&self, request: &Request<A>) -> Result<Response> {
        let api_url = self.session()?.api_endpoint()?;
        let body = request.to_vec()?;

        debug!(url = %api_url, calls = request.method_calls.len(), "Making JMAP request");
        let resp = self
            .client
            .post(api_url)
            .bearer_auth(&self.config.token)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let resp = ensure_success(resp, "Token expired or invalid").await?;

        let bytes = resp.bytes().await?;
        Response::from_slice(&bytes)
    }

    /// Send a single call and return the invocation answering it.
    async fn call<A: Serialize>(&self, method: &str, arguments: A) -> Result<Invocation> {
        let request = Request::single(USING, method, arguments);
        self.request(&request).await?.into_first()
    }

    /// Create a masked email. `account_id` of `None` (or empty) selects the
    /// primary masked email account.
    #[instrument(skip(self, item), fields(domain = %item.for_domain))]
    pub async fn create_masked_email(
        &self,
        account_id: Option<&str>,
        item: MaskedEmailCreate,
    ) -> Result<MaskedEmail> {
        let account_id = self.account_id(account_id)?;
        let args = SetCreateArgs::new(account_id, self.config.app_name.as_str(), item);

        let invocation = self.call(MASKED_EMAIL_SET, args).await?;
        let resp: SetResponse = response::expect(invocation, MASKED_EMAIL_SET)?;

        for (label, err) in &resp.not_created {
            warn!(
                label = %label,
                error_type = %err.error_type,
                description = err.description.as_deref().unwrap_or(""),
                "Masked email not created"
            );
        }

        resp.into_created_item()
    }

    /// Apply a sparse patch to the masked email with ID `id`.
    #[instrument(skip(self, patch))]
    pub async fn update_masked_email(
        &self,
        account_id: Option<&str>,
        id: &str,
        patch: MaskedEmailUpdate,
    ) -> Result<SetResponse> {
        let account_id = self.account_id(account_id)?;
        let args = SetUpdateArgs::new(account_id, id, patch);

        let invocation = self.call(MASKED_EMAIL_SET, args).await?;
        let resp: SetResponse = response::expect(invocation, MASKED_EMAIL_SET)?;

        if let Some(err) = resp.update_error(id, MASKED_EMAIL_SET) {
            return Err(err);
        }

        Ok(resp)
    }

    /// Promote a pending masked email to enabled.
    pub async fn confirm_masked_email(
        &self,
        account_id: Option<&str>,
        id: &str,
    ) -> Result<SetResponse> {
        self.update_masked_email(
            account_id,
            id,
            MaskedEmailUpdate::new().state(MaskedEmailState::Enabled),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_all_masked_emails(
        &self,
        account_id: Option<&str>,
        include_deleted: bool,
    ) -> Result<Vec<MaskedEmail>> {
        let account_id = self.account_id(account_id)?;

        let invocation = self
            .call(MASKED_EMAIL_GET, GetAllArgs::new(account_id))
            .await?;
        let resp: GetResponse = response::expect(invocation, MASKED_EMAIL_GET)?;

        Ok(resp.into_list(include_deleted))
    }

    /// Resolve a visible address to its masked email ID. Deleted entries are
    /// searched too.
    pub async fn lookup_masked_email_id(
        &self,
        account_id: Option<&str>,
        email: &str,
    ) -> Result<String> {
        let all = self.get_all_masked_emails(account_id, true).await?;
        response::find_id_by_address(&all, email)
    }

    pub async fn enable_masked_email(
        &self,
        account_id: Option<&str>,
        email: &str,
    ) -> Result<SetResponse> {
        self.set_state_by_address(account_id, email, MaskedEmailState::Enabled)
            .await
    }

    pub async fn disable_masked_email(
        &self,
        account_id: Option<&str>,
        email: &str,
    ) -> Result<SetResponse> {
        self.set_state_by_address(account_id, email, MaskedEmailState::Disabled)
            .await
    }

    /// Moves the address to the `deleted` state. Nothing is removed server-side.
    pub async fn delete_masked_email(
        &self,
        account_id: Option<&str>,
        email: &str,
    ) -> Result<SetResponse> {
        self.set_state_by_address(account_id, email, MaskedEmailState::Deleted)
            .await
    }

    /// Update domain and/or description of the masked email with address `email`.
    pub async fn update_info(
        &self,
        account_id: Option<&str>,
        email: &str,
        patch: MaskedEmailUpdate,
    ) -> Result<SetResponse> {
        let id = self.lookup_masked_email_id(account_id, email).await?;
        self.update_masked_email(account_id, &id, patch).await
    }

    async fn set_state_by_address(
        &self,
        account_id: Option<&str>,
        email: &str,
        state: MaskedEmailState,
    ) -> Result<SetResponse> {
        let id = self.lookup_masked_email_id(account_id, email).await?;
        self.update_masked_email(account_id, &id, MaskedEmailUpdate::new().state(state))
            .await
    }
}

/// RFC 7807 problem details, as sent with request-level JMAP errors.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Problem {
    #[serde(rename = "type")]
    problem_type: Option<String>,
    title: Option<String>,
    detail: Option<String>,
}

/// Pass 2xx responses through; turn anything else into an error.
async fn ensure_success(
    resp: reqwest::Response,
    unauthorized: &str,
) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.bytes().await.unwrap_or_default();
    let err = status_error(status.as_u16(), &body, unauthorized);
    warn!(status = status.as_u16(), error = %err, "JMAP request failed");
    Err(err)
}

fn status_error(status: u16, body: &[u8], unauthorized: &str) -> Error {
    match status {
        401 => Error::InvalidToken(unauthorized.into()),
        429 => Error::RateLimited,
        500..=599 => Error::Server(format!("Server error: {}", status)),
        _ => {
            let problem: Problem = serde_json::from_slice(body).unwrap_or_default();
            let mut text = String::from_utf8_lossy(body).trim().to_string();
            if text.is_empty() {
                text = reqwest::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or_default()
                    .to_string();
            }
            Error::Rejected {
                status,
                problem_type: problem.problem_type.unwrap_or_else(|| "http".into()),
                detail: problem
                    .detail
                    .or(problem.title)
                    .filter(|d| !d.is_empty())
                    .unwrap_or(text),
            }
        }
    }
}
