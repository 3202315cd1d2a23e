//! Twilio REST client for outbound calls

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info, warn};

use crate::{Result, TwilioError};

pub const DEFAULT_API_BASE: &str = "https://api.twilio.com";

/// Account credentials used for HTTP basic auth
#[derive(Clone)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
}

impl fmt::Debug for TwilioCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioCredentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"***")
            .finish()
    }
}

/// Parameters of `POST /Accounts/{sid}/Calls.json`.
///
/// Twilio fetches `url` and the status callback with POST, and the status
/// callback fires on the `completed` event only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCallRequest {
    pub to: String,
    pub from: String,
    /// TwiML URL fetched when the call connects
    pub url: String,
    pub record: bool,
    pub status_callback: String,
}

impl CreateCallRequest {
    /// Form fields in the order Twilio documents them
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("To", self.to.clone()),
            ("From", self.from.clone()),
            ("Url", self.url.clone()),
            ("Method", "POST".to_string()),
            ("Record", self.record.to_string()),
            ("StatusCallback", self.status_callback.clone()),
            ("StatusCallbackMethod", "POST".to_string()),
            ("StatusCallbackEvent", "completed".to_string()),
        ]
    }
}

/// Subset of the Twilio call resource returned on creation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CallResource {
    pub sid: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

/// Call creation seam, shared by reference across handlers
#[async_trait]
pub trait CallApi: Send + Sync {
    async fn create_call(&self, request: &CreateCallRequest) -> Result<CallResource>;
}

/// Twilio REST API client. Cheap to clone; one per process.
#[derive(Clone)]
pub struct TwilioClient {
    client: Client,
    api_base: String,
    credentials: TwilioCredentials,
}

impl TwilioClient {
    pub fn with_client(
        client: Client,
        api_base: impl Into<String>,
        credentials: TwilioCredentials,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn calls_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Calls.json",
            self.api_base, self.credentials.account_sid
        )
    }
}

#[async_trait]
impl CallApi for TwilioClient {
    async fn create_call(&self, request: &CreateCallRequest) -> Result<CallResource> {
        debug!(to = %request.to, url = %request.url, "Creating Twilio call");

        let response = self
            .client
            .post(self.calls_url())
            .basic_auth(&self.credentials.account_sid, Some(&self.credentials.auth_token))
            .form(&request.form_fields())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let parsed: Option<ApiErrorBody> = serde_json::from_str(&body).ok();
            let (code, message) = match parsed {
                Some(err) => (err.code, err.message.unwrap_or_else(|| body.clone())),
                None => (None, body),
            };
            warn!(status = status.as_u16(), ?code, %message, "Twilio rejected call creation");
            return Err(TwilioError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }

        let call: CallResource =
            serde_json::from_str(&body).map_err(|e| TwilioError::Parse(e.to_string()))?;

        info!(call_sid = %call.sid, status = ?call.status, "Twilio call created");
        Ok(call)
    }
}
