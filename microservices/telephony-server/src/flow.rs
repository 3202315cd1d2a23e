//! Standard and demo call flows
//!
//! Both flows place the call the same way; they differ in the callback
//! route Twilio is pointed at, the acknowledgement returned to the client,
//! and whether the TwiML greets the callee before streaming.

use callbridge_core::{SessionId, TunnelPair};
use callbridge_twilio_sdk::{Stream, VoiceResponse};
use reqwest::Url;

use crate::{Error, Result};

/// Spoken before the media stream opens on demo calls
pub const DEMO_SCRIPT: &str = "Hello, this is the Bolna AI Agent. Let me walk you through the demo of our application. In this demo, we will discuss how our system allows users to seamlessly interact with AI agents for tasks like call automation, data collection, and more. Feel free to ask me any questions during the call.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallFlow {
    Standard,
    Demo,
}

impl CallFlow {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Demo => "demo",
        }
    }

    /// Route Twilio calls back on once the callee answers
    pub fn callback_path(&self) -> &'static str {
        match self {
            Self::Standard => "twilio_callback",
            Self::Demo => "demo_twilio_callback",
        }
    }

    /// Plain-text body returned to the client on success
    pub fn ack(&self) -> &'static str {
        match self {
            Self::Standard => "done",
            Self::Demo => "Demo call initiated",
        }
    }

    /// `{callback}/{path}?ws_url=..&agent_id=..&user_id=..`, values percent-encoded
    pub fn callback_url(
        &self,
        tunnels: &TunnelPair,
        agent_id: &str,
        session_id: &SessionId,
    ) -> Result<Url> {
        let base = format!(
            "{}/{}",
            tunnels.callback_url.trim_end_matches('/'),
            self.callback_path()
        );
        let mut url = Url::parse(&base)
            .map_err(|e| Error::TunnelsUnavailable(format!("bad callback tunnel {}: {}", base, e)))?;

        url.query_pairs_mut()
            .append_pair("ws_url", &tunnels.websocket_url)
            .append_pair("agent_id", agent_id)
            .append_pair("user_id", session_id.as_str());

        Ok(url)
    }

    /// TwiML connecting the call to the agent's websocket
    pub fn voice_response(&self, ws_url: &str, agent_id: &str) -> VoiceResponse {
        let stream = Stream::new(stream_target(ws_url, agent_id));
        match self {
            Self::Standard => VoiceResponse::new().connect_stream(stream),
            Self::Demo => VoiceResponse::new().say(DEMO_SCRIPT).connect_stream(stream),
        }
    }
}

pub fn stream_target(ws_url: &str, agent_id: &str) -> String {
    format!("{}/chat/v1/{}", ws_url, agent_id)
}
