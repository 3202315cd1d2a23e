//! HTTP handlers for the Telephony Server API

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use callbridge_core::{CallRequest, DependencyStatus, HealthStatus, ReadinessStatus, SessionId};
use callbridge_kv::KvEntry;
use callbridge_telemetry::MetricsSnapshot;
use callbridge_twilio_sdk::CreateCallRequest;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info, warn};

use crate::flow::CallFlow;
use crate::{AppState, Error, Result};

/// Stats response
#[derive(Serialize)]
pub struct StatsResponse {
    pub uptime_secs: u64,
    pub calls_initiated: u64,
    pub calls_failed: u64,
    pub callbacks_served: u64,
    pub twilio_latency_ms: MetricsSnapshot,
}

/// Query string Twilio sends back on the callback URL
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub ws_url: String,
    pub agent_id: String,
    /// Session id; accepted for provider compatibility, not used
    #[allow(dead_code)]
    pub user_id: String,
}

// ============================================
// Health & Metrics Handlers
// ============================================

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        healthy: true,
        service_id: state.config.service.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

pub async fn ready(State(state): State<AppState>) -> Json<ReadinessStatus> {
    let started = Instant::now();
    let store_ok = state.store.ping().await;

    Json(ReadinessStatus {
        ready: store_ok,
        dependencies: vec![DependencyStatus {
            name: "session-store".to_string(),
            available: store_ok,
            latency_ms: Some(started.elapsed().as_millis() as u64),
        }],
    })
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        uptime_secs: state.start_time.elapsed().as_secs(),
        calls_initiated: state.metrics.calls_initiated.get(),
        calls_failed: state.metrics.calls_failed.get(),
        callbacks_served: state.metrics.callbacks_served.get(),
        twilio_latency_ms: MetricsSnapshot::from(&state.metrics.twilio_latency_ms),
    })
}

// ============================================
// Call Initiation Handlers
// ============================================

pub async fn make_call(State(state): State<AppState>, body: Bytes) -> Result<&'static str> {
    initiate(&state, CallFlow::Standard, &body).await
}

pub async fn demo_call(State(state): State<AppState>, body: Bytes) -> Result<&'static str> {
    initiate(&state, CallFlow::Demo, &body).await
}

async fn initiate(state: &AppState, flow: CallFlow, body: &[u8]) -> Result<&'static str> {
    match place_call(state, flow, body).await {
        Ok(session_id) => {
            state.metrics.calls_initiated.inc();
            info!(flow = flow.name(), session_id = %session_id, "Call initiated");
            Ok(flow.ack())
        }
        Err(e) => {
            state.metrics.calls_failed.inc();
            match &e {
                Error::MissingField(field) => warn!(flow = flow.name(), "Rejected call: {}", field),
                other => error!(flow = flow.name(), "Call initiation failed: {}", other),
            }
            Err(e)
        }
    }
}

/// Validate, resolve tunnels, create the Twilio call, then record the session.
async fn place_call(state: &AppState, flow: CallFlow, body: &[u8]) -> Result<SessionId> {
    let request: CallRequest =
        serde_json::from_slice(body).map_err(|e| Error::InvalidPayload(e.to_string()))?;
    let call = request.validate()?;

    let session_id = SessionId::generate();

    let tunnels = match state.tunnels.resolve().await.into_pair() {
        Some(pair) => pair,
        None => {
            return Err(Error::TunnelsUnavailable(
                "callback or websocket tunnel not resolved".to_string(),
            ))
        }
    };
    info!(
        callback_url = %tunnels.callback_url,
        websocket_url = %tunnels.websocket_url,
        webhook_url = %call.webhook_url,
        "Tunnels resolved for call"
    );

    let callback_url = flow.callback_url(&tunnels, call.agent_id, &session_id)?;

    let create = CreateCallRequest {
        to: call.recipient_phone_number.to_string(),
        from: state.config.twilio_phone_number.clone(),
        url: callback_url.to_string(),
        record: false,
        status_callback: call.webhook_url.to_string(),
    };

    let started = Instant::now();
    let created = state.twilio.create_call(&create).await?;
    state
        .metrics
        .twilio_latency_ms
        .record(started.elapsed().as_secs_f64() * 1000.0);

    info!(call_sid = %created.sid, agent_id = %call.agent_id, "Twilio call placed");

    state
        .store
        .set(KvEntry::json(session_id.as_str(), &request)?)
        .await?;

    Ok(session_id)
}

// ============================================
// Twilio Callback Handlers
// ============================================

pub async fn twilio_callback(
    State(state): State<AppState>,
    params: std::result::Result<Query<CallbackParams>, QueryRejection>,
) -> Result<Response> {
    callback(&state, CallFlow::Standard, params)
}

pub async fn demo_twilio_callback(
    State(state): State<AppState>,
    params: std::result::Result<Query<CallbackParams>, QueryRejection>,
) -> Result<Response> {
    callback(&state, CallFlow::Demo, params)
}

fn callback(
    state: &AppState,
    flow: CallFlow,
    params: std::result::Result<Query<CallbackParams>, QueryRejection>,
) -> Result<Response> {
    let Query(params) = params.map_err(|rejection| {
        warn!(flow = flow.name(), "Rejected callback: {}", rejection.body_text());
        Error::InvalidCallback(rejection.body_text())
    })?;

    let twiml = flow
        .voice_response(&params.ws_url, &params.agent_id)
        .to_xml()
        .map_err(|e| {
            error!(flow = flow.name(), "TwiML generation failed: {}", e);
            Error::Internal(e.to_string())
        })?;

    state.metrics.callbacks_served.inc();
    info!(
        flow = flow.name(),
        agent_id = %params.agent_id,
        "Websocket stream connected to {}/chat/v1/{}",
        params.ws_url,
        params.agent_id
    );

    Ok(([(header::CONTENT_TYPE, "text/xml")], twiml).into_response())
}
