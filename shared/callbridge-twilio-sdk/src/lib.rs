//! Twilio Programmable Voice SDK
//!
//! Minimal client for outbound call creation and a TwiML builder for the
//! voice-control documents Twilio fetches when a call connects.

mod client;
mod error;
mod twiml;

pub use client::{CallApi, CallResource, CreateCallRequest, TwilioClient, TwilioCredentials, DEFAULT_API_BASE};
pub use error::{Result, TwilioError};
pub use twiml::{Stream, VoiceResponse};
