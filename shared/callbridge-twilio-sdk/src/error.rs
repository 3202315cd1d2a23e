//! Twilio SDK error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TwilioError>;

#[derive(Debug, Error)]
pub enum TwilioError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Twilio API error {status}: {message}")]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("TwiML error: {0}")]
    Twiml(String),
}
