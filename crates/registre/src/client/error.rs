//! Client-side error types and their user-facing messages.

use thiserror::Error;

use crate::api::error::{NOT_FOUND, VALIDATION_ERROR};
use crate::i18n::{Language, Message};

/// What the user was doing when a call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Save,
    Update,
    Delete,
    Search,
    Load,
}

impl Action {
    fn failure(&self) -> Message {
        match self {
            Self::Save | Self::Update => Message::SaveFailed,
            Self::Delete => Message::DeleteFailed,
            Self::Search => Message::SearchFailed,
            Self::Load => Message::LoadFailed,
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
        field: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The health check failed, so the call was not attempted.
    #[error("Server unavailable: {0}")]
    Unavailable(String),
}

impl ClientError {
    pub fn message(&self, action: Action) -> Message {
        match self {
            Self::Unavailable(_) => Message::ServerUnavailable,
            Self::Api { code, .. } if code == NOT_FOUND => Message::NotFound,
            Self::Api { code, .. } if code == VALIDATION_ERROR => Message::FieldRequired,
            _ => action.failure(),
        }
    }

    /// Localized toast text for this failure.
    pub fn toast(&self, action: Action, lang: Language) -> &'static str {
        self.message(action).text(lang)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
