use std::fmt;

use thiserror::Error;

/// The three inbound routes, used to label routing failures and log events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteKind {
    Trigger,
    Command,
    Action,
}

impl RouteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
            Self::Command => "command",
            Self::Action => "action",
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures raised while turning an inbound request into a reply.
///
/// `InvalidToken` and `MalformedPayload` are answered with an empty body;
/// everything else is reported back to the caller as a private message.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("invalid token")]
    InvalidToken,
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    #[error("no {0} supplied")]
    MissingField(&'static str),
    #[error("unregistered {kind}: {key}")]
    UnknownRoute { kind: RouteKind, key: String },
    #[error("{0}")]
    HandlerFailure(String),
}

impl DispatchError {
    /// True for the failures that must never produce a visible reply.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::InvalidToken | Self::MalformedPayload(_))
    }

    pub fn error_class(&self) -> &'static str {
        match self {
            Self::InvalidToken => "invalid_token",
            Self::MalformedPayload(_) => "malformed_payload",
            Self::MissingField(_) => "missing_field",
            Self::UnknownRoute { .. } => "unknown_route",
            Self::HandlerFailure(_) => "handler_failure",
        }
    }

    /// Text safe to echo back to the platform: angle brackets would otherwise
    /// be interpreted as link or mention markup.
    pub fn sanitized_message(&self) -> String {
        sanitize_markup(&self.to_string())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("invalid {kind} registration: key must not be empty")]
    InvalidRegistration { kind: RouteKind },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("response url has expired (status {status})")]
    Expired { status: u16 },
    #[error("response url rejected delivery (status {status})")]
    Failed { status: u16 },
    #[error("delivery transport failed: {0}")]
    Transport(String),
    #[error("delivery queue is closed")]
    QueueClosed,
    #[error("delivery queue is full")]
    QueueFull,
}

impl DeliveryError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::Transport(_))
    }
}

pub fn sanitize_markup(message: &str) -> String {
    message.chars().filter(|ch| !matches!(ch, '<' | '>')).collect()
}
