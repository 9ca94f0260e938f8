use flack_core::errors::DispatchError;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use crate::identity::{normalize, Caller, Channel, FlatIdentity, IdentitySource, NestedIdentity};

/// Form body of an outgoing-webhook callback. Every field defaults to empty so
/// that a request missing keys still reaches the token check.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebhookPayload {
    pub token: String,
    pub trigger_word: String,
    pub text: String,
    #[serde(flatten)]
    pub identity: FlatIdentity,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CommandPayload {
    pub token: String,
    pub command: String,
    pub text: String,
    pub response_url: String,
    pub trigger_id: String,
    #[serde(flatten)]
    pub identity: FlatIdentity,
}

/// Interactive callbacks arrive as a single `payload` form field holding JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ActionForm {
    pub payload: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ActionPayload {
    pub token: String,
    pub actions: Vec<ActionSelection>,
    pub callback_id: String,
    pub message_ts: String,
    pub response_url: String,
    pub trigger_id: String,
    #[serde(flatten)]
    pub identity: NestedIdentity,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ActionSelection {
    pub name: String,
    pub value: String,
    pub selected_options: Vec<SelectedOption>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SelectedOption {
    pub value: String,
}

impl ActionSelection {
    /// Buttons carry `value`; menus carry `selected_options` instead.
    pub fn effective_value(&self) -> String {
        if !self.value.is_empty() {
            return self.value.clone();
        }
        self.selected_options.first().map(|option| option.value.clone()).unwrap_or_default()
    }
}

/// Arguments handed to a trigger-word handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebhookCall {
    pub trigger_word: String,
    pub text: String,
    pub user: Caller,
    pub channel: Channel,
}

/// Arguments handed to a slash-command handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandCall {
    pub command: String,
    pub text: String,
    pub user: Caller,
    pub channel: Channel,
    pub response_url: Option<String>,
    /// Short-lived id for opening a dialog in response to this command.
    pub trigger_id: Option<String>,
}

/// Arguments handed to an action handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionCall {
    pub name: String,
    pub value: String,
    pub callback_id: String,
    pub message_ts: String,
    pub user: Caller,
    pub channel: Channel,
    pub response_url: Option<String>,
    pub trigger_id: Option<String>,
}

/// Compares the shared verification token carried in every payload.
#[derive(Clone)]
pub struct TokenVerifier {
    expected: SecretString,
}

impl TokenVerifier {
    pub fn new(expected: SecretString) -> Self {
        Self { expected }
    }

    pub fn verify(&self, presented: &str) -> Result<(), DispatchError> {
        let expected = self.expected.expose_secret();
        if expected.is_empty() || presented != expected {
            return Err(DispatchError::InvalidToken);
        }
        Ok(())
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").field("expected", &"<redacted>").finish()
    }
}

pub fn parse_webhook(
    payload: WebhookPayload,
    verifier: &TokenVerifier,
) -> Result<WebhookCall, DispatchError> {
    verifier.verify(&payload.token)?;
    if payload.trigger_word.is_empty() {
        return Err(DispatchError::MissingField("trigger word"));
    }

    let identity = normalize(IdentitySource::Flat(&payload.identity));
    let text = strip_trigger(&payload.text, &payload.trigger_word);

    Ok(WebhookCall {
        trigger_word: payload.trigger_word,
        text,
        user: identity.caller,
        channel: identity.channel,
    })
}

pub fn parse_command(
    payload: CommandPayload,
    verifier: &TokenVerifier,
) -> Result<CommandCall, DispatchError> {
    verifier.verify(&payload.token)?;
    if payload.command.is_empty() {
        return Err(DispatchError::MissingField("command"));
    }

    let identity = normalize(IdentitySource::Flat(&payload.identity));

    Ok(CommandCall {
        command: payload.command,
        text: payload.text,
        user: identity.caller,
        channel: identity.channel,
        response_url: non_empty(payload.response_url),
        trigger_id: non_empty(payload.trigger_id),
    })
}

pub fn parse_action(form: ActionForm, verifier: &TokenVerifier) -> Result<ActionCall, DispatchError> {
    let payload: ActionPayload = serde_json::from_str(&form.payload)
        .map_err(|error| DispatchError::MalformedPayload(error.to_string()))?;
    verifier.verify(&payload.token)?;

    // Slack sends exactly one action per callback; anything after the first
    // element is ignored.
    let Some(selection) = payload.actions.first() else {
        return Err(DispatchError::MissingField("action"));
    };

    let identity = normalize(IdentitySource::Nested(&payload.identity));

    Ok(ActionCall {
        name: selection.name.clone(),
        value: selection.effective_value(),
        callback_id: payload.callback_id,
        message_ts: payload.message_ts,
        user: identity.caller,
        channel: identity.channel,
        response_url: non_empty(payload.response_url),
        trigger_id: non_empty(payload.trigger_id),
    })
}

/// Removes the trigger word echoed at the start of an outgoing-webhook text.
/// Text that does not start with the trigger word is passed through trimmed.
pub fn strip_trigger(text: &str, trigger_word: &str) -> String {
    let prefix_len = trigger_word.chars().count();
    let split_at = text.char_indices().nth(prefix_len).map(|(index, _)| index).unwrap_or(text.len());
    let (head, rest) = text.split_at(split_at);

    if head.chars().count() == prefix_len && head.eq_ignore_ascii_case(trigger_word) {
        rest.trim().to_owned()
    } else {
        debug!(
            event_name = "ingress.webhook.trigger_not_prefix",
            trigger_word,
            "webhook text does not start with its trigger word; passing text through"
        );
        text.trim().to_owned()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
