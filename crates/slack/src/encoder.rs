use flack_core::errors::{DeliveryError, DispatchError};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::delivery::{DeferredDelivery, DeliveryQueue};
use crate::dispatcher::RequestContext;
use crate::message::{Attachment, Content, Feedback, Reply};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Ephemeral,
    InChannel,
}

impl ResponseType {
    fn from_private(private: bool) -> Self {
        if private {
            Self::Ephemeral
        } else {
            Self::InChannel
        }
    }
}

/// The JSON object Slack expects as a synchronous reply.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub username: String,
    pub text: String,
    pub attachments: Vec<Attachment>,
    pub response_type: ResponseType,
    pub replace_original: bool,
}

/// Synchronous outcome of a dispatch, ready to be written as the HTTP body.
#[derive(Clone, Debug, PartialEq)]
pub enum SyncReply {
    /// Empty body.
    Empty,
    /// `{"response_type":"in_channel"}`: the platform echoes the caller's input.
    Echo,
    Message(ResponseEnvelope),
}

impl SyncReply {
    /// JSON body, or `None` when the reply is an empty body.
    pub fn body(&self) -> Option<Value> {
        match self {
            Self::Empty => None,
            Self::Echo => Some(json!({ "response_type": "in_channel" })),
            Self::Message(envelope) => serde_json::to_value(envelope).ok(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Body posted to a response URL by the delivery worker. Always public.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DeferredMessage {
    pub text: String,
    pub attachments: Vec<Attachment>,
    pub response_type: ResponseType,
}

impl DeferredMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), attachments: Vec::new(), response_type: ResponseType::InChannel }
    }
}

impl From<Content> for DeferredMessage {
    fn from(content: Content) -> Self {
        match content {
            Content::Text(text) => Self::text(text),
            Content::Attachment(attachment) => Self {
                text: String::new(),
                attachments: vec![attachment],
                response_type: ResponseType::InChannel,
            },
        }
    }
}

/// Per-call encoding knobs chosen by the dispatcher.
#[derive(Clone, Copy, Debug, Default)]
pub struct EncodeOptions<'a> {
    /// Overrides the configured default username.
    pub display_name: Option<&'a str>,
    pub response_url: Option<&'a str>,
    pub private: bool,
    pub replace_original: bool,
}

#[derive(Clone, Debug)]
pub struct ResponseEncoder {
    default_name: String,
    deliveries: Option<DeliveryQueue>,
}

impl ResponseEncoder {
    pub fn new(default_name: impl Into<String>) -> Self {
        Self { default_name: default_name.into(), deliveries: None }
    }

    pub fn with_deliveries(mut self, queue: DeliveryQueue) -> Self {
        self.deliveries = Some(queue);
        self
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn deliveries(&self) -> Option<&DeliveryQueue> {
        self.deliveries.as_ref()
    }

    pub async fn encode(
        &self,
        reply: Reply,
        options: EncodeOptions<'_>,
        context: &RequestContext,
    ) -> SyncReply {
        let mut envelope = ResponseEnvelope {
            username: options.display_name.unwrap_or(&self.default_name).to_owned(),
            text: String::new(),
            attachments: Vec::new(),
            response_type: ResponseType::from_private(options.private),
            replace_original: options.replace_original,
        };

        match reply {
            Reply::None => return SyncReply::Empty,
            Reply::Text(text) => envelope.text = text,
            Reply::Attachment(attachment) => envelope.attachments.push(attachment),
            Reply::Private(text) => {
                envelope.text = text;
                envelope.response_type = ResponseType::Ephemeral;
            }
            Reply::Indirect { feedback, indirect } => {
                // The side channel is scheduled first; the synchronous part
                // depends only on `feedback`.
                self.schedule(indirect, options.response_url, context);

                match feedback {
                    Feedback::None => return SyncReply::Empty,
                    Feedback::Echo => return SyncReply::Echo,
                    Feedback::Private(text) if text.is_empty() => return SyncReply::Empty,
                    Feedback::Private(text) => {
                        envelope.text = text;
                        envelope.response_type = ResponseType::Ephemeral;
                    }
                }
            }
        }

        debug!(
            event_name = "dispatch.response.encoded",
            correlation_id = %context.correlation_id,
            response_type = ?envelope.response_type,
            "generated synchronous response"
        );
        SyncReply::Message(envelope)
    }

    /// Private reply for every non-silent dispatch failure.
    pub fn error_reply(&self, error: &DispatchError) -> SyncReply {
        SyncReply::Message(ResponseEnvelope {
            username: self.default_name.clone(),
            text: error.sanitized_message(),
            attachments: Vec::new(),
            response_type: ResponseType::Ephemeral,
            replace_original: false,
        })
    }

    fn schedule(&self, content: Content, response_url: Option<&str>, context: &RequestContext) {
        let Some(response_url) = response_url else {
            warn!(
                event_name = "dispatch.indirect.no_response_url",
                correlation_id = %context.correlation_id,
                "indirect reply without a response url; skipping deferred delivery"
            );
            return;
        };
        let Some(queue) = &self.deliveries else {
            warn!(
                event_name = "dispatch.indirect.no_worker",
                correlation_id = %context.correlation_id,
                "no delivery worker configured; skipping deferred delivery"
            );
            return;
        };

        let delivery = DeferredDelivery {
            response_url: response_url.to_owned(),
            message: DeferredMessage::from(content),
            correlation_id: context.correlation_id.clone(),
        };

        match queue.submit(delivery) {
            Ok(()) => {}
            Err(DeliveryError::QueueFull) => warn!(
                event_name = "delivery.dropped",
                correlation_id = %context.correlation_id,
                pending = queue.pending(),
                "delivery queue is full; dropping deferred message"
            ),
            Err(error) => warn!(
                event_name = "dispatch.indirect.enqueue_failed",
                correlation_id = %context.correlation_id,
                error = %error,
                "failed to enqueue deferred delivery"
            ),
        }
    }
}
