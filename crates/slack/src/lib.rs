//! Slack callback dispatch for flack
//!
//! This crate turns Slack's three inbound callback shapes into handler calls
//! and the handlers' answers back into Slack responses:
//! - **Payloads** (`payloads`) - form/JSON bodies, token check, call structs
//! - **Identity** (`identity`) - flat and nested user/channel shapes, one normalizer
//! - **Dispatcher** (`dispatcher`) - trigger, command and action registries
//! - **Encoder** (`encoder`) - `Reply` to synchronous JSON envelope
//! - **Delivery** (`delivery`) - single-worker queue posting deferred replies
//! - **Message** (`message`) - attachments, actions and reply intents
//!
//! # Architecture
//!
//! ```text
//! HTTP form → payloads (token) → Dispatcher → handler → Reply
//!                                                 ↓
//!                      SyncReply ← ResponseEncoder → DeliveryQueue → response_url
//! ```
//!
//! # Key Types
//!
//! - `Dispatcher` - owns the three registries and the encoder
//! - `Reply` - what a handler wants sent, now and/or later
//! - `DeliveryWorker` - ordered, delayed posts to response URLs

pub mod delivery;
pub mod dispatcher;
pub mod encoder;
pub mod identity;
pub mod message;
pub mod payloads;

pub use delivery::{DeliveryPolicy, DeliveryQueue, DeliveryWorker, HttpTransport, RetryPolicy};
pub use dispatcher::{ActionHandler, CommandHandler, Dispatcher, RequestContext, WebhookHandler};
pub use encoder::{ResponseEncoder, SyncReply};
pub use message::{Action, ActionStyle, Attachment, Confirmation, Content, Feedback, Reply};
pub use payloads::{ActionCall, ActionForm, CommandCall, CommandPayload, WebhookCall, WebhookPayload};
