use serde::Serialize;
use serde_json::{json, Map, Value};

/// Keys Slack recognizes on a legacy message attachment.
pub const ATTACHMENT_KEYS: &[&str] = &[
    "fallback",
    "color",
    "pretext",
    "author_name",
    "author_link",
    "author_icon",
    "title",
    "title_link",
    "text",
    "fields",
    "image_url",
    "thumb_url",
    "callback_id",
    "actions",
];

/// Keys Slack recognizes on an interactive attachment action.
pub const ACTION_KEYS: &[&str] = &["name", "text", "type", "style", "value", "confirm"];

fn retain_known<I, K, V>(fields: I, whitelist: &[&str]) -> Map<String, Value>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    fields
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .filter(|(key, _)| whitelist.contains(&key.as_str()))
        .collect()
}

fn append(fields: &mut Map<String, Value>, key: &str, item: Value) {
    let slot = fields.entry(key).or_insert_with(|| Value::Array(Vec::new()));
    match slot {
        Value::Array(items) => items.push(item),
        other => *other = Value::Array(vec![item]),
    }
}

/// A rich message attachment. Only whitelisted keys survive construction, so
/// the serialized form never carries anything Slack would reject.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Attachment {
    fields: Map<String, Value>,
}

impl Attachment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an attachment from arbitrary key/value pairs, silently dropping
    /// keys outside [`ATTACHMENT_KEYS`].
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self { fields: retain_known(fields, ATTACHMENT_KEYS) }
    }

    pub fn fallback(self, text: impl Into<String>) -> Self {
        self.with("fallback", text.into())
    }

    pub fn color(self, color: impl Into<String>) -> Self {
        self.with("color", color.into())
    }

    pub fn pretext(self, text: impl Into<String>) -> Self {
        self.with("pretext", text.into())
    }

    pub fn author(self, name: impl Into<String>, link: Option<&str>, icon: Option<&str>) -> Self {
        let mut attachment = self.with("author_name", name.into());
        if let Some(link) = link {
            attachment = attachment.with("author_link", link);
        }
        if let Some(icon) = icon {
            attachment = attachment.with("author_icon", icon);
        }
        attachment
    }

    pub fn title(self, title: impl Into<String>) -> Self {
        self.with("title", title.into())
    }

    pub fn title_link(self, link: impl Into<String>) -> Self {
        self.with("title_link", link.into())
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.with("text", text.into())
    }

    pub fn image_url(self, url: impl Into<String>) -> Self {
        self.with("image_url", url.into())
    }

    pub fn thumb_url(self, url: impl Into<String>) -> Self {
        self.with("thumb_url", url.into())
    }

    pub fn callback_id(self, callback_id: impl Into<String>) -> Self {
        self.with("callback_id", callback_id.into())
    }

    pub fn field(mut self, title: impl Into<String>, value: impl Into<String>, short: bool) -> Self {
        append(
            &mut self.fields,
            "fields",
            json!({ "title": title.into(), "value": value.into(), "short": short }),
        );
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        append(&mut self.fields, "actions", Value::Object(action.fields));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn with(mut self, key: &'static str, value: impl Into<Value>) -> Self {
        debug_assert!(ATTACHMENT_KEYS.contains(&key));
        self.fields.insert(key.to_owned(), value.into());
        self
    }
}

/// An interactive element carried inside [`Attachment::action`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Action {
    fields: Map<String, Value>,
}

impl Action {
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self { fields: retain_known(fields, ACTION_KEYS) }
    }

    pub fn button(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::default().with("name", name.into()).with("text", text.into()).with("type", "button")
    }

    pub fn style(self, style: ActionStyle) -> Self {
        self.with("style", style.as_str())
    }

    pub fn value(self, value: impl Into<String>) -> Self {
        self.with("value", value.into())
    }

    pub fn confirm(self, confirmation: Confirmation) -> Self {
        self.with("confirm", confirmation.into_value())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    fn with(mut self, key: &'static str, value: impl Into<Value>) -> Self {
        debug_assert!(ACTION_KEYS.contains(&key));
        self.fields.insert(key.to_owned(), value.into());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionStyle {
    Default,
    Primary,
    Danger,
}

impl ActionStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Primary => "primary",
            Self::Danger => "danger",
        }
    }
}

/// Dialog shown before a destructive action is submitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub title: String,
    pub text: String,
    pub ok_text: String,
    pub dismiss_text: String,
}

impl Confirmation {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            ok_text: "Yes".to_owned(),
            dismiss_text: "No".to_owned(),
        }
    }

    fn into_value(self) -> Value {
        json!({
            "title": self.title,
            "text": self.text,
            "ok_text": self.ok_text,
            "dismiss_text": self.dismiss_text,
        })
    }
}

/// What a handler wants done with its result.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    /// No reply at all; the platform receives an empty body.
    None,
    /// Plain text, visibility decided by the route.
    Text(String),
    /// A single attachment, visibility decided by the route.
    Attachment(Attachment),
    /// Text shown only to the caller.
    Private(String),
    /// `indirect` is posted to the response URL later; `feedback` decides the
    /// immediate reply.
    Indirect { feedback: Feedback, indirect: Content },
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn private(feedback: impl Into<String>) -> Self {
        Self::Private(feedback.into())
    }

    pub fn indirect(feedback: impl Into<Feedback>, indirect: impl Into<Content>) -> Self {
        Self::Indirect { feedback: feedback.into(), indirect: indirect.into() }
    }
}

impl From<()> for Reply {
    fn from(_: ()) -> Self {
        Self::None
    }
}

impl From<&str> for Reply {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Reply {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Attachment> for Reply {
    fn from(value: Attachment) -> Self {
        Self::Attachment(value)
    }
}

/// Immediate reply accompanying an [`Reply::Indirect`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Feedback {
    /// Empty body.
    None,
    /// Let the platform echo the caller's input into the channel.
    Echo,
    /// Ephemeral text; an empty string behaves like [`Feedback::None`].
    Private(String),
}

impl From<bool> for Feedback {
    fn from(value: bool) -> Self {
        if value {
            Self::Echo
        } else {
            Self::None
        }
    }
}

impl From<&str> for Feedback {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<String> for Feedback {
    fn from(value: String) -> Self {
        if value.is_empty() {
            Self::None
        } else {
            Self::Private(value)
        }
    }
}

/// Body of a deferred delivery.
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Text(String),
    Attachment(Attachment),
}

impl From<&str> for Content {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Content {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Attachment> for Content {
    fn from(value: Attachment) -> Self {
        Self::Attachment(value)
    }
}
