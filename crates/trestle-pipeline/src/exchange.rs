//! The in-flight unit of work a pipeline operates on.
//!
//! An [`Exchange`] carries cross-cutting metadata as properties plus a
//! [`Message`] holding the body and per-message headers. The bridge creates
//! one exchange per inbound record, hands it to the engine, and reads the
//! returned exchange back into an outbound record.

use std::collections::HashMap;

use crate::value::Value;

/// A single unit of work flowing through a pipeline.
///
/// Properties hold metadata that spans the whole exchange (routing
/// decisions, bridge-injected record metadata); the message holds the
/// payload and its headers. An exchange is owned exclusively by the engine
/// while a request runs and is returned by value when the request
/// completes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Exchange {
    properties: HashMap<String, Value>,
    message: Message,
}

impl Exchange {
    /// Creates an empty exchange with a null-bodied message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an exchange property, replacing any previous value.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Gets an exchange property.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Returns all exchange properties.
    #[must_use]
    pub fn properties(&self) -> &HashMap<String, Value> {
        &self.properties
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Returns the message for mutation.
    pub fn message_mut(&mut self) -> &mut Message {
        &mut self.message
    }

    /// Consumes the exchange, returning its message.
    #[must_use]
    pub fn into_message(self) -> Message {
        self.message
    }
}

/// The payload portion of an [`Exchange`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    body: Value,
    headers: HashMap<String, Value>,
}

impl Message {
    /// Creates an empty message with a null body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message body.
    pub fn set_body(&mut self, body: impl Into<Value>) {
        self.body = body.into();
    }

    /// Returns the message body.
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Consumes the message, returning its body.
    #[must_use]
    pub fn into_body(self) -> Value {
        self.body
    }

    /// Sets a message header, replacing any previous value.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.headers.insert(key.into(), value.into());
    }

    /// Gets a message header.
    #[must_use]
    pub fn header(&self, key: &str) -> Option<&Value> {
        self.headers.get(key)
    }

    /// Removes a message header, returning its value if present.
    pub fn remove_header(&mut self, key: &str) -> Option<Value> {
        self.headers.remove(key)
    }

    /// Returns all message headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, Value> {
        &self.headers
    }
}
