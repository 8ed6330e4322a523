//! Platform record types.
//!
//! Provides the messaging-platform side of the bridge's data model:
//! - [`SchemaDescriptor`]: Opaque schema identity the bridge moves but
//!   never interprets
//! - [`InboundRecord`]: A record as delivered by the platform
//! - [`OutboundRecord`]: A record ready to hand back to the platform,
//!   built via [`OutboundRecordBuilder`]

use std::collections::HashMap;
use std::fmt;

use trestle_pipeline::Value;

use crate::error::BridgeError;

/// Identity of a platform schema.
///
/// The bridge only carries schema identity across the pipeline boundary;
/// interpretation stays with the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    name: String,
    version: Option<u64>,
}

impl SchemaDescriptor {
    /// Creates a schema descriptor with no version.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    /// Sets the schema version.
    #[must_use]
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    /// Returns the schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the schema version, if known.
    #[must_use]
    pub fn version(&self) -> Option<u64> {
        self.version
    }
}

impl fmt::Display for SchemaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version {
            Some(v) => write!(f, "{}@{v}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A record delivered by the messaging platform.
///
/// Immutable once delivered; lives for exactly one invocation. Partition
/// fields and the key are optional because not every platform delivery
/// carries them.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundRecord {
    topic: String,
    schema: SchemaDescriptor,
    key: Option<String>,
    partition_id: Option<String>,
    partition_index: Option<i32>,
    properties: HashMap<String, String>,
    body: Value,
}

impl InboundRecord {
    /// Creates an inbound record with the mandatory fields.
    #[must_use]
    pub fn new(topic: impl Into<String>, schema: SchemaDescriptor, body: impl Into<Value>) -> Self {
        Self {
            topic: topic.into(),
            schema,
            key: None,
            partition_id: None,
            partition_index: None,
            properties: HashMap::new(),
            body: body.into(),
        }
    }

    /// Sets the record key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the partition identifier.
    #[must_use]
    pub fn with_partition_id(mut self, id: impl Into<String>) -> Self {
        self.partition_id = Some(id.into());
        self
    }

    /// Sets the partition index.
    #[must_use]
    pub fn with_partition_index(mut self, index: i32) -> Self {
        self.partition_index = Some(index);
        self
    }

    /// Adds a platform property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Replaces all platform properties.
    #[must_use]
    pub fn with_properties(mut self, properties: HashMap<String, String>) -> Self {
        self.properties = properties;
        self
    }

    /// Returns the topic the record arrived on.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Returns the record's schema descriptor.
    #[must_use]
    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    /// Returns the record key, if present.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns the partition identifier, if present.
    #[must_use]
    pub fn partition_id(&self) -> Option<&str> {
        self.partition_id.as_deref()
    }

    /// Returns the partition index, if present.
    #[must_use]
    pub fn partition_index(&self) -> Option<i32> {
        self.partition_index
    }

    /// Returns the platform properties.
    #[must_use]
    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }

    /// Returns the record body.
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }
}

/// A record ready to hand back to the messaging platform.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRecord {
    destination_topic: String,
    schema: SchemaDescriptor,
    body: Value,
    properties: HashMap<String, String>,
}

impl OutboundRecord {
    /// Starts building an outbound record for the given schema.
    #[must_use]
    pub fn builder(schema: SchemaDescriptor) -> OutboundRecordBuilder {
        OutboundRecordBuilder {
            schema,
            destination_topic: None,
            body: Value::Null,
            properties: HashMap::new(),
        }
    }

    /// Returns the topic the record will be sent to.
    #[must_use]
    pub fn destination_topic(&self) -> &str {
        &self.destination_topic
    }

    /// Returns the record's schema descriptor.
    #[must_use]
    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    /// Returns the record body.
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Returns the record properties.
    #[must_use]
    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }
}

/// Builder for [`OutboundRecord`].
#[derive(Debug, Clone)]
pub struct OutboundRecordBuilder {
    schema: SchemaDescriptor,
    destination_topic: Option<String>,
    body: Value,
    properties: HashMap<String, String>,
}

impl OutboundRecordBuilder {
    /// Sets the destination topic. Required.
    #[must_use]
    pub fn destination_topic(mut self, topic: impl Into<String>) -> Self {
        self.destination_topic = Some(topic.into());
        self
    }

    /// Sets the record body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Value>) -> Self {
        self.body = body.into();
        self
    }

    /// Adds a single record property.
    #[must_use]
    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Replaces all record properties.
    #[must_use]
    pub fn properties(mut self, properties: HashMap<String, String>) -> Self {
        self.properties = properties;
        self
    }

    /// Builds the record.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::Configuration` if no destination topic was
    /// set.
    pub fn build(self) -> Result<OutboundRecord, BridgeError> {
        let destination_topic = self.destination_topic.ok_or_else(|| {
            BridgeError::Configuration("outbound record has no destination topic".to_string())
        })?;
        Ok(OutboundRecord {
            destination_topic,
            schema: self.schema,
            body: self.body,
            properties: self.properties,
        })
    }
}
