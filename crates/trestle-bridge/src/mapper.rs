//! Metadata translation between platform records and pipeline exchanges.
//!
//! The mapper is the heart of the bridge: pure functions that carry record
//! metadata across an engine boundary that knows nothing about the
//! platform's types.
//!
//! - [`build_exchange_properties`]: Inbound record → exchange properties
//!   and message headers
//! - [`extract_outbound_metadata`]: Result exchange → outbound topic,
//!   schema, and record properties
//!
//! Bridge-injected properties use the fixed `PROP_*` keys below, all under
//! the `trestle/` namespace so they cannot collide with property names a
//! route author picks. Routes read them to inspect record provenance and
//! write [`PROP_OUTPUT_TOPIC`] / [`PROP_RECORD_SCHEMA`] to redirect the
//! outbound record.
//!
//! Nothing here performs I/O or holds state; failures on the outbound path
//! are contained per header and reported through [`OutboundMetadata`].

use std::collections::HashMap;

use tracing::warn;

use trestle_pipeline::{Exchange, Value};

use crate::context::FunctionContext;
use crate::record::{InboundRecord, SchemaDescriptor};

/// Exchange property carrying the function instance identifier.
pub const PROP_FUNCTION_ID: &str = "trestle/function.id";

/// Exchange property carrying the configured output topic.
///
/// A route may overwrite it to redirect the outbound record.
pub const PROP_OUTPUT_TOPIC: &str = "trestle/function.topic.output";

/// Exchange property carrying the topic the inbound record arrived on.
pub const PROP_RECORD_TOPIC: &str = "trestle/record.topic";

/// Exchange property carrying the inbound record's schema descriptor.
///
/// Stored as an opaque [`SchemaDescriptor`]; a route may overwrite it to
/// change the outbound schema.
pub const PROP_RECORD_SCHEMA: &str = "trestle/record.schema";

/// Exchange property carrying the inbound record key. Set only when the
/// record has a key.
pub const PROP_RECORD_KEY: &str = "trestle/record.key";

/// Exchange property carrying the inbound partition identifier. Set only
/// when the record has one.
pub const PROP_PARTITION_ID: &str = "trestle/record.partition.id";

/// Exchange property carrying the inbound partition index. Set only when
/// the record has one.
pub const PROP_PARTITION_INDEX: &str = "trestle/record.partition.index";

/// Exchange properties and message headers derived from one inbound
/// record, ready to apply to a fresh exchange.
#[derive(Debug, Clone, Default)]
pub struct PropertySet {
    /// Exchange-level properties, keyed by the `PROP_*` constants.
    pub properties: HashMap<String, Value>,

    /// Message headers copied from the inbound record's platform
    /// properties.
    pub headers: HashMap<String, Value>,
}

impl PropertySet {
    /// Applies the set to an exchange, overwriting colliding keys.
    pub fn apply_to(&self, exchange: &mut Exchange) {
        for (key, value) in &self.properties {
            exchange.set_property(key.clone(), value.clone());
        }
        for (key, value) in &self.headers {
            exchange.message_mut().set_header(key.clone(), value.clone());
        }
    }
}

/// Translates an inbound record's metadata into exchange properties and
/// message headers.
///
/// Mandatory metadata (function id, output topic, record topic, schema)
/// is always present; the key and partition fields appear only when the
/// record carries them. Platform properties are copied verbatim into the
/// header map as string values.
#[must_use]
pub fn build_exchange_properties(inbound: &InboundRecord, ctx: &FunctionContext) -> PropertySet {
    let mut properties = HashMap::new();
    properties.insert(PROP_FUNCTION_ID.to_string(), Value::from(ctx.function_id()));
    properties.insert(PROP_OUTPUT_TOPIC.to_string(), Value::from(ctx.output_topic()));
    properties.insert(PROP_RECORD_TOPIC.to_string(), Value::from(inbound.topic()));
    properties.insert(
        PROP_RECORD_SCHEMA.to_string(),
        Value::opaque(inbound.schema().clone()),
    );

    if let Some(key) = inbound.key() {
        properties.insert(PROP_RECORD_KEY.to_string(), Value::from(key));
    }
    if let Some(id) = inbound.partition_id() {
        properties.insert(PROP_PARTITION_ID.to_string(), Value::from(id));
    }
    if let Some(index) = inbound.partition_index() {
        properties.insert(PROP_PARTITION_INDEX.to_string(), Value::from(index));
    }

    let headers = inbound
        .properties()
        .iter()
        .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
        .collect();

    PropertySet { properties, headers }
}

/// Outbound metadata resolved from a result exchange.
#[derive(Debug, Clone)]
pub struct OutboundMetadata {
    /// Resolved destination topic.
    pub topic: String,

    /// Resolved outbound schema.
    pub schema: SchemaDescriptor,

    /// Result headers coerced to record properties.
    pub properties: HashMap<String, String>,

    /// Number of result headers dropped for lack of a string form.
    pub headers_dropped: u64,
}

/// Resolves the outbound topic, schema, and record properties from a
/// result exchange.
///
/// The topic comes from [`PROP_OUTPUT_TOPIC`] when the route set one and
/// it coerces to a string; otherwise `fallback_topic`. The schema comes
/// from [`PROP_RECORD_SCHEMA`] when it still holds a
/// [`SchemaDescriptor`]; otherwise `fallback_schema`. Every result header
/// is coerced to a string; headers with no string form are logged and
/// skipped, never failing the record.
#[must_use]
pub fn extract_outbound_metadata(
    result: &Exchange,
    fallback_topic: &str,
    fallback_schema: &SchemaDescriptor,
) -> OutboundMetadata {
    let topic = match result.property(PROP_OUTPUT_TOPIC) {
        Some(value) => match value.coerce_to_string() {
            Ok(topic) => topic,
            Err(e) => {
                warn!(
                    error = %e,
                    fallback = fallback_topic,
                    "output topic override unusable, using configured topic"
                );
                fallback_topic.to_string()
            }
        },
        None => fallback_topic.to_string(),
    };

    let schema = match result.property(PROP_RECORD_SCHEMA) {
        Some(value) => match value.downcast_ref::<SchemaDescriptor>() {
            Some(schema) => schema.clone(),
            None => {
                warn!(
                    kind = value.kind(),
                    fallback = %fallback_schema,
                    "schema override is not a schema descriptor, using inbound schema"
                );
                fallback_schema.clone()
            }
        },
        None => fallback_schema.clone(),
    };

    let mut properties = HashMap::new();
    let mut headers_dropped = 0u64;
    for (key, value) in result.message().headers() {
        match value.coerce_to_string() {
            Ok(text) => {
                properties.insert(key.clone(), text);
            }
            Err(e) => {
                warn!(
                    header = key.as_str(),
                    error = %e,
                    "dropping result header with no string form"
                );
                headers_dropped += 1;
            }
        }
    }

    OutboundMetadata {
        topic,
        schema,
        properties,
        headers_dropped,
    }
}
