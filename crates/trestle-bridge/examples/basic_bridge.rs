//! Basic bridge example: configure a route, process a record, and print
//! the outbound result.
//!
//! Uses the mock engine as a stand-in for a real routing engine; the
//! simulated route uppercases the body and stamps a header.
//!
//! ```bash
//! cargo run --example basic_bridge
//! ```

use std::sync::Arc;

use trestle_bridge::config::{BridgeConfig, UserConfig};
use trestle_bridge::context::FunctionContext;
use trestle_bridge::coordinator::BridgeCoordinator;
use trestle_bridge::record::{InboundRecord, SchemaDescriptor};
use trestle_bridge::testing::MockPipelineEngine;
use trestle_pipeline::Value;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Configuration as the function host would deliver it
    let json = serde_json::json!({
        "route": "- from:\n    uri: direct:in\n    steps:\n      - setBody:\n          simple: \"${body.toUpperCase()}\"",
    });
    let user = UserConfig::from_json(&json)?;
    let config = BridgeConfig::from_user_config(&user)?;

    // A stand-in engine that behaves like the route above
    let engine = Arc::new(MockPipelineEngine::new().with_transform(|exchange| {
        if let Some(text) = exchange.message().body().as_str() {
            let upper = text.to_uppercase();
            exchange.message_mut().set_body(upper);
        }
        exchange.message_mut().set_header("processed-by", "demo-route");
    }));

    let ctx = FunctionContext::new("demo-fn", "orders-out");
    let bridge = BridgeCoordinator::new(engine);
    bridge.initialize(&config, &ctx)?;

    let inbound = InboundRecord::new("orders-in", SchemaDescriptor::new("string"), "hello bridge")
        .with_key("order-42")
        .with_property("trace-id", "abc-123");

    let outbound = bridge.process(&inbound, &ctx)?;

    println!("Destination: {}", outbound.destination_topic());
    println!("Schema:      {}", outbound.schema());
    if let Value::Str(body) = outbound.body() {
        println!("Body:        {body}");
    }
    println!("Properties:");
    for (key, value) in outbound.properties() {
        println!("  {key} = {value}");
    }

    bridge.close()?;
    println!("\nBridge closed. {:?}", bridge.metrics().snapshot());
    Ok(())
}
