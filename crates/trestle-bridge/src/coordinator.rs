//! Bridge coordinator — connects a function host to a [`PipelineEngine`].
//!
//! [`BridgeCoordinator`] owns one engine instance for the lifetime of the
//! function: it loads the configured route at initialization, submits one
//! synchronous request per inbound record, and shuts the engine down on
//! close.

use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use trestle_pipeline::{Exchange, PipelineEngine, RouteDefinition};

use crate::config::BridgeConfig;
use crate::context::FunctionContext;
use crate::error::BridgeError;
use crate::health::HealthStatus;
use crate::mapper;
use crate::metrics::BridgeMetrics;
use crate::record::{InboundRecord, OutboundRecord};

/// The route endpoint every request enters the pipeline through.
///
/// Route authors bind their route's consumer to this endpoint.
pub const ENTRY_ENDPOINT: &str = "direct:in";

/// State of a bridge coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    /// Coordinator has been created but not yet initialized.
    Created,
    /// The route is loaded but the engine is not started.
    Initialized,
    /// The engine is running and records are accepted.
    Running,
    /// The coordinator has been closed.
    Closed,
}

impl fmt::Display for BridgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BridgeState::Created => "Created",
            BridgeState::Initialized => "Initialized",
            BridgeState::Running => "Running",
            BridgeState::Closed => "Closed",
        };
        f.write_str(name)
    }
}

/// Bridges a function host to a routing-pipeline engine.
///
/// One inbound record in, one outbound record out, synchronously. The
/// coordinator is `Send + Sync`; hosts may call
/// [`process`](Self::process) concurrently from multiple worker threads.
/// `initialize` and `close` are expected once each, outside the
/// processing window.
pub struct BridgeCoordinator {
    engine: Arc<dyn PipelineEngine>,
    state: RwLock<BridgeState>,
    metrics: BridgeMetrics,
}

impl BridgeCoordinator {
    /// Creates a coordinator around an engine instance.
    #[must_use]
    pub fn new(engine: Arc<dyn PipelineEngine>) -> Self {
        Self {
            engine,
            state: RwLock::new(BridgeState::Created),
            metrics: BridgeMetrics::new(),
        }
    }

    /// Loads the configured route and starts the engine.
    ///
    /// The route is registered under the function's identifier with the
    /// configured definition language. A load or start failure is fatal:
    /// the error propagates and the coordinator never reaches
    /// [`BridgeState::Running`].
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::InvalidState` if the coordinator was already
    /// initialized, or the engine's error if loading or starting fails.
    pub fn initialize(
        &self,
        config: &BridgeConfig,
        ctx: &FunctionContext,
    ) -> Result<(), BridgeError> {
        let mut state = self.state.write();
        if *state != BridgeState::Created {
            return Err(BridgeError::InvalidState {
                expected: BridgeState::Created.to_string(),
                actual: state.to_string(),
            });
        }

        let route = RouteDefinition::new(
            ctx.function_id(),
            config.route_language(),
            config.route(),
        );
        info!(
            function_id = ctx.function_id(),
            language = config.route_language(),
            resource = route.resource_name().as_str(),
            "loading route"
        );
        self.engine.load_route(&route)?;
        *state = BridgeState::Initialized;

        self.engine.start()?;
        *state = BridgeState::Running;
        info!(function_id = ctx.function_id(), "bridge running");
        Ok(())
    }

    /// Processes one inbound record through the pipeline.
    ///
    /// Builds the exchange properties for the record, submits a blocking
    /// request to [`ENTRY_ENDPOINT`], and converts the result exchange
    /// into an outbound record. The outbound topic and schema fall back to
    /// the context's output topic and the inbound schema unless the route
    /// overrode them.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::InvalidState` if the coordinator is not
    /// running, or the engine's error if the pipeline fails. A failed
    /// record leaves the coordinator ready for the next one.
    pub fn process(
        &self,
        inbound: &InboundRecord,
        ctx: &FunctionContext,
    ) -> Result<OutboundRecord, BridgeError> {
        {
            let state = self.state.read();
            if *state != BridgeState::Running {
                return Err(BridgeError::InvalidState {
                    expected: BridgeState::Running.to_string(),
                    actual: state.to_string(),
                });
            }
        }

        let seed = mapper::build_exchange_properties(inbound, ctx);
        let body = inbound.body().clone();
        let mut populate = |exchange: &mut Exchange| {
            exchange.message_mut().set_body(body.clone());
            seed.apply_to(exchange);
        };

        let result = match self.engine.request(ENTRY_ENDPOINT, &mut populate) {
            Ok(result) => result,
            Err(e) => {
                self.metrics.record_failure();
                return Err(e.into());
            }
        };

        let meta = mapper::extract_outbound_metadata(&result, ctx.output_topic(), inbound.schema());
        if meta.headers_dropped > 0 {
            self.metrics.record_dropped_headers(meta.headers_dropped);
        }

        let outbound = OutboundRecord::builder(meta.schema)
            .destination_topic(meta.topic)
            .body(result.into_message().into_body())
            .properties(meta.properties)
            .build()?;

        self.metrics.record_success();
        debug!(
            topic = outbound.destination_topic(),
            dropped_headers = meta.headers_dropped,
            "record processed"
        );
        Ok(outbound)
    }

    /// Shuts the engine down and marks the coordinator closed.
    ///
    /// Idempotent: closing an already-closed coordinator is a no-op, and
    /// closing one that never initialized merely marks it closed. The
    /// coordinator ends up [`BridgeState::Closed`] even when engine
    /// shutdown fails.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if shutdown fails.
    pub fn close(&self) -> Result<(), BridgeError> {
        let mut state = self.state.write();
        match *state {
            BridgeState::Closed => Ok(()),
            BridgeState::Created => {
                *state = BridgeState::Closed;
                Ok(())
            }
            BridgeState::Initialized | BridgeState::Running => {
                let result = self.engine.shutdown();
                *state = BridgeState::Closed;
                match result {
                    Ok(()) => {
                        info!("bridge closed");
                        Ok(())
                    }
                    Err(e) => {
                        warn!(error = %e, "engine shutdown failed, bridge marked closed");
                        Err(e.into())
                    }
                }
            }
        }
    }

    /// Returns the current coordinator state.
    #[must_use]
    pub fn state(&self) -> BridgeState {
        *self.state.read()
    }

    /// Returns the bridge's health, derived from its state and metrics.
    ///
    /// A running bridge that has seen record failures reports
    /// [`HealthStatus::Degraded`] with the failure count; it keeps
    /// accepting records either way.
    #[must_use]
    pub fn health(&self) -> HealthStatus {
        match self.state() {
            BridgeState::Created | BridgeState::Initialized => HealthStatus::Starting,
            BridgeState::Running => {
                let records_failed = self.metrics.records_failed.load(Ordering::Relaxed);
                if records_failed > 0 {
                    HealthStatus::Degraded { records_failed }
                } else {
                    HealthStatus::Healthy
                }
            }
            BridgeState::Closed => HealthStatus::Closed,
        }
    }

    /// Returns the bridge metrics.
    #[must_use]
    pub fn metrics(&self) -> &BridgeMetrics {
        &self.metrics
    }
}

impl fmt::Debug for BridgeCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeCoordinator")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SchemaDescriptor;
    use crate::testing::{sample_context, sample_inbound, MockPipelineEngine};
    use trestle_pipeline::Value;

    fn running_coordinator(engine: Arc<MockPipelineEngine>) -> BridgeCoordinator {
        let coordinator = BridgeCoordinator::new(engine);
        let config = BridgeConfig::new("- from: direct:in", "yaml");
        coordinator
            .initialize(&config, &sample_context())
            .unwrap();
        coordinator
    }

    #[test]
    fn test_lifecycle_happy_path() {
        let engine = Arc::new(MockPipelineEngine::new());
        let coordinator = BridgeCoordinator::new(engine.clone());
        assert_eq!(coordinator.state(), BridgeState::Created);

        let config = BridgeConfig::new("- from: direct:in", "yaml");
        coordinator
            .initialize(&config, &sample_context())
            .unwrap();
        assert_eq!(coordinator.state(), BridgeState::Running);
        assert!(engine.is_started());

        let loaded = engine.loaded_routes();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name(), sample_context().function_id());
        assert_eq!(loaded[0].language(), "yaml");

        coordinator.close().unwrap();
        assert_eq!(coordinator.state(), BridgeState::Closed);
        assert!(engine.is_shut_down());

        // Second close is a no-op
        coordinator.close().unwrap();
        assert_eq!(engine.shutdown_count(), 1);
    }

    #[test]
    fn test_double_initialize_rejected() {
        let engine = Arc::new(MockPipelineEngine::new());
        let coordinator = running_coordinator(engine);

        let config = BridgeConfig::new("- from: direct:in", "yaml");
        let err = coordinator
            .initialize(&config, &sample_context())
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidState { .. }));
    }

    #[test]
    fn test_process_requires_running() {
        let coordinator = BridgeCoordinator::new(Arc::new(MockPipelineEngine::new()));
        let err = coordinator
            .process(&sample_inbound(), &sample_context())
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::InvalidState { ref actual, .. } if actual == "Created"
        ));

        coordinator.close().unwrap();
        let err = coordinator
            .process(&sample_inbound(), &sample_context())
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::InvalidState { ref actual, .. } if actual == "Closed"
        ));
    }

    #[test]
    fn test_load_failure_leaves_created() {
        let engine = Arc::new(MockPipelineEngine::new().fail_on_load("bad yaml"));
        let coordinator = BridgeCoordinator::new(engine);
        let config = BridgeConfig::new("not yaml at all", "yaml");

        let err = coordinator
            .initialize(&config, &sample_context())
            .unwrap_err();
        assert!(matches!(err, BridgeError::Engine(_)));
        assert_eq!(coordinator.state(), BridgeState::Created);
    }

    #[test]
    fn test_start_failure_leaves_initialized() {
        let engine = Arc::new(MockPipelineEngine::new().fail_on_start("no threads"));
        let coordinator = BridgeCoordinator::new(engine.clone());
        let config = BridgeConfig::new("- from: direct:in", "yaml");

        let err = coordinator
            .initialize(&config, &sample_context())
            .unwrap_err();
        assert!(matches!(err, BridgeError::Engine(_)));
        assert_eq!(coordinator.state(), BridgeState::Initialized);

        // Close is still safe from Initialized
        coordinator.close().unwrap();
        assert!(engine.is_shut_down());
    }

    #[test]
    fn test_process_identity_record() {
        let engine = Arc::new(MockPipelineEngine::new());
        let coordinator = running_coordinator(engine.clone());

        let outbound = coordinator
            .process(&sample_inbound(), &sample_context())
            .unwrap();

        assert_eq!(outbound.destination_topic(), sample_context().output_topic());
        assert_eq!(outbound.schema(), sample_inbound().schema());
        assert_eq!(outbound.body(), sample_inbound().body());
        assert_eq!(engine.request_count(), 1);
        assert_eq!(coordinator.metrics().snapshot().records_processed, 1);
    }

    #[test]
    fn test_process_failure_then_success() {
        let engine = Arc::new(MockPipelineEngine::new().fail_next_request("step blew up"));
        let coordinator = running_coordinator(engine);

        let err = coordinator
            .process(&sample_inbound(), &sample_context())
            .unwrap_err();
        assert!(matches!(err, BridgeError::Engine(_)));
        assert_eq!(coordinator.metrics().snapshot().records_failed, 1);
        assert_eq!(coordinator.state(), BridgeState::Running);

        // The failure is per-record: the next one goes through
        coordinator
            .process(&sample_inbound(), &sample_context())
            .unwrap();
        assert_eq!(coordinator.metrics().snapshot().records_processed, 1);
    }

    #[test]
    fn test_process_counts_dropped_headers() {
        let engine = Arc::new(MockPipelineEngine::new().with_transform(|exchange| {
            exchange.message_mut().set_header("ok", "fine");
            exchange.message_mut().set_header("bad", Value::Null);
        }));
        let coordinator = running_coordinator(engine);

        let outbound = coordinator
            .process(&sample_inbound(), &sample_context())
            .unwrap();
        assert_eq!(outbound.properties().get("ok").map(String::as_str), Some("fine"));
        assert!(!outbound.properties().contains_key("bad"));
        assert_eq!(coordinator.metrics().snapshot().headers_dropped, 1);
    }

    #[test]
    fn test_route_can_redirect_topic_and_schema() {
        let replacement = SchemaDescriptor::new("json-generic");
        let replacement_for_transform = replacement.clone();
        let engine = Arc::new(MockPipelineEngine::new().with_transform(move |exchange| {
            exchange.set_property(mapper::PROP_OUTPUT_TOPIC, "elsewhere");
            exchange.set_property(
                mapper::PROP_RECORD_SCHEMA,
                Value::opaque(replacement_for_transform.clone()),
            );
        }));
        let coordinator = running_coordinator(engine);

        let outbound = coordinator
            .process(&sample_inbound(), &sample_context())
            .unwrap();
        assert_eq!(outbound.destination_topic(), "elsewhere");
        assert_eq!(outbound.schema(), &replacement);
    }

    #[test]
    fn test_close_propagates_shutdown_error_but_closes() {
        let engine = Arc::new(MockPipelineEngine::new().fail_on_shutdown("hung consumer"));
        let coordinator = running_coordinator(engine);

        let err = coordinator.close().unwrap_err();
        assert!(matches!(err, BridgeError::Engine(_)));
        assert_eq!(coordinator.state(), BridgeState::Closed);

        // Retry is a no-op, not a second shutdown attempt
        coordinator.close().unwrap();
    }

    #[test]
    fn test_health_follows_state_and_failures() {
        let engine = Arc::new(MockPipelineEngine::new().fail_next_request("boom"));
        let coordinator = BridgeCoordinator::new(engine);
        assert_eq!(coordinator.health(), HealthStatus::Starting);

        let config = BridgeConfig::new("- from: direct:in", "yaml");
        coordinator
            .initialize(&config, &sample_context())
            .unwrap();
        assert!(coordinator.health().is_healthy());

        let _ = coordinator.process(&sample_inbound(), &sample_context());
        assert_eq!(
            coordinator.health(),
            HealthStatus::Degraded { records_failed: 1 }
        );
        assert!(coordinator.health().accepts_records());

        coordinator.close().unwrap();
        assert_eq!(coordinator.health(), HealthStatus::Closed);
    }

    #[test]
    fn test_debug_output_shows_state() {
        let coordinator = BridgeCoordinator::new(Arc::new(MockPipelineEngine::new()));
        let text = format!("{coordinator:?}");
        assert!(text.contains("Created"));
    }
}
