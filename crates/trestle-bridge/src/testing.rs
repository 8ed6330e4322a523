//! Testing utilities for bridge and route development.
//!
//! Provides a mock pipeline engine and canonical sample values for testing
//! the bridge without a real routing engine.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

use trestle_pipeline::{EngineError, Exchange, PipelineEngine, RouteDefinition};

use crate::context::FunctionContext;
use crate::record::{InboundRecord, SchemaDescriptor};

/// Creates the function context used across tests: function `fn-1`
/// writing to `t1-out`.
#[must_use]
pub fn sample_context() -> FunctionContext {
    FunctionContext::new("fn-1", "t1-out")
}

/// Creates a keyed inbound record on topic `t1` with body `hello` and no
/// platform properties.
#[must_use]
pub fn sample_inbound() -> InboundRecord {
    InboundRecord::new("t1", SchemaDescriptor::new("raw").with_version(1), "hello")
        .with_key("k1")
}

type Transform = Box<dyn Fn(&mut Exchange) + Send + Sync>;

/// Mock pipeline engine for testing.
///
/// Behaves as an identity pipeline by default: every request returns the
/// exchange exactly as `populate` filled it. A transform hook simulates
/// route behavior, and each lifecycle operation can be made to fail.
/// Calls are recorded for inspection.
pub struct MockPipelineEngine {
    loaded: Mutex<Vec<RouteDefinition>>,
    started: AtomicBool,
    shutdown_count: AtomicU64,
    request_count: AtomicU64,
    last_endpoint: Mutex<Option<String>>,
    transform: Option<Transform>,
    fail_load: Option<String>,
    fail_start: Option<String>,
    fail_request: Option<String>,
    fail_next: Mutex<Option<String>>,
    fail_shutdown: Option<String>,
}

impl MockPipelineEngine {
    /// Creates an identity mock engine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            loaded: Mutex::new(Vec::new()),
            started: AtomicBool::new(false),
            shutdown_count: AtomicU64::new(0),
            request_count: AtomicU64::new(0),
            last_endpoint: Mutex::new(None),
            transform: None,
            fail_load: None,
            fail_start: None,
            fail_request: None,
            fail_next: Mutex::new(None),
            fail_shutdown: None,
        }
    }

    /// Applies `transform` to every exchange after `populate`, simulating
    /// what a route would do to it.
    #[must_use]
    pub fn with_transform(
        mut self,
        transform: impl Fn(&mut Exchange) + Send + Sync + 'static,
    ) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    /// Makes every `load_route` call fail.
    #[must_use]
    pub fn fail_on_load(mut self, message: impl Into<String>) -> Self {
        self.fail_load = Some(message.into());
        self
    }

    /// Makes every `start` call fail.
    #[must_use]
    pub fn fail_on_start(mut self, message: impl Into<String>) -> Self {
        self.fail_start = Some(message.into());
        self
    }

    /// Makes every `request` call fail.
    #[must_use]
    pub fn fail_on_request(mut self, message: impl Into<String>) -> Self {
        self.fail_request = Some(message.into());
        self
    }

    /// Makes only the next `request` call fail; later ones succeed.
    #[must_use]
    pub fn fail_next_request(self, message: impl Into<String>) -> Self {
        *self.fail_next.lock() = Some(message.into());
        self
    }

    /// Makes every `shutdown` call fail.
    #[must_use]
    pub fn fail_on_shutdown(mut self, message: impl Into<String>) -> Self {
        self.fail_shutdown = Some(message.into());
        self
    }

    /// Returns the routes loaded so far.
    #[must_use]
    pub fn loaded_routes(&self) -> Vec<RouteDefinition> {
        self.loaded.lock().clone()
    }

    /// Returns `true` if `start` succeeded.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Relaxed)
    }

    /// Returns `true` if `shutdown` was attempted at least once.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shutdown_count() > 0
    }

    /// Returns the number of `shutdown` attempts.
    #[must_use]
    pub fn shutdown_count(&self) -> u64 {
        self.shutdown_count.load(Ordering::Relaxed)
    }

    /// Returns the number of `request` calls received.
    #[must_use]
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Returns the endpoint of the most recent request.
    #[must_use]
    pub fn last_endpoint(&self) -> Option<String> {
        self.last_endpoint.lock().clone()
    }
}

impl Default for MockPipelineEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MockPipelineEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockPipelineEngine")
            .field("started", &self.is_started())
            .field("requests", &self.request_count())
            .finish_non_exhaustive()
    }
}

impl PipelineEngine for MockPipelineEngine {
    fn load_route(&self, route: &RouteDefinition) -> Result<(), EngineError> {
        if let Some(msg) = &self.fail_load {
            return Err(EngineError::RouteLoad(msg.clone()));
        }
        self.loaded.lock().push(route.clone());
        Ok(())
    }

    fn start(&self) -> Result<(), EngineError> {
        if let Some(msg) = &self.fail_start {
            return Err(EngineError::Start(msg.clone()));
        }
        self.started.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn request(
        &self,
        endpoint: &str,
        populate: &mut dyn FnMut(&mut Exchange),
    ) -> Result<Exchange, EngineError> {
        if !self.started.load(Ordering::Relaxed) {
            return Err(EngineError::NotRunning);
        }
        self.request_count.fetch_add(1, Ordering::Relaxed);
        *self.last_endpoint.lock() = Some(endpoint.to_string());

        if let Some(msg) = self.fail_next.lock().take() {
            return Err(EngineError::Execution(msg));
        }
        if let Some(msg) = &self.fail_request {
            return Err(EngineError::Execution(msg.clone()));
        }

        let mut exchange = Exchange::new();
        populate(&mut exchange);
        if let Some(transform) = &self.transform {
            transform(&mut exchange);
        }
        Ok(exchange)
    }

    fn shutdown(&self) -> Result<(), EngineError> {
        self.shutdown_count.fetch_add(1, Ordering::Relaxed);
        self.started.store(false, Ordering::Relaxed);
        if let Some(msg) = &self.fail_shutdown {
            return Err(EngineError::Shutdown(msg.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trestle_pipeline::Value;

    #[test]
    fn test_mock_engine_identity_request() {
        let engine = MockPipelineEngine::new();
        engine
            .load_route(&RouteDefinition::new("r", "yaml", "- from: direct:in"))
            .unwrap();
        engine.start().unwrap();

        let result = engine
            .request("direct:in", &mut |ex| {
                ex.message_mut().set_body("ping");
                ex.set_property("p", 1i64);
            })
            .unwrap();

        assert_eq!(result.message().body(), &Value::Str("ping".into()));
        assert_eq!(result.property("p"), Some(&Value::Int(1)));
        assert_eq!(engine.request_count(), 1);
        assert_eq!(engine.last_endpoint().as_deref(), Some("direct:in"));
        assert_eq!(engine.loaded_routes().len(), 1);
    }

    #[test]
    fn test_mock_engine_rejects_requests_before_start() {
        let engine = MockPipelineEngine::new();
        let err = engine.request("direct:in", &mut |_| {}).unwrap_err();
        assert!(matches!(err, EngineError::NotRunning));
    }

    #[test]
    fn test_mock_engine_transform_runs_after_populate() {
        let engine = MockPipelineEngine::new().with_transform(|ex| {
            ex.message_mut().set_body("transformed");
        });
        engine.start().unwrap();

        let result = engine
            .request("direct:in", &mut |ex| ex.message_mut().set_body("original"))
            .unwrap();
        assert_eq!(result.message().body(), &Value::Str("transformed".into()));
    }

    #[test]
    fn test_mock_engine_fail_next_is_one_shot() {
        let engine = MockPipelineEngine::new().fail_next_request("once");
        engine.start().unwrap();

        assert!(engine.request("direct:in", &mut |_| {}).is_err());
        assert!(engine.request("direct:in", &mut |_| {}).is_ok());
    }

    #[test]
    fn test_mock_engine_persistent_failures() {
        let engine = MockPipelineEngine::new().fail_on_request("always");
        engine.start().unwrap();
        assert!(engine.request("direct:in", &mut |_| {}).is_err());
        assert!(engine.request("direct:in", &mut |_| {}).is_err());

        let failing = MockPipelineEngine::new().fail_on_shutdown("stuck");
        failing.start().unwrap();
        assert!(failing.shutdown().is_err());
        assert_eq!(failing.shutdown_count(), 1);
    }

    #[test]
    fn test_sample_values() {
        assert_eq!(sample_context().output_topic(), "t1-out");
        let inbound = sample_inbound();
        assert_eq!(inbound.topic(), "t1");
        assert_eq!(inbound.key(), Some("k1"));
        assert!(inbound.properties().is_empty());
    }
}
