//! The pipeline engine boundary.
//!
//! [`PipelineEngine`] is the capability contract an embedded routing engine
//! presents to its host: load declarative routes, start, answer synchronous
//! requests, shut down. Hosts hold an engine as `Arc<dyn PipelineEngine>`
//! and never see past this trait.

use thiserror::Error;

use crate::exchange::Exchange;
use crate::route::RouteDefinition;

/// A routing-pipeline engine embedded in a host process.
///
/// # Lifecycle
///
/// Routes are loaded first, then the engine is started; only a started
/// engine accepts requests. `shutdown` stops route consumers and releases
/// engine resources.
///
/// # Concurrency
///
/// Implementations must tolerate concurrent [`request`](Self::request)
/// calls from multiple threads; each call works on its own [`Exchange`].
pub trait PipelineEngine: Send + Sync {
    /// Loads a declarative route into the engine.
    ///
    /// Loading parses and registers the route but does not start its
    /// consumers.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RouteLoad`] if the definition cannot be
    /// parsed or registered.
    fn load_route(&self, route: &RouteDefinition) -> Result<(), EngineError>;

    /// Starts the engine and all loaded routes.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Start`] if the engine or any route fails to
    /// come up.
    fn start(&self) -> Result<(), EngineError>;

    /// Executes one synchronous request against a route endpoint.
    ///
    /// The engine creates a fresh exchange, lets `populate` fill in its
    /// body, properties, and headers, routes it from `endpoint`, and blocks
    /// the calling thread until the pipeline completes. The resulting
    /// exchange is returned by value.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotRunning`] if the engine has not been
    /// started, or [`EngineError::Execution`] if the pipeline fails while
    /// processing the exchange.
    fn request(
        &self,
        endpoint: &str,
        populate: &mut dyn FnMut(&mut Exchange),
    ) -> Result<Exchange, EngineError>;

    /// Stops the engine and releases its resources.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Shutdown`] if teardown fails.
    fn shutdown(&self) -> Result<(), EngineError>;
}

/// Errors surfaced by a [`PipelineEngine`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// A route definition could not be parsed or registered.
    #[error("route load failed: {0}")]
    RouteLoad(String),

    /// The engine failed to start.
    #[error("engine start failed: {0}")]
    Start(String),

    /// A pipeline failed while processing an exchange.
    #[error("pipeline execution failed: {0}")]
    Execution(String),

    /// The engine failed to shut down cleanly.
    #[error("engine shutdown failed: {0}")]
    Shutdown(String),

    /// A request reached an engine that is not running.
    #[error("engine is not running")]
    NotRunning,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::value::Value;

    // Minimal engine that echoes whatever populate produced.
    struct EchoEngine;

    impl PipelineEngine for EchoEngine {
        fn load_route(&self, _route: &RouteDefinition) -> Result<(), EngineError> {
            Ok(())
        }

        fn start(&self) -> Result<(), EngineError> {
            Ok(())
        }

        fn request(
            &self,
            _endpoint: &str,
            populate: &mut dyn FnMut(&mut Exchange),
        ) -> Result<Exchange, EngineError> {
            let mut exchange = Exchange::new();
            populate(&mut exchange);
            Ok(exchange)
        }

        fn shutdown(&self) -> Result<(), EngineError> {
            Ok(())
        }
    }

    #[test]
    fn test_engine_is_object_safe() {
        let engine: Arc<dyn PipelineEngine> = Arc::new(EchoEngine);
        let route = RouteDefinition::new("r", "yaml", "- from: direct:in");
        engine.load_route(&route).unwrap();
        engine.start().unwrap();

        let result = engine
            .request("direct:in", &mut |ex| ex.message_mut().set_body("ping"))
            .unwrap();
        assert_eq!(result.message().body(), &Value::Str("ping".into()));

        engine.shutdown().unwrap();
    }

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::RouteLoad("bad yaml at line 3".into());
        assert_eq!(err.to_string(), "route load failed: bad yaml at line 3");
        assert_eq!(EngineError::NotRunning.to_string(), "engine is not running");
    }
}
