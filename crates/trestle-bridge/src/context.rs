//! Invocation context supplied by the function host.

/// Context the host provides for an invocation of the bridge.
///
/// Carries the identity of the function instance and the output topic the
/// host configured for it. The output topic is the default destination; a
/// pipeline may override it per record through the bridge's exchange
/// properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionContext {
    function_id: String,
    output_topic: String,
}

impl FunctionContext {
    /// Creates a function context.
    #[must_use]
    pub fn new(function_id: impl Into<String>, output_topic: impl Into<String>) -> Self {
        Self {
            function_id: function_id.into(),
            output_topic: output_topic.into(),
        }
    }

    /// Returns the function instance identifier.
    #[must_use]
    pub fn function_id(&self) -> &str {
        &self.function_id
    }

    /// Returns the configured output topic.
    #[must_use]
    pub fn output_topic(&self) -> &str {
        &self.output_topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_context_accessors() {
        let ctx = FunctionContext::new("fn-7", "orders-out");
        assert_eq!(ctx.function_id(), "fn-7");
        assert_eq!(ctx.output_topic(), "orders-out");
    }
}
