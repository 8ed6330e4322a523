//! Declarative route definitions.
//!
//! A [`RouteDefinition`] packages the text of a pipeline definition together
//! with the language it is written in. The engine parses and materializes
//! the route; this crate only moves it across the boundary.

/// A declarative pipeline definition, loaded once and executed per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefinition {
    name: String,
    language: String,
    text: String,
}

impl RouteDefinition {
    /// Creates a route definition.
    ///
    /// # Arguments
    ///
    /// * `name` — Identifier for the loaded route, unique per engine.
    /// * `language` — The definition language (e.g. `yaml`).
    /// * `text` — The route definition itself.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        language: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            text: text.into(),
        }
    }

    /// Returns the route name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the definition language.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns the route definition text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the resource name the engine loads the route under.
    ///
    /// Engines that dispatch parsers on file extensions see the language
    /// as the extension, e.g. `my-fn.yaml`.
    #[must_use]
    pub fn resource_name(&self) -> String {
        format!("{}.{}", self.name, self.language)
    }
}
