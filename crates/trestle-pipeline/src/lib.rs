//! # Trestle Pipeline
//!
//! Boundary types for embedding a routing-pipeline engine in a host
//! process.
//!
//! This crate provides:
//! - **Value**: Dynamically typed payloads, including engine-opaque objects
//! - **Exchange**: The in-flight unit of work (body, properties, headers)
//! - **Route**: Declarative pipeline definitions
//! - **Engine**: The [`PipelineEngine`] capability trait and its errors
//!
//! It contains no engine implementation; concrete engines and test doubles
//! live with their hosts.

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod engine;
pub mod exchange;
pub mod route;
pub mod value;

// Re-export key types
pub use engine::{EngineError, PipelineEngine};
pub use exchange::{Exchange, Message};
pub use route::RouteDefinition;
pub use value::{CoercionError, Value};
