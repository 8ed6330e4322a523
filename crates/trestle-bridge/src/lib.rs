//! # Trestle Bridge
//!
//! Bridges a streaming-messaging function host to an embedded
//! routing-pipeline engine: one inbound record in, one routed outbound
//! record out, with platform metadata preserved across the engine
//! boundary.
//!
//! ## Modules
//!
//! - [`coordinator`] - Engine lifecycle and the per-record protocol
//! - [`mapper`] - Pure metadata ↔ exchange-property translation
//! - [`record`] - Platform record types
//! - [`config`] - User and bridge configuration
//! - [`testing`] - Mock engine and sample values
//!
//! ## Flow
//!
//! ```text
//! InboundRecord ──▶ BridgeCoordinator::process
//!                        │ mapper::build_exchange_properties
//!                        ▼
//!                 PipelineEngine::request("direct:in")   (blocking)
//!                        │ result Exchange
//!                        ▼
//!                 mapper::extract_outbound_metadata
//!                        │
//!                        ▼
//!                 OutboundRecord (topic/schema fall back to the
//!                 configured output topic and inbound schema)
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Bridge error types.
pub mod error;

/// User and bridge configuration.
pub mod config;

/// Invocation context supplied by the function host.
pub mod context;

/// Platform record types.
pub mod record;

/// Metadata translation between records and exchanges.
pub mod mapper;

/// Engine lifecycle and per-record processing.
pub mod coordinator;

/// Bridge metrics types.
pub mod metrics;

/// Bridge health reporting.
pub mod health;

/// Testing utilities (mock engine, sample values).
pub mod testing;
