//! # Labgate Types
//!
//! Wire types and error definitions for the Labgate gateway.
//!
//! This crate provides the foundational type system for the gateway:
//!
//! - **`error`** - Proxy error taxonomy with inbound HTTP status mapping
//! - **`chat`** - Notes-chat request/reply shapes (inbound and upstream)
//! - **`experiment`** - Experiment-generation shapes and the platform schema
//!
//! ## Architecture Role
//!
//! `labgate-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!     labgate-types (this crate)
//!            │
//!            ▼
//!      labgate-core
//!            │
//!            ▼
//!     labgate-server
//! ```
//!
//! All types are designed to be:
//! - **Serializable** via serde for the JSON API
//! - **Clone** for cheap sharing across async boundaries

pub mod chat;
pub mod error;
pub mod experiment;

// Re-export error types for convenience
pub use error::{ErrorBody, ProxyError};
