//! # Labgate Core
//!
//! Proxy business logic for the Labgate gateway.
//!
//! ```text
//! labgate-core/src/
//! ├── config.rs         # upstream base URLs from the environment
//! └── proxy/
//!     ├── retry/        # bounded retry with exponential backoff + jitter
//!     ├── chat.rs       # notes-chat proxy (timeout, normalization, RAG fallback)
//!     └── experiment.rs # experiment-generation proxy (prompt, reshaping)
//! ```
//!
//! Each request is handled by one isolated coroutine-like flow: no shared
//! mutable state crosses concurrent requests, and backoff waits are passive
//! timers that never block other requests.

pub mod config;
pub mod proxy;

pub use config::ProxyConfig;
pub use proxy::{ChatProxy, ExperimentProxy, RetryPolicy};
