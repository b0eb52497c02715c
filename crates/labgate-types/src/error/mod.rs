//! Typed error definitions for Labgate.
//!
//! All errors are designed to be:
//!
//! - **Serializable** for API responses via serde
//! - **Displayable** for logging via Display trait
//! - **Matchable** for error handling logic via enum variants

mod body;
mod proxy;

pub use body::ErrorBody;
pub use proxy::ProxyError;
