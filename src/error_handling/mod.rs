//! Error handling.
//!
//! Error types are categorized into:
//! - **Validation**: configuration or interceptor bundle rejected before any network activity
//! - **Request failed**: the server answered with a non-success status
//! - **Transport**: the injected transport failed or was aborted, propagated unchanged
//! - **Cache**: on-disk page cache I/O, propagated unchanged
//!
//! Nothing here retries. Retry policies belong in caller-supplied interceptors.

mod types;

pub use types::{
    Error, FieldIssue, InitializationError, RequestFailedError, Result, TransportError,
    ValidationError,
};
