//! Request and response interceptors.
//!
//! Interceptors are shared as `Arc<dyn ...>` trait objects so the same interceptor can
//! be registered on a profile, an instance and a single call while still running once.

mod bundle;
mod traits;

pub use bundle::InterceptorBundle;
pub use traits::{
    request_interceptor, response_interceptor, FnRequestInterceptor, FnResponseInterceptor,
    RequestInterceptor, ResponseInterceptor,
};
