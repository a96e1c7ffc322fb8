//! Declarative validation of configurations and interceptor bundles.
//!
//! Validation runs once per send, after the final merge.

mod config_schema;
mod interceptors_schema;
mod rules;

pub use config_schema::{ConfigSchema, ValidatedConfig};
pub use interceptors_schema::InterceptorsSchema;
