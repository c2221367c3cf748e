//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `environment`: Environment variable and CLI loading tests
//! - `validation`: Configuration consistency and derived policy tests

mod environment;
mod helpers;
mod precedence;
