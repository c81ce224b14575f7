//! Service plumbing shared across Parley services.

pub mod health;
pub mod middleware;
pub mod tracing;
