//! Adapters for the domain ports: an in-memory scripted wallet and telemetry sinks.

pub mod in_memory;
pub mod telemetry;
