//! Application layer: the readiness pipeline, payment request construction
//! and the per-attempt transaction orchestrator.
//!
//! [`client::WalletPayClient`] is the facade a host application talks to.

pub mod availability;
pub mod client;
pub mod events;
pub mod orchestrator;
pub mod payment_info;
