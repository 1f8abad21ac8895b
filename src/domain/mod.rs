//! Domain types for wallet payments: readiness, sheets, requests and credentials.

pub mod card;
pub mod credential;
pub mod partner;
pub mod payment_request;
pub mod ports;
pub mod sheet;
pub mod status;
pub mod transaction;
